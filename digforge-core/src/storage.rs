use crate::block::Block;
use crate::coordinates::BlockPosition;
use crate::save::SaveError;
use crate::worldgen::FillPolicy;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::trace;

/// Sparse map from block positions to blocks.
///
/// Keys compare by exact integer value, so two lookups with value-equal
/// positions always reach the same block. Blocks are boxed and never removed,
/// which keeps their address stable for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    blocks: BTreeMap<BlockPosition, Box<Block>>,
    policy: FillPolicy,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::with_fill_policy(FillPolicy::default())
    }

    pub fn with_fill_policy(policy: FillPolicy) -> Self {
        Self {
            blocks: BTreeMap::new(),
            policy,
        }
    }

    pub fn fill_policy(&self) -> FillPolicy {
        self.policy
    }

    pub fn get(&self, position: &BlockPosition) -> Option<&Block> {
        self.blocks.get(position).map(Box::as_ref)
    }

    pub fn get_mut(&mut self, position: &BlockPosition) -> Option<&mut Block> {
        self.blocks.get_mut(position).map(Box::as_mut)
    }

    /// Returns the block at `position`, creating and default-filling it first if needed.
    pub fn get_or_create(&mut self, position: &BlockPosition) -> &mut Block {
        if !self.blocks.contains_key(position) {
            trace!(%position, policy = %self.policy, "materializing block");
        }

        let policy = self.policy;
        self.blocks
            .entry(position.clone())
            .or_insert_with_key(|key| Box::new(policy.new_block(key.clone())))
    }

    pub fn insert(&mut self, block: Block) -> Result<(), SaveError> {
        match self.blocks.entry(block.position().clone()) {
            Entry::Occupied(entry) => Err(SaveError::DuplicateBlock(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(Box::new(block));
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.values().map(Box::as_ref)
    }
}
