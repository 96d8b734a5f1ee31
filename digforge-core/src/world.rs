use crate::block::Block;
use crate::coordinates::{BlockPosition, Coord, split_position};
use crate::save::{BlockSave, SaveError, WorldSave};
use crate::storage::BlockStore;
use crate::worldgen::FillPolicy;
use tracing::debug;

/// Point-level access to an unbounded field of solid and empty voxels.
///
/// Reads never create blocks: a point in a block that does not exist yet is
/// answered from the fill policy. Writes materialize the owning block first,
/// so the rest of its default fill is kept.
#[derive(Debug, Clone, Default)]
pub struct World {
    store: BlockStore,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_policy(policy: FillPolicy) -> Self {
        Self {
            store: BlockStore::with_fill_policy(policy),
        }
    }

    pub fn fill_policy(&self) -> FillPolicy {
        self.store.fill_policy()
    }

    pub fn get(&self, x: &Coord, y: &Coord, z: &Coord) -> bool {
        let (position, local) = split_position(x, y, z);
        match self.store.get(&position) {
            Some(block) => block.get(local),
            None => self.store.fill_policy().is_solid(&position.z, local.z),
        }
    }

    pub fn set(&mut self, x: &Coord, y: &Coord, z: &Coord) {
        let (position, local) = split_position(x, y, z);
        self.store.get_or_create(&position).set(local);
    }

    pub fn unset(&mut self, x: &Coord, y: &Coord, z: &Coord) {
        let (position, local) = split_position(x, y, z);
        self.store.get_or_create(&position).unset(local);
    }

    pub fn block(&self, position: &BlockPosition) -> Option<&Block> {
        self.store.get(position)
    }

    pub fn materialize(&mut self, position: &BlockPosition) -> &mut Block {
        self.store.get_or_create(position)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> + '_ {
        self.store.iter()
    }

    pub fn block_count(&self) -> usize {
        self.store.len()
    }

    pub fn to_save(&self) -> WorldSave {
        WorldSave {
            blocks: self.blocks().map(BlockSave::from_block).collect(),
        }
    }

    /// Rebuilds a world from its saved blocks. Fails on malformed or duplicated blocks.
    pub fn from_save(save: WorldSave, policy: FillPolicy) -> Result<Self, SaveError> {
        let mut store = BlockStore::with_fill_policy(policy);
        for block in save.blocks {
            store.insert(Block::try_from(block)?)?;
        }
        debug!(blocks = store.len(), %policy, "restored world");
        Ok(Self { store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::LocalCoord;

    fn c(value: i64) -> Coord {
        Coord::from(value)
    }

    fn get(world: &World, x: i64, y: i64, z: i64) -> bool {
        world.get(&c(x), &c(y), &c(z))
    }

    #[test]
    fn fresh_world_uses_default_fill() {
        let world = World::new();
        assert!(get(&world, 0, 0, -1));
        assert!(get(&world, 0, 0, 0));
        assert!(!get(&world, 0, 0, 1));
        assert!(!get(&world, 0, 0, 64));
        assert!(get(&world, 12345, -999, -64));
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn set_keeps_default_fill_of_new_block() {
        let mut world = World::new();
        world.set(&c(0), &c(0), &c(1));

        assert_eq!(world.block_count(), 1);
        assert!(get(&world, 0, 0, 0));
        assert!(get(&world, 0, 0, 1));
        assert!(!get(&world, 0, 1, 1));
        assert!(!get(&world, 64, 0, 1));
    }

    #[test]
    fn boundary_table_after_set() {
        let mut world = World::new();
        world
            .materialize(&BlockPosition::new(0, 0, 0))
            .set(LocalCoord::new(0, 0, 1));

        let table: [(i64, i64, i64, bool); 32] = [
            (0, 0, 0, true),
            (0, 0, 1, true),
            (0, 1, 0, true),
            (0, 1, 1, false),
            (1, 0, 0, true),
            (1, 0, 1, false),
            (1, 1, 0, true),
            (1, 1, 1, false),
            (64, 0, 0, true),
            (64, 0, 1, false),
            (64, 1, 0, true),
            (64, 1, 1, false),
            (65, 0, 0, true),
            (65, 0, 1, false),
            (65, 1, 0, true),
            (65, 1, 1, false),
            (0, 0, -64, true),
            (0, 0, -63, true),
            (0, 1, -64, true),
            (0, 1, -63, true),
            (1, 0, -64, true),
            (1, 0, -63, true),
            (1, 1, -64, true),
            (1, 1, -63, true),
            (0, 0, 64, false),
            (0, 0, 65, false),
            (0, 1, 64, false),
            (0, 1, 65, false),
            (1, 0, 64, false),
            (1, 0, 65, false),
            (1, 1, 64, false),
            (1, 1, 65, false),
        ];

        for (x, y, z, expected) in table {
            assert_eq!(get(&world, x, y, z), expected, "({x}, {y}, {z})");
        }
        assert_eq!(world.block_count(), 1);
    }

    #[test]
    fn set_and_unset_across_block_edges() {
        let mut world = World::new();
        for x in [63, 64, 65] {
            world.set(&c(x), &c(-1), &c(200));
        }
        assert!(get(&world, 63, -1, 200));
        assert!(get(&world, 64, -1, 200));
        assert!(get(&world, 65, -1, 200));
        assert!(!get(&world, 66, -1, 200));
        assert_eq!(world.block_count(), 2);

        world.unset(&c(64), &c(-1), &c(200));
        world.unset(&c(64), &c(-1), &c(200));
        assert!(get(&world, 63, -1, 200));
        assert!(!get(&world, 64, -1, 200));
        assert!(get(&world, 65, -1, 200));
    }

    #[test]
    fn unset_below_ground_digs_into_solid_block() {
        let mut world = World::new();
        world.unset(&c(-1), &c(-1), &c(-1));
        assert!(!get(&world, -1, -1, -1));
        assert!(get(&world, -2, -1, -1));
        assert!(get(&world, -1, -1, -2));
        assert_eq!(
            world.block(&BlockPosition::new(-1, -1, -1)).unwrap().solid_count(),
            64 * 64 * 64 - 1
        );
    }

    #[test]
    fn works_far_beyond_native_range() {
        let mut world = World::new();
        let far: Coord = "-1000000000000000000000000000000".parse().unwrap();
        let next = far.succ();

        assert!(world.get(&far, &far, &far));
        world.unset(&far, &far, &far);
        assert!(!world.get(&far, &far, &far));
        assert!(world.get(&next, &far, &far));

        let high: Coord = "1000000000000000000000000000000".parse().unwrap();
        assert!(!world.get(&high, &high, &high));
        world.set(&high, &high, &high);
        assert!(world.get(&high, &high, &high));
        assert_eq!(world.block_count(), 2);
    }

    #[test]
    fn fill_policy_is_configurable() {
        let world = World::with_fill_policy(FillPolicy::BelowZero);
        assert!(get(&world, 0, 0, -1));
        assert!(!get(&world, 0, 0, 0));

        let world = World::with_fill_policy(FillPolicy::SolidGround);
        assert!(get(&world, 0, 0, 63));
        assert!(!get(&world, 0, 0, 64));
    }

    #[test]
    fn save_round_trip_restores_every_block() {
        let mut world = World::new();
        world.set(&c(5), &c(6), &c(7));
        world.unset(&c(-100), &c(3), &c(-3));
        let huge: Coord = "-36893488147419103232".parse().unwrap();
        world.unset(&huge, &c(0), &c(-1));

        let json = world.to_save().to_json().unwrap();
        let restored =
            World::from_save(WorldSave::from_json(&json).unwrap(), FillPolicy::GroundSlab)
                .unwrap();

        assert_eq!(restored.block_count(), 3);
        for (a, b) in world.blocks().zip(restored.blocks()) {
            assert_eq!(a, b);
        }
        assert!(!restored.get(&huge, &c(0), &c(-1)));
    }

    #[test]
    fn from_save_rejects_duplicate_blocks() {
        let mut world = World::new();
        world.set(&c(0), &c(0), &c(0));
        let mut save = world.to_save();
        save.blocks.push(save.blocks[0].clone());

        assert!(matches!(
            World::from_save(save, FillPolicy::GroundSlab),
            Err(SaveError::DuplicateBlock(_))
        ));
    }
}
