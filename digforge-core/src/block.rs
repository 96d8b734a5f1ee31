use crate::coordinates::{BLOCK_SIZE, BlockPosition, LocalCoord};
use crate::save::BlockSave;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `(x, y)` column of a block. Bit `z` is the solidity of local point `(x, y, z)`.
pub type Column = u64;

pub const EMPTY_COLUMN: Column = 0;
pub const SOLID_COLUMN: Column = Column::MAX;

pub type Columns = [[Column; BLOCK_SIZE]; BLOCK_SIZE];

/// A 64x64x64 cube of voxel occupancy, packed one bit per voxel.
///
/// The position is fixed at creation; the store remains the authority on
/// which block owns which position.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BlockSave", try_from = "BlockSave")]
pub struct Block {
    position: BlockPosition,
    solid: Columns,
}

impl Block {
    pub fn new(position: BlockPosition) -> Self {
        Self::filled(position, EMPTY_COLUMN)
    }

    pub fn filled(position: BlockPosition, column: Column) -> Self {
        Self::from_columns(position, [[column; BLOCK_SIZE]; BLOCK_SIZE])
    }

    pub fn from_columns(position: BlockPosition, solid: Columns) -> Self {
        Self { position, solid }
    }

    pub fn position(&self) -> &BlockPosition {
        &self.position
    }

    pub fn columns(&self) -> &Columns {
        &self.solid
    }

    pub fn column(&self, x: u8, y: u8) -> Column {
        self.solid[x as usize][y as usize]
    }

    pub fn get(&self, local: LocalCoord) -> bool {
        self.column(local.x, local.y) & bit(local.z) != 0
    }

    pub fn set(&mut self, local: LocalCoord) {
        *self.column_mut(local) |= bit(local.z);
    }

    pub fn unset(&mut self, local: LocalCoord) {
        *self.column_mut(local) &= !bit(local.z);
    }

    pub fn solid_count(&self) -> u32 {
        self.solid
            .iter()
            .flatten()
            .map(|column| column.count_ones())
            .sum()
    }

    fn column_mut(&mut self, local: LocalCoord) -> &mut Column {
        &mut self.solid[local.x as usize][local.y as usize]
    }
}

// Shifts mask their amount, so an unchecked z of 64 would land on z = 0.
fn bit(z: u8) -> Column {
    assert!((z as usize) < BLOCK_SIZE, "local z {z} outside of block");
    1 << z
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("position", &self.position)
            .field("solid_count", &self.solid_count())
            .finish()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block{}", self.position)
    }
}
