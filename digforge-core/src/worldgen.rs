use crate::block::{Block, Column, EMPTY_COLUMN, SOLID_COLUMN};
use crate::coordinates::{BlockPosition, Coord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Column word of a block where only local `z = 0` is solid.
pub const GROUND_LAYER_COLUMN: Column = 1;

/// Decides the occupancy a block starts with, from its vertical block coordinate.
///
/// Every column of a fresh block gets the same word, so a read that misses the
/// store can be answered from [`FillPolicy::column`] without creating a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillPolicy {
    /// Negative blocks are solid, block `z = 0` has its lowest layer solid.
    #[default]
    GroundSlab,
    /// Only negative blocks are solid.
    BelowZero,
    /// Blocks at or below `z = 0` are solid.
    SolidGround,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fill policy {0:?}, expected ground-slab, below-zero or solid-ground")]
pub struct UnknownFillPolicy(pub String);

impl FillPolicy {
    pub const ALL: [FillPolicy; 3] = [
        FillPolicy::GroundSlab,
        FillPolicy::BelowZero,
        FillPolicy::SolidGround,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FillPolicy::GroundSlab => "ground-slab",
            FillPolicy::BelowZero => "below-zero",
            FillPolicy::SolidGround => "solid-ground",
        }
    }

    /// The word every column of a new block at vertical block coordinate `block_z` holds.
    pub fn column(self, block_z: &Coord) -> Column {
        if block_z.is_negative() {
            return SOLID_COLUMN;
        }
        if !block_z.is_zero() {
            return EMPTY_COLUMN;
        }

        match self {
            FillPolicy::GroundSlab => GROUND_LAYER_COLUMN,
            FillPolicy::BelowZero => EMPTY_COLUMN,
            FillPolicy::SolidGround => SOLID_COLUMN,
        }
    }

    pub fn is_solid(self, block_z: &Coord, local_z: u8) -> bool {
        self.column(block_z) >> local_z & 1 != 0
    }

    pub fn new_block(self, position: BlockPosition) -> Block {
        let column = self.column(&position.z);
        Block::filled(position, column)
    }
}

impl fmt::Display for FillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FillPolicy {
    type Err = UnknownFillPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FillPolicy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| UnknownFillPolicy(s.to_owned()))
    }
}
