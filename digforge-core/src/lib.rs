pub mod block;
pub mod coordinates;
pub mod save;
pub mod storage;
pub mod world;
pub mod worldgen;

pub use block::{Block, Column, EMPTY_COLUMN, SOLID_COLUMN};
pub use coordinates::{
    BLOCK_BITS, BLOCK_SIZE, BlockPosition, Coord, CoordError, LocalCoord, join, split,
    split_position,
};
pub use save::{BlockSave, SaveError, WorldSave};
pub use storage::BlockStore;
pub use world::World;
pub use worldgen::{FillPolicy, GROUND_LAYER_COLUMN, UnknownFillPolicy};
