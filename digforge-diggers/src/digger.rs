use digforge_core::Coord;
use serde::{Deserialize, Serialize};

/// Moves a digger may take after a dig decision: the eight horizontal
/// neighbours, the same eight one level down, and straight down.
pub const DIG_OFFSETS: [[i64; 3]; 17] = [
    [1, 0, 0],
    [1, 1, 0],
    [0, 1, 0],
    [-1, 1, 0],
    [-1, 0, 0],
    [-1, -1, 0],
    [0, -1, 0],
    [1, -1, 0],
    [1, 0, -1],
    [1, 1, -1],
    [0, 1, -1],
    [-1, 1, -1],
    [-1, 0, -1],
    [-1, -1, -1],
    [0, -1, -1],
    [1, -1, -1],
    [0, 0, -1],
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digger {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Digger {
    pub fn new(x: impl Into<Coord>, y: impl Into<Coord>, z: impl Into<Coord>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    /// Vertical coordinate of the voxel the digger stands on.
    pub fn below(&self) -> Coord {
        self.z.pred()
    }

    pub fn shift(&mut self, [dx, dy, dz]: [i64; 3]) {
        if dx != 0 {
            self.x += dx;
        }
        if dy != 0 {
            self.y += dy;
        }
        if dz != 0 {
            self.z += dz;
        }
    }
}
