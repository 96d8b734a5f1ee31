use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

pub const BLOCK_BITS: u32 = 6;
pub const BLOCK_SIZE: usize = 1 << BLOCK_BITS;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    #[error("invalid coordinate {0:?}: expected a decimal integer")]
    Invalid(String),
}

/// An exact, unbounded signed integer coordinate. Serialized as a decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Coord(BigInt);

impl Coord {
    pub fn new(value: impl Into<BigInt>) -> Self {
        Self(value.into())
    }

    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    pub fn succ(&self) -> Self {
        self + 1
    }

    pub fn pred(&self) -> Self {
        self - 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_plain_decimal(s, true) {
            return Err(CoordError::Invalid(s.to_owned()));
        }
        BigInt::from_str(s)
            .map(Self)
            .map_err(|_| CoordError::Invalid(s.to_owned()))
    }
}

impl From<Coord> for String {
    fn from(coord: Coord) -> Self {
        coord.0.to_string()
    }
}

impl TryFrom<String> for Coord {
    type Error = CoordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BigInt> for Coord {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

impl From<i32> for Coord {
    fn from(value: i32) -> Self {
        Self(value.into())
    }
}

impl From<i64> for Coord {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<i128> for Coord {
    fn from(value: i128) -> Self {
        Self(value.into())
    }
}

impl Add<i64> for &Coord {
    type Output = Coord;

    fn add(self, delta: i64) -> Coord {
        Coord(&self.0 + BigInt::from(delta))
    }
}

impl Sub<i64> for &Coord {
    type Output = Coord;

    fn sub(self, delta: i64) -> Coord {
        Coord(&self.0 - BigInt::from(delta))
    }
}

impl AddAssign<i64> for Coord {
    fn add_assign(&mut self, delta: i64) {
        self.0 += BigInt::from(delta);
    }
}

impl SubAssign<i64> for Coord {
    fn sub_assign(&mut self, delta: i64) {
        self.0 -= BigInt::from(delta);
    }
}

/// Identifies one block: the floor of each global coordinate divided by [`BLOCK_SIZE`].
///
/// Ordering is lexicographic on `(x, y, z)` using exact integer comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPosition {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl BlockPosition {
    pub fn new(x: impl Into<Coord>, y: impl Into<Coord>, z: impl Into<Coord>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        }
    }

    pub fn origin(&self) -> (Coord, Coord, Coord) {
        (join(&self.x, 0), join(&self.y, 0), join(&self.z, 0))
    }
}

impl fmt::Display for BlockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.x, self.y, self.z)
    }
}

/// A voxel offset inside a block. Every component is in `[0, BLOCK_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalCoord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl LocalCoord {
    pub fn new(x: u8, y: u8, z: u8) -> Self {
        assert!(
            (x as usize) < BLOCK_SIZE && (y as usize) < BLOCK_SIZE && (z as usize) < BLOCK_SIZE,
            "local coordinate ({x}, {y}, {z}) outside of block"
        );
        Self { x, y, z }
    }
}

/// Splits a global coordinate into its block coordinate and local offset.
///
/// The block coordinate rounds toward negative infinity, so `-1` lands in block
/// `-1` at offset `63`.
pub fn split(global: &Coord) -> (Coord, u8) {
    let (block, local) = global.0.div_mod_floor(&BigInt::from(BLOCK_SIZE));
    (Coord(block), low_bits(&local))
}

pub fn split_position(x: &Coord, y: &Coord, z: &Coord) -> (BlockPosition, LocalCoord) {
    let (bx, lx) = split(x);
    let (by, ly) = split(y);
    let (bz, lz) = split(z);
    (
        BlockPosition { x: bx, y: by, z: bz },
        LocalCoord::new(lx, ly, lz),
    )
}

/// Inverse of [`split`]: `block * BLOCK_SIZE + local`.
pub fn join(block: &Coord, local: u8) -> Coord {
    assert!((local as usize) < BLOCK_SIZE, "local offset {local} outside of block");
    Coord((block.0.clone() << BLOCK_BITS) + BigInt::from(local))
}

// ASCII digits, with an optional leading `-` when `signed`.
pub(crate) fn is_plain_decimal(text: &str, signed: bool) -> bool {
    let digits = match text.strip_prefix('-') {
        Some(rest) if signed => rest,
        Some(_) => return false,
        None => text,
    };
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

// `value` is the floor remainder, already in [0, BLOCK_SIZE).
fn low_bits(value: &BigInt) -> u8 {
    value
        .iter_u32_digits()
        .next()
        .map_or(0, |digit| (digit & (BLOCK_SIZE as u32 - 1)) as u8)
}
