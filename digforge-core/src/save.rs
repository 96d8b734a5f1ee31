use crate::block::{Block, Column, Columns, EMPTY_COLUMN};
use crate::coordinates::{BLOCK_SIZE, BlockPosition, Coord, is_plain_decimal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("block has {found} rows, expected {}", BLOCK_SIZE)]
    RowCount { found: usize },
    #[error("block row {row} has {found} columns, expected {}", BLOCK_SIZE)]
    ColumnCount { row: usize, found: usize },
    #[error("block column ({row}, {column}) holds {word:?}, expected an unsigned 64-bit decimal")]
    InvalidWord {
        row: usize,
        column: usize,
        word: String,
    },
    #[error("snapshot holds more than one block at {0}")]
    DuplicateBlock(BlockPosition),
    #[error("malformed JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted form of a [`Block`]. Column words are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockSave {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
    pub solid: Vec<Vec<String>>,
}

impl BlockSave {
    pub fn from_block(block: &Block) -> Self {
        let position = block.position().clone();
        let solid = block
            .columns()
            .iter()
            .map(|row| row.iter().map(Column::to_string).collect())
            .collect();

        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            solid,
        }
    }

    pub fn position(&self) -> BlockPosition {
        BlockPosition {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }

    fn columns(&self) -> Result<Columns, SaveError> {
        if self.solid.len() != BLOCK_SIZE {
            return Err(SaveError::RowCount {
                found: self.solid.len(),
            });
        }

        let mut columns = [[EMPTY_COLUMN; BLOCK_SIZE]; BLOCK_SIZE];
        for (row, (words, target)) in self.solid.iter().zip(columns.iter_mut()).enumerate() {
            if words.len() != BLOCK_SIZE {
                return Err(SaveError::ColumnCount {
                    row,
                    found: words.len(),
                });
            }
            for (column, (word, slot)) in words.iter().zip(target.iter_mut()).enumerate() {
                *slot = parse_word(word).ok_or_else(|| SaveError::InvalidWord {
                    row,
                    column,
                    word: word.clone(),
                })?;
            }
        }
        Ok(columns)
    }
}

fn parse_word(word: &str) -> Option<Column> {
    if !is_plain_decimal(word, false) {
        return None;
    }
    word.parse().ok()
}

impl From<Block> for BlockSave {
    fn from(block: Block) -> Self {
        Self::from_block(&block)
    }
}

impl TryFrom<BlockSave> for Block {
    type Error = SaveError;

    fn try_from(save: BlockSave) -> Result<Self, Self::Error> {
        let columns = save.columns()?;
        let BlockSave { x, y, z, .. } = save;
        Ok(Block::from_columns(BlockPosition { x, y, z }, columns))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSave {
    pub blocks: Vec<BlockSave>,
}

impl WorldSave {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::SOLID_COLUMN;
    use crate::coordinates::LocalCoord;
    use fastrand::Rng;

    fn random_block(seed: u64) -> Block {
        let mut rng = Rng::with_seed(seed);
        let mut columns = [[EMPTY_COLUMN; BLOCK_SIZE]; BLOCK_SIZE];
        for column in columns.iter_mut().flatten() {
            *column = rng.u64(..);
        }
        columns[0][0] = Column::MAX;
        columns[63][63] = Column::MAX;
        columns[1][0] = 1 << 63;
        let position = BlockPosition::new(
            "-18446744073709551617".parse::<Coord>().unwrap(),
            42,
            "99999999999999999999".parse::<Coord>().unwrap(),
        );
        Block::from_columns(position, columns)
    }

    fn json_round_trip(block: &Block) -> Block {
        let json = serde_json::to_string(block).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn json_uses_decimal_strings() {
        let mut block = Block::new(BlockPosition::new(1, -2, 3));
        block.set(LocalCoord::new(0, 1, 63));

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["X"], "1");
        assert_eq!(value["Y"], "-2");
        assert_eq!(value["Z"], "3");
        assert_eq!(value["Solid"][0][0], "0");
        assert_eq!(value["Solid"][0][1], "9223372036854775808");
        assert_eq!(value["Solid"].as_array().unwrap().len(), BLOCK_SIZE);
    }

    #[test]
    fn round_trips_empty_full_and_random_blocks() {
        let empty = Block::new(BlockPosition::new(0, 0, 0));
        let full = Block::filled(BlockPosition::new(0, 0, -1), SOLID_COLUMN);
        let random = random_block(7);

        for block in [empty, full, random] {
            assert_eq!(json_round_trip(&block), block);
        }
    }

    #[test]
    fn round_trips_through_bincode() {
        let block = random_block(11);
        let bytes = bincode::serialize(&block).unwrap();
        let decoded: Block = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, block);
        assert_eq!(decoded.column(0, 0), Column::MAX);
    }

    #[test]
    fn rejects_wrong_row_count() {
        let mut save = BlockSave::from_block(&Block::new(BlockPosition::default()));
        save.solid.pop();
        assert!(matches!(
            Block::try_from(save),
            Err(SaveError::RowCount { found: 63 })
        ));
    }

    #[test]
    fn rejects_wrong_column_count() {
        let mut save = BlockSave::from_block(&Block::new(BlockPosition::default()));
        save.solid[5].push("0".to_owned());
        assert!(matches!(
            Block::try_from(save),
            Err(SaveError::ColumnCount { row: 5, found: 65 })
        ));
    }

    #[test]
    fn rejects_words_outside_u64() {
        for word in ["-1", "18446744073709551616", "", "0x10", "+5", "1_0", " 7"] {
            let mut save = BlockSave::from_block(&Block::new(BlockPosition::default()));
            save.solid[2][9] = word.to_owned();
            match Block::try_from(save) {
                Err(SaveError::InvalidWord { row, column, word: found }) => {
                    assert_eq!((row, column), (2, 9));
                    assert_eq!(found, word);
                }
                other => panic!("expected invalid word for {word:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_json_surfaces_as_error() {
        let json = serde_json::to_string(&Block::new(BlockPosition::default()))
            .unwrap()
            .replacen("\"X\":\"0\"", "\"X\":\"zero\"", 1);
        assert!(serde_json::from_str::<Block>(&json).is_err());

        let signed = serde_json::to_string(&Block::new(BlockPosition::default()))
            .unwrap()
            .replacen("\"Y\":\"0\"", "\"Y\":\"+0\"", 1);
        assert!(serde_json::from_str::<Block>(&signed).is_err());

        assert!(matches!(
            WorldSave::from_json("{\"blocks\":[{}]}"),
            Err(SaveError::Json(_))
        ));
    }
}
