use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("formation row {row} has {found} cells, expected {expected}")]
    RaggedFormation {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown soldier class code {code} at row {row}, column {col}")]
    UnknownClassCode { code: u8, row: usize, col: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BattleError>;
