use thiserror::Error;

/// Why a measurement pass could not produce a complete block list.
///
/// None of these are fatal: the pipeline keeps the previous pagination
/// state and waits for the next settled edit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Render surface is detached or not yet rendered")]
    NotReady,

    #[error("No rendered height for block {index}")]
    MissingBlock { index: usize },

    #[error("Block {index} starts at {found}, expected {expected}")]
    NonContiguous {
        index: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown page template: {0}")]
    UnknownTemplate(String),
}
