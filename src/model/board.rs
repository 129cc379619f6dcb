use std::path::PathBuf;

use super::config::BoardConfig;

/// A discovered idea board on disk
#[derive(Debug)]
pub struct Board {
    /// Root directory (parent of `ideaboard/`)
    pub root: PathBuf,
    /// Path to the `ideaboard/` directory
    pub board_dir: PathBuf,
    /// Parsed board.toml
    pub config: BoardConfig,
}
