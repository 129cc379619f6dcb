use std::fs;
use std::path::{Path, PathBuf};

use crate::model::board::Board;
use crate::model::config::BoardConfig;

/// Name of the directory holding a board's files
pub const BOARD_DIR: &str = "ideaboard";

/// Keys `ib config set` may change
pub const SETTABLE_KEYS: [&str; 3] = ["board.name", "auth.email", "auth.password"];

/// Error type for board I/O operations
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("not an idea board: no ideaboard/ directory found")]
    NotABoard,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse board.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit board.toml: {0}")]
    ConfigEditError(#[from] toml_edit::TomlError),
    #[error("unknown config key '{0}' (expected one of: board.name, auth.email, auth.password)")]
    UnknownKey(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` looking for `ideaboard/board.toml`.
pub fn discover_board(start: &Path) -> Result<PathBuf, BoardError> {
    let mut current = start.to_path_buf();
    loop {
        let board_dir = current.join(BOARD_DIR);
        if board_dir.is_dir() && board_dir.join("board.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(BoardError::NotABoard);
        }
    }
}

/// Load the board rooted at `root`.
pub fn load_board(root: &Path) -> Result<Board, BoardError> {
    let board_dir = root.join(BOARD_DIR);
    if !board_dir.is_dir() {
        return Err(BoardError::NotABoard);
    }
    let config_text = read_config_text(&board_dir)?;
    let config: BoardConfig = toml::from_str(&config_text)?;
    log::debug!("loaded board '{}' from {}", config.board.name, board_dir.display());

    Ok(Board {
        root: root.to_path_buf(),
        board_dir,
        config,
    })
}

fn read_config_text(board_dir: &Path) -> Result<String, BoardError> {
    let config_path = board_dir.join("board.toml");
    fs::read_to_string(&config_path).map_err(|e| BoardError::ReadError {
        path: config_path,
        source: e,
    })
}

/// Read board.toml as an editable document that keeps comments and layout.
pub fn read_config_doc(board_dir: &Path) -> Result<toml_edit::DocumentMut, BoardError> {
    Ok(read_config_text(board_dir)?.parse()?)
}

/// Write the config document back, then check it still parses as a config.
pub fn write_config_doc(board_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), BoardError> {
    let text = doc.to_string();
    toml::from_str::<BoardConfig>(&text)?;
    fs::write(board_dir.join("board.toml"), text)?;
    Ok(())
}

/// Set a dotted key such as `auth.email` in the config document.
pub fn set_config_value(doc: &mut toml_edit::DocumentMut, key: &str, value: &str) -> Result<(), BoardError> {
    if !SETTABLE_KEYS.contains(&key) {
        return Err(BoardError::UnknownKey(key.to_string()));
    }
    let Some((table, field)) = key.split_once('.') else {
        return Err(BoardError::UnknownKey(key.to_string()));
    };
    if !doc.contains_key(table) {
        doc[table] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc[table][field] = toml_edit::value(value);
    Ok(())
}
