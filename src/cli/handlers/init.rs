use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::board_io::{self, BOARD_DIR};
use crate::io::store::IDEAS_FILE;

const BOARD_TOML_TEMPLATE: &str = r##"[board]
name = "{name}"

# --- Login ---
# The single credential pair accepted by `ib login`.
# Change it with: ib config set auth.password <new>
[auth]
email = "admin@ideaboard.local"
password = "ideaboard"
"##;

/// Infer a board name from a directory name: hyphens and underscores become
/// spaces, each word is capitalized.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render board.toml for a board called `name`.
fn render_board_toml(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    BOARD_TOML_TEMPLATE.replace("{name}", &escaped)
}

/// Create `ideaboard/` under `root` (the working directory unless `-C` was given).
pub fn cmd_init(args: InitArgs, root: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match root {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let board_dir = root.join(BOARD_DIR);

    if board_dir.join("board.toml").exists() && !args.force {
        return Err(format!(
            "idea board already exists in {}/ (use --force to rewrite board.toml)",
            board_dir.display()
        )
        .into());
    }

    // Note a board further up, which this one will shadow
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = board_io::discover_board(parent)
    {
        eprintln!("Note: parent board found at {}/", parent_root.join(BOARD_DIR).display());
        eprintln!("Creating new board in {}/", board_dir.display());
    }

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Idea Board".to_string())
    });

    fs::create_dir_all(&board_dir)?;
    fs::write(board_dir.join("board.toml"), render_board_toml(&name))?;

    // --force keeps existing ideas
    let ideas_path = board_dir.join(IDEAS_FILE);
    if !ideas_path.exists() {
        fs::write(&ideas_path, "[]\n")?;
    }

    log::info!("initialized board '{}' at {}", name, board_dir.display());
    println!("Initialized idea board: {}", name);
    println!("  log in with: ib login admin@ideaboard.local --password ideaboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::BoardConfig;

    #[test]
    fn test_infer_name() {
        assert_eq!(infer_name("ops-ideas"), "Ops Ideas");
        assert_eq!(infer_name("kantor_pusat"), "Kantor Pusat");
        assert_eq!(infer_name("board"), "Board");
        assert_eq!(infer_name("--"), "");
    }

    #[test]
    fn test_render_board_toml_parses() {
        let text = render_board_toml("Ops \"Team\" Ideas");
        let config: BoardConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.board.name, "Ops \"Team\" Ideas");
        assert_eq!(config.auth.email, "admin@ideaboard.local");
        assert_eq!(config.auth.password, "ideaboard");
        assert!(text.contains("# --- Login ---"));
    }
}
