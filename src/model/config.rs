use serde::{Deserialize, Serialize};

/// Configuration from board.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
}

/// The single credential pair allowed to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Default: see src/cli/handlers/init.rs
    #[serde(default = "default_email")]
    pub email: String,
    /// Default: see src/cli/handlers/init.rs
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            email: default_email(),
            password: default_password(),
        }
    }
}

fn default_email() -> String {
    "admin@ideaboard.local".to_string()
}

fn default_password() -> String {
    "ideaboard".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_section_is_optional() {
        let config: BoardConfig = toml::from_str("[board]\nname = \"Ops\"\n").unwrap();
        assert_eq!(config.board.name, "Ops");
        assert_eq!(config.auth, AuthConfig::default());
    }

    #[test]
    fn partial_auth_section_fills_defaults() {
        let config: BoardConfig =
            toml::from_str("[board]\nname = \"Ops\"\n\n[auth]\nemail = \"me@example.com\"\n").unwrap();
        assert_eq!(config.auth.email, "me@example.com");
        assert_eq!(config.auth.password, "ideaboard");
    }
}
