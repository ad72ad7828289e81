use crate::engine::types::{Difficulty, GameMode};

/// Server configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server listen port.
    pub port: u16,
    /// Server bind host.
    pub host: String,
    /// Game mode the session starts in.
    pub default_mode: GameMode,
    /// Bot difficulty the session starts with.
    pub default_difficulty: Difficulty,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        AppConfig {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            default_mode: std::env::var("MODO_INICIAL")
                .ok()
                .and_then(|v| GameMode::from_wire(&v))
                .unwrap_or(GameMode::Friend),
            default_difficulty: std::env::var("NIVEL_INICIAL")
                .ok()
                .and_then(|v| Difficulty::from_wire(&v))
                .unwrap_or(Difficulty::Beginner),
        }
    }

    /// Socket address string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 8080,
            host: "0.0.0.0".to_string(),
            default_mode: GameMode::Friend,
            default_difficulty: Difficulty::Beginner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_mode, GameMode::Friend);
        assert_eq!(config.default_difficulty, Difficulty::Beginner);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn from_env_defaults() {
        // Without setting env vars, should fall back to defaults.
        let config = AppConfig::from_env();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_mode, GameMode::Friend);
    }
}
