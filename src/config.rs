/// Driver configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Render the board with Unicode chess glyphs instead of letters.
    pub unicode_pieces: bool,
    /// Print the legal-move list before every prompt.
    pub show_moves: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        AppConfig {
            unicode_pieces: env_flag("CHESS_UNICODE_PIECES", false),
            show_moves: env_flag("CHESS_SHOW_MOVES", false),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            unicode_pieces: false,
            show_moves: false,
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
