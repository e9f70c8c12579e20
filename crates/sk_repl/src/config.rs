use std::path::PathBuf;

pub const HISTORY_FILE: &str = ".asterisk_history";

/// Settings for an interactive session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReplConfig {
    /// Where line history is loaded from and saved to; `None` disables history
    pub history_path: Option<PathBuf>,
    pub show_timing: bool,
}

impl ReplConfig {
    pub fn new(history: Option<PathBuf>, no_history: bool, show_timing: bool) -> Self {
        let history_path = if no_history {
            None
        } else {
            history.or_else(default_history_path)
        };

        ReplConfig {
            history_path,
            show_timing,
        }
    }
}

pub fn default_history_path() -> Option<PathBuf> {
    dirs_home().map(|home| home.join(HISTORY_FILE))
}

fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
