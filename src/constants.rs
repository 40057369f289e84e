// commit message
pub const DEFAULT_TYPE: &str = "chore";
pub const DEFAULT_DESCRIPTION: &str = "commit changes";

// status labels
pub const LABEL_SEPARATOR: &str = "] ";

// svn
pub const SVN_BIN: &str = "svn";
pub const DIFF_TIMEOUT_SECS: u64 = 10;
pub const REVISION_PATTERN: &str = r"Committed revision (\d+)";

// generative backend
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_DIFF_LENGTH: usize = 2000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const TEMPERATURE: f32 = 0.3;
pub const MAX_TOKENS: u32 = 200;

// config
pub const PROJECT_CONFIG_NAME: &str = ".smart-svn-commit.json";
pub const USER_CONFIG_DIR: &str = "smart-svn-commit";
pub const USER_CONFIG_NAME: &str = "config.json";

// ui
pub const SPINNER_TICK_MS: u64 = 100;
