// Names and defaults shared by the config layer and the binary

pub const APP_NAME: &str = "localplay";

// === Storage ===
pub const DATABASE_FILE: &str = "localplay.db";
pub const CONFIG_FILE: &str = "config.toml";

// === Library ===
// Extensions the filesystem index treats as videos (compared case-insensitively)
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &[
    "3gp", "avi", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "ogv", "ts", "webm",
    "wmv",
];

// === Logging ===
pub const DEFAULT_LOG_FILTER: &str = "localplay=info";
