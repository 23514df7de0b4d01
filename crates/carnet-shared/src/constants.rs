/// Format of the `birthday` column (`DD-MM-YYYY`)
pub const BIRTHDAY_FORMAT: &str = "%d-%m-%Y";

/// Default length of the upcoming-birthday window, in days
pub const DEFAULT_BIRTHDAY_WINDOW_DAYS: u32 = 7;

/// Largest accepted upcoming-birthday window, in days
pub const MAX_BIRTHDAY_WINDOW_DAYS: u32 = 366;

/// Number of hex characters of the SHA-256 digest kept in avatar names
pub const AVATAR_NAME_LEN: usize = 12;

/// Default folder avatars are namespaced under
pub const DEFAULT_AVATAR_FOLDER: &str = "web10";

/// Avatar crop size in pixels (square, fill)
pub const AVATAR_SIZE_PX: u32 = 250;

/// Maximum avatar upload size in bytes (5 MiB)
pub const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024;

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Size of a freshly issued bearer token, in random bytes
pub const TOKEN_BYTES: usize = 32;
