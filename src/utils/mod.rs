pub mod paths;

/// Environment switch set by `--verbose`.
pub const VERBOSE_ENV: &str = "REQSYNC_VERBOSE";

pub fn is_verbose() -> bool {
    std::env::var(VERBOSE_ENV).is_ok()
}
