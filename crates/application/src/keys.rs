//! Well-known storage keys.

/// Per-region configuration object.
pub const CONFIG: &str = "jimeng_config";
/// Last selected region.
pub const REGION: &str = "jimeng_region";
/// Generation history, newest first.
pub const HISTORY: &str = "jimeng_generation_history";
/// Counter backing history ids.
pub const HISTORY_SEQ: &str = "jimeng_history_seq";
/// Legacy single base URL, read once for migration.
pub const LEGACY_BASE_URL: &str = "jimeng_base_url";
/// Legacy single token, read once for migration.
pub const LEGACY_TOKEN: &str = "jimeng_token";
