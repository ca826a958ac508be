// Constants module for shared string constants

pub const MANIFEST_FILE: &str = "apps.toml";
pub const DOWNLOADS_DIR: &str = "apks";
pub const DEFAULT_DOWNLOADER: &str = "uptodown";

/// Version keyword that selects the newest release instead of a specific one
pub const LATEST: &str = "latest";

/// User-Agent string for all HTTP requests
pub const USER_AGENT: &str = concat!("apkfetch/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_VERSION_PAGES: u32 = 100;
pub const MAX_REDIRECTS: usize = 10;
