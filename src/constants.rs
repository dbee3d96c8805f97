pub mod network {
    pub const DEFAULT_BASE_URL: &str = "https://app.fakturoid.cz/api/v3";
    pub const DEFAULT_TOKEN_URL: &str = "https://app.fakturoid.cz/api/v3/oauth/token";
    pub const USER_AGENT: &str = "fakturoid-mcp (github.com/tedyno/fakturoid-mcp)";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
}

pub mod auth {
    pub const GRANT_TYPE: &str = "client_credentials";
    /// Tokens this close to expiry are refreshed before use.
    pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;
}

pub mod pagination {
    pub const DEFAULT_PAGE: u32 = 1;
}

pub mod limits {
    pub const LOG_BODY_PREVIEW_BYTES: usize = 512;
}

pub mod config {
    pub const CONFIG_DIR: &str = "fakturoid-mcp";
    pub const CONFIG_FILE: &str = "config.json";
    pub const ENV_CLIENT_ID: &str = "FAKTUROID_CLIENT_ID";
    pub const ENV_CLIENT_SECRET: &str = "FAKTUROID_CLIENT_SECRET";
    pub const ENV_SLUG: &str = "FAKTUROID_SLUG";
    pub const ENV_BASE_URL: &str = "FAKTUROID_BASE_URL";
    pub const ENV_TOKEN_URL: &str = "FAKTUROID_TOKEN_URL";
    pub const ENV_CONFIG_PATH: &str = "FAKTUROID_CONFIG_PATH";
}
