// See config.toml for information on the variables here.

use serde::Deserialize;

#[derive(Deserialize)]
pub struct FerriteConfig {
    pub urls: Urls,
    pub authentication: Authentication,
    pub telegram: Telegram,
    pub database: Database,
    pub prefix: Prefixes,
}

#[derive(Deserialize)]
pub struct Urls {
    pub repository: String,
}

#[derive(Deserialize)]
pub struct Authentication {
    pub token: String,
}

#[derive(Deserialize)]
pub struct Telegram {
    pub api_url: String,
    pub poll_timeout_seconds: u64,
}

#[derive(Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Deserialize)]
pub struct Prefixes {
    pub default: String,
}
