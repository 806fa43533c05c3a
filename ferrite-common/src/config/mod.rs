pub mod config;

use lazy_static::lazy_static;
use toml::from_str;

use crate::config::config::FerriteConfig;

static CONFIG_LOCATION: &'static str = "./config.toml";
static CONFIG_LOCATION_VAR: &'static str = "FERRITE_CONFIG";

lazy_static! {
    pub static ref CONFIG: FerriteConfig = {
        let location = std::env::var(CONFIG_LOCATION_VAR).unwrap_or_else(|_| CONFIG_LOCATION.to_owned());
        let raw = std::fs::read_to_string(&location)
            .unwrap_or_else(|e| panic!("failed to read config at {location}: {e}"));
        from_str::<FerriteConfig>(&raw).unwrap_or_else(|e| panic!("invalid config at {location}: {e}"))
    };
}
