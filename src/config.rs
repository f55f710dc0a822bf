use std::path::PathBuf;

use crate::cli::Args;

const LOG_FILE: &str = "skyview.log";

pub struct Config {
    pub api_key: String,
    pub default_city: String,
    pub base_url: String,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self {
            api_key: args.api_key.unwrap_or_default(),
            default_city: args.city,
            base_url: args.base_url,
            log_file: args
                .log_file
                .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE)),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[test]
fn test_defaults() {
    let args = Args {
        city: "Kolkata".to_string(),
        api_key: None,
        base_url: "https://api.weatherapi.com".to_string(),
        log_file: None,
    };
    let config = Config::from_args(args);
    assert!(!config.has_api_key());
    assert_eq!(config.default_city, "Kolkata");
    assert!(config.log_file.ends_with(LOG_FILE));
}
