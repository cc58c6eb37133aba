// Copyright (c) 2024 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Configuration file handling.

use config::Config;
use log::info;
use url::Url;

/// Default configuration file.
pub const DEF_CONFIG_FILE: &str = "configuration.yaml";

pub const DEF_USERNAME: &str = "admin";

/// Environment variable prefix for configuration overrides, e.g. `ZWAY_URL`.
pub const ENV_PREFIX: &str = "ZWAY";

/// Z-Way light platform configuration.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PlatformConfig {
    /// Base URL of the Z-Way controller, e.g. `http://zway.local:8083`.
    pub url: Url,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    /// Only include devices with this tag.
    #[serde(default)]
    pub include: Option<String>,
}

fn default_username() -> String {
    DEF_USERNAME.to_string()
}

impl PlatformConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            username: default_username(),
            password: None,
            include: None,
        }
    }
}

/// Load the configuration settings.
///
/// The application provides default values which can be overriden in the following order:
/// 1. Configuration settings in the yaml or json configuration file specified in `filename`
/// 2. Environment variables with prefix `ZWAY_`
///
/// The `url` setting has no default and must be provided.
pub fn get_configuration(filename: Option<&str>) -> Result<PlatformConfig, config::ConfigError> {
    let mut config = Config::builder().set_default("username", DEF_USERNAME)?;
    // read optional configuration file
    if let Some(filename) = filename {
        info!("Loading configuration file: {filename}");
        config = config.add_source(config::File::with_name(filename));
    }

    // E.g. `ZWAY_URL=http://localhost:8083` would set the `url` key
    let config = config
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()?;

    let settings: PlatformConfig = config.try_deserialize()?;

    check_cfg_values(settings)
}

fn check_cfg_values(mut settings: PlatformConfig) -> Result<PlatformConfig, config::ConfigError> {
    match settings.url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(config::ConfigError::Message(format!(
                "invalid scheme in url: {}. Valid: [http, https]",
                scheme
            )));
        }
    }

    if settings.username.trim().is_empty() {
        settings.username = default_username();
    }
    settings.password = settings.password.filter(|v| !v.is_empty());
    settings.include = settings
        .include
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    Ok(settings)
}
