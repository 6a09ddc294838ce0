use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// `OMDBAPI_KEY` is honoured for the OMDb key; `MOVEMEDIA_*` variables
/// override anything else, with `__` separating nested keys
/// (e.g. `MOVEMEDIA_SOURCE__MIN_AGE_SECS=0`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(
            Env::raw()
                .only(&["OMDBAPI_KEY"])
                .map(|_| "metadata.omdb.api_key".into()),
        )
        .merge(Env::prefixed("MOVEMEDIA_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
