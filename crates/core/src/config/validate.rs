use super::{
    types::{Config, MetadataBackend},
    ConfigError,
};
use crate::router::LocationOverrides;

/// Validate configuration
/// Currently validates:
/// - At least one source extension
/// - Placer buffer size is not 0
/// - Override patterns compile
/// - Known TV titles are lowercase
/// - The selected metadata backend has an API key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.source.extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "source.extensions cannot be empty".to_string(),
        ));
    }

    if config.placer.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "placer.buffer_size cannot be 0".to_string(),
        ));
    }

    LocationOverrides::from_config(&config.overrides)
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if let Some(title) = config
        .classifier
        .known_tv_titles
        .iter()
        .find(|t| t.to_lowercase() != **t)
    {
        return Err(ConfigError::ValidationError(format!(
            "classifier.known_tv_titles must be lowercase: {:?}",
            title
        )));
    }

    let key_missing = match config.metadata.backend {
        MetadataBackend::Omdb => config
            .metadata
            .omdb
            .as_ref()
            .is_none_or(|o| o.api_key.is_empty()),
        MetadataBackend::Tmdb => config
            .metadata
            .tmdb
            .as_ref()
            .is_none_or(|t| t.api_key.is_empty()),
        MetadataBackend::None => false,
    };
    if key_missing {
        return Err(ConfigError::ValidationError(format!(
            "metadata backend {:?} selected but no api_key configured",
            config.metadata.backend
        )));
    }

    Ok(())
}
