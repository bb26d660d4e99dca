//! Startup checks beyond what `Config` enforces on its own.

use anyhow::Result;
use vidreview_core::Config;

pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS."
        ));
    }

    let layout = config.video_layout();
    if layout.review_prefix() == layout.reference_prefix() {
        tracing::warn!(
            prefix = %layout.review_prefix(),
            "REVIEW_PREFIX and REFERENCE_PREFIX are identical; batch listings will mix both kinds"
        );
    }

    if config.backend_timeout_secs() == 0 {
        return Err(anyhow::anyhow!("BACKEND_TIMEOUT_SECS cannot be 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&config_from(&[])).is_ok());
    }

    #[test]
    fn zero_backend_timeout_is_rejected() {
        let config = config_from(&[("BACKEND_TIMEOUT_SECS", "0")]);
        assert!(validate_config(&config).is_err());
    }
}
