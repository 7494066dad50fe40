use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No fetch backends configured (need at least one gateway or a mirror_dir)")]
    NoBackendsConfigured,

    #[error("Invalid gateway '{gateway}', expected an http:// or https:// URL")]
    InvalidGatewayScheme { gateway: String },

    #[error("fetch.max_bytes must be positive")]
    InvalidMaxBytes,

    #[error("Timeout must be positive: {field} = {value}")]
    InvalidTimeout { field: String, value: u64 },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_backends(config)?;
    validate_limits(config)?;
    Ok(())
}

fn validate_backends(config: &Config) -> Result<(), ValidationError> {
    if config.fetch.gateways.is_empty() && config.fetch.mirror_dir.is_none() {
        return Err(ValidationError::NoBackendsConfigured);
    }

    for gateway in &config.fetch.gateways {
        let has_host = gateway
            .strip_prefix("http://")
            .or_else(|| gateway.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());

        if !has_host {
            return Err(ValidationError::InvalidGatewayScheme {
                gateway: gateway.clone(),
            });
        }
    }

    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ValidationError> {
    if config.fetch.max_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidMaxBytes);
    }

    let timeouts = [
        ("fetch.timeout_secs", config.fetch.timeout_secs),
        ("http.connect_timeout_secs", config.http.connect_timeout_secs),
        ("http.read_timeout_secs", config.http.read_timeout_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            return Err(ValidationError::InvalidTimeout {
                field: field.to_string(),
                value,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_no_backends() {
        let mut config = Config::default();
        config.fetch.gateways.clear();

        assert!(matches!(
            validate(&config),
            Err(ValidationError::NoBackendsConfigured)
        ));
    }

    #[test]
    fn test_mirror_only_is_valid() {
        let mut config = Config::default();
        config.fetch.gateways.clear();
        config.fetch.mirror_dir = Some(PathBuf::from("/srv/mirror"));

        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_gateway_scheme() {
        let mut config = Config::default();
        config.fetch.gateways = vec!["https://ipfs.io".into(), "ftp://mirror".into()];

        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidGatewayScheme { ref gateway } if gateway == "ftp://mirror"
        ));
    }

    #[test]
    fn test_gateway_without_host() {
        let mut config = Config::default();
        config.fetch.gateways = vec!["http://".into()];

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidGatewayScheme { .. })
        ));
    }

    #[test]
    fn test_zero_max_bytes() {
        let mut config = Config::default();
        config.fetch.max_bytes = ByteSize(0);

        assert!(matches!(validate(&config), Err(ValidationError::InvalidMaxBytes)));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.http.read_timeout_secs = 0;

        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidTimeout { ref field, value: 0 } if field == "http.read_timeout_secs"
        ));
    }
}
