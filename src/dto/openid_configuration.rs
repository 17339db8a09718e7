use serde::Serialize;

use crate::error::{AppError, Result};

/// Minimal OpenID provider configuration: only where to find the keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenIdConfiguration {
    pub jwks_uri: String,
}

impl OpenIdConfiguration {
    pub fn new(jwks_uri: &str) -> Result<Self> {
        url::Url::parse(jwks_uri)
            .map_err(|e| AppError::invalid_input(format!("jwks uri must be an absolute URL: {e}")))?;

        Ok(Self {
            jwks_uri: jwks_uri.to_string(),
        })
    }
}
