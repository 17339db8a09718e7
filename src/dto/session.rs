use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Output of `session`, input of `headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub access_token: String,
}

impl SessionDocument {
    pub fn new(access_token: String) -> Self {
        Self { access_token }
    }

    /// Extra members are ignored; `access_token` is required.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| AppError::invalid_input(format!("invalid session document: {e}")))
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "access_token": self.access_token }).to_string()
    }
}
