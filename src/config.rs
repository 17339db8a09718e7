//! Turns parsed arguments into explicit, validated per-command configuration.
//!
//! Nothing below `app` reads the environment or the command line; everything
//! the core needs is carried in these structs.

use std::path::{Path, PathBuf};
use std::{fmt, fs};

use crate::cli::{HeadersArgs, KeyArgs, SessionArgs};
use crate::error::AppError;
use crate::services::auth::dpop::ProofOptions;
use crate::services::auth::keys::KeyPair;

/// Load `.env` from the working directory, if present. Must run before
/// argument parsing so env-backed options see it.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::InvalidInput(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFiles {
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl KeyFiles {
    /// Read both files into memory for the rest of the invocation.
    pub fn load(&self) -> Result<KeyPair, AppError> {
        let private_key_pem = read_file(&self.private_key)?;
        let public_key = read_file(&self.public_key)?;
        Ok(KeyPair::new(private_key_pem, public_key))
    }
}

impl From<KeyArgs> for KeyFiles {
    fn from(args: KeyArgs) -> Self {
        Self {
            private_key: args.private_key,
            public_key: args.public_key,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub webid: String,
    pub issuer: String,
    pub validity_days: f64,
    pub keys: KeyFiles,
}

impl TryFrom<SessionArgs> for SessionConfig {
    type Error = ConfigError;

    fn try_from(args: SessionArgs) -> Result<Self, Self::Error> {
        let webid = required(args.webid, "webid")?;
        let issuer = required(args.issuer, "issuer")?;
        if !args.expire.is_finite() || args.expire <= 0.0 {
            return Err(ConfigError::Invalid("expire"));
        }

        Ok(SessionConfig {
            webid,
            issuer,
            validity_days: args.expire,
            keys: args.keys.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersConfig {
    pub method: String,
    pub url: String,
    pub session: PathBuf,
    pub keys: KeyFiles,
    pub proof: ProofOptions,
}

impl TryFrom<HeadersArgs> for HeadersConfig {
    type Error = ConfigError;

    fn try_from(args: HeadersArgs) -> Result<Self, Self::Error> {
        let method = required(args.method, "method")?;
        let url = required(args.url, "url")?;
        let nonce = match args.nonce {
            Some(n) if n.is_empty() => return Err(ConfigError::Invalid("nonce")),
            other => other,
        };

        Ok(HeadersConfig {
            method,
            url,
            session: args.session,
            keys: args.keys.into(),
            proof: ProofOptions {
                nonce,
                include_ath: args.ath,
            },
        })
    }
}

pub fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn required(value: String, key: &'static str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing(key))
    } else {
        Ok(value)
    }
}
