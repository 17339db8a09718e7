use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{AppError, Result};
use crate::services::auth::keys::KeyPair;

/// RS256 is the only algorithm either token is signed with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// RS256 signer over the private half of a `KeyPair`.
///
/// Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtSigner {
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("alg", &SIGNING_ALGORITHM)
            .finish()
    }
}

impl JwtSigner {
    /// `private_key_pem` must be an RSA private key in PKCS#1 or PKCS#8 PEM format.
    pub fn new(private_key_pem: &[u8]) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem).map_err(|e| {
            warn!(error = %e, "failed to parse private key PEM (expected RSA PKCS#1 or PKCS#8 PEM)");
            AppError::Signing("private key is not a usable RSA PEM key".to_string())
        })?;

        Ok(Self { encoding_key })
    }

    pub fn from_key_pair(key_pair: &KeyPair) -> Result<Self> {
        Self::new(key_pair.private_key_pem())
    }

    /// Header with `alg` fixed; callers add `kid`, `typ` or `jwk`.
    pub fn header() -> Header {
        Header::new(SIGNING_ALGORITHM)
    }

    pub fn sign<T: Serialize>(&self, header: &Header, claims: &T) -> Result<String> {
        if header.alg != SIGNING_ALGORITHM {
            return Err(AppError::Signing(format!(
                "header alg {:?} does not match signer alg {:?}",
                header.alg, SIGNING_ALGORITHM
            )));
        }

        jsonwebtoken::encode(header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Signing(e.to_string())
        })
    }
}

/// Current time as Unix epoch seconds.
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
