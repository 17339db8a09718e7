//! Key material shared by the access-token issuer and the DPoP proof generator.
//!
//! Two identifiers are derived from the public key and they are NOT
//! interchangeable:
//! - `KeyId`: hex SHA-256 over the public key bytes exactly as supplied.
//!   Used as `kid` in the access-token header and in the JWKS entry.
//! - `JwkThumbprint`: RFC 7638 thumbprint over the canonical JWK.
//!   Used as `cnf.jkt`, and recomputed by verifiers from the DPoP `jwk`.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::jwk::{
    AlgorithmParameters, CommonParameters, EllipticCurve, Jwk, RSAKeyParameters, RSAKeyType,
};
use rsa::RsaPublicKey;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{AppError, Result};

/// Private + public key bytes for one command invocation.
///
/// Bytes are kept as loaded; parsing happens in the operation that needs it.
#[derive(Clone)]
pub struct KeyPair {
    private_key_pem: Vec<u8>,
    public_key: Vec<u8>,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("KeyPair")
            .field("key_id", &self.key_id())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    pub fn new(private_key_pem: impl Into<Vec<u8>>, public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            private_key_pem: private_key_pem.into(),
            public_key: public_key.into(),
        }
    }

    pub fn private_key_pem(&self) -> &[u8] {
        &self.private_key_pem
    }

    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    pub fn key_id(&self) -> KeyId {
        derive_key_id(&self.public_key)
    }

    /// Re-derived on every call.
    pub fn public_jwk(&self) -> Result<Jwk> {
        to_jwk(&self.public_key)
    }
}

/// Hex SHA-256 of the raw public key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyId(String);

impl KeyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<KeyId> for String {
    fn from(k: KeyId) -> Self {
        k.0
    }
}

/// JWK Thumbprint (RFC 7638), SHA-256, base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JwkThumbprint(String);

impl JwkThumbprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for JwkThumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JwkThumbprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<JwkThumbprint> for String {
    fn from(t: JwkThumbprint) -> Self {
        t.0
    }
}

pub fn derive_key_id(public_key: &[u8]) -> KeyId {
    KeyId(hex::encode(Sha256::digest(public_key)))
}

/// Parse an RSA public key (SPKI or PKCS#1, PEM or DER) into a JWK
/// carrying only `kty`, `n` and `e`.
pub fn to_jwk(public_key: &[u8]) -> Result<Jwk> {
    let key = parse_rsa_public_key(public_key)?;

    Ok(Jwk {
        common: CommonParameters::default(),
        algorithm: AlgorithmParameters::RSA(RSAKeyParameters {
            key_type: RSAKeyType::RSA,
            n: URL_SAFE_NO_PAD.encode(key.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(key.e().to_bytes_be()),
        }),
    })
}

/// RFC 7638 thumbprint over the required members of `jwk`, in lexicographic
/// order with no whitespace. Optional members (`kid`, `use`, `alg`, ...) never
/// take part.
pub fn thumbprint(jwk: &Jwk) -> Result<JwkThumbprint> {
    let canonical = match &jwk.algorithm {
        AlgorithmParameters::RSA(params) => {
            format!(r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#, params.e, params.n)
        }
        AlgorithmParameters::EllipticCurve(params) => {
            let crv = match params.curve {
                EllipticCurve::P256 => "P-256",
                EllipticCurve::P384 => "P-384",
                EllipticCurve::P521 => "P-521",
                _ => return Err(unsupported_jwk()),
            };
            format!(
                r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
                crv, params.x, params.y
            )
        }
        AlgorithmParameters::OctetKeyPair(params) => match params.curve {
            EllipticCurve::Ed25519 => {
                format!(r#"{{"crv":"Ed25519","kty":"OKP","x":"{}"}}"#, params.x)
            }
            _ => return Err(unsupported_jwk()),
        },
        _ => return Err(unsupported_jwk()),
    };

    let digest = Sha256::digest(canonical.as_bytes());
    Ok(JwkThumbprint(URL_SAFE_NO_PAD.encode(digest)))
}

fn unsupported_jwk() -> AppError {
    AppError::KeyFormat("unsupported jwk for thumbprint".to_string())
}

fn parse_rsa_public_key(bytes: &[u8]) -> Result<RsaPublicKey> {
    let parsed = match std::str::from_utf8(bytes) {
        Ok(text) if text.trim_start().starts_with("-----BEGIN") => {
            let pem = text.trim();
            RsaPublicKey::from_public_key_pem(pem)
                .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem).map_err(|e| e.to_string()))
        }
        // DER: SPKI first, then PKCS#1
        _ => RsaPublicKey::from_public_key_der(bytes)
            .or_else(|_| RsaPublicKey::from_pkcs1_der(bytes).map_err(|e| e.to_string())),
    };

    parsed.map_err(|e| {
        warn!(error = %e, "failed to parse public key (expected RSA SPKI or PKCS#1)");
        AppError::KeyFormat("public key is not a well-formed RSA public key".to_string())
    })
}
