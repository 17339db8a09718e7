//! DPoP proof construction (RFC 9449), client side.
//!
//! A proof is minted fresh for every request. Its header embeds the full
//! public JWK (never a `kid`) so the verifier can recompute the thumbprint
//! and compare it with `cnf.jkt` of the access token.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::services::auth::jwt::{JwtSigner, now_unix};
use crate::services::auth::keys::KeyPair;
use crate::services::token_id::{TokenIdGenerator, UuidV4Generator};

/// `typ` header value that marks a JWT as a DPoP proof.
pub const DPOP_JWT_TYPE: &str = "dpop+jwt";

/// Authorization scheme for DPoP-bound access tokens (replaces `Bearer`).
pub const DPOP_SCHEME: &str = "DPoP";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpopClaims {
    pub jti: String,
    // HTTP method, verbatim
    pub htm: String,
    // HTTP target URI, verbatim
    pub htu: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    // base64url(SHA-256(access_token))
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ath: Option<String>,
}

/// Optional claims. The default adds nothing: `{jti, htm, htu, iat}` only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofOptions {
    /// Server-provided nonce.
    pub nonce: Option<String>,
    /// Add `ath` for the access token the proof travels with.
    pub include_ath: bool,
}

/// The two header values sent with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// `DPoP <access_token>`
    pub authorization: String,
    /// Signed proof token.
    pub dpop: String,
}

impl AuthHeaders {
    pub const AUTHORIZATION: &'static str = "Authorization";
    pub const DPOP: &'static str = "DPoP";

    /// Render as curl arguments: `-H "Authorization:..." -H "DPoP:..."`.
    pub fn to_curl_args(&self) -> String {
        format!(
            r#"-H "{}:{}" -H "{}:{}""#,
            Self::AUTHORIZATION,
            self.authorization,
            Self::DPOP,
            self.dpop
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct DpopProofGenerator<G = UuidV4Generator> {
    ids: G,
}

impl<G: TokenIdGenerator> DpopProofGenerator<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Sign a proof for `method` + `url`. Neither value is normalized.
    pub fn make_proof(&self, method: &str, url: &str, key_pair: &KeyPair) -> Result<String> {
        self.make_proof_with(method, url, key_pair, None, &ProofOptions::default())
    }

    /// `access_token` is only used when `options.include_ath` is set.
    pub fn make_proof_with(
        &self,
        method: &str,
        url: &str,
        key_pair: &KeyPair,
        access_token: Option<&str>,
        options: &ProofOptions,
    ) -> Result<String> {
        if method.is_empty() {
            return Err(AppError::invalid_input("HTTP method must not be empty"));
        }
        if url.is_empty() {
            return Err(AppError::invalid_input("target URL must not be empty"));
        }
        let ath = match (options.include_ath, access_token) {
            (false, _) => None,
            (true, Some(token)) => Some(access_token_hash(token)),
            (true, None) => {
                return Err(AppError::invalid_input(
                    "ath requested without an access token",
                ));
            }
        };

        // Re-derived for each proof.
        let jwk = key_pair.public_jwk()?;
        let signer = JwtSigner::from_key_pair(key_pair)?;

        let claims = DpopClaims {
            jti: self.ids.generate(),
            htm: method.to_string(),
            htu: url.to_string(),
            iat: now_unix(),
            nonce: options.nonce.clone(),
            ath,
        };

        let mut header = JwtSigner::header();
        header.typ = Some(DPOP_JWT_TYPE.to_string());
        header.jwk = Some(jwk);

        let proof = signer.sign(&header, &claims)?;

        debug!(jti = %claims.jti, htm = %claims.htm, htu = %claims.htu, "created DPoP proof");

        Ok(proof)
    }

    /// `Authorization` + `DPoP` values for one request.
    pub fn make_auth_headers(
        &self,
        method: &str,
        url: &str,
        access_token: &str,
        key_pair: &KeyPair,
        options: &ProofOptions,
    ) -> Result<AuthHeaders> {
        if access_token.trim().is_empty() {
            return Err(AppError::invalid_input("access token must not be empty"));
        }

        let dpop = self.make_proof_with(method, url, key_pair, Some(access_token), options)?;

        Ok(AuthHeaders {
            authorization: format!("{} {}", DPOP_SCHEME, access_token),
            dpop,
        })
    }
}

pub fn make_dpop_proof(method: &str, url: &str, key_pair: &KeyPair) -> Result<String> {
    DpopProofGenerator::new(UuidV4Generator).make_proof(method, url, key_pair)
}

pub fn make_auth_headers(
    method: &str,
    url: &str,
    access_token: &str,
    key_pair: &KeyPair,
) -> Result<AuthHeaders> {
    DpopProofGenerator::new(UuidV4Generator).make_auth_headers(
        method,
        url,
        access_token,
        key_pair,
        &ProofOptions::default(),
    )
}

/// `ath`: base64url(SHA-256(access_token)).
pub fn access_token_hash(access_token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(access_token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};

    use super::*;
    use crate::services::auth::keys::{thumbprint, to_jwk};
    use crate::test_support::{FIXTURE_JKT, PUBLIC_KEY_PEM, key_pair};

    /// Verify against the JWK embedded in the proof header, like a server would.
    fn verify(proof: &str) -> DpopClaims {
        let header = decode_header(proof).unwrap();
        assert_eq!(header.typ.as_deref(), Some(DPOP_JWT_TYPE));
        assert_eq!(header.alg, Algorithm::RS256);
        assert!(header.kid.is_none());

        let jwk = header.jwk.expect("proof embeds jwk");
        let key = DecodingKey::from_jwk(&jwk).unwrap();
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.required_spec_claims.remove("exp");

        decode::<DpopClaims>(proof, &key, &validation).unwrap().claims
    }

    #[test]
    fn proof_carries_method_url_and_fresh_iat() {
        let before = now_unix();
        let proof = make_dpop_proof("POST", "https://x/y", &key_pair()).unwrap();
        let claims = verify(&proof);

        assert_eq!(claims.htm, "POST");
        assert_eq!(claims.htu, "https://x/y");
        assert!((claims.iat - before).abs() <= 2);
        assert!(claims.nonce.is_none());
        assert!(claims.ath.is_none());
    }

    #[test]
    fn default_payload_has_exactly_four_claims() {
        let proof = make_dpop_proof("GET", "https://example.org/r", &key_pair()).unwrap();
        let payload = proof.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["htm", "htu", "iat", "jti"]);
    }

    #[test]
    fn method_and_url_are_not_normalized() {
        let proof = make_dpop_proof("get", "HTTPS://Example.ORG:443/a/../b?q=1#f", &key_pair())
            .unwrap();
        let claims = verify(&proof);
        assert_eq!(claims.htm, "get");
        assert_eq!(claims.htu, "HTTPS://Example.ORG:443/a/../b?q=1#f");
    }

    #[test]
    fn embedded_jwk_thumbprint_matches_binding() {
        let proof = make_dpop_proof("GET", "https://example.org/r", &key_pair()).unwrap();
        let jwk = decode_header(&proof).unwrap().jwk.unwrap();
        assert_eq!(thumbprint(&jwk).unwrap().as_str(), FIXTURE_JKT);
        assert_eq!(jwk, to_jwk(PUBLIC_KEY_PEM).unwrap());
    }

    #[test]
    fn each_proof_has_a_new_jti() {
        let kp = key_pair();
        let a = verify(&make_dpop_proof("GET", "https://example.org/r", &kp).unwrap());
        let b = verify(&make_dpop_proof("GET", "https://example.org/r", &kp).unwrap());
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn authorization_uses_dpop_scheme() {
        let headers =
            make_auth_headers("GET", "https://example.org/r", "abc.def.ghi", &key_pair()).unwrap();
        assert_eq!(headers.authorization, "DPoP abc.def.ghi");
        assert!(headers.authorization.starts_with("DPoP "));

        let claims = verify(&headers.dpop);
        assert_eq!(claims.htm, "GET");
        assert_eq!(claims.htu, "https://example.org/r");
    }

    #[test]
    fn optional_nonce_and_ath() {
        let options = ProofOptions {
            nonce: Some("server-nonce".to_string()),
            include_ath: true,
        };
        let headers = DpopProofGenerator::<UuidV4Generator>::default()
            .make_auth_headers("GET", "https://example.org/r", "tok", &key_pair(), &options)
            .unwrap();

        let claims = verify(&headers.dpop);
        assert_eq!(claims.nonce.as_deref(), Some("server-nonce"));
        assert_eq!(claims.ath, Some(access_token_hash("tok")));
    }

    #[test]
    fn ath_requires_access_token() {
        let options = ProofOptions {
            nonce: None,
            include_ath: true,
        };
        let err = DpopProofGenerator::<UuidV4Generator>::default()
            .make_proof_with("GET", "https://example.org/r", &key_pair(), None, &options)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn curl_args_layout() {
        let headers = AuthHeaders {
            authorization: "DPoP a.b.c".to_string(),
            dpop: "d.e.f".to_string(),
        };
        assert_eq!(
            headers.to_curl_args(),
            r#"-H "Authorization:DPoP a.b.c" -H "DPoP:d.e.f""#
        );
    }

    #[test]
    fn rejects_missing_inputs() {
        let kp = key_pair();
        assert!(matches!(
            make_dpop_proof("", "https://x/y", &kp),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            make_dpop_proof("GET", "", &kp),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            make_auth_headers("GET", "https://x/y", "  ", &kp),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn malformed_keys_produce_no_proof() {
        let kp = KeyPair::new(b"junk".to_vec(), b"junk".to_vec());
        assert!(matches!(
            make_dpop_proof("GET", "https://x/y", &kp),
            Err(AppError::KeyFormat(_))
        ));

        let kp = KeyPair::new(b"junk".to_vec(), PUBLIC_KEY_PEM.to_vec());
        assert!(matches!(
            make_dpop_proof("GET", "https://x/y", &kp),
            Err(AppError::Signing(_))
        ));
    }
}
