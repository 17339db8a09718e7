use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::services::auth::jwt::{JwtSigner, now_unix};
use crate::services::auth::keys::{KeyId, KeyPair, thumbprint};
use crate::services::token_id::{TokenIdGenerator, UuidV4Generator};

/// Every access token is issued for this audience.
pub const AUDIENCE: &str = "solid";

const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub webid: String,
    pub client_id: String,
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub cnf: CnfClaim,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Confirmation claim: binds the token to the key with this thumbprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnfClaim {
    pub jkt: String,
}

/// Signed token plus the payload it carries.
#[derive(Debug, Clone)]
pub struct IssuedAccessToken {
    pub access_token: String,
    pub claims: AccessTokenClaims,
    pub kid: KeyId,
}

#[derive(Debug, Clone, Default)]
pub struct AccessTokenIssuer<G = UuidV4Generator> {
    ids: G,
}

impl<G: TokenIdGenerator> AccessTokenIssuer<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Issue an access token for `subject`, bound to `key_pair`.
    ///
    /// - `subject` is used for both `webid` and `sub`.
    /// - `issuer` must be an absolute URL.
    /// - `validity_days` may be fractional; the lifetime in seconds is truncated.
    pub fn issue_access_token(
        &self,
        subject: &str,
        issuer: &str,
        key_pair: &KeyPair,
        validity_days: f64,
    ) -> Result<IssuedAccessToken> {
        // Validate inputs before touching any key material.
        validate_subject(subject)?;
        validate_issuer(issuer)?;
        let lifetime = lifetime_seconds(validity_days)?;

        let kid = key_pair.key_id();
        let jwk = key_pair.public_jwk()?;
        let jkt = thumbprint(&jwk)?;

        let iat = now_unix();
        let exp = iat
            .checked_add(lifetime)
            .ok_or_else(|| AppError::invalid_input("expiry is out of range"))?;

        let claims = AccessTokenClaims {
            webid: subject.to_string(),
            client_id: self.ids.generate(),
            iss: issuer.to_string(),
            sub: subject.to_string(),
            aud: AUDIENCE.to_string(),
            cnf: CnfClaim {
                jkt: jkt.into_inner(),
            },
            iat,
            exp,
            jti: self.ids.generate(),
        };

        let signer = JwtSigner::from_key_pair(key_pair)?;
        let mut header = JwtSigner::header();
        header.kid = Some(kid.to_string());
        let access_token = signer.sign(&header, &claims)?;

        debug!(kid = %kid, jti = %claims.jti, exp = claims.exp, "issued access token");

        Ok(IssuedAccessToken {
            access_token,
            claims,
            kid,
        })
    }
}

/// `AccessTokenIssuer` with random UUID v4 identifiers.
pub fn issue_access_token(
    subject: &str,
    issuer: &str,
    key_pair: &KeyPair,
    validity_days: f64,
) -> Result<IssuedAccessToken> {
    AccessTokenIssuer::new(UuidV4Generator).issue_access_token(
        subject,
        issuer,
        key_pair,
        validity_days,
    )
}

fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(AppError::invalid_input("subject (webid) must not be empty"));
    }
    Ok(())
}

fn validate_issuer(issuer: &str) -> Result<()> {
    url::Url::parse(issuer)
        .map(|_| ())
        .map_err(|e| AppError::invalid_input(format!("issuer must be an absolute URL: {e}")))
}

/// `floor(validity_days * 86400)`, computed once at the end.
fn lifetime_seconds(validity_days: f64) -> Result<i64> {
    if !validity_days.is_finite() || validity_days <= 0.0 {
        return Err(AppError::invalid_input(
            "validity (days) must be a positive number",
        ));
    }

    let seconds = (validity_days * SECONDS_PER_DAY).trunc();
    if seconds < 1.0 {
        return Err(AppError::invalid_input(
            "validity (days) must amount to at least one second",
        ));
    }
    if seconds >= i64::MAX as f64 {
        return Err(AppError::invalid_input("validity (days) is too large"));
    }

    Ok(seconds as i64)
}
