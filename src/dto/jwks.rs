use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm, PublicKeyUse};

use crate::error::Result;
use crate::services::auth::keys::{derive_key_id, to_jwk};

/// Single-key JWKS for `public_key`: the JWK plus `use`, `alg` and `kid`.
///
/// `kid` is the same KeyID the issuer puts in access-token headers.
pub fn build_jwks(public_key: &[u8]) -> Result<JwkSet> {
    let mut jwk = to_jwk(public_key)?;
    jwk.common.public_key_use = Some(PublicKeyUse::Signature);
    jwk.common.key_algorithm = Some(KeyAlgorithm::RS256);
    jwk.common.key_id = Some(derive_key_id(public_key).into_inner());

    Ok(JwkSet { keys: vec![jwk] })
}
