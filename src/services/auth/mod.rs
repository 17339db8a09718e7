pub mod dpop;
pub mod jwt;
pub mod keys;
pub mod token_issuer;

pub use dpop::{AuthHeaders, DpopProofGenerator, ProofOptions, make_auth_headers, make_dpop_proof};
pub use jwt::JwtSigner;
pub use keys::{JwkThumbprint, KeyId, KeyPair, derive_key_id, thumbprint, to_jwk};
pub use token_issuer::{AccessTokenIssuer, IssuedAccessToken, issue_access_token};
