//! Solid-OIDC style DPoP-bound access tokens.
//!
//! - `services::auth::token_issuer`: RS256 access token with `cnf.jkt`
//! - `services::auth::dpop`: per-request DPoP proof + `Authorization: DPoP ...`
//! - `services::auth::keys`: KeyID and JWK thumbprint, the glue between both

pub mod app;
pub mod cli;
pub mod config;
pub mod dto;
pub mod error;
pub mod services;

#[cfg(test)]
mod test_support;

pub use error::{AppError, Result};
