pub mod jwks;
pub mod openid_configuration;
pub mod session;
pub mod webid;
