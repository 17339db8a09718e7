//! Fixture key pair shared by unit tests.
//!
//! Generated with `openssl genrsa 2048`; thumbprint and key id computed
//! independently of this crate.

pub const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../tests/fixtures/private.key");
pub const PUBLIC_KEY_PEM: &[u8] = include_bytes!("../tests/fixtures/public.key");
pub const PUBLIC_KEY_PKCS1_PEM: &[u8] = include_bytes!("../tests/fixtures/public_pkcs1.key");

pub const FIXTURE_N: &str = "yBZQwqTzLZGm8TNeUI3Ut2L4PHPkL2QA0Je75_1sPy6Tmudbydf10x4VWrm52oqtsVLItu5_ypA1xOzu-c9SIL2fbWMQbyS8uDDNmr8xoJRonpVTjr2_UVVFkVTWAsfo4g9-wpICB0vM0jTeJJsh-2z4r5iSWfa_lPWsyFuJ_ihcexgEC9LEjXrZP47-W5RcGBdBcuIIkixsXty0ZB2O6VsbSPJyq-Kj2MxhKD95ye1ozfhCOY_265ae21RdLAIs0gYCTlbQhhfuVKhsXmysK8us0eR2iu4Fjz0f2AxxRy2iv8x5LnAder576Q7_xA0_OYD9DL-2R7wz7QzlhPS4OQ";
pub const FIXTURE_JKT: &str = "_bLkSksinZ5VEKh8iB_tyBEeh3zZXTDI63m1LDUiCD4";
pub const FIXTURE_KID: &str = "560b395a776fc60e001b4730c464b65a7515108de22fcd127a2941f9d530fc3c";

pub fn key_pair() -> crate::services::auth::keys::KeyPair {
    crate::services::auth::keys::KeyPair::new(PRIVATE_KEY_PEM, PUBLIC_KEY_PEM)
}
