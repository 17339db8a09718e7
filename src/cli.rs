use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Issue DPoP-bound Solid-OIDC access tokens and per-request DPoP proofs.
///
/// Options marked with an env var can also be set in the environment or a
/// `.env` file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "solid-dpop", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the openssl commands that create a private and public key
    Keys,

    /// Issue an access token and print it as a session document
    Session(SessionArgs),

    /// Print the JWKS document for a public key
    Jwks(JwksArgs),

    /// Print a WebID profile document (Turtle)
    Webid(WebidArgs),

    /// Print an OpenID configuration pointing at a JWKS uri
    #[command(name = "openid-configuration")]
    OpenidConfiguration(OpenidConfigurationArgs),

    /// Print curl header arguments (Authorization + DPoP) for one request
    Headers(HeadersArgs),
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// RSA private key in PEM (PKCS#1 or PKCS#8)
    #[arg(long = "private", value_name = "FILE", env = "SOLID_PRIVATE_KEY")]
    pub private_key: PathBuf,

    /// RSA public key in PEM (SPKI or PKCS#1)
    #[arg(long = "public", value_name = "FILE", env = "SOLID_PUBLIC_KEY")]
    pub public_key: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub keys: KeyArgs,

    /// WebID of the subject (used for `webid` and `sub`)
    #[arg(long, env = "SOLID_WEBID")]
    pub webid: String,

    /// Issuer URL (`iss`)
    #[arg(long, env = "SOLID_ISSUER")]
    pub issuer: String,

    /// Token lifetime in days, fractions allowed (e.g. 0.5)
    #[arg(long, value_name = "DAYS", env = "SOLID_EXPIRE_DAYS")]
    pub expire: f64,
}

#[derive(Args, Debug, Clone)]
pub struct JwksArgs {
    /// RSA public key in PEM (SPKI or PKCS#1)
    #[arg(long = "public", value_name = "FILE", env = "SOLID_PUBLIC_KEY")]
    pub public_key: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct WebidArgs {
    /// Issuer URL trusted by this WebID
    #[arg(long, env = "SOLID_ISSUER")]
    pub issuer: String,

    /// Display name (`foaf:name`)
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct OpenidConfigurationArgs {
    /// Where the JWKS document is served
    #[arg(long = "jwks", value_name = "URI", env = "SOLID_JWKS_URI")]
    pub jwks_uri: String,
}

#[derive(Args, Debug, Clone)]
pub struct HeadersArgs {
    /// HTTP method (htm), used verbatim
    pub method: String,

    /// Full request URL (htu), used verbatim
    pub url: String,

    /// Session document written by `session`
    #[arg(long, value_name = "FILE", env = "SOLID_SESSION")]
    pub session: PathBuf,

    #[command(flatten)]
    pub keys: KeyArgs,

    /// Server-provided DPoP nonce
    #[arg(long)]
    pub nonce: Option<String>,

    /// Bind the proof to the access token with an `ath` claim
    #[arg(long, default_value_t = false)]
    pub ath: bool,
}
