use std::io::{self, Write};
use std::panic;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::config::{self, HeadersConfig, SessionConfig};
use crate::dto::{
    jwks::build_jwks, openid_configuration::OpenIdConfiguration, session::SessionDocument,
    webid::render_profile,
};
use crate::error::{AppError, Result};
use crate::services::auth::{DpopProofGenerator, issue_access_token};
use crate::services::token_id::UuidV4Generator;

const KEYS_HELP: &str = "\
# Use these commands to create a private and public key
openssl genrsa -out private.key 2048
openssl rsa -in private.key -pubout > public.key";

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise only warnings and errors.
    // Ex:
    // RUST_LOG=solid_dpop=debug solid-dpop session ...
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    // stdout is reserved for tokens and documents.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn init_panic_hook() {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");
        default_hook(info);
    }))
}

pub fn run() -> Result<()> {
    config::load_dotenv();
    init_tracing();
    init_panic_hook();

    let cli = Cli::parse();
    let stdout = io::stdout();
    execute(cli.command, &mut stdout.lock())
}

/// Run one command and write its complete output to `out`.
///
/// Output is rendered fully before the single write, so a failing command
/// leaves `out` untouched.
pub fn execute<W: Write>(command: Command, out: &mut W) -> Result<()> {
    let rendered = render(command)?;
    writeln!(out, "{}", rendered).map_err(AppError::Output)?;
    out.flush().map_err(AppError::Output)
}

fn render(command: Command) -> Result<String> {
    match command {
        Command::Keys => Ok(KEYS_HELP.to_string()),
        Command::Session(args) => {
            let config = SessionConfig::try_from(args)?;
            let key_pair = config.keys.load()?;
            let issued = issue_access_token(
                &config.webid,
                &config.issuer,
                &key_pair,
                config.validity_days,
            )?;
            tracing::info!(kid = %issued.kid, exp = issued.claims.exp, "session issued");
            Ok(SessionDocument::new(issued.access_token).to_json())
        }
        Command::Jwks(args) => {
            let public_key = config::read_file(&args.public_key)?;
            let jwks = build_jwks(&public_key)?;
            to_json(&jwks)
        }
        Command::Webid(args) => render_profile(&args.name, &args.issuer),
        Command::OpenidConfiguration(args) => {
            let conf = OpenIdConfiguration::new(&args.jwks_uri)?;
            to_json(&conf)
        }
        Command::Headers(args) => {
            let config = HeadersConfig::try_from(args)?;
            let session = SessionDocument::from_json(&config::read_file(&config.session)?)?;
            let key_pair = config.keys.load()?;
            let headers = DpopProofGenerator::new(UuidV4Generator).make_auth_headers(
                &config.method,
                &config.url,
                &session.access_token,
                &key_pair,
                &config.proof,
            )?;
            Ok(headers.to_curl_args())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| AppError::invalid_input(e.to_string()))
}
