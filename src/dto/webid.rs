use crate::error::{AppError, Result};

/// Turtle WebID profile naming `issuer` as the trusted OIDC issuer.
pub fn render_profile(name: &str, issuer: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_input("name must not be empty"));
    }
    url::Url::parse(issuer)
        .map_err(|e| AppError::invalid_input(format!("issuer must be an absolute URL: {e}")))?;

    // Keep the Turtle string literal well-formed.
    let name = name.replace('\\', "\\\\").replace('"', "\\\"");

    Ok(format!(
        r#"@prefix : <#>.
@prefix schema: <http://schema.org/> .
@prefix foaf: <http://xmlns.com/foaf/0.1/> .
@prefix ldp: <http://www.w3.org/ns/ldp#>.

:me
    a           schema:Person, foaf:Person;
    foaf:name   "{name}" ;
    <http://www.w3.org/ns/solid/terms#oidcIssuer> <{issuer}> .
"#
    ))
}
