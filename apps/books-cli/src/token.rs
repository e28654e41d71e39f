//! OAuth2 client-credentials token exchange.

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub struct ClientCredentials<'a> {
    pub token_url: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub scope: Option<&'a str>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange client credentials for an access token at `token_url`.
///
/// # Errors
/// Returns an error if the endpoint is unreachable, answers with a
/// non-success status, or the body has no `access_token`.
pub async fn fetch_token(http: &reqwest::Client, creds: &ClientCredentials<'_>) -> Result<String> {
    let mut form = vec![
        ("grant_type", "client_credentials"),
        ("client_id", creds.client_id),
        ("client_secret", creds.client_secret),
    ];
    if let Some(scope) = creds.scope {
        form.push(("scope", scope));
    }

    let resp = http
        .post(creds.token_url)
        .form(&form)
        .send()
        .await
        .with_context(|| format!("token endpoint {} unreachable", creds.token_url))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("token endpoint answered {status}: {body}");
    }

    let token: TokenResponse = resp
        .json()
        .await
        .context("token endpoint returned no access_token")?;
    tracing::debug!(client_id = creds.client_id, "access token obtained");
    Ok(token.access_token)
}
