//! Service-account authentication.
//!
//! Google service accounts authenticate by signing a short-lived RS256 JWT
//! with the account's private key and exchanging it at the token endpoint for
//! a bearer access token.

use std::path::Path;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetsError};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// The subset of a service-account key file this client needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Read and parse a key file downloaded from the Cloud console.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SheetsError::Credentials(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SheetsError::Credentials(format!("invalid service-account key: {}", e)))
    }
}

/// Claims of the signed assertion.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    /// Claims valid for one hour from `now`.
    pub fn new(key: &ServiceAccountKey, scope: &str, now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: scope.to_string(),
            aud: key.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(1)).timestamp(),
        }
    }
}

/// Sign the assertion with the key's RSA private key.
pub fn sign_assertion(key: &ServiceAccountKey, claims: &AssertionClaims) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SheetsError::Auth(format!("invalid private key: {}", e)))?;

    encode(&Header::new(Algorithm::RS256), claims, &encoding_key)
        .map_err(|e| SheetsError::Auth(format!("failed to sign assertion: {}", e)))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange a fresh assertion for an access token.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    key: &ServiceAccountKey,
    scope: &str,
) -> Result<String> {
    let claims = AssertionClaims::new(key, scope, chrono::Utc::now());
    let assertion = sign_assertion(key, &claims)?;

    let resp = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SheetsError::Auth(format!(
            "token exchange failed ({}): {}",
            status.as_u16(),
            body
        )));
    }

    let token: TokenResponse = resp
        .json()
        .await
        .map_err(|e| SheetsError::Parse(format!("token response: {}", e)))?;

    tracing::debug!(client_email = %key.client_email, "Obtained Sheets access token");
    Ok(token.access_token)
}
