//! Firebase Identity Toolkit client (email/password accounts)

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::http::{build_client, error_message, handle_response, status_error};
use crate::{ClientConfig, ClientError, ClientResult};

/// Identity Toolkit error codes meaning "wrong email/password"
const CREDENTIAL_ERRORS: &[&str] = &[
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "MISSING_PASSWORD",
    "USER_DISABLED",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Successful sign-in or sign-up
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// ID token for authenticated calls
    pub id_token: String,
    /// Account uid
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds (sent as a string)
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// Identity Toolkit client
#[derive(Debug, Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl IdentityClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            client: build_client(config.timeout)?,
            base_url: config.identity_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Sign in with email and password
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        self.password_call("accounts:signInWithPassword", email, password)
            .await
    }

    /// Create a new email/password account
    pub async fn sign_up(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        self.password_call("accounts:signUp", email, password).await
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let url = format!("{}/{}", self.base_url, method);
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(classify_error(status, &text));
        }
        handle_response(response).await
    }
}

/// Turn an Identity Toolkit failure into invalid-credentials vs anything else
///
/// Messages look like `INVALID_PASSWORD` or `WEAK_PASSWORD : Password should be ...`.
fn classify_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    let message = error_message(body);
    let code = message.split([' ', ':']).next().unwrap_or_default();
    if CREDENTIAL_ERRORS.contains(&code) {
        return ClientError::InvalidCredentials(code.to_string());
    }
    status_error(status, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_credential_errors_are_classified() {
        for code in ["INVALID_PASSWORD", "EMAIL_NOT_FOUND", "INVALID_LOGIN_CREDENTIALS"] {
            let body = format!(r#"{{"error":{{"code":400,"message":"{code}"}}}}"#);
            let err = classify_error(StatusCode::BAD_REQUEST, &body);
            assert!(err.is_invalid_credentials(), "{code}");
        }

        let body = r#"{"error":{"code":400,"message":"USER_DISABLED : The user account has been disabled."}}"#;
        match classify_error(StatusCode::BAD_REQUEST, body) {
            ClientError::InvalidCredentials(code) => assert_eq!(code, "USER_DISABLED"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_other_errors_stay_generic() {
        let body = r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#;
        let err = classify_error(StatusCode::BAD_REQUEST, body);
        assert!(!err.is_invalid_credentials());
        assert!(matches!(err, ClientError::Api { status: 400, .. }));

        let err = classify_error(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(matches!(err, ClientError::Api { status: 503, .. }));
    }

    #[test]
    fn test_auth_response_shape() {
        let json = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "ana@resto.co",
            "idToken": "tok",
            "refreshToken": "ref",
            "expiresIn": "3600",
            "registered": true
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.local_id, "uid-1");
        assert_eq!(resp.id_token, "tok");
        assert_eq!(resp.expires_in.as_deref(), Some("3600"));
    }
}
