//! REST helpers for the diary auth endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Every helper returns the client's [`ApiError`] unchanged; the session
//! store decides what a failed login means for local state.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::http::{HttpClient, Method};
use super::types::{NewAccount, OkResponse, PasswordChange, PasswordGrant, Profile, TokenResponse};
use crate::error::ApiError;

pub const TOKEN_PATH: &str = "/auth/token";
pub const ME_PATH: &str = "/auth/me";
pub const CHANGE_PASSWORD_PATH: &str = "/auth/change_password";
pub const SIGNUP_PATH: &str = "/auth/signup";

/// Exchange credentials for a bearer token via the OAuth2 password grant.
///
/// # Errors
///
/// Returns an error if the server rejects the credentials, the request
/// fails, or the response carries no token.
pub async fn request_token(http: &HttpClient, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
    let grant = PasswordGrant { username, password };
    let token: TokenResponse = http.post_form(TOKEN_PATH, &grant).await?;
    if token.access_token.trim().is_empty() {
        return Err(ApiError::Decode("token response carried an empty access_token".to_owned()));
    }
    Ok(token)
}

/// Fetch the profile of whoever owns the current bearer token.
///
/// # Errors
///
/// Returns an error if the request fails or the profile does not decode.
pub async fn fetch_me(http: &HttpClient) -> Result<Profile, ApiError> {
    http.get_json(ME_PATH).await
}

/// Change the current user's password.
///
/// # Errors
///
/// Returns an error if the old password is rejected or the request fails.
pub async fn change_password(http: &HttpClient, old_password: &str, new_password: &str) -> Result<(), ApiError> {
    let body = PasswordChange { old_password, new_password };
    let ack: OkResponse = http.send_json(Method::Post, CHANGE_PASSWORD_PATH, &body).await?;
    if !ack.ok {
        return Err(ApiError::Decode("password change was not acknowledged".to_owned()));
    }
    Ok(())
}

/// Register a new (inactive until approved) account.
///
/// # Errors
///
/// Returns an error if the server rejects the account or the request fails.
pub async fn signup(http: &HttpClient, account: &NewAccount) -> Result<Profile, ApiError> {
    http.send_json(Method::Post, SIGNUP_PATH, account).await
}
