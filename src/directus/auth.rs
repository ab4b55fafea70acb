//! Login, token refresh, logout and the authentication probe.

use serde::Serialize;

use crate::directus::client::{Auth, DirectusClient};
use crate::directus::error::RemoteError;
use crate::directus::types::{AuthPayload, AuthUser, Credentials, Session, TokenSet};
use crate::observability::metrics;
use crate::resilience::{bounded, describe, run, Envelope};

/// Ask Directus to return tokens in the body instead of a cookie.
const JSON_MODE: &str = "json";

#[derive(Serialize)]
struct LoginRequest<'a> {
    #[serde(flatten)]
    credentials: &'a Credentials,
    mode: &'static str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
    mode: &'static str,
}

/// Verdict of [`DirectusClient::check_authenticated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
    /// The probe failed for a reason unrelated to the token (network,
    /// server error, timeout). Callers should keep the session.
    Undetermined,
}

impl AuthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthStatus::Authenticated => "authenticated",
            AuthStatus::Unauthenticated => "unauthenticated",
            AuthStatus::Undetermined => "undetermined",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthCheck {
    pub status: AuthStatus,
    pub refreshed: bool,
    /// New tokens, present only when `refreshed` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl AuthCheck {
    fn plain(status: AuthStatus) -> Self {
        Self {
            status,
            refreshed: false,
            session: None,
        }
    }
}

/// Turn a login/refresh payload into a session, rejecting payloads without
/// an access token.
fn session_from(payload: AuthPayload, fallback_email: Option<&str>) -> Result<Session, RemoteError> {
    let access_token = payload
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RemoteError::MalformedResponse("response carries no access_token".into()))?;

    Ok(Session {
        tokens: TokenSet {
            access_token,
            refresh_token: payload.refresh_token,
            expires: payload.expires,
        },
        user: payload
            .user
            .or_else(|| fallback_email.map(AuthUser::from_email)),
    })
}

impl DirectusClient {
    /// Log in with email and password.
    ///
    /// When the backend does not return a user object, the session's user
    /// holds just the email that was used.
    pub async fn authenticate(&self, credentials: &Credentials) -> Envelope<Session> {
        tracing::info!(email = %credentials.email, "Authenticating");
        let body = LoginRequest {
            credentials,
            mode: JSON_MODE,
        };

        let envelope = run("authenticating", self.deadline(), || async {
            let payload: AuthPayload = self.post("auth/login", &body, Auth::Anonymous).await?;
            session_from(payload, Some(&credentials.email))
        })
        .await;

        if let Envelope::Ok(session) = &envelope {
            tracing::info!(
                has_user = session.user.is_some(),
                has_refresh_token = session.tokens.refresh_token.is_some(),
                expires = ?session.tokens.expires,
                "Authenticated"
            );
        }
        envelope
    }

    /// Exchange a refresh token for a new token pair. Does not need (or
    /// use) the current session.
    pub async fn refresh_token(&self, refresh_token: &str) -> Envelope<Session> {
        if refresh_token.trim().is_empty() {
            return Envelope::Err(describe(&RemoteError::Validation(
                "refresh token is required".into(),
            )));
        }
        let body = RefreshRequest {
            refresh_token,
            mode: JSON_MODE,
        };

        run("refreshing token", self.deadline(), || async {
            let payload: AuthPayload = self.post("auth/refresh", &body, Auth::Anonymous).await?;
            session_from(payload, None)
        })
        .await
    }

    /// Invalidate a refresh token on the backend.
    pub async fn logout(&self, refresh_token: &str) -> Envelope<()> {
        if refresh_token.trim().is_empty() {
            return Envelope::Err(describe(&RemoteError::Validation(
                "refresh token is required".into(),
            )));
        }
        let body = RefreshRequest {
            refresh_token,
            mode: JSON_MODE,
        };

        run("logging out", self.deadline(), || async {
            self.post_no_content("auth/logout", &body, Auth::Session).await
        })
        .await
    }

    /// The account behind the session's token (`/users/me`).
    ///
    /// Callers use this to resolve the acting user before
    /// [`DirectusClient::create_vehicle`].
    pub async fn current_user(&self) -> Envelope<AuthUser> {
        run("reading current user", self.deadline(), || async {
            self.get("users/me", &[]).await
        })
        .await
    }

    /// Check whether the session's token is still accepted.
    ///
    /// The backend has no cheap "who am I" check, so this reads at most one
    /// record of the probe collection. If that read is rejected for
    /// authorization reasons and a refresh token is given, one refresh is
    /// attempted. Failures unrelated to authorization yield
    /// [`AuthStatus::Undetermined`].
    pub async fn check_authenticated(&self, refresh_token: Option<&str>) -> AuthCheck {
        let path = format!("items/{}", self.config().collections.probe);
        let probe = bounded("probing authentication", self.deadline(), || async {
            self.get::<serde_json::Value>(&path, &[("limit", "1".to_string())])
                .await
                .map(|_| ())
        })
        .await;

        let check = match probe {
            Ok(()) => AuthCheck::plain(AuthStatus::Authenticated),
            Err(e) if e.is_auth_failure() => {
                tracing::info!(error = %e, "Token rejected by backend");
                self.refresh_after_rejection(refresh_token).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not determine authentication state");
                AuthCheck::plain(AuthStatus::Undetermined)
            }
        };

        metrics::record_auth_check(check.status.as_str(), check.refreshed);
        check
    }

    async fn refresh_after_rejection(&self, refresh_token: Option<&str>) -> AuthCheck {
        let Some(token) = refresh_token.filter(|t| !t.trim().is_empty()) else {
            return AuthCheck::plain(AuthStatus::Unauthenticated);
        };

        match self.refresh_token(token).await {
            Envelope::Ok(session) => {
                tracing::info!("Token refreshed after rejection");
                AuthCheck {
                    status: AuthStatus::Authenticated,
                    refreshed: true,
                    session: Some(session),
                }
            }
            Envelope::Err(err) => {
                tracing::info!(error = %err, "Refresh after rejection failed");
                AuthCheck::plain(AuthStatus::Unauthenticated)
            }
        }
    }
}
