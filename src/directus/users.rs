//! User profile records, platform accounts and user reads.
//!
//! Profiles (`Usuario` collection) and accounts (`directus_users`) share no
//! schema: a profile is application data, an account is a login on the
//! platform. They stay separate types with separate creation paths.

use crate::directus::client::{Auth, DirectusClient};
use crate::directus::error::RemoteError;
use crate::directus::types::{
    Account, AccountInput, NewAccount, NewUserRecord, UserRecord, UserRecordInput, UserRow,
    UserSummary,
};
use crate::resilience::{describe, run, Envelope, ErrorKind};

const USER_FIELDS: &str = "id,first_name,email,phone";

/// Friendly messages for profile creation failures.
fn profile_message(kind: ErrorKind, _raw: &str) -> Option<String> {
    match kind {
        ErrorKind::DuplicateResource => {
            Some("This email address is already registered. Please use another one.".into())
        }
        ErrorKind::ValidationFailure => {
            Some("The provided data is not valid. Please check the information.".into())
        }
        _ => None,
    }
}

/// Friendly messages for account creation failures.
fn account_message(kind: ErrorKind, raw: &str) -> Option<String> {
    match kind {
        ErrorKind::DuplicateResource => Some("This email address is already registered".into()),
        ErrorKind::ValidationFailure => Some(format!("Validation error: {}", raw)),
        ErrorKind::PermissionDenied => Some("You do not have permission to create users".into()),
        ErrorKind::Timeout => {
            Some("Timed out while creating the user. Please try again.".into())
        }
        _ => None,
    }
}

impl DirectusClient {
    /// Create an application profile in the profiles collection.
    ///
    /// Status and role default from configuration; `input.role` overrides
    /// the role. Name, email and password are required; without them no
    /// request is made.
    pub async fn create_user_record(&self, input: &UserRecordInput) -> Envelope<UserRecord> {
        if input.name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
        {
            return Envelope::Err(describe(&RemoteError::Validation(
                "Name, email and password are required".into(),
            )));
        }

        tracing::info!(user = ?input, "Creating user profile");
        let defaults = &self.config().defaults;
        let path = format!("items/{}", self.config().collections.profiles);
        let body = NewUserRecord {
            name: &input.name,
            email: &input.email,
            phone: input.phone.as_deref(),
            password: &input.password,
            city: input.city.as_ref(),
            status: &defaults.profile_status,
            role: input.role.as_deref().unwrap_or(&defaults.profile_role),
        };

        run("creating user profile", self.deadline(), || async {
            self.post(&path, &body, Auth::Session).await
        })
        .await
        .map_err(|err| err.translate(profile_message))
    }

    /// Create a platform account with the configured role.
    ///
    /// Email and password are required; without them no request is made.
    pub async fn create_account(&self, input: &AccountInput) -> Envelope<Account> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Envelope::Err(describe(&RemoteError::Validation(
                "Email and password are required".into(),
            )));
        }

        tracing::info!(account = ?input, "Creating platform account");
        let body = NewAccount {
            email: input.email.trim(),
            password: &input.password,
            first_name: input.first_name.as_deref().unwrap_or(""),
            role: &self.config().defaults.account_role,
        };

        run("creating account", self.deadline(), || async {
            self.post("users", &body, Auth::Session).await
        })
        .await
        .map_err(|err| err.translate(account_message))
    }

    /// All platform users, mapped for display. Empty on failure.
    pub async fn list_users(&self) -> Vec<UserSummary> {
        let query = [("fields", USER_FIELDS.to_string())];
        run("listing users", self.deadline(), || async {
            self.get::<Vec<UserRow>>("users", &query).await
        })
        .await
        .map(|rows| rows.into_iter().map(UserSummary::from).collect::<Vec<_>>())
        .unwrap_or(Vec::new())
    }

    /// One platform user, mapped for display.
    ///
    /// Never fails: a missing user or a failed read yields
    /// [`UserSummary::unavailable`].
    pub async fn get_user(&self, id: &str) -> UserSummary {
        let query = [
            ("fields", USER_FIELDS.to_string()),
            ("filter[id][_eq]", id.to_string()),
            ("limit", "1".to_string()),
        ];

        let envelope = run("reading user", self.deadline(), || async {
            let rows: Vec<UserRow> = self.get("users", &query).await?;
            Ok(rows.into_iter().next())
        })
        .await;

        match envelope {
            Envelope::Ok(Some(row)) => UserSummary::from(row),
            Envelope::Ok(None) => {
                tracing::warn!(id, "User not found");
                UserSummary::unavailable(id)
            }
            Envelope::Err(err) => {
                tracing::warn!(id, error = %err, "Could not read user");
                UserSummary::unavailable(id)
            }
        }
    }
}
