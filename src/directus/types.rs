//! Wire and domain types for the Directus collections this crate touches.
//!
//! Collection field names (`Placa`, `Tipo`, `Ciudad`, ...) are part of the
//! backend schema and are kept verbatim on the wire through serde renames.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder used when the backend omits a user's name.
pub const UNNAMED: &str = "Unnamed";
/// Placeholder for any other missing optional value.
pub const NOT_AVAILABLE: &str = "Not available";
/// Name shown for a user whose record could not be loaded.
pub const FAILED_TO_LOAD: &str = "Failed to load";

/// Primary key of a backend record.
///
/// Directus hands out integers for item collections and UUIDs for system
/// collections; both are kept as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => RecordId(n.to_string()),
            Raw::Str(s) => RecordId(s),
        })
    }
}

/// Login credentials. The password is never printed.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access/refresh token pair as issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Access token lifetime in milliseconds.
    pub expires: Option<i64>,
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires", &self.expires)
            .finish()
    }
}

/// User object attached to a login, or returned by `/users/me`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl AuthUser {
    /// The minimal user known after a login that returned no user object.
    pub fn from_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Self::default()
        }
    }
}

/// Tokens plus whatever we know about the user they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    #[serde(flatten)]
    pub tokens: TokenSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

/// `data` of a login or refresh response. Every field is optional so that a
/// missing token surfaces as a malformed response instead of a decode error.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthPayload {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// A row of the `Vehiculo` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: RecordId,
    #[serde(rename = "Placa", default)]
    pub plate: String,
    #[serde(rename = "Tipo", default)]
    pub kind: String,
    #[serde(rename = "Ciudad", default, skip_serializing_if = "Option::is_none")]
    pub city: Option<RecordId>,
    #[serde(rename = "Usuario", default)]
    pub owner: Option<RecordId>,
}

/// Body of a vehicle create call. `Usuario` is sent as `null` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NewVehicle<'a> {
    #[serde(rename = "Placa")]
    pub plate: &'a str,
    #[serde(rename = "Tipo")]
    pub kind: &'a str,
    #[serde(rename = "Ciudad")]
    pub city: &'a str,
    #[serde(rename = "Usuario")]
    pub owner: Option<&'a RecordId>,
}

/// Input for a profile record in the `Usuario` collection.
#[derive(Clone, Default, Deserialize)]
pub struct UserRecordInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    #[serde(default)]
    pub city: Option<RecordId>,
    /// Overrides the configured default role.
    #[serde(default)]
    pub role: Option<String>,
}

impl fmt::Debug for UserRecordInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecordInput")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"<redacted>")
            .field("city", &self.city)
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct NewUserRecord<'a> {
    #[serde(rename = "Nombre")]
    pub name: &'a str,
    #[serde(rename = "Correo")]
    pub email: &'a str,
    #[serde(rename = "Telefono")]
    pub phone: Option<&'a str>,
    #[serde(rename = "Clave")]
    pub password: &'a str,
    #[serde(rename = "Ciudad")]
    pub city: Option<&'a RecordId>,
    pub status: &'a str,
    pub role: &'a str,
}

/// A created `Usuario` profile record. The stored password is dropped on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(rename = "Nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "Correo", default)]
    pub email: Option<String>,
    #[serde(rename = "Telefono", default)]
    pub phone: Option<String>,
    #[serde(rename = "Ciudad", default)]
    pub city: Option<RecordId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub role: Option<RecordId>,
}

/// Input for a platform account (`directus_users`).
#[derive(Clone, Default, Deserialize)]
pub struct AccountInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl fmt::Debug for AccountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .finish()
    }
}

#[derive(Serialize)]
pub(crate) struct NewAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub role: &'a str,
}

/// A created platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: RecordId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub role: Option<RecordId>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A `directus_users` row as requested by the user reads.
#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    pub id: RecordId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Display-ready user with placeholders in place of missing values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.0,
            name: present(row.first_name).unwrap_or_else(|| UNNAMED.to_string()),
            email: present(row.email).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            phone: present(row.phone).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

impl UserSummary {
    /// Stand-in returned when a user could not be read.
    pub fn unavailable(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: FAILED_TO_LOAD.to_string(),
            email: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
        }
    }
}
