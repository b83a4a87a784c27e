use serde::{Deserialize, Serialize};

use crate::db::models::Admin;

/// Profile returned by the provider's userinfo endpoint.
///
/// Google's v2 endpoint names the account id `id`, the OIDC one `sub`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    #[serde(alias = "sub")]
    pub id: String,
    pub email: String,
    #[serde(default, alias = "email_verified")]
    pub verified_email: bool,
    #[serde(default)]
    pub picture: Option<String>,
}

/// The admin identity carried in the encrypted session cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSession {
    /// Hex object id of the admin record.
    pub admin_id: String,
    pub email: String,
    pub google_id: String,
}

impl From<&Admin> for AdminSession {
    fn from(admin: &Admin) -> Self {
        Self {
            admin_id: admin.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: admin.email.clone(),
            google_id: admin.google_id.clone(),
        }
    }
}
