use crate::config::Settings;

/// OAuth client configuration for the identity provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// The OIDC issuer URL (e.g., `https://accounts.google.com`).
    pub issuer_url: String,
    /// The OAuth2 client ID.
    pub client_id: String,
    /// The OAuth2 client secret.
    pub client_secret: String,
    /// The redirect URI the provider sends the browser back to.
    pub redirect_uri: String,
}

impl OAuthConfig {
    /// Pick the OAuth fields out of the loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            issuer_url: settings.oauth_issuer_url.clone(),
            client_id: settings.google_client_id.clone(),
            client_secret: settings.google_client_secret.clone(),
            redirect_uri: settings.oauth_redirect_url.clone(),
        }
    }
}
