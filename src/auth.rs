pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;

use async_trait::async_trait;
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, OAuth2TokenResponse,
    RedirectUrl, Scope,
};

use crate::auth::config::OAuthConfig;
use crate::auth::models::GoogleUserInfo;
use crate::error::AppError;

/// Used when discovery does not advertise a userinfo endpoint.
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// The three provider calls of the authorization-code flow.
///
/// Abstracted as a trait so the login handlers can be tested without a
/// real identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser, with `state` as the anti-forgery value.
    fn authorize_url(&self, state: &CsrfToken) -> String;

    /// Exchange an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, AppError>;

    /// Fetch the signed-in user's profile with the access token.
    async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError>;
}

/// Google (or any OIDC issuer) via discovery.
pub struct GoogleProvider {
    metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    userinfo_url: String,
    http: reqwest::Client,
}

impl GoogleProvider {
    /// Run OIDC discovery against the configured issuer.
    pub async fn discover(config: &OAuthConfig) -> Result<Self, AppError> {
        // Following redirects from the token endpoint would leak the code.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        let issuer = IssuerUrl::new(config.issuer_url.clone())
            .map_err(|e| AppError::Auth(format!("Invalid issuer URL: {e}")))?;
        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| AppError::Auth(format!("Invalid redirect URL: {e}")))?;

        let metadata = CoreProviderMetadata::discover_async(issuer, &http)
            .await
            .map_err(|e| AppError::Auth(format!("Failed to discover OIDC provider: {e}")))?;

        let userinfo_url = metadata
            .userinfo_endpoint()
            .map(|u| u.url().to_string())
            .unwrap_or_else(|| GOOGLE_USERINFO_URL.to_string());

        tracing::info!("OIDC provider discovered at {}", config.issuer_url);

        Ok(Self {
            metadata,
            client_id: ClientId::new(config.client_id.clone()),
            client_secret: ClientSecret::new(config.client_secret.clone()),
            redirect_url,
            userinfo_url,
            http,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self, state: &CsrfToken) -> String {
        let state = state.clone();
        let (url, _state, _nonce) = CoreClient::from_provider_metadata(
            self.metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone())
        .authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            move || state,
            Nonce::new_random,
        )
        .add_scope(Scope::new("email".to_string()))
        .url();
        url.to_string()
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let client = CoreClient::from_provider_metadata(
            self.metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let token = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AppError::Auth(format!("Token endpoint not configured: {e}")))?
            .request_async(&self.http)
            .await
            .map_err(|e| AppError::Auth(format!("Code exchange failed: {e}")))?;

        Ok(token.access_token().secret().clone())
    }

    async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo, AppError> {
        self.http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::Auth(format!("Failed getting user info: {e}")))?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| AppError::Auth(format!("Failed reading user info: {e}")))
    }
}
