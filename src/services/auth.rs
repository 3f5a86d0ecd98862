use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

/// Verifies bearer tokens issued by the external auth provider. The provider
/// owns registration, passwords and sessions; this service only checks the
/// shared-secret signature and, when the token does not carry an email,
/// fetches the identity over HTTP.
#[derive(Clone)]
pub struct AuthService {
    config: Config,
    http_client: Client,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Provider-side user id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Identity as established for one request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    #[allow(dead_code)]
    id: String,
    email: String,
    name: Option<String>,
    image: Option<String>,
}

impl AuthService {
    pub async fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    pub fn verify_jwt(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_ref());
        let validation = Validation::new(Algorithm::HS256);

        match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(token_data) => {
                debug!("JWT token verified for user: {}", token_data.claims.sub);
                Ok(token_data.claims)
            }
            Err(e) => {
                warn!("JWT verification failed: {}", e);
                Err(AppError::Authentication("Invalid token".to_string()))
            }
        }
    }

    /// Establish the caller's identity from a bearer token. Tokens normally
    /// carry the email claim; older provider tokens do not, in which case the
    /// provider is asked directly.
    pub async fn resolve_identity(&self, token: &str) -> Result<Identity> {
        let claims = self.verify_jwt(token)?;

        if let Some(email) = claims.email {
            return Ok(Identity {
                external_id: claims.sub,
                email,
                name: claims.name,
                image: None,
            });
        }

        let user = self.fetch_provider_user(token).await?;
        Ok(Identity {
            external_id: claims.sub,
            email: user.email,
            name: user.name,
            image: user.image,
        })
    }

    async fn fetch_provider_user(&self, token: &str) -> Result<ProviderUser> {
        let url = format!("{}/api/users/me", self.config.auth_service_url);

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch user from auth provider: {}", e);
                AppError::ExternalService("Failed to verify user with auth provider".to_string())
            })?;

        if !response.status().is_success() {
            warn!(
                "Auth provider rejected token: status {}",
                response.status()
            );
            return Err(AppError::Authentication("Invalid token".to_string()));
        }

        response.json::<ProviderUser>().await.map_err(|e| {
            error!("Failed to parse auth provider response: {}", e);
            AppError::ExternalService("Invalid response from auth provider".to_string())
        })
    }
}
