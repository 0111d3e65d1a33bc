use async_trait::async_trait;
use chrono::Utc;
use common::errors::AppError;
use common::http_client::HttpClient;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, instrument};

use super::service_account::TokenSource;
use super::{Account, IdentityProvider};

const USER_NOT_FOUND: &str = "There is no user record corresponding to the provided identifier.";

#[derive(Serialize)]
struct CreateAccountBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountResponse {
    local_id: String,
}

#[derive(Serialize)]
struct LookupBody<'a> {
    email: [&'a str; 1],
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<UserInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    local_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RevokeBody<'a> {
    local_id: &'a str,
    valid_since: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Identity Toolkit REST client. Admin calls use the service account,
/// password checks use the web API key.
pub struct FirebaseIdentityClient {
    http_client: HttpClient,
    tokens: TokenSource,
    base_url: String,
    api_key: String,
}

impl FirebaseIdentityClient {
    pub fn new(
        http_client: HttpClient,
        tokens: TokenSource,
        base_url: String,
        api_key: String,
    ) -> Self {
        Self {
            http_client,
            tokens,
            base_url,
            api_key,
        }
    }

    fn admin_url(&self, action: &str) -> String {
        format!(
            "{}/v1/projects/{}/{}",
            self.base_url,
            self.tokens.project_id(),
            action
        )
    }

    async fn admin_post<B, T>(&self, action: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let token = self.tokens.access_token().await?;
        self.http_client
            .post_json(&self.admin_url(action), body, Some(&token))
            .await
            .map_err(translate_provider_error)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityClient {
    #[instrument(skip(self, email, password))]
    async fn create_account(&self, email: &str, password: &str) -> Result<String, AppError> {
        let response: CreateAccountResponse = self
            .admin_post("accounts", &CreateAccountBody { email, password })
            .await?;

        info!(uid = %response.local_id, "Account created");
        Ok(response.local_id)
    }

    #[instrument(skip(self, email))]
    async fn find_by_email(&self, email: &str) -> Result<Account, AppError> {
        let response: LookupResponse = self
            .admin_post("accounts:lookup", &LookupBody { email: [email] })
            .await?;

        response
            .users
            .into_iter()
            .next()
            .map(|user| Account { uid: user.local_id })
            .ok_or_else(|| AppError::rejected(USER_NOT_FOUND))
    }

    #[instrument(skip(self, email, password))]
    async fn verify_credential(&self, email: &str, password: &str) -> Result<(), AppError> {
        let url = format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.base_url,
            urlencoding::encode(&self.api_key)
        );
        let body = SignInBody {
            email,
            password,
            return_secure_token: true,
        };

        // The minted id token is not handed out; only the check matters.
        let _: serde_json::Value = self
            .http_client
            .post_json(&url, &body, None)
            .await
            .map_err(translate_provider_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn end_session(&self, uid: Option<&str>) -> Result<(), AppError> {
        let Some(uid) = uid else {
            info!("Logout without uid, no sessions to revoke");
            return Ok(());
        };

        // Tokens issued before validSince stop being accepted.
        let body = RevokeBody {
            local_id: uid,
            valid_since: Utc::now().timestamp().to_string(),
        };
        let _: serde_json::Value = self.admin_post("accounts:update", &body).await?;

        info!(uid = %uid, "Refresh tokens revoked");
        Ok(())
    }
}

/// A 400 from the provider means it refused the caller's input.
fn translate_provider_error(err: AppError) -> AppError {
    match err {
        AppError::Http { status: 400, message } => {
            let code = serde_json::from_str::<ProviderErrorBody>(&message)
                .map(|body| body.error.message)
                .unwrap_or(message);
            AppError::rejected(describe_provider_code(&code))
        }
        other => other,
    }
}

/// Provider codes look like `WEAK_PASSWORD : Password should be at least 6 characters`.
fn describe_provider_code(raw: &str) -> String {
    let code = raw.split(" : ").next().unwrap_or(raw).trim();
    let description = match code {
        "EMAIL_EXISTS" => "The email address is already in use by another account.",
        "INVALID_EMAIL" => "The email address is improperly formatted.",
        "MISSING_EMAIL" => "The email address must be provided.",
        "WEAK_PASSWORD" | "INVALID_PASSWORD_LENGTH" => {
            "The password must be a string with at least 6 characters."
        }
        "MISSING_PASSWORD" => "A non-empty password must be provided.",
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => USER_NOT_FOUND,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "The supplied auth credential is incorrect, malformed or has expired."
        }
        "USER_DISABLED" => "The user account has been disabled by an administrator.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            "Access to this account has been temporarily disabled due to many failed login attempts."
        }
        _ => return raw.to_string(),
    };
    description.to_string()
}
