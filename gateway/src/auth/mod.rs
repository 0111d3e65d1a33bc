//! Account signup, login and logout, delegated to an external identity provider.

pub mod firebase;
pub mod handlers;
pub mod service_account;

use async_trait::async_trait;
use common::errors::AppError;

/// An account as known to the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub uid: String,
}

/// Operations the gateway needs from an identity service.
///
/// Implementations return [`AppError::Rejected`] when the provider refuses the
/// caller's input (duplicate email, wrong password, unknown account) so the
/// handlers can answer with a client error.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and return its uid.
    async fn create_account(&self, email: &str, password: &str) -> Result<String, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Account, AppError>;

    /// Succeeds only when `password` matches the account's password.
    async fn verify_credential(&self, email: &str, password: &str) -> Result<(), AppError>;

    /// End the sessions of `uid`. Nothing to do when no uid is known.
    async fn end_session(&self, uid: Option<&str>) -> Result<(), AppError>;
}
