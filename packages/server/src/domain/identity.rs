//! Identity provider interface.

use async_trait::async_trait;

use super::{IdentityError, UserId};

/// Turns an opaque credential into a stable user identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<UserId, IdentityError>;
}
