//! UseCase: 資格情報の検証（同期 API 用）

use std::sync::Arc;

use crate::domain::{IdentityVerifier, UserId};

use super::{access::verify_credential, error::ChatError};

/// Bearer トークンをユーザー ID に解決するユースケース
pub struct AuthenticateUseCase {
    identity: Arc<dyn IdentityVerifier>,
}

impl AuthenticateUseCase {
    pub fn new(identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { identity }
    }

    pub async fn execute(&self, credential: &str) -> Result<UserId, ChatError> {
        verify_credential(self.identity.as_ref(), credential).await
    }
}
