//! Identity verifier backed by a fixed credential table.
//!
//! Stands in for an external identity provider in development and tests. The
//! table is loaded from the seed file at startup and never changes afterwards.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{IdentityError, IdentityVerifier, UserId};

pub struct StaticTokenVerifier {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, UserId>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityVerifier for StaticTokenVerifier {
    async fn verify(&self, credential: &str) -> Result<UserId, IdentityError> {
        self.tokens
            .get(credential)
            .cloned()
            .ok_or(IdentityError::InvalidCredential)
    }
}
