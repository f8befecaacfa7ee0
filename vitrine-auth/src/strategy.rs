// Shared-secret step-up strategy.

use std::env;

use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::Duration;

use crate::{StepUpError, StepUpGrant};

#[async_trait]
pub trait StepUpVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<StepUpGrant, StepUpError>;
}

#[derive(Clone, Debug)]
pub struct StepUpOptions {
    pub error_message: String,
    pub ttl: Duration,
    pub hash_cost: u32,
}

impl Default for StepUpOptions {
    fn default() -> Self {
        Self {
            error_message: "Invalid password".to_string(),
            ttl: Duration::minutes(5),
            hash_cost: 10,
        }
    }
}

/// Checks the shared admin secret against a bcrypt hash. The plaintext is
/// never held.
#[derive(Clone, Debug)]
pub struct BcryptStepUp {
    password_hash: String,
    options: StepUpOptions,
}

impl BcryptStepUp {
    pub fn new(password_hash: impl Into<String>) -> Self {
        Self {
            password_hash: password_hash.into(),
            options: StepUpOptions::default(),
        }
    }

    /// Hash `secret` now; useful for tests and first-run setup.
    pub fn from_secret(secret: &str, cost: u32) -> Result<Self, StepUpError> {
        let password_hash = hash(secret, cost)?;
        Ok(Self::new(password_hash).with_options(StepUpOptions {
            hash_cost: cost,
            ..StepUpOptions::default()
        }))
    }

    /// Reads `VITRINE_STEP_UP_HASH`, optional `VITRINE_STEP_UP_TTL_SECS`.
    pub fn from_env() -> Result<Self, StepUpError> {
        let password_hash = env::var("VITRINE_STEP_UP_HASH").map_err(|_| {
            StepUpError::Misconfigured("VITRINE_STEP_UP_HASH environment variable required".into())
        })?;
        let mut step_up = Self::new(password_hash);

        if let Ok(raw) = env::var("VITRINE_STEP_UP_TTL_SECS") {
            let secs: i64 = raw.parse().map_err(|_| {
                StepUpError::Misconfigured(format!("VITRINE_STEP_UP_TTL_SECS is not a number: {raw}"))
            })?;
            step_up.options.ttl = Duration::seconds(secs);
        }
        Ok(step_up)
    }

    pub fn with_options(mut self, options: StepUpOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.options.ttl = ttl;
        self
    }

    pub fn options(&self) -> &StepUpOptions {
        &self.options
    }

    pub fn verify_configuration(&self) -> Result<(), StepUpError> {
        if self.password_hash.trim().is_empty() {
            return Err(StepUpError::Misconfigured("password hash is empty".into()));
        }
        if self.options.ttl <= Duration::zero() {
            return Err(StepUpError::Misconfigured("grant ttl must be positive".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StepUpVerifier for BcryptStepUp {
    async fn verify(&self, credential: &str) -> Result<StepUpGrant, StepUpError> {
        self.verify_configuration()?;

        if credential.is_empty() {
            return Err(StepUpError::MissingCredential);
        }

        let ok = verify(credential, &self.password_hash)?;
        if !ok {
            tracing::warn!("step-up credential rejected");
            return Err(StepUpError::Rejected(self.options.error_message.clone()));
        }

        let grant = StepUpGrant::issue(self.options.ttl);
        tracing::info!(expires_at = %grant.expires_at(), "step-up granted");
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_is_misconfigured() {
        let err = BcryptStepUp::new("  ").verify_configuration().unwrap_err();
        assert!(matches!(err, StepUpError::Misconfigured(_)));
    }

    #[test]
    fn non_positive_ttl_is_misconfigured() {
        let step_up = BcryptStepUp::new("$2b$04$abc").with_ttl(Duration::zero());
        assert!(step_up.verify_configuration().is_err());
    }
}
