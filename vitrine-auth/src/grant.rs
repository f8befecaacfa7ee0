use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use vitrine_core::VitrineError;

#[derive(Debug, Error)]
pub enum StepUpError {
    #[error("Step-up credential is required")]
    MissingCredential,

    #[error("{0}")]
    Rejected(String),

    #[error("Step-up is not configured: {0}")]
    Misconfigured(String),

    #[error("Password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl StepUpError {
    /// Every step-up failure reads as `Forbidden` to the workflows.
    pub fn into_anyhow(self) -> anyhow::Error {
        VitrineError::forbidden(self.to_string()).into_anyhow()
    }
}

/// Proof that the operator re-authenticated recently.
///
/// Only a [`StepUpVerifier`](crate::StepUpVerifier) in this crate mints one;
/// there is no public constructor and no `Deserialize`.
///
/// ```compile_fail
/// let grant = vitrine_auth::StepUpGrant::issue(chrono::Duration::minutes(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepUpGrant {
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl StepUpGrant {
    pub(crate) fn issue(ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.issued_at && now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// `Forbidden` once the grant has lapsed.
    pub fn ensure_valid(&self) -> anyhow::Result<()> {
        if !self.is_valid() {
            return Err(VitrineError::forbidden("Re-authentication expired, confirm your password again")
                .into_anyhow());
        }
        Ok(())
    }
}
