//! Step-up re-authentication.
//!
//! Destructive actions (deleting a catalog record, exporting contact
//! messages) require the operator to re-enter the shared admin secret. The
//! secret is checked server-side against a bcrypt hash and yields a
//! short-lived [`StepUpGrant`] the workflows inspect before acting.

mod grant;
mod strategy;

pub use grant::{StepUpError, StepUpGrant};
pub use strategy::{BcryptStepUp, StepUpOptions, StepUpVerifier};
