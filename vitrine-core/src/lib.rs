//! vitrine-core: shared traits and plumbing for the Vitrine admin backend.
//!
//! The hosted backend is seen through two narrow seams: a [`RowStore`] for
//! catalog rows and (in `vitrine-blob`) a blob backend for binary assets.
//! Operator feedback goes through a [`Notifier`]. Everything here is
//! transport-agnostic.

pub mod config;
pub mod errors;
pub mod localized;
pub mod memory;
pub mod notify;
pub mod store;

pub use config::{VitrineConfig, VitrineConfigSnapshot};
pub use errors::{ErrorKind, VitrineError, VitrineResult};
pub use localized::{LanguageCode, Localized, Overlay};
pub use memory::MemoryRowStore;
pub use notify::{MemoryNotifier, Notification, Notifier, Severity, TracingNotifier};
pub use store::{Order, Query, Row, RowStore};
