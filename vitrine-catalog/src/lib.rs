//! # vitrine-catalog: the content workflows of the Vitrine admin
//!
//! - [`AssetInputResolver`] reconciles a typed URL and an uploaded file into
//!   one asset reference
//! - [`CatalogWorkflow`] runs list/create/update/delete for media, documents
//!   and event photos over a [`RowStore`](vitrine_core::RowStore)
//! - [`ContactInbox`] lists contact messages and exports them as CSV
//! - [`dashboard_counts`] feeds the dashboard tiles

pub mod asset;
mod columns;
pub mod contacts;
pub mod entity;
pub mod form;
pub mod stats;
pub mod workflow;

pub use asset::{AssetInputResolver, AssetSource, InputMode, Selection, UploadTicket};
pub use contacts::{export_filename, to_csv, ContactInbox, ContactMessage, CsvExport, CSV_HEADER};
pub use entity::{CatalogEntity, DisplayText, DisplayTextOverride, Document, EventPhoto, MediaItem, Record};
pub use form::validate_form;
pub use stats::{dashboard_counts, DashboardCounts};
pub use workflow::{CatalogWorkflow, EditTarget, Editor, EditorPhase, ListState};
