//! Contact messages sent through the public site, and their CSV export.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;
use vitrine_auth::StepUpGrant;
use vitrine_core::{Notification, Notifier, Order, Query, RowStore, VitrineError};

use crate::entity::Record;
use crate::workflow::guarded;

pub const CSV_HEADER: [&str; 6] = ["Nom", "Email", "Téléphone", "Sujet", "Message", "Date de création"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub name: String,
    #[validate(email)]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub subject: String,
    #[validate(length(min = 1))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for ContactMessage {
    const TABLE: &'static str = "contacts";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// A rendered export, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// `contacts_export_{YYYY-MM-DD}.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("contacts_export_{}.csv", date.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// `dd/mm/yyyy` when the timestamp parses, the raw text otherwise.
fn creation_date(created_at: Option<&str>) -> String {
    match created_at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => String::new(),
    }
}

/// Header plus one line per message, every field quoted.
pub fn to_csv(messages: &[ContactMessage]) -> String {
    let mut lines = Vec::with_capacity(messages.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for m in messages {
        let fields = [
            m.name.clone(),
            m.email.clone(),
            m.phone.clone().unwrap_or_default(),
            m.subject.clone(),
            m.message.clone(),
            creation_date(m.created_at.as_deref()),
        ];
        lines.push(fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(","));
    }

    lines.join("\n")
}

/// Operator inbox over the `contacts` table.
pub struct ContactInbox {
    store: Arc<dyn RowStore>,
    notifier: Arc<dyn Notifier>,
    messages: Vec<ContactMessage>,
}

impl ContactInbox {
    pub fn new(store: Arc<dyn RowStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }

    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_read).count()
    }

    /// Newest first; `unread_only` narrows to messages not yet read.
    pub async fn load(&mut self, unread_only: bool) -> Result<(), VitrineError> {
        let mut query = Query::new().order_by(Order::desc(ContactMessage::ORDER_COLUMN));
        if unread_only {
            query = query.eq("is_read", false);
        }

        let loaded = guarded(self.store.select(ContactMessage::TABLE, &query))
            .await
            .and_then(|rows| {
                rows.into_iter()
                    .map(ContactMessage::from_row)
                    .collect::<Result<Vec<_>, _>>()
            });

        match loaded {
            Ok(messages) => {
                self.messages = messages;
                Ok(())
            }
            Err(err) => Err(self.report("load", err)),
        }
    }

    pub async fn mark_read(&mut self, id: &str) -> Result<(), VitrineError> {
        let mut patch = Map::new();
        patch.insert("is_read".to_string(), Value::Bool(true));

        match guarded(self.store.update(ContactMessage::TABLE, id, patch)).await {
            Ok(_) => {
                if let Some(m) = self.messages.iter_mut().find(|m| m.id.as_deref() == Some(id)) {
                    m.is_read = true;
                }
                Ok(())
            }
            Err(err) => Err(self.report("mark_read", err)),
        }
    }

    /// Export every loaded message. Requires a live step-up grant.
    pub fn export_csv(&self, grant: &StepUpGrant, today: NaiveDate) -> Result<CsvExport, VitrineError> {
        if let Err(err) = grant.ensure_valid() {
            let err = VitrineError::normalize(err);
            self.notifier
                .notify(Notification::failure("Accès refusé", err.message.clone()));
            return Err(err);
        }

        let export = CsvExport {
            filename: export_filename(today),
            content: to_csv(&self.messages),
        };
        tracing::info!(rows = self.messages.len(), filename = %export.filename, "contacts exported");
        self.notifier.notify(Notification::success(
            "Export réussi",
            format!("{} messages exportés", self.messages.len()),
        ));
        Ok(export)
    }

    /// Export dated today (UTC).
    pub fn export_csv_now(&self, grant: &StepUpGrant) -> Result<CsvExport, VitrineError> {
        self.export_csv(grant, Utc::now().date_naive())
    }

    fn report(&self, action: &'static str, err: VitrineError) -> VitrineError {
        tracing::error!(table = ContactMessage::TABLE, action, error = %err.message, "contacts operation failed");
        self.notifier.notify(Notification::failure(
            "Erreur",
            "Une erreur est survenue. Veuillez réessayer.",
        ));
        err
    }
}
