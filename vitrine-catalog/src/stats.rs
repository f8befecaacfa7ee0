use serde::Serialize;
use vitrine_core::{RowStore, VitrineError};

use crate::contacts::ContactMessage;
use crate::entity::{Document, EventPhoto, MediaItem, Record};
use crate::workflow::guarded;

/// Row counts shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardCounts {
    pub media: u64,
    pub documents: u64,
    pub event_photos: u64,
    pub contacts: u64,
}

pub async fn dashboard_counts(store: &dyn RowStore) -> Result<DashboardCounts, VitrineError> {
    let (media, documents, event_photos, contacts) = futures::try_join!(
        guarded(store.count(MediaItem::TABLE)),
        guarded(store.count(Document::TABLE)),
        guarded(store.count(EventPhoto::TABLE)),
        guarded(store.count(ContactMessage::TABLE)),
    )?;

    tracing::debug!(media, documents, event_photos, contacts, "dashboard counts");
    Ok(DashboardCounts {
        media,
        documents,
        event_photos,
        contacts,
    })
}
