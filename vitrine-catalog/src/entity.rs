//! Catalog records and their row mapping.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;
use vitrine_blob::Bucket;
use vitrine_core::{LanguageCode, Localized, Overlay, Row, VitrineError};

/// Columns the row store owns; never sent on insert or update.
const GENERATED_COLUMNS: &[&str] = &["id", "created_at"];

/// A typed view over one table of the row store.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    const TABLE: &'static str;
    /// Recency column lists are ordered by, newest first.
    const ORDER_COLUMN: &'static str = "created_at";

    fn id(&self) -> Option<&str>;

    fn to_row(&self) -> Result<Row, VitrineError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut row)) => {
                for column in GENERATED_COLUMNS {
                    row.remove(*column);
                }
                Ok(row)
            }
            Ok(_) => Err(VitrineError::general_error(format!(
                "{} record did not serialize to a row",
                Self::TABLE
            ))),
            Err(e) => Err(VitrineError::general_error(e.to_string())),
        }
    }

    fn from_row(row: Row) -> Result<Self, VitrineError> {
        serde_json::from_value(Value::Object(row)).map_err(|e| {
            VitrineError::general_error(format!("Malformed {} row: {}", Self::TABLE, e))
        })
    }
}

/// A record that points at one binary asset.
pub trait CatalogEntity: Record + Validate + Default {
    /// Bucket uploads for this entity go to.
    const BUCKET: Bucket;
    /// Label used in operator notifications.
    const LABEL: &'static str;

    fn asset(&self) -> &str;

    fn set_asset(&mut self, url: String);
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayText {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayTextOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Overlay for DisplayText {
    type Partial = DisplayTextOverride;

    fn overlay(&self, partial: &DisplayTextOverride) -> Self {
        Self {
            title: partial.title.clone().unwrap_or_else(|| self.title.clone()),
            description: partial.description.clone().or_else(|| self.description.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct MediaItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `photo`, `video` or `audio`
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(length(min = 1, message = "a thumbnail is required"))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub thumbnail: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    /// Stored as JSON text in the `translations` column.
    #[serde(default, with = "crate::columns::json_text")]
    pub translations: HashMap<LanguageCode, DisplayTextOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl MediaItem {
    pub fn display_text(&self) -> Localized<DisplayText> {
        Localized {
            base: DisplayText {
                title: self.title.clone(),
                description: self.description.clone(),
            },
            overrides: self.translations.clone(),
        }
    }

    /// Title and description in `lang`, falling back field by field.
    pub fn display(&self, lang: &LanguageCode) -> DisplayText {
        self.display_text().resolve(lang)
    }
}

impl Record for MediaItem {
    const TABLE: &'static str = "media";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl CatalogEntity for MediaItem {
    const BUCKET: Bucket = Bucket::Media;
    const LABEL: &'static str = "Média";

    fn asset(&self) -> &str {
        &self.thumbnail
    }

    fn set_asset(&mut self, url: String) {
        self.thumbnail = url;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[validate(url(message = "link must be a valid URL"))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub link: String,
    #[serde(default)]
    pub published_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for Document {
    const TABLE: &'static str = "documents";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl CatalogEntity for Document {
    const BUCKET: Bucket = Bucket::Documents;
    const LABEL: &'static str = "Document";

    fn asset(&self) -> &str {
        &self.link
    }

    fn set_asset(&mut self, url: String) {
        self.link = url;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct EventPhoto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub event_name: Option<String>,
    #[validate(length(min = 1, message = "an image is required"))]
    #[serde(default, deserialize_with = "crate::columns::null_as_default")]
    pub image: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for EventPhoto {
    const TABLE: &'static str = "event_photos";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl CatalogEntity for EventPhoto {
    const BUCKET: Bucket = Bucket::Images;
    const LABEL: &'static str = "Photo";

    fn asset(&self) -> &str {
        &self.image
    }

    fn set_asset(&mut self, url: String) {
        self.image = url;
    }
}
