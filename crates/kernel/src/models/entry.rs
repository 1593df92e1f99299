//! Entry model.
//!
//! Entries are instances of a content type. They carry a slug and
//! entry-level options; resolving them into content is the content type's job.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::options::{self, Options};

/// Stored entry record (the `entry` table).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EntryRow {
    pub id: Uuid,
    pub content_type_id: Uuid,
    pub slug: String,
    /// Serialized option mapping; may be `NULL`.
    pub options: Option<Value>,
}

/// Input for creating an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub content_type_id: Uuid,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub options: Option<Options>,
}

impl NewEntry {
    pub fn new(content_type_id: Uuid) -> Self {
        Self {
            content_type_id,
            slug: String::new(),
            options: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }
}

/// Input for updating an entry. The owning content type cannot change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryUpdate {
    pub slug: Option<String>,
    pub options: Option<Options>,
}

/// An entry of a content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    id: Option<Uuid>,
    content_type_id: Uuid,
    slug: String,
    options: Options,
}

impl Entry {
    /// Build an unpersisted entry.
    pub fn new(input: NewEntry) -> Self {
        Self {
            id: None,
            content_type_id: input.content_type_id,
            slug: input.slug,
            options: input.options.unwrap_or_default(),
        }
    }

    /// Hydrate a stored record.
    pub fn from_row(row: EntryRow) -> Self {
        Self {
            id: Some(row.id),
            content_type_id: row.content_type_id,
            slug: row.slug,
            options: options::from_stored(row.options),
        }
    }

    /// Apply an update.
    pub fn update(&mut self, changes: EntryUpdate) {
        if let Some(slug) = changes.slug {
            self.slug = slug;
        }
        if let Some(options) = changes.options {
            self.options = options;
        }
    }

    /// Database ID, once persisted.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn mark_persisted(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    /// Owning content type.
    pub fn content_type_id(&self) -> Uuid {
        self.content_type_id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Entry-level options, as stored.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Get a single option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}
