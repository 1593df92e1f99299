//! PostgreSQL implementation of ContentStore.
//!
//! Uniqueness, referential integrity and cascading deletes are enforced by
//! the schema in `migrations/`; constraint violations are mapped onto
//! [`ContentError`] variants.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::ContentStore;
use crate::error::{ContentError, ContentResult};
use crate::models::{ContentType, ContentTypeRow, Entry, EntryRow};
use crate::provider::ProviderRegistry;

const CONTENT_TYPE_COLUMNS: &str = "id, name, provider_name, options";
const ENTRY_COLUMNS: &str = "id, content_type_id, slug, options";

/// Content store backed by PostgreSQL.
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
    registry: Arc<ProviderRegistry>,
}

impl PgContentStore {
    /// Create a store. The registry is used to bind loaded content types.
    pub fn new(pool: PgPool, registry: Arc<ProviderRegistry>) -> Self {
        Self { pool, registry }
    }

    fn hydrate(&self, row: ContentTypeRow) -> ContentResult<ContentType> {
        ContentType::from_row(row, &self.registry)
    }
}

fn options_column(options: &crate::models::Options) -> Value {
    Value::Object(options.clone())
}

/// Map constraint violations onto kernel errors.
fn map_write_error(error: sqlx::Error, context: &str) -> ContentError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return ContentError::Conflict(format!("{context} already exists"));
        }
        if db.is_foreign_key_violation() {
            return ContentError::ContentTypeNotFound(context.to_string());
        }
    }
    ContentError::Database(error)
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn save_content_type(&self, content_type: &mut ContentType) -> ContentResult<()> {
        let options = options_column(content_type.options());
        let context = format!("content type '{}'", content_type.name());

        match content_type.id() {
            None => {
                let id = Uuid::now_v7();
                sqlx::query(
                    "INSERT INTO content_type (id, name, provider_name, options) VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(content_type.name())
                .bind(content_type.provider_name())
                .bind(&options)
                .execute(&self.pool)
                .await
                .map_err(|e| map_write_error(e, &context))?;

                content_type.mark_persisted(id);
                info!(type_name = %content_type.name(), %id, "content type created");
            }
            Some(id) => {
                // provider_name is write-once and never rewritten.
                let result =
                    sqlx::query("UPDATE content_type SET name = $2, options = $3 WHERE id = $1")
                        .bind(id)
                        .bind(content_type.name())
                        .bind(&options)
                        .execute(&self.pool)
                        .await
                        .map_err(|e| map_write_error(e, &context))?;

                if result.rows_affected() == 0 {
                    return Err(ContentError::ContentTypeNotFound(id.to_string()));
                }
            }
        }

        Ok(())
    }

    async fn load_content_type(&self, id: Uuid) -> ContentResult<Option<ContentType>> {
        let row = sqlx::query_as::<_, ContentTypeRow>(&format!(
            "SELECT {CONTENT_TYPE_COLUMNS} FROM content_type WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| self.hydrate(r)).transpose()
    }

    async fn find_content_type_by_name(&self, name: &str) -> ContentResult<Option<ContentType>> {
        let row = sqlx::query_as::<_, ContentTypeRow>(&format!(
            "SELECT {CONTENT_TYPE_COLUMNS} FROM content_type WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| self.hydrate(r)).transpose()
    }

    async fn list_content_types(&self) -> ContentResult<Vec<ContentType>> {
        let rows = sqlx::query_as::<_, ContentTypeRow>(&format!(
            "SELECT {CONTENT_TYPE_COLUMNS} FROM content_type ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| self.hydrate(r)).collect()
    }

    async fn delete_content_type(&self, id: Uuid) -> ContentResult<bool> {
        let result = sqlx::query("DELETE FROM content_type WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(%id, "content type deleted");
        }
        Ok(deleted)
    }

    async fn save_entry(&self, entry: &mut Entry) -> ContentResult<()> {
        let options = options_column(entry.options());
        let context = entry.content_type_id().to_string();

        match entry.id() {
            None => {
                let id = Uuid::now_v7();
                sqlx::query(
                    "INSERT INTO entry (id, content_type_id, slug, options) VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(entry.content_type_id())
                .bind(entry.slug())
                .bind(&options)
                .execute(&self.pool)
                .await
                .map_err(|e| map_write_error(e, &context))?;

                entry.mark_persisted(id);
            }
            Some(id) => {
                let result = sqlx::query("UPDATE entry SET slug = $2, options = $3 WHERE id = $1")
                    .bind(id)
                    .bind(entry.slug())
                    .bind(&options)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| map_write_error(e, &context))?;

                if result.rows_affected() == 0 {
                    return Err(ContentError::EntryNotFound(id.to_string()));
                }
            }
        }

        Ok(())
    }

    async fn load_entry(&self, id: Uuid) -> ContentResult<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entry WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Entry::from_row))
    }

    async fn find_entry_by_slug(
        &self,
        content_type_id: Uuid,
        slug: &str,
    ) -> ContentResult<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entry WHERE content_type_id = $1 AND slug = $2 ORDER BY id LIMIT 1"
        ))
        .bind(content_type_id)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Entry::from_row))
    }

    async fn entries_for(&self, content_type_id: Uuid) -> ContentResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entry WHERE content_type_id = $1 ORDER BY id"
        ))
        .bind(content_type_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Entry::from_row).collect())
    }

    async fn delete_entry(&self, id: Uuid) -> ContentResult<bool> {
        let result = sqlx::query("DELETE FROM entry WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
