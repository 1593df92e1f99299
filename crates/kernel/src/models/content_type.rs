//! ContentType model.
//!
//! A content type is a named configuration bound to exactly one provider.
//! Construction is two-phase: the raw record is built first (options
//! defaulted, no provider), then a finalize step validates it and
//! binds the provider through the registry. The binding captures the
//! provider's field schemas once; they are never re-derived.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use quire_sdk::{FieldDescriptor, ResolutionRequest, ResolvedContent};

use crate::error::{ContentError, ContentResult, ValidationError};
use crate::models::entry::Entry;
use crate::models::options::{self, Options};
use crate::provider::ProviderRegistry;

/// Stored content type record (the `content_type` table).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentTypeRow {
    pub id: Uuid,
    pub name: String,
    pub provider_name: String,
    /// Serialized option mapping; may be `NULL`.
    pub options: Option<Value>,
}

/// Input for creating a content type.
#[derive(Debug, Clone, Deserialize)]
pub struct NewContentType {
    pub name: String,
    pub provider_name: String,
    #[serde(default)]
    pub options: Option<Options>,
}

impl NewContentType {
    pub fn new(name: impl Into<String>, provider_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider_name: provider_name.into(),
            options: None,
        }
    }

    /// Set type-level options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }
}

/// Input for updating a content type. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentTypeUpdate {
    pub name: Option<String>,
    pub provider_name: Option<String>,
    pub options: Option<Options>,
}

/// Provider binding state.
#[derive(Debug, Clone, PartialEq)]
enum Binding {
    Unbound,
    Bound {
        provider_name: String,
        field_schema: Vec<FieldDescriptor>,
        entry_fields: Vec<String>,
    },
}

/// A content type bound to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType {
    id: Option<Uuid>,
    name: String,
    options: Options,
    binding: Binding,
}

impl ContentType {
    /// Create a new, unpersisted content type bound to its provider.
    ///
    /// Fails with a validation error when the name or provider name is blank
    /// and with `UnknownProvider` when the provider is not registered.
    pub fn create(input: NewContentType, registry: &ProviderRegistry) -> ContentResult<Self> {
        let content_type =
            Self::raw(None, input.name, input.options).finalize(input.provider_name, registry)?;

        debug!(
            type_name = %content_type.name,
            provider = %content_type.provider_name().unwrap_or_default(),
            fields = content_type.field_schema().len(),
            "content type bound"
        );
        Ok(content_type)
    }

    /// Hydrate a stored record. The provider is bound again on load.
    pub fn from_row(row: ContentTypeRow, registry: &ProviderRegistry) -> ContentResult<Self> {
        Self::raw(Some(row.id), row.name, Some(options::from_stored(row.options)))
            .finalize(row.provider_name, registry)
    }

    /// Phase one: the raw, unbound record with defaults applied.
    fn raw(id: Option<Uuid>, name: String, options: Option<Options>) -> Self {
        Self {
            id,
            name,
            options: options.unwrap_or_default(),
            binding: Binding::Unbound,
        }
    }

    /// Phase two: validate, then bind the provider.
    fn finalize(mut self, provider_name: String, registry: &ProviderRegistry) -> ContentResult<Self> {
        validate_present("name", &self.name)?;
        validate_present("provider_name", &provider_name)?;
        self.bind(provider_name, registry)?;
        Ok(self)
    }

    fn bind(&mut self, provider_name: String, registry: &ProviderRegistry) -> ContentResult<()> {
        let provider = registry.lookup(&provider_name)?;
        self.binding = Binding::Bound {
            field_schema: provider.entry_type_fields(),
            entry_fields: provider.entry_fields(),
            provider_name,
        };
        Ok(())
    }

    /// Apply an update.
    ///
    /// Name and options change freely. A different provider name is rejected
    /// with `ReadOnlyField` once the record is persisted; before that the type
    /// is re-bound. A failed update leaves the record untouched.
    pub fn update(
        &mut self,
        changes: ContentTypeUpdate,
        registry: &ProviderRegistry,
    ) -> ContentResult<()> {
        let mut next = self.clone();

        if let Some(name) = changes.name {
            validate_present("name", &name)?;
            next.name = name;
        }

        if let Some(options) = changes.options {
            next.options = options;
        }

        match changes.provider_name {
            Some(provider_name) if self.provider_name() != Some(provider_name.as_str()) => {
                if self.is_persisted() {
                    return Err(ValidationError::ReadOnlyField {
                        field: "provider_name",
                    }
                    .into());
                }
                validate_present("provider_name", &provider_name)?;
                next.bind(provider_name, registry)?;
            }
            _ => {}
        }

        *self = next;
        Ok(())
    }

    /// Database ID, once persisted.
    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Check whether the record has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn mark_persisted(&mut self, id: Uuid) {
        self.id = Some(id);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound provider key; `None` only while unbound.
    pub fn provider_name(&self) -> Option<&str> {
        match &self.binding {
            Binding::Bound { provider_name, .. } => Some(provider_name),
            Binding::Unbound => None,
        }
    }

    /// Check whether a provider is bound.
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound { .. })
    }

    /// Type-level options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Type-level fields declared by the bound provider, as captured at
    /// binding time. Empty while unbound.
    pub fn field_schema(&self) -> &[FieldDescriptor] {
        match &self.binding {
            Binding::Bound { field_schema, .. } => field_schema,
            Binding::Unbound => &[],
        }
    }

    /// Entry-level option keys declared by the bound provider.
    pub fn entry_field_names(&self) -> &[String] {
        match &self.binding {
            Binding::Bound { entry_fields, .. } => entry_fields,
            Binding::Unbound => &[],
        }
    }

    /// Check whether the provider declares a type-level field.
    pub fn has_field(&self, name: &str) -> bool {
        self.field_schema().iter().any(|f| f.name == name)
    }

    /// Read a declared type-level field from the options.
    ///
    /// Returns `None` for undeclared fields even when the option is set.
    pub fn field(&self, name: &str) -> Option<&Value> {
        if self.has_field(name) {
            self.options.get(name)
        } else {
            None
        }
    }

    /// Every declared type-level field with its current value.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, Option<&Value>)> {
        self.field_schema()
            .iter()
            .map(|f| (f, self.options.get(&f.name)))
    }

    /// Read a declared entry-level field from an entry's options.
    pub fn entry_field<'a>(&self, entry: &'a Entry, name: &str) -> Option<&'a Value> {
        if self.entry_field_names().iter().any(|f| f == name) {
            entry.options().get(name)
        } else {
            None
        }
    }

    /// Build the provider request for an entry of this type.
    ///
    /// Entry and type options are passed as stored, in separate maps; they
    /// are never merged.
    pub fn build_request(&self, entry: &Entry) -> ResolutionRequest {
        ResolutionRequest {
            slug: entry.slug().to_string(),
            content_type: self.name.clone(),
            provider: self.provider_name().unwrap_or_default().to_string(),
            options: entry.options().clone(),
            type_options: self.options.clone(),
        }
    }

    /// Resolve an entry through the bound provider.
    ///
    /// The provider is looked up at call time. Its result, success or error,
    /// is returned unchanged.
    pub async fn content_for(
        &self,
        entry: &Entry,
        registry: &ProviderRegistry,
    ) -> ContentResult<ResolvedContent> {
        if let Some(id) = self.id.filter(|id| *id != entry.content_type_id()) {
            return Err(ContentError::ForeignEntry {
                entry_type_id: entry.content_type_id(),
                content_type_id: id,
            });
        }

        let provider_name = self
            .provider_name()
            .ok_or(ValidationError::Blank {
                field: "provider_name",
            })?;
        let provider = registry.lookup(provider_name)?;
        let request = self.build_request(entry);

        debug!(
            type_name = %self.name,
            provider = %provider_name,
            slug = %request.slug,
            "resolving entry content"
        );

        Ok(provider.call(request).await?)
    }
}

fn validate_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}
