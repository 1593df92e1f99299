//! CLI command implementations.
//!
//! Each command runs against an initialized [`AppState`] and prints its
//! result to stdout.

use anyhow::{Context, Result};

use quire_kernel::models::Options;
use quire_kernel::{AppState, ContentType, Entry, NewContentType, NewEntry};

/// Parse an `--options` argument into an option mapping.
pub fn parse_options(raw: Option<&str>) -> Result<Option<Options>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let value: serde_json::Value =
        serde_json::from_str(raw).context("options must be valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(Some(map)),
        _ => anyhow::bail!("options must be a JSON object"),
    }
}

/// List content types with their providers and entry counts.
pub async fn cmd_types(state: &AppState) -> Result<()> {
    let types = state.store().list_content_types().await?;

    if types.is_empty() {
        println!("No content types found.");
        return Ok(());
    }

    println!("{:<20} {:<14} {:<8} {}", "NAME", "PROVIDER", "ENTRIES", "FIELDS");
    println!("{}", "-".repeat(60));

    for content_type in &types {
        let entries = match content_type.id() {
            Some(id) => state.store().entries_for(id).await?.len(),
            None => 0,
        };
        let fields: Vec<&str> = content_type
            .field_schema()
            .iter()
            .map(|f| f.name.as_str())
            .collect();

        println!(
            "{:<20} {:<14} {:<8} {}",
            content_type.name(),
            content_type.provider_name().unwrap_or("-"),
            entries,
            fields.join(", ")
        );
    }

    Ok(())
}

/// Create and persist a content type.
pub async fn cmd_create_type(
    state: &AppState,
    name: &str,
    provider: &str,
    options: Option<&str>,
) -> Result<()> {
    let mut input = NewContentType::new(name, provider);
    input.options = parse_options(options)?;

    let mut content_type = ContentType::create(input, state.registry())?;
    state.store().save_content_type(&mut content_type).await?;

    println!(
        "Created content type '{}' ({}) bound to '{}'",
        content_type.name(),
        content_type.id().map(|id| id.to_string()).unwrap_or_default(),
        provider
    );
    Ok(())
}

/// Create and persist an entry.
pub async fn cmd_create_entry(
    state: &AppState,
    type_name: &str,
    slug: &str,
    options: Option<&str>,
) -> Result<()> {
    let content_type = state.store().content_type_by_name(type_name).await?;
    let type_id = content_type
        .id()
        .with_context(|| format!("content type '{type_name}' is not persisted"))?;

    let mut input = NewEntry::new(type_id).with_slug(slug);
    input.options = parse_options(options)?;

    let mut entry = Entry::new(input);
    state.store().save_entry(&mut entry).await?;

    println!(
        "Created entry '{}' ({}) in '{}'",
        entry.slug(),
        entry.id().map(|id| id.to_string()).unwrap_or_default(),
        type_name
    );
    Ok(())
}

/// Resolve an entry and print the provider response as JSON.
pub async fn cmd_resolve(state: &AppState, type_name: &str, slug: &str) -> Result<()> {
    let content = state.resolver().resolve_slug(type_name, slug).await?;
    let json = serde_json::to_string_pretty(&content).context("serialize content")?;
    println!("{json}");
    Ok(())
}
