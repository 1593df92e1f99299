//! Content models.

pub mod content_type;
pub mod entry;
pub mod options;

pub use content_type::{ContentType, ContentTypeRow, ContentTypeUpdate, NewContentType};
pub use entry::{Entry, EntryRow, EntryUpdate, NewEntry};
pub use options::Options;
