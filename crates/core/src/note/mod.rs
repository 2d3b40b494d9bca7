//! Note metadata model and the read-only index interface.

pub mod index;
pub mod types;

pub use index::{MetadataIndex, VaultSnapshot};
pub use types::{NoteRecord, PropertyValue};
