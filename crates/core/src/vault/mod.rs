//! Vault scanning: file discovery and note metadata extraction.

pub mod extractor;
pub mod scan;
pub mod walker;

pub use extractor::{extract_record, record_from_content};
pub use scan::{ScanError, scan_dir, scan_vault};
pub use walker::{VaultWalker, VaultWalkerError, WalkedFile};
