//! Card catalog: per-set indexes and the shared cache in front of them.
//!
//! ## Key Types
//!
//! - `CatalogEntry`: number -> metadata index for one set
//! - `CardCatalog`: cache with single-flight loading and placeholder fallback
//! - `download_sets` / `clear_set_files`: refresh or drop the per-set data files

pub mod cache;
pub mod download;
pub mod entry;

pub use cache::CardCatalog;
pub use download::{clear_set_files, download_sets, set_url};
pub use entry::CatalogEntry;
