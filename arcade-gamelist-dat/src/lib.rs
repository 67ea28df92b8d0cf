pub mod archive;
pub mod catalog;
pub mod error;
pub mod merge;

pub use archive::{
    CatalogClassifier, CatalogKind, CatalogSet, default_catalog_classifier, extract_catalog,
    find_catalog_entry, locate_catalogs, locate_catalogs_with, read_catalog_document,
};
pub use catalog::{MachineMap, MachineRecord, parse_catalog, parse_catalog_file};
pub use error::DatError;
pub use merge::merge_catalogs;
