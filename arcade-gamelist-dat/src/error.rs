/// Errors that can occur while locating, extracting or parsing catalogs.
#[derive(Debug, thiserror::Error)]
pub enum DatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("No XML catalog found in {0}")]
    NoCatalogEntry(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

impl DatError {
    pub fn no_catalog_entry(archive: impl Into<String>) -> Self {
        Self::NoCatalogEntry(archive.into())
    }

    pub fn invalid_catalog(msg: impl Into<String>) -> Self {
        Self::InvalidCatalog(msg.into())
    }
}
