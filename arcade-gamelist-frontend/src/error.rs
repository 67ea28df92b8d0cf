/// Errors that can occur while extracting media or reading/writing a gamelist.
#[derive(Debug, thiserror::Error)]
pub enum FrontendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid gamelist: {0}")]
    InvalidGamelist(String),
}

impl FrontendError {
    pub fn invalid_gamelist(msg: impl Into<String>) -> Self {
        Self::InvalidGamelist(msg.into())
    }
}
