//! Frontend side of the conversion: media extraction and the Batocera
//! `gamelist.xml` document.

pub mod error;
pub mod gamelist;
pub mod media;
pub mod media_types;
pub mod xml;

pub use error::FrontendError;
pub use gamelist::{
    ExistingGamelist, GAMELIST_FILE_NAME, GeneratedGamelist, build_record, format_release_date,
    generate_gamelist, load_gamelist, parse_gamelist, write_gamelist,
};
pub use media::{
    ArtworkClass, ArtworkClassifier, MediaExtractor, MediaIndex, MediaLayout, MediaMap,
    default_artwork_classifier,
};
pub use media_types::{MEDIA_DIR, MediaType};
pub use xml::{XmlElement, parse_document, render_document};
