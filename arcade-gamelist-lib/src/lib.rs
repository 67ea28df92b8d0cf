//! Conversion of MAME catalogs and extras into a Batocera gamelist.
//!
//! This crate wires the catalog side ([`arcade_gamelist_dat`]) and the
//! frontend side ([`arcade_gamelist_frontend`]) into one run.

pub mod error;
pub mod pipeline;
pub mod scratch;
pub mod settings;

pub use error::PipelineError;
pub use pipeline::{ConvertOptions, ConvertSummary, Converter};
pub use scratch::ScratchDir;
pub use settings::{PathSettings, Settings};

pub use arcade_gamelist_dat as dat;
pub use arcade_gamelist_frontend as frontend;
