//! Extraction of screenshots, flyers and marquees from the MAME "extras"
//! archives into the frontend's media folders.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::FrontendError;
use crate::media_types::{MEDIA_DIR, MediaType};

pub const SNAP_ARCHIVE: &str = "snap.zip";
pub const FLYERS_ARCHIVE: &str = "flyers.zip";
pub const ARTWORK_ARCHIVE: &str = "artwork.zip";

const IMAGE_EXTENSION: &str = ".png";
const MARQUEE_SUFFIX: &str = "_marquee";

/// Identifier -> entry name inside the source archive.
pub type MediaMap = BTreeMap<String, String>;

/// How an `artwork.zip` entry is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkClass {
    Flyer,
    Marquee,
    /// Bezels and snaps; recognised but never extracted.
    Excluded,
}

/// Decides what an `artwork.zip` entry is from its name.
pub type ArtworkClassifier = fn(&str) -> Option<ArtworkClass>;

/// Case-insensitive substring match: "flyer", then "marquee", then
/// "bezel"/"snap".
pub fn default_artwork_classifier(entry_name: &str) -> Option<ArtworkClass> {
    let lower = entry_name.to_lowercase();
    if lower.contains("flyer") {
        Some(ArtworkClass::Flyer)
    } else if lower.contains("marquee") {
        Some(ArtworkClass::Marquee)
    } else if lower.contains("bezel") || lower.contains("snap") {
        Some(ArtworkClass::Excluded)
    } else {
        None
    }
}

/// The images available per game, by media type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaIndex {
    pub screenshots: MediaMap,
    pub covers: MediaMap,
    pub marquees: MediaMap,
}

impl MediaIndex {
    pub fn get(&self, media_type: MediaType) -> &MediaMap {
        match media_type {
            MediaType::Screenshot => &self.screenshots,
            MediaType::Cover => &self.covers,
            MediaType::Marquee => &self.marquees,
        }
    }

    pub fn contains(&self, media_type: MediaType, identifier: &str) -> bool {
        self.get(media_type).contains_key(identifier)
    }
}

/// Destination folders for extracted media.
#[derive(Debug, Clone)]
pub struct MediaLayout {
    root: PathBuf,
}

impl MediaLayout {
    /// Layout rooted at `<roms_dir>/media`.
    pub fn new(roms_dir: &Path) -> Self {
        Self {
            root: roms_dir.join(MEDIA_DIR),
        }
    }

    pub fn dir(&self, media_type: MediaType) -> PathBuf {
        self.root.join(media_type.subdir())
    }

    /// Create the media folder and one subfolder per media type.
    pub fn create_dirs(&self) -> std::io::Result<()> {
        for media_type in MediaType::ALL {
            std::fs::create_dir_all(self.dir(media_type))?;
        }
        Ok(())
    }
}

/// Pulls images out of the extras archives.
pub struct MediaExtractor {
    extras_dir: PathBuf,
    layout: MediaLayout,
    dry_run: bool,
    artwork_classifier: ArtworkClassifier,
}

impl MediaExtractor {
    pub fn new(extras_dir: impl Into<PathBuf>, layout: MediaLayout, dry_run: bool) -> Self {
        Self {
            extras_dir: extras_dir.into(),
            layout,
            dry_run,
            artwork_classifier: default_artwork_classifier,
        }
    }

    pub fn with_artwork_classifier(mut self, classifier: ArtworkClassifier) -> Self {
        self.artwork_classifier = classifier;
        self
    }

    /// Process every extras archive that exists.
    ///
    /// A failing archive is logged and contributes nothing (or only what was
    /// extracted before the failure); it never aborts the others.
    pub fn extract_all(&self) -> MediaIndex {
        let mut index = MediaIndex::default();

        let snap_zip = self.extras_dir.join(SNAP_ARCHIVE);
        if snap_zip.exists() {
            index.screenshots = self.process_direct(&snap_zip, MediaType::Screenshot);
        }

        let flyers_zip = self.extras_dir.join(FLYERS_ARCHIVE);
        if flyers_zip.exists() {
            index.covers = self.process_direct(&flyers_zip, MediaType::Cover);
        }

        let artwork_zip = self.extras_dir.join(ARTWORK_ARCHIVE);
        if artwork_zip.exists() {
            index.marquees = self.process_artwork(&artwork_zip);
        }

        index
    }

    /// Snapshots and flyers: every image is keyed by its file stem.
    fn process_direct(&self, archive: &Path, media_type: MediaType) -> MediaMap {
        let map = match open_archive(archive).and_then(|mut zip| index_direct(&mut zip)) {
            Ok(map) => map,
            Err(e) => {
                log::error!("Failed to process media zip {}: {e}", archive.display());
                return MediaMap::new();
            }
        };
        log::info!(
            "Found {} {} images in {}",
            map.len(),
            media_type.subdir(),
            archive.display()
        );

        let mut extracted = MediaMap::new();
        if let Err(e) = self.extract_entries(archive, &map, media_type, &mut extracted) {
            log::error!("Failed to extract media from {}: {e}", archive.display());
        }
        if !self.dry_run {
            log::info!(
                "Extracted {} of {} images to {}",
                extracted.len(),
                map.len(),
                self.layout.dir(media_type).display()
            );
        }
        map
    }

    /// Artwork: only marquees are extracted; the index lists the marquees
    /// that made it (or, in a dry run, would make it) to disk.
    fn process_artwork(&self, archive: &Path) -> MediaMap {
        let map = match open_archive(archive)
            .and_then(|mut zip| index_artwork(&mut zip, self.artwork_classifier))
        {
            Ok(map) => map,
            Err(e) => {
                log::error!("Failed to process media zip {}: {e}", archive.display());
                return MediaMap::new();
            }
        };
        log::info!("Found {} artwork images in {}", map.len(), archive.display());

        let wanted: MediaMap = map
            .iter()
            .filter_map(|(key, entry)| {
                key.strip_suffix(MARQUEE_SUFFIX)
                    .map(|id| (id.to_string(), entry.clone()))
            })
            .collect();

        let mut marquees = MediaMap::new();
        if let Err(e) = self.extract_entries(archive, &wanted, MediaType::Marquee, &mut marquees) {
            log::error!("Failed to extract artwork media: {e}");
        }
        marquees
    }

    /// Copy each wanted entry to `<dest>/<identifier>.png`, recording
    /// successes in `extracted`.
    fn extract_entries(
        &self,
        archive: &Path,
        wanted: &MediaMap,
        media_type: MediaType,
        extracted: &mut MediaMap,
    ) -> Result<(), FrontendError> {
        let dest_dir = self.layout.dir(media_type);
        let mut zip = open_archive(archive)?;

        for (identifier, entry_name) in wanted {
            let dest = dest_dir.join(format!(
                "{identifier}.{}",
                media_type.default_extension()
            ));
            if self.dry_run {
                log::info!("Would extract {entry_name} to {}", dest.display());
                extracted.insert(identifier.clone(), entry_name.clone());
                continue;
            }

            let mut entry = zip.by_name(entry_name)?;
            let mut out = File::create(&dest)?;
            std::io::copy(&mut entry, &mut out)?;
            log::debug!("Extracted {entry_name} to {}", dest.display());
            extracted.insert(identifier.clone(), entry_name.clone());
        }
        Ok(())
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, FrontendError> {
    Ok(ZipArchive::new(BufReader::new(File::open(path)?))?)
}

/// Image entries of an archive, in archive order.
fn image_entries<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<Vec<String>, FrontendError> {
    let mut names = Vec::new();
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        if !entry.is_dir() && entry.name().ends_with(IMAGE_EXTENSION) {
            names.push(entry.name().to_string());
        }
    }
    Ok(names)
}

fn file_stem(entry_name: &str) -> Option<String> {
    Path::new(entry_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
}

/// Key every image by its file stem. A later entry with the same stem wins.
pub fn index_direct<R: Read + Seek>(zip: &mut ZipArchive<R>) -> Result<MediaMap, FrontendError> {
    let mut map = MediaMap::new();
    for name in image_entries(zip)? {
        if let Some(stem) = file_stem(&name) {
            map.insert(stem, name);
        }
    }
    Ok(map)
}

/// Key artwork images by the part of the stem before the first `_`.
///
/// Flyers are keyed by the identifier, marquees by `<identifier>_marquee`;
/// excluded and unclassified entries are left out.
pub fn index_artwork<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    classifier: ArtworkClassifier,
) -> Result<MediaMap, FrontendError> {
    let mut map = MediaMap::new();
    for name in image_entries(zip)? {
        let Some(stem) = file_stem(&name) else {
            continue;
        };
        let identifier = stem.split('_').next().unwrap_or_default().to_string();
        if identifier.is_empty() {
            continue;
        }
        match classifier(&name) {
            Some(ArtworkClass::Flyer) => {
                map.insert(identifier, name);
            }
            Some(ArtworkClass::Marquee) => {
                map.insert(format!("{identifier}{MARQUEE_SUFFIX}"), name);
            }
            Some(ArtworkClass::Excluded) | None => {}
        }
    }
    Ok(map)
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
