//! Locating catalog archives and pulling the embedded catalog out of them.
//!
//! A MAME distribution ships its catalogs as separate zip files (one for the
//! ROM sets, one for CHD sets, one for artwork), each holding a single XML
//! document. Archives are told apart by their file name.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::DatError;

const CATALOG_EXTENSION: &str = ".xml";

/// The role a catalog archive plays in the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Rom,
    Chd,
    Artwork,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Rom => write!(f, "ROM"),
            CatalogKind::Chd => write!(f, "CHD"),
            CatalogKind::Artwork => write!(f, "artwork"),
        }
    }
}

/// Decides the catalog kind of an archive from its file name.
pub type CatalogClassifier = fn(&str) -> Option<CatalogKind>;

/// Classify by case-insensitive substring, checking "rom", then "chd",
/// then "artwork".
pub fn default_catalog_classifier(file_name: &str) -> Option<CatalogKind> {
    let lower = file_name.to_lowercase();
    if lower.contains("rom") {
        Some(CatalogKind::Rom)
    } else if lower.contains("chd") {
        Some(CatalogKind::Chd)
    } else if lower.contains("artwork") {
        Some(CatalogKind::Artwork)
    } else {
        None
    }
}

/// The archives selected for each catalog kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSet {
    pub rom: Option<PathBuf>,
    pub chd: Option<PathBuf>,
    pub artwork: Option<PathBuf>,
}

impl CatalogSet {
    pub fn get(&self, kind: CatalogKind) -> Option<&Path> {
        match kind {
            CatalogKind::Rom => self.rom.as_deref(),
            CatalogKind::Chd => self.chd.as_deref(),
            CatalogKind::Artwork => self.artwork.as_deref(),
        }
    }

    fn slot_mut(&mut self, kind: CatalogKind) -> &mut Option<PathBuf> {
        match kind {
            CatalogKind::Rom => &mut self.rom,
            CatalogKind::Chd => &mut self.chd,
            CatalogKind::Artwork => &mut self.artwork,
        }
    }
}

/// Find catalog archives using [`default_catalog_classifier`].
pub fn locate_catalogs(path: &Path) -> Result<CatalogSet, DatError> {
    locate_catalogs_with(path, default_catalog_classifier)
}

/// Find catalog archives next to `path` (if it is a file) or inside it (if it
/// is a directory).
///
/// Archives are visited in file-name order and the first match for each kind
/// is kept; later matches are ignored.
pub fn locate_catalogs_with(
    path: &Path,
    classifier: CatalogClassifier,
) -> Result<CatalogSet, DatError> {
    let dir = if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        path
    };

    let mut archives: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_zip_extension(p))
        .collect();
    archives.sort();

    let mut set = CatalogSet::default();
    for archive in archives {
        let Some(file_name) = archive.file_name().map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        let Some(kind) = classifier(&file_name) else {
            continue;
        };
        let slot = set.slot_mut(kind);
        if slot.is_some() {
            log::debug!("Ignoring additional {kind} catalog {file_name}");
            continue;
        }
        log::info!("Found {kind} catalog: {}", archive.display());
        *slot = Some(archive);
    }

    Ok(set)
}

fn has_zip_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Name of the catalog document inside an archive.
///
/// Picks the first `.xml` entry in archive order, warning if there are more.
pub fn find_catalog_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    label: &str,
) -> Result<String, DatError> {
    let mut candidates = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if !entry.is_dir() && entry.name().ends_with(CATALOG_EXTENSION) {
            candidates.push(entry.name().to_string());
        }
    }

    let mut candidates = candidates.into_iter();
    let first = candidates
        .next()
        .ok_or_else(|| DatError::no_catalog_entry(label))?;
    if candidates.next().is_some() {
        log::warn!("Multiple XML files found in {label}, using {first}");
    }
    Ok(first)
}

/// Extract the catalog document of `archive_path` into `scratch`.
///
/// The file is written as `<archive stem>_<entry file name>` so catalogs that
/// embed identically named documents don't collide.
pub fn extract_catalog(archive_path: &Path, scratch: &Path) -> Result<PathBuf, DatError> {
    let label = archive_path.display().to_string();
    let mut archive = ZipArchive::new(BufReader::new(File::open(archive_path)?))?;
    let entry_name = find_catalog_entry(&mut archive, &label)?;

    let stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = Path::new(&entry_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry_name.clone());
    let dest = scratch.join(format!("{stem}_{file_name}"));

    let mut entry = archive.by_name(&entry_name)?;
    let mut out = File::create(&dest)?;
    std::io::copy(&mut entry, &mut out)?;

    log::debug!("Extracted {entry_name} from {label} to {}", dest.display());
    Ok(dest)
}

/// Read the catalog document of `archive_path` into memory, without writing
/// it anywhere.
pub fn read_catalog_document(archive_path: &Path) -> Result<Vec<u8>, DatError> {
    let label = archive_path.display().to_string();
    let mut archive = ZipArchive::new(BufReader::new(File::open(archive_path)?))?;
    let entry_name = find_catalog_entry(&mut archive, &label)?;
    let mut entry = archive.by_name(&entry_name)?;
    let mut document = Vec::new();
    entry.read_to_end(&mut document)?;
    Ok(document)
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
