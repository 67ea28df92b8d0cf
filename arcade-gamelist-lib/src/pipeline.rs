//! The end-to-end conversion: catalogs + extras in, `gamelist.xml` out.

use std::path::{Path, PathBuf};

use arcade_gamelist_dat::{
    CatalogClassifier, CatalogKind, CatalogSet, MachineMap, default_catalog_classifier,
    extract_catalog, locate_catalogs_with, merge_catalogs, parse_catalog, parse_catalog_file,
    read_catalog_document,
};
use arcade_gamelist_frontend::{
    ArtworkClassifier, ExistingGamelist, GAMELIST_FILE_NAME, MediaExtractor, MediaLayout,
    default_artwork_classifier, generate_gamelist, load_gamelist, write_gamelist,
};

use crate::error::PipelineError;
use crate::scratch::ScratchDir;

/// Inputs and switches for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// A catalog archive, or the directory holding the catalog archives
    pub dat_path: PathBuf,
    /// Directory holding `snap.zip`, `flyers.zip` and `artwork.zip`
    pub extras_dir: PathBuf,
    /// Target ROM directory; receives `gamelist.xml` and `media/`
    pub roms_dir: PathBuf,
    /// Where catalogs are extracted; a fresh temp directory when unset
    pub extract_temp: Option<PathBuf>,
    /// Ignore any existing gamelist and drop its entries
    pub no_merge: bool,
    /// Log what would happen without touching the file system
    pub dry_run: bool,
}

impl ConvertOptions {
    pub fn new(
        dat_path: impl Into<PathBuf>,
        extras_dir: impl Into<PathBuf>,
        roms_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dat_path: dat_path.into(),
            extras_dir: extras_dir.into(),
            roms_dir: roms_dir.into(),
            extract_temp: None,
            no_merge: false,
            dry_run: false,
        }
    }

    pub fn gamelist_path(&self) -> PathBuf {
        self.roms_dir.join(GAMELIST_FILE_NAME)
    }
}

/// Counts from a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    pub rom_machines: usize,
    pub chd_machines: usize,
    pub artwork_machines: usize,
    pub merged_machines: usize,
    pub screenshots: usize,
    pub covers: usize,
    pub marquees: usize,
    /// Existing entries kept although no catalog lists them
    pub preserved_orphans: usize,
    pub total_games: usize,
    pub gamelist_path: PathBuf,
    /// False for dry runs
    pub written: bool,
}

pub struct Converter {
    options: ConvertOptions,
    catalog_classifier: CatalogClassifier,
    artwork_classifier: ArtworkClassifier,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            catalog_classifier: default_catalog_classifier,
            artwork_classifier: default_artwork_classifier,
        }
    }

    pub fn with_catalog_classifier(mut self, classifier: CatalogClassifier) -> Self {
        self.catalog_classifier = classifier;
        self
    }

    pub fn with_artwork_classifier(mut self, classifier: ArtworkClassifier) -> Self {
        self.artwork_classifier = classifier;
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Run the conversion.
    ///
    /// Only a missing ROM catalog (or a file system failure outside the
    /// per-source steps) is an error; every other source that fails to load
    /// contributes nothing and the run carries on.
    pub fn run(&self) -> Result<ConvertSummary, PipelineError> {
        let opts = &self.options;
        let dat_label = opts.dat_path.display().to_string();

        let catalogs = match locate_catalogs_with(&opts.dat_path, self.catalog_classifier) {
            Ok(set) => set,
            Err(e) => {
                log::error!("Failed to scan {dat_label} for catalogs: {e}");
                CatalogSet::default()
            }
        };
        let Some(rom_archive) = catalogs.rom.as_deref() else {
            return Err(PipelineError::missing_rom_catalog(dat_label));
        };

        // Dry runs read catalogs in memory and never need a scratch dir.
        let mut scratch = if opts.dry_run {
            None
        } else {
            Some(match &opts.extract_temp {
                Some(path) => ScratchDir::at(path)?,
                None => ScratchDir::temporary()?,
            })
        };

        let rom = self
            .load_catalog(CatalogKind::Rom, rom_archive, scratch.as_mut())
            .ok_or_else(|| PipelineError::missing_rom_catalog(&dat_label))?;
        let chd = self.load_optional(&catalogs, CatalogKind::Chd, scratch.as_mut());
        let artwork = self.load_optional(&catalogs, CatalogKind::Artwork, scratch.as_mut());

        let mut summary = ConvertSummary {
            rom_machines: rom.len(),
            chd_machines: chd.len(),
            artwork_machines: artwork.len(),
            gamelist_path: opts.gamelist_path(),
            ..Default::default()
        };

        let machines = merge_catalogs(rom, chd, artwork);
        log::info!("Merged metadata for {} machines", machines.len());
        summary.merged_machines = machines.len();

        let layout = MediaLayout::new(&opts.roms_dir);
        if !opts.dry_run {
            layout.create_dirs()?;
        }
        let media = MediaExtractor::new(&opts.extras_dir, layout, opts.dry_run)
            .with_artwork_classifier(self.artwork_classifier)
            .extract_all();
        summary.screenshots = media.screenshots.len();
        summary.covers = media.covers.len();
        summary.marquees = media.marquees.len();

        let existing = if opts.no_merge {
            ExistingGamelist::default()
        } else {
            self.load_existing(&summary.gamelist_path)
        };

        let gamelist = generate_gamelist(&machines, &media, &existing, !opts.no_merge);
        summary.preserved_orphans = gamelist.preserved;
        summary.total_games = gamelist.total();

        if opts.dry_run {
            log::info!(
                "Would write {GAMELIST_FILE_NAME} to {}",
                summary.gamelist_path.display()
            );
            log::info!("Total games: {}", summary.total_games);
        } else {
            write_gamelist(&summary.gamelist_path, &gamelist.root)?;
            summary.written = true;
            log::info!(
                "Successfully wrote {GAMELIST_FILE_NAME} with {} games",
                summary.total_games
            );
        }

        Ok(summary)
    }

    fn load_optional(
        &self,
        catalogs: &CatalogSet,
        kind: CatalogKind,
        scratch: Option<&mut ScratchDir>,
    ) -> MachineMap {
        catalogs
            .get(kind)
            .and_then(|archive| self.load_catalog(kind, archive, scratch))
            .unwrap_or_default()
    }

    /// Extract and parse one catalog.
    ///
    /// `None` means the catalog document couldn't be pulled out of the
    /// archive; a document that fails to parse yields an empty map.
    fn load_catalog(
        &self,
        kind: CatalogKind,
        archive: &Path,
        scratch: Option<&mut ScratchDir>,
    ) -> Option<MachineMap> {
        let parsed = match scratch {
            Some(scratch) => match extract_catalog(archive, scratch.path()) {
                Ok(extracted) => {
                    scratch.track(extracted.clone());
                    parse_catalog_file(&extracted)
                }
                Err(e) => {
                    log::error!(
                        "Failed to extract {kind} catalog from {}: {e}",
                        archive.display()
                    );
                    return None;
                }
            },
            None => match read_catalog_document(archive) {
                Ok(document) => parse_catalog(document.as_slice()),
                Err(e) => {
                    log::error!(
                        "Failed to read {kind} catalog from {}: {e}",
                        archive.display()
                    );
                    return None;
                }
            },
        };

        match parsed {
            Ok(machines) => {
                log::info!("Loaded {} machines from {kind} catalog", machines.len());
                Some(machines)
            }
            Err(e) => {
                log::error!("Failed to parse {kind} catalog {}: {e}", archive.display());
                Some(MachineMap::new())
            }
        }
    }

    fn load_existing(&self, path: &Path) -> ExistingGamelist {
        if !path.exists() {
            return ExistingGamelist::default();
        }
        match load_gamelist(path) {
            Ok(games) => {
                log::info!(
                    "Loaded {} existing games from {}",
                    games.len(),
                    path.display()
                );
                games
            }
            Err(e) => {
                log::warn!("Failed to load existing {}: {e}", path.display());
                ExistingGamelist::default()
            }
        }
    }
}
