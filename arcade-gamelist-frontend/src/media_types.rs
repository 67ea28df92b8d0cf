/// Media categories written under `<roms>/media`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// In-game screenshot (from `snap.zip`)
    Screenshot,
    /// Flyer art (from `flyers.zip`)
    Cover,
    /// Cabinet marquee (from `artwork.zip`)
    Marquee,
}

/// Name of the media directory inside the ROM directory.
pub const MEDIA_DIR: &str = "media";

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Screenshot, MediaType::Cover, MediaType::Marquee];

    /// File extension for this media type.
    pub fn default_extension(&self) -> &'static str {
        "png"
    }

    /// Subdirectory of [`MEDIA_DIR`] holding this media type.
    pub fn subdir(&self) -> &'static str {
        match self {
            MediaType::Screenshot => "screenshots",
            MediaType::Cover => "covers",
            MediaType::Marquee => "marquees",
        }
    }

    /// Path of a game's image as referenced from the gamelist,
    /// e.g. `./media/screenshots/pacman.png`.
    pub fn gamelist_path(&self, identifier: &str) -> String {
        format!(
            "./{MEDIA_DIR}/{}/{identifier}.{}",
            self.subdir(),
            self.default_extension()
        )
    }
}
