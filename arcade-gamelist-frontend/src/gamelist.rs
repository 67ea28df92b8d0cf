//! Batocera `gamelist.xml`: loading an existing list and generating the new one.
//!
//! Generation layers catalog-derived metadata *under* whatever an existing
//! list already says about a game, so hand-edited fields survive re-runs.

use std::io::BufRead;
use std::path::Path;

use indexmap::IndexMap;

use arcade_gamelist_dat::{MachineMap, MachineRecord};

use crate::error::FrontendError;
use crate::media::MediaIndex;
use crate::media_types::MediaType;
use crate::xml::{XmlElement, parse_document, render_document};

pub const GAMELIST_FILE_NAME: &str = "gamelist.xml";

const ROOT_TAG: &str = "gameList";
const GAME_TAG: &str = "game";
const DEFAULT_GENRE: &str = "Arcade";

/// Child elements of a `game` entry, in output order.
const STANDARD_FIELDS: [&str; 14] = [
    "path",
    "name",
    "desc",
    "image",
    "thumbnail",
    "marquee",
    "video",
    "rating",
    "releasedate",
    "developer",
    "publisher",
    "genre",
    "players",
    "hidden",
];

/// Identifier -> `game` element of a previously written gamelist, in
/// document order.
pub type ExistingGamelist = IndexMap<String, XmlElement>;

/// Load the gamelist at `path`.
pub fn load_gamelist(path: &Path) -> Result<ExistingGamelist, FrontendError> {
    let file = std::fs::File::open(path)?;
    parse_gamelist(std::io::BufReader::new(file))
}

/// Parse a gamelist, keying each `game` by the file stem of its `path`.
///
/// Games without a usable `path` are skipped. When two games share an
/// identifier the later one replaces the earlier, keeping the earlier position.
pub fn parse_gamelist<R: BufRead>(reader: R) -> Result<ExistingGamelist, FrontendError> {
    let root = parse_document(reader)?;

    let mut games = ExistingGamelist::new();
    for game in root.children.into_iter().filter(|c| c.name == GAME_TAG) {
        let Some(identifier) = game.child_text("path").and_then(identifier_from_path) else {
            continue;
        };
        games.insert(identifier, game);
    }
    Ok(games)
}

fn identifier_from_path(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}

/// Convert a catalog year to the `YYYYMMDDTHHMMSS` form Batocera expects.
///
/// Only the leading four digits are used, so "1985" and "19850" both work,
/// while partial years such as "198?" yield `None`.
pub fn format_release_date(year: &str) -> Option<String> {
    year.get(..4)
        .filter(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
        .map(|digits| format!("{digits}0101T000000"))
}

/// Build the `game` element for one machine.
///
/// Every field the existing entry has is kept verbatim; the rest are derived
/// from the catalog and media index, or left out.
pub fn build_record(
    identifier: &str,
    machine: &MachineRecord,
    media: &MediaIndex,
    existing: Option<&XmlElement>,
) -> XmlElement {
    let mut game = XmlElement::new(GAME_TAG);
    if let Some(existing) = existing {
        game.attributes = existing.attributes.clone();
    }

    let screenshot = media
        .contains(MediaType::Screenshot, identifier)
        .then(|| MediaType::Screenshot.gamelist_path(identifier));

    for tag in STANDARD_FIELDS {
        if let Some(kept) = existing.and_then(|e| e.child(tag)) {
            game.push(kept.clone());
            continue;
        }

        let derived = match tag {
            "path" => Some(format!("./{identifier}.zip")),
            "name" | "desc" => Some(machine.description.clone()),
            "image" | "thumbnail" => screenshot.clone(),
            "marquee" => media
                .contains(MediaType::Marquee, identifier)
                .then(|| MediaType::Marquee.gamelist_path(identifier)),
            "releasedate" => format_release_date(&machine.year),
            "developer" | "publisher" => Some(machine.manufacturer.clone()),
            "genre" => Some(DEFAULT_GENRE.to_string()),
            "players" => machine.players.clone(),
            "hidden" => machine.is_unfinished().then(|| "true".to_string()),
            // video and rating are never synthesized
            _ => None,
        };
        if let Some(value) = derived {
            game.push(XmlElement::with_text(tag, value));
        }
    }

    if let Some(existing) = existing {
        game.children.extend(
            existing
                .children
                .iter()
                .filter(|c| !STANDARD_FIELDS.contains(&c.name.as_str()))
                .cloned(),
        );
    }

    game
}

/// A generated gamelist and how it was put together.
#[derive(Debug, Clone)]
pub struct GeneratedGamelist {
    pub root: XmlElement,
    /// Entries built from the catalog
    pub generated: usize,
    /// Existing entries carried over because the catalog doesn't know them
    pub preserved: usize,
}

impl GeneratedGamelist {
    pub fn total(&self) -> usize {
        self.root.children.len()
    }
}

/// Build the full gamelist: one entry per machine in identifier order, then
/// (when `preserve_orphans` is set) every existing entry the catalog lacks.
pub fn generate_gamelist(
    machines: &MachineMap,
    media: &MediaIndex,
    existing: &ExistingGamelist,
    preserve_orphans: bool,
) -> GeneratedGamelist {
    let mut root = XmlElement::new(ROOT_TAG);

    for (identifier, machine) in machines {
        root.push(build_record(
            identifier,
            machine,
            media,
            existing.get(identifier),
        ));
    }
    let generated = root.children.len();

    let mut preserved = 0;
    if preserve_orphans {
        for (identifier, game) in existing {
            if !machines.contains_key(identifier) {
                log::debug!("Preserved existing game not in catalog: {identifier}");
                root.push(game.clone());
                preserved += 1;
            }
        }
    }

    GeneratedGamelist {
        root,
        generated,
        preserved,
    }
}

/// Render and write the gamelist document.
pub fn write_gamelist(path: &Path, root: &XmlElement) -> Result<(), FrontendError> {
    std::fs::write(path, render_document(root))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/gamelist_tests.rs"]
mod tests;
