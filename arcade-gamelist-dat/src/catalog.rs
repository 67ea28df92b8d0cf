use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;

/// Metadata for a single machine entry in a MAME catalog.
///
/// The text fields and flags are always populated by the parser (empty or
/// `false` when the document omits them). The `Option` fields are only set
/// when the document carries the corresponding element, which is what lets
/// the merger tell "absent" apart from "present but empty".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MachineRecord {
    pub description: String,
    pub year: String,
    pub manufacturer: String,
    pub is_bios: bool,
    pub is_mechanical: bool,
    pub is_device: bool,
    /// Player count from the `input` element (e.g. "2")
    pub players: Option<String>,
    /// `driver status` attribute (e.g. "good", "imperfect", "preliminary")
    pub driver_status: Option<String>,
    /// `driver emulation` attribute
    pub driver_emulation: Option<String>,
}

impl MachineRecord {
    /// Whether the driver is flagged as not fully working.
    pub fn is_unfinished(&self) -> bool {
        matches!(
            self.driver_status.as_deref(),
            Some("preliminary" | "imperfect")
        )
    }
}

/// Machine identifier -> metadata, ordered by identifier.
pub type MachineMap = BTreeMap<String, MachineRecord>;

/// Parse a catalog document from a file path.
pub fn parse_catalog_file(path: &Path) -> Result<MachineMap, DatError> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    parse_catalog(reader)
}

/// Parse a MAME-style catalog document.
///
/// Under a `datafile` root the entries are `machine` elements, under any
/// other root they are `game` elements. Entries without a `name` attribute
/// are skipped; a repeated name replaces the earlier entry. Field text is
/// taken as written, surrounding whitespace included.
pub fn parse_catalog<R: BufRead>(reader: R) -> Result<MachineMap, DatError> {
    let mut xml = Reader::from_reader(reader);

    let mut buf = Vec::new();
    let mut builder = CatalogBuilder::default();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                saw_root = true;
                builder.open(e, depth)?;
            }
            Event::Empty(ref e) => {
                saw_root = true;
                builder.open(e, depth + 1)?;
                builder.close(depth + 1);
            }
            Event::Text(ref e) => {
                if depth == FIELD_DEPTH {
                    builder.text(&e.unescape()?);
                }
            }
            Event::CData(ref e) => {
                if depth == FIELD_DEPTH {
                    builder.text(&String::from_utf8_lossy(e));
                }
            }
            Event::End(_) => {
                builder.close(depth);
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(DatError::invalid_catalog("document has no root element"));
    }
    if depth != 0 {
        return Err(DatError::invalid_catalog("unexpected end of document"));
    }

    Ok(builder.machines)
}

const ROOT_DEPTH: usize = 1;
const ENTRY_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy)]
enum TextField {
    Description,
    Year,
    Manufacturer,
}

/// An entry being assembled; `name` is `None` when the entry will be skipped.
#[derive(Default)]
struct PendingEntry {
    name: Option<String>,
    record: MachineRecord,
    seen_description: bool,
    seen_year: bool,
    seen_manufacturer: bool,
    seen_input: bool,
    seen_driver: bool,
}

#[derive(Default)]
struct CatalogBuilder {
    machines: MachineMap,
    entry_tag: &'static [u8],
    current: Option<PendingEntry>,
    field: Option<TextField>,
    field_text: String,
}

impl CatalogBuilder {
    fn open(&mut self, e: &BytesStart<'_>, depth: usize) -> Result<(), DatError> {
        let tag = e.name();
        match depth {
            ROOT_DEPTH => {
                self.entry_tag = if tag.as_ref() == b"datafile" {
                    b"machine"
                } else {
                    b"game"
                };
            }
            ENTRY_DEPTH if tag.as_ref() == self.entry_tag => {
                self.current = Some(start_entry(e)?);
            }
            FIELD_DEPTH => {
                if let Some(entry) = self.current.as_mut() {
                    self.field = open_field(entry, e)?;
                    self.field_text.clear();
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.field.is_some() {
            self.field_text.push_str(text);
        }
    }

    fn close(&mut self, depth: usize) {
        match depth {
            FIELD_DEPTH => {
                if let (Some(field), Some(entry)) = (self.field.take(), self.current.as_mut()) {
                    let text = std::mem::take(&mut self.field_text);
                    match field {
                        TextField::Description => entry.record.description = text,
                        TextField::Year => entry.record.year = text,
                        TextField::Manufacturer => entry.record.manufacturer = text,
                    }
                }
            }
            ENTRY_DEPTH => {
                if let Some(entry) = self.current.take() {
                    if let Some(name) = entry.name {
                        log::debug!("Parsed metadata for {name}");
                        self.machines.insert(name, entry.record);
                    }
                }
            }
            _ => {}
        }
    }
}

fn start_entry(e: &BytesStart<'_>) -> Result<PendingEntry, DatError> {
    let name = attribute(e, "name")?.filter(|n| !n.is_empty());
    let record = MachineRecord {
        is_bios: attribute(e, "isbios")?.as_deref() == Some("yes"),
        is_mechanical: attribute(e, "ismechanical")?.as_deref() == Some("yes"),
        is_device: attribute(e, "isdevice")?.as_deref() == Some("yes"),
        ..MachineRecord::default()
    };
    Ok(PendingEntry {
        name,
        record,
        ..PendingEntry::default()
    })
}

/// Handle a direct child of an entry. Returns the text field to collect, if any.
/// Only the first occurrence of each child is honoured.
fn open_field(
    entry: &mut PendingEntry,
    e: &BytesStart<'_>,
) -> Result<Option<TextField>, DatError> {
    let field = match e.name().as_ref() {
        b"description" if !entry.seen_description => {
            entry.seen_description = true;
            Some(TextField::Description)
        }
        b"year" if !entry.seen_year => {
            entry.seen_year = true;
            Some(TextField::Year)
        }
        b"manufacturer" if !entry.seen_manufacturer => {
            entry.seen_manufacturer = true;
            Some(TextField::Manufacturer)
        }
        b"input" if !entry.seen_input => {
            entry.seen_input = true;
            entry.record.players = attribute(e, "players")?.filter(|p| !p.is_empty());
            None
        }
        b"driver" if !entry.seen_driver => {
            entry.seen_driver = true;
            entry.record.driver_status = Some(attribute(e, "status")?.unwrap_or_default());
            entry.record.driver_emulation = Some(attribute(e, "emulation")?.unwrap_or_default());
            None
        }
        _ => None,
    };
    Ok(field)
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, DatError> {
    match e.try_get_attribute(key)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
