use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use arcade_gamelist_lib::frontend::{ExistingGamelist, load_gamelist};
use arcade_gamelist_lib::*;

const ROM_XML: &str = r#"<?xml version="1.0"?>
<datafile>
    <machine name="galaga">
        <description>Galaga</description>
        <year>1981</year>
        <manufacturer>Namco</manufacturer>
        <input players="2"/>
        <driver status="good" emulation="good"/>
    </machine>
    <machine name="protoball">
        <description>Proto Ball</description>
        <year>198?</year>
        <manufacturer>Unknown</manufacturer>
        <driver status="preliminary" emulation="preliminary"/>
    </machine>
    <machine name="kinst">
        <description></description>
        <year>1994</year>
        <manufacturer>Rare</manufacturer>
    </machine>
</datafile>"#;

const CHD_XML: &str = r#"<?xml version="1.0"?>
<datafile>
    <machine name="kinst">
        <description>Killer Instinct</description>
        <year>1994</year>
        <manufacturer>Rare / Nintendo</manufacturer>
    </machine>
</datafile>"#;

const ARTWORK_XML: &str = r#"<?xml version="1.0"?>
<datafile>
    <machine name="kinst">
        <input players="2"/>
    </machine>
</datafile>"#;

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, contents) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Catalogs, extras and an empty ROM directory under one temp root.
struct Fixture {
    root: tempfile::TempDir,
    dats: PathBuf,
    extras: PathBuf,
    roms: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let dats = root.path().join("dats");
        let extras = root.path().join("extras");
        let roms = root.path().join("roms");
        for dir in [&dats, &extras, &roms] {
            std::fs::create_dir_all(dir).unwrap();
        }

        write_zip(
            &dats.join("MAME ROMs.zip"),
            &[("MAME ROMs.xml", ROM_XML)],
        );
        write_zip(
            &dats.join("MAME CHDs.zip"),
            &[("MAME CHDs.xml", CHD_XML)],
        );
        write_zip(
            &dats.join("MAME Artwork.zip"),
            &[("MAME Artwork.xml", ARTWORK_XML)],
        );

        write_zip(
            &extras.join("snap.zip"),
            &[("galaga.png", "snap"), ("kinst.png", "snap")],
        );
        write_zip(&extras.join("flyers.zip"), &[("galaga.png", "flyer")]);
        write_zip(
            &extras.join("artwork.zip"),
            &[
                ("galaga/galaga_marquee.png", "marquee"),
                ("galaga/galaga_bezel.png", "bezel"),
            ],
        );

        Self {
            root,
            dats,
            extras,
            roms,
        }
    }

    fn options(&self) -> ConvertOptions {
        ConvertOptions::new(&self.dats, &self.extras, &self.roms)
    }

    fn gamelist(&self) -> PathBuf {
        self.roms.join("gamelist.xml")
    }

    fn load(&self) -> ExistingGamelist {
        load_gamelist(&self.gamelist()).unwrap()
    }
}

fn file_count(dir: &Path) -> usize {
    walk(dir).len()
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walk(&path));
        } else {
            files.push(path);
        }
    }
    files
}

#[test]
fn full_run_writes_gamelist_and_media() {
    let fixture = Fixture::new();
    let summary = Converter::new(fixture.options()).run().unwrap();

    assert!(summary.written);
    assert_eq!(summary.rom_machines, 3);
    assert_eq!(summary.chd_machines, 1);
    assert_eq!(summary.artwork_machines, 1);
    assert_eq!(summary.merged_machines, 3);
    assert_eq!(summary.screenshots, 2);
    assert_eq!(summary.covers, 1);
    assert_eq!(summary.marquees, 1);
    assert_eq!(summary.total_games, 3);
    assert_eq!(summary.gamelist_path, fixture.gamelist());

    let media = fixture.roms.join("media");
    assert_eq!(
        std::fs::read(media.join("screenshots/galaga.png")).unwrap(),
        b"snap"
    );
    assert_eq!(
        std::fs::read(media.join("covers/galaga.png")).unwrap(),
        b"flyer"
    );
    assert_eq!(
        std::fs::read(media.join("marquees/galaga.png")).unwrap(),
        b"marquee"
    );
    assert!(!media.join("marquees/galaga_bezel.png").exists());

    let games = fixture.load();
    let ids: Vec<&str> = games.keys().map(String::as_str).collect();
    assert_eq!(ids, ["galaga", "kinst", "protoball"]);

    let galaga = &games["galaga"];
    assert_eq!(galaga.child_text("path"), Some("./galaga.zip"));
    assert_eq!(galaga.child_text("name"), Some("Galaga"));
    assert_eq!(
        galaga.child_text("image"),
        Some("./media/screenshots/galaga.png")
    );
    assert_eq!(
        galaga.child_text("marquee"),
        Some("./media/marquees/galaga.png")
    );
    assert_eq!(galaga.child_text("releasedate"), Some("19810101T000000"));
    assert_eq!(galaga.child_text("developer"), Some("Namco"));
    assert_eq!(galaga.child_text("publisher"), Some("Namco"));
    assert_eq!(galaga.child_text("genre"), Some("Arcade"));
    assert_eq!(galaga.child_text("players"), Some("2"));
    assert!(galaga.child("hidden").is_none());
    assert!(galaga.child("rating").is_none());

    // non-empty CHD values overwrite, artwork only adds the player count
    let kinst = &games["kinst"];
    assert_eq!(kinst.child_text("name"), Some("Killer Instinct"));
    assert_eq!(kinst.child_text("developer"), Some("Rare / Nintendo"));
    assert_eq!(kinst.child_text("players"), Some("2"));
}

#[test]
fn unfinished_driver_is_hidden() {
    let fixture = Fixture::new();
    Converter::new(fixture.options()).run().unwrap();

    let games = fixture.load();
    let proto = &games["protoball"];
    assert_eq!(proto.child_text("hidden"), Some("true"));
    assert!(proto.child("releasedate").is_none());
    assert!(proto.child("image").is_none());
}

#[test]
fn missing_rom_catalog_is_fatal() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.dats.join("MAME ROMs.zip")).unwrap();

    let err = Converter::new(fixture.options()).run().unwrap_err();
    assert!(matches!(err, PipelineError::MissingRomCatalog(_)));
    assert!(!fixture.gamelist().exists());
}

#[test]
fn missing_dat_path_is_fatal() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dat_path = fixture.dats.join("nowhere");

    let err = Converter::new(options).run().unwrap_err();
    assert!(matches!(err, PipelineError::MissingRomCatalog(_)));
}

#[test]
fn rom_archive_without_catalog_is_fatal() {
    let fixture = Fixture::new();
    write_zip(
        &fixture.dats.join("MAME ROMs.zip"),
        &[("readme.txt", "nothing here")],
    );

    let err = Converter::new(fixture.options()).run().unwrap_err();
    assert!(matches!(err, PipelineError::MissingRomCatalog(_)));
}

#[test]
fn broken_chd_catalog_is_skipped() {
    let fixture = Fixture::new();
    std::fs::write(fixture.dats.join("MAME CHDs.zip"), "not a zip").unwrap();

    let summary = Converter::new(fixture.options()).run().unwrap();
    assert_eq!(summary.chd_machines, 0);
    assert_eq!(summary.total_games, 3);

    let games = fixture.load();
    assert_eq!(games["kinst"].child_text("name"), Some(""));
}

#[test]
fn missing_extras_still_writes_gamelist() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.extras_dir = fixture.extras.join("absent");

    let summary = Converter::new(options).run().unwrap();
    assert_eq!(summary.screenshots, 0);
    assert_eq!(summary.marquees, 0);
    assert!(fixture.roms.join("media/screenshots").is_dir());
    assert!(fixture.load()["galaga"].child("image").is_none());
}

#[test]
fn dry_run_writes_nothing() {
    let fixture = Fixture::new();
    let mut options = fixture.options();
    options.dry_run = true;

    let summary = Converter::new(options).run().unwrap();
    assert!(!summary.written);
    assert_eq!(summary.total_games, 3);
    assert_eq!(summary.marquees, 1);
    assert_eq!(file_count(&fixture.roms), 0);
    assert!(!fixture.roms.join("media").exists());
}

#[test]
fn dry_run_leaves_existing_gamelist_alone() {
    let fixture = Fixture::new();
    let original = "<?xml version=\"1.0\"?>\n<gameList />\n";
    std::fs::write(fixture.gamelist(), original).unwrap();

    let mut options = fixture.options();
    options.dry_run = true;
    Converter::new(options).run().unwrap();

    assert_eq!(std::fs::read_to_string(fixture.gamelist()).unwrap(), original);
}

#[test]
fn rerun_is_byte_identical() {
    let fixture = Fixture::new();
    Converter::new(fixture.options()).run().unwrap();
    let first = std::fs::read(fixture.gamelist()).unwrap();

    let summary = Converter::new(fixture.options()).run().unwrap();
    let second = std::fs::read(fixture.gamelist()).unwrap();

    assert_eq!(first, second);
    assert_eq!(summary.total_games, 3);
    assert_eq!(summary.preserved_orphans, 0);
}

#[test]
fn hand_edits_survive_rerun() {
    let fixture = Fixture::new();
    std::fs::write(
        fixture.gamelist(),
        r#"<?xml version="1.0"?>
<gameList>
  <game id="42">
    <path>./galaga.zip</path>
    <name>Galaga (my copy)</name>
    <rating>0.9</rating>
    <favorite>true</favorite>
  </game>
</gameList>
"#,
    )
    .unwrap();

    Converter::new(fixture.options()).run().unwrap();

    let games = fixture.load();
    let galaga = &games["galaga"];
    assert_eq!(galaga.child_text("name"), Some("Galaga (my copy)"));
    assert_eq!(galaga.child_text("desc"), Some("Galaga"));
    assert_eq!(galaga.child_text("rating"), Some("0.9"));
    assert_eq!(galaga.child_text("favorite"), Some("true"));
    assert_eq!(
        galaga.attributes,
        vec![("id".to_string(), "42".to_string())]
    );
}

const ORPHAN_GAMELIST: &str = r#"<?xml version="1.0"?>
<gameList>
  <game>
    <path>./homebrew.zip</path>
    <name>My Homebrew</name>
  </game>
</gameList>
"#;

#[test]
fn orphans_are_preserved_when_merging() {
    let fixture = Fixture::new();
    std::fs::write(fixture.gamelist(), ORPHAN_GAMELIST).unwrap();

    let summary = Converter::new(fixture.options()).run().unwrap();
    assert_eq!(summary.preserved_orphans, 1);
    assert_eq!(summary.total_games, 4);

    let games = fixture.load();
    let ids: Vec<&str> = games.keys().map(String::as_str).collect();
    assert_eq!(ids, ["galaga", "kinst", "protoball", "homebrew"]);
    assert_eq!(games["homebrew"].child_text("name"), Some("My Homebrew"));
}

#[test]
fn orphans_are_dropped_without_merge() {
    let fixture = Fixture::new();
    std::fs::write(fixture.gamelist(), ORPHAN_GAMELIST).unwrap();

    let mut options = fixture.options();
    options.no_merge = true;
    let summary = Converter::new(options).run().unwrap();

    assert_eq!(summary.preserved_orphans, 0);
    assert_eq!(summary.total_games, 3);
    assert!(!fixture.load().contains_key("homebrew"));
}

#[test]
fn corrupt_existing_gamelist_is_replaced() {
    let fixture = Fixture::new();
    std::fs::write(fixture.gamelist(), "<gameList><game>").unwrap();

    let summary = Converter::new(fixture.options()).run().unwrap();
    assert_eq!(summary.total_games, 3);
    assert_eq!(fixture.load().len(), 3);
}

#[test]
fn user_scratch_dir_is_cleaned_up() {
    let fixture = Fixture::new();

    let created = fixture.root.path().join("scratch");
    let mut options = fixture.options();
    options.extract_temp = Some(created.clone());
    Converter::new(options).run().unwrap();
    assert!(!created.exists());

    let existing = fixture.root.path().join("existing");
    std::fs::create_dir(&existing).unwrap();
    std::fs::write(existing.join("notes.txt"), "keep").unwrap();
    let mut options = fixture.options();
    options.extract_temp = Some(existing.clone());
    Converter::new(options).run().unwrap();

    let left: Vec<PathBuf> = walk(&existing);
    assert_eq!(left, vec![existing.join("notes.txt")]);
}

#[test]
fn custom_catalog_classifier() {
    fn by_prefix(name: &str) -> Option<dat::CatalogKind> {
        name.starts_with("MAME ROMs").then_some(dat::CatalogKind::Rom)
    }

    let fixture = Fixture::new();
    let summary = Converter::new(fixture.options())
        .with_catalog_classifier(by_prefix)
        .run()
        .unwrap();

    assert_eq!(summary.chd_machines, 0);
    assert_eq!(summary.artwork_machines, 0);
    assert!(fixture.load()["kinst"].child("players").is_none());
}
