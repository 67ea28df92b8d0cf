use super::*;

fn record(description: &str, year: &str, manufacturer: &str) -> MachineRecord {
    MachineRecord {
        description: description.to_string(),
        year: year.to_string(),
        manufacturer: manufacturer.to_string(),
        ..MachineRecord::default()
    }
}

fn map(entries: Vec<(&str, MachineRecord)>) -> MachineMap {
    entries
        .into_iter()
        .map(|(name, r)| (name.to_string(), r))
        .collect()
}

#[test]
fn test_rom_only() {
    let rom = map(vec![("pacman", record("Pac-Man", "1980", "Namco"))]);
    let merged = merge_catalogs(rom.clone(), MachineMap::new(), MachineMap::new());
    assert_eq!(merged, rom);
}

#[test]
fn test_chd_truthy_value_overwrites_rom() {
    let rom = map(vec![("kinst", record("Killer Instinct", "1994", "Rare"))]);
    let chd = map(vec![("kinst", record("Killer Instinct (v1.5d)", "", ""))]);

    let merged = merge_catalogs(rom, chd, MachineMap::new());
    let kinst = &merged["kinst"];
    assert_eq!(kinst.description, "Killer Instinct (v1.5d)");
    // empty CHD values leave ROM values alone
    assert_eq!(kinst.year, "1994");
    assert_eq!(kinst.manufacturer, "Rare");
}

#[test]
fn test_chd_fills_empty_rom_value() {
    let rom = map(vec![("area51", record("Area 51", "", "Atari"))]);
    let chd = map(vec![("area51", record("", "1995", ""))]);

    let merged = merge_catalogs(rom, chd, MachineMap::new());
    assert_eq!(merged["area51"].year, "1995");
    assert_eq!(merged["area51"].description, "Area 51");
}

#[test]
fn test_chd_flags_and_optionals() {
    let mut rom_record = record("Game", "1990", "Maker");
    rom_record.players = Some("1".to_string());
    rom_record.driver_status = Some("good".to_string());
    let rom = map(vec![("game", rom_record)]);

    let mut chd_record = MachineRecord {
        is_mechanical: true,
        ..MachineRecord::default()
    };
    chd_record.players = Some("2".to_string());
    chd_record.driver_status = Some(String::new());
    let chd = map(vec![("game", chd_record)]);

    let merged = merge_catalogs(rom, chd, MachineMap::new());
    let game = &merged["game"];
    assert!(game.is_mechanical);
    assert!(!game.is_bios);
    assert_eq!(game.players.as_deref(), Some("2"));
    assert_eq!(game.driver_status.as_deref(), Some("good"));
}

#[test]
fn test_new_identifiers_are_inserted_whole() {
    let rom = map(vec![("a", record("A", "", ""))]);
    let chd = map(vec![("b", record("B", "", ""))]);
    let artwork = map(vec![("c", record("C", "", ""))]);

    let merged = merge_catalogs(rom, chd, artwork);
    assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(merged["c"].description, "C");
}

#[test]
fn test_artwork_never_overwrites_present_fields() {
    let rom = map(vec![("sf2", record("", "1991", "Capcom"))]);
    let mut art = record("Street Fighter II (artwork)", "1992", "Someone");
    art.is_bios = true;
    let artwork = map(vec![("sf2", art)]);

    let merged = merge_catalogs(rom, MachineMap::new(), artwork);
    let sf2 = &merged["sf2"];
    // present-but-empty still counts as present
    assert_eq!(sf2.description, "");
    assert_eq!(sf2.year, "1991");
    assert_eq!(sf2.manufacturer, "Capcom");
    assert!(!sf2.is_bios);
}

#[test]
fn test_artwork_fills_absent_optionals() {
    let mut rom_record = record("Galaga", "1981", "Namco");
    rom_record.players = Some("2".to_string());
    let rom = map(vec![("galaga", rom_record)]);

    let mut art = MachineRecord::default();
    art.players = Some("4".to_string());
    art.driver_status = Some("preliminary".to_string());
    art.driver_emulation = Some(String::new());
    let artwork = map(vec![("galaga", art)]);

    let merged = merge_catalogs(rom, MachineMap::new(), artwork);
    let galaga = &merged["galaga"];
    assert_eq!(galaga.players.as_deref(), Some("2"));
    assert_eq!(galaga.driver_status.as_deref(), Some("preliminary"));
    // empty artwork values are not contributed
    assert_eq!(galaga.driver_emulation, None);
}

#[test]
fn test_chd_beats_artwork() {
    let rom = map(vec![("x", record("X", "", ""))]);
    let mut chd = MachineRecord::default();
    chd.driver_status = Some("imperfect".to_string());
    let mut art = MachineRecord::default();
    art.driver_status = Some("good".to_string());

    let merged = merge_catalogs(rom, map(vec![("x", chd)]), map(vec![("x", art)]));
    assert_eq!(merged["x"].driver_status.as_deref(), Some("imperfect"));
}
