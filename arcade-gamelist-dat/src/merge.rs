//! Combining the ROM, CHD and artwork catalogs into one machine set.
//!
//! Priority is ROM > CHD > artwork. CHD values overwrite ROM values whenever
//! they are non-empty; artwork values only fill fields the merged record
//! doesn't have at all.

use std::collections::btree_map::Entry;

use crate::catalog::{MachineMap, MachineRecord};

/// Merge the three per-source catalogs.
pub fn merge_catalogs(rom: MachineMap, chd: MachineMap, artwork: MachineMap) -> MachineMap {
    let mut merged = rom;

    for (name, record) in chd {
        match merged.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => slot.get_mut().overlay_truthy(&record),
        }
    }

    for (name, record) in artwork {
        match merged.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => slot.get_mut().fill_absent(&record),
        }
    }

    merged
}

impl MachineRecord {
    /// Overwrite fields with every non-empty / `true` value of `other`.
    pub fn overlay_truthy(&mut self, other: &MachineRecord) {
        overlay_text(&mut self.description, &other.description);
        overlay_text(&mut self.year, &other.year);
        overlay_text(&mut self.manufacturer, &other.manufacturer);
        self.is_bios |= other.is_bios;
        self.is_mechanical |= other.is_mechanical;
        self.is_device |= other.is_device;
        overlay_optional(&mut self.players, &other.players);
        overlay_optional(&mut self.driver_status, &other.driver_status);
        overlay_optional(&mut self.driver_emulation, &other.driver_emulation);
    }

    /// Fill fields this record lacks with non-empty values of `other`.
    ///
    /// Text fields and flags always exist on a parsed record, so only the
    /// optional fields can be contributed.
    pub fn fill_absent(&mut self, other: &MachineRecord) {
        fill_optional(&mut self.players, &other.players);
        fill_optional(&mut self.driver_status, &other.driver_status);
        fill_optional(&mut self.driver_emulation, &other.driver_emulation);
    }
}

fn overlay_text(target: &mut String, value: &str) {
    if !value.is_empty() {
        *target = value.to_string();
    }
}

fn overlay_optional(target: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        *target = Some(v.to_string());
    }
}

fn fill_optional(target: &mut Option<String>, value: &Option<String>) {
    if target.is_none() {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            *target = Some(v.to_string());
        }
    }
}

#[cfg(test)]
#[path = "tests/merge_tests.rs"]
mod tests;
