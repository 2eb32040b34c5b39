//! Address labels.
//!
//! A [`LabelMap`] is seeded from named groups in a [`LabelLibrary`] (ROM entry
//! points, zero-page locations and the like), then [`resolve_labels`] adds an
//! `Lnnnn` name for every referenced address inside the decoded window that
//! does not already have one.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::instruction::Instruction;
use crate::DisassembleError;

/// Group keyword selecting every group in a library.
pub const ALL_GROUPS: &str = "All";

/// Group keyword selecting no groups.
pub const NO_GROUPS: &str = "None";

/// Address to label name. The first name recorded for an address wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    names: BTreeMap<u16, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: u16) -> Option<&str> {
        self.names.get(&address).map(String::as_str)
    }

    pub fn contains(&self, address: u16) -> bool {
        self.names.contains_key(&address)
    }

    /// Record `name` unless the address is already labelled. Returns whether
    /// the name was recorded.
    pub fn insert_if_absent(&mut self, address: u16, name: impl Into<String>) -> bool {
        match self.names.entry(address) {
            Entry::Vacant(slot) => {
                slot.insert(name.into());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Labels in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        self.names.iter().map(|(addr, name)| (*addr, name.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(u16, S)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (u16, S)>>(iter: I) -> Self {
        let mut map = LabelMap::new();
        for (address, name) in iter {
            map.insert_if_absent(address, name);
        }
        map
    }
}

/// Named groups of well-known addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelLibrary {
    groups: BTreeMap<String, BTreeMap<u16, String>>,
}

impl LabelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` at `address` to `group`, creating the group if needed.
    /// A later name for the same address in the same group replaces the
    /// earlier one.
    pub fn insert(&mut self, group: impl Into<String>, name: impl Into<String>, address: u16) {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(address, name.into());
    }

    /// Like [`insert`](Self::insert) with the address given as text
    /// (`$FDED`, `0xFDED` or `65005`).
    pub fn insert_parsed(
        &mut self,
        group: impl Into<String>,
        name: impl Into<String>,
        address: &str,
    ) -> Result<(), DisassembleError> {
        let address = parse_address(address)?;
        self.insert(group, name, address);
        Ok(())
    }

    pub fn group(&self, name: &str) -> Option<&BTreeMap<u16, String>> {
        self.groups.get(name)
    }

    /// Group names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Resolve requested group names, expanding [`ALL_GROUPS`] and dropping
    /// [`NO_GROUPS`]. Order is preserved and duplicates are removed.
    ///
    /// # Errors
    ///
    /// Returns [`DisassembleError::UnknownLabelGroup`] for a name that is not
    /// in the library.
    pub fn select<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<&str>, DisassembleError> {
        let mut selected: Vec<&str> = Vec::new();
        for name in requested.iter().map(AsRef::as_ref) {
            if name.eq_ignore_ascii_case(NO_GROUPS) {
                continue;
            }
            if name.eq_ignore_ascii_case(ALL_GROUPS) {
                for group in self.names() {
                    if !selected.contains(&group) {
                        selected.push(group);
                    }
                }
                continue;
            }
            let (group, _) = self
                .groups
                .get_key_value(name)
                .ok_or_else(|| DisassembleError::UnknownLabelGroup(name.to_string()))?;
            if !selected.contains(&group.as_str()) {
                selected.push(group);
            }
        }
        Ok(selected)
    }

    /// Build a label map from the requested groups. Earlier groups win when
    /// two name the same address.
    pub fn seed<S: AsRef<str>>(&self, requested: &[S]) -> Result<LabelMap, DisassembleError> {
        let mut labels = LabelMap::new();
        for group in self.select(requested)? {
            if let Some(entries) = self.groups.get(group) {
                for (address, name) in entries {
                    labels.insert_if_absent(*address, name.clone());
                }
            }
        }
        Ok(labels)
    }
}

/// Parse an address written as `$801`, `0x801` or `2049`.
///
/// # Errors
///
/// Returns [`DisassembleError::InvalidAddress`] for malformed text or a value
/// above `$FFFF`.
///
/// # Examples
///
/// ```
/// use retrodis::parse_address;
///
/// assert_eq!(parse_address("$801").unwrap(), 0x0801);
/// assert_eq!(parse_address("0x801").unwrap(), 0x0801);
/// assert_eq!(parse_address("2049").unwrap(), 0x0801);
/// assert!(parse_address("$10000").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<u16, DisassembleError> {
    let trimmed = text.trim();
    let parsed = if let Some(hex) = trimmed.strip_prefix('$') {
        u16::from_str_radix(hex, 16)
    } else if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u16>()
    };
    parsed.map_err(|_| DisassembleError::InvalidAddress(text.to_string()))
}

/// Auto-generated label for an address.
pub fn auto_label(address: u16) -> String {
    format!("L{:04X}", address)
}

/// Label every address referenced by an instruction that falls within
/// `length` bytes of `base`, keeping any name already in `seed`.
///
/// Only the first address-bearing operand of each instruction is considered.
/// The window is measured with 16-bit wraparound, so a window starting at
/// `$FF00` covers `$0000` onwards when it runs past `$FFFF`.
pub fn resolve_labels(
    instructions: &[Instruction],
    base: u16,
    length: usize,
    seed: LabelMap,
) -> LabelMap {
    let mut labels = seed;
    for address in instructions.iter().filter_map(Instruction::operand_address) {
        if (address.wrapping_sub(base) as usize) < length {
            labels.insert_if_absent(address, auto_label(address));
        }
    }
    labels
}
