//! Detail selection inside the details dialog

use std::collections::BTreeMap;

use cyclarc_domain::{CyclarcError, DetailMode, DetailTypeId, EventDetail, Intensity, Result};

/// Working set of selected details for one Symptoms, Drugs or Moods event.
///
/// Saving always submits [`DetailSelection::to_details`], the complete list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSelection {
    mode: DetailMode,
    entries: BTreeMap<DetailTypeId, Option<Intensity>>,
}

impl DetailSelection {
    /// An empty selection.
    pub const fn new(mode: DetailMode) -> Self {
        Self { mode, entries: BTreeMap::new() }
    }

    /// Seed from stored details; unselected entries are ignored.
    pub fn from_details(mode: DetailMode, details: &[EventDetail]) -> Self {
        let entries = details
            .iter()
            .filter(|detail| detail.selected)
            .map(|detail| {
                let value = match mode {
                    DetailMode::Intensity => detail.value,
                    DetailMode::Presence => None,
                };
                (detail.detail_type_id, value)
            })
            .collect();
        Self { mode, entries }
    }

    /// Intensity or presence.
    pub const fn mode(&self) -> DetailMode {
        self.mode
    }

    /// Click on intensity `level` for `detail`.
    ///
    /// Clicking the active level clears the detail, any other level
    /// overwrites it.
    pub fn select_intensity(&mut self, detail: DetailTypeId, level: Intensity) -> Result<()> {
        if self.mode != DetailMode::Intensity {
            return Err(CyclarcError::InvalidInput(format!(
                "detail {detail} records presence, not intensity"
            )));
        }
        if self.entries.get(&detail) == Some(&Some(level)) {
            self.entries.remove(&detail);
        } else {
            self.entries.insert(detail, Some(level));
        }
        Ok(())
    }

    /// Flip presence of `detail`.
    pub fn toggle_presence(&mut self, detail: DetailTypeId) -> Result<()> {
        if self.mode != DetailMode::Presence {
            return Err(CyclarcError::InvalidInput(format!(
                "detail {detail} records an intensity, pick a level"
            )));
        }
        if self.entries.remove(&detail).is_none() {
            self.entries.insert(detail, None);
        }
        Ok(())
    }

    /// Whether `detail` is checked.
    pub fn is_selected(&self, detail: DetailTypeId) -> bool {
        self.entries.contains_key(&detail)
    }

    /// Level chosen for `detail`, `None` when unchecked or presence-only.
    pub fn intensity_of(&self, detail: DetailTypeId) -> Option<Intensity> {
        self.entries.get(&detail).copied().flatten()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selected details.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every selected detail, in catalogue id order.
    pub fn to_details(&self) -> Vec<EventDetail> {
        self.entries
            .iter()
            .map(|(id, value)| EventDetail { detail_type_id: *id, value: *value, selected: true })
            .collect()
    }
}
