use log::debug;

use crate::edit::{EditRef, PastedRegion, StrokeAction};

/// The ordered store of every edit in the session.
///
/// Strokes and pasted regions live in two append-ordered collections; the
/// merged chronological order is reconstructed on demand by sorting the
/// union by id. No operation ever reorders entries, and ids are unique
/// within the merged set because they come from one shared counter.
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    strokes: Vec<StrokeAction>,
    regions: Vec<PastedRegion>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[StrokeAction] {
        &self.strokes
    }

    pub fn regions(&self) -> &[PastedRegion] {
        &self.regions
    }

    pub fn add_stroke(&mut self, stroke: StrokeAction) {
        debug!("edit log: add stroke {} ({:?})", stroke.id(), stroke.tool());
        self.strokes.push(stroke);
    }

    pub fn add_region(&mut self, region: PastedRegion) {
        debug!("edit log: add region {}", region.id());
        self.regions.push(region);
    }

    pub fn remove_stroke(&mut self, index: usize) -> Option<StrokeAction> {
        if index < self.strokes.len() {
            Some(self.strokes.remove(index))
        } else {
            None
        }
    }

    pub fn remove_region(&mut self, index: usize) -> Option<PastedRegion> {
        if index < self.regions.len() {
            Some(self.regions.remove(index))
        } else {
            None
        }
    }

    /// Replace a stroke in place, keeping its slot. The replacement keeps
    /// the original id so history order is untouched.
    pub fn replace_stroke(&mut self, index: usize, stroke: StrokeAction) {
        if let Some(slot) = self.strokes.get_mut(index) {
            debug_assert_eq!(slot.id(), stroke.id(), "replace must not change the id");
            *slot = stroke;
        }
    }

    pub fn replace_region(&mut self, index: usize, region: PastedRegion) {
        if let Some(slot) = self.regions.get_mut(index) {
            debug_assert_eq!(slot.id(), region.id(), "replace must not change the id");
            *slot = region;
        }
    }

    pub fn stroke_by_id(&self, id: u64) -> Option<&StrokeAction> {
        self.strokes.iter().find(|s| s.id() == id)
    }

    pub fn stroke_by_id_mut(&mut self, id: u64) -> Option<&mut StrokeAction> {
        self.strokes.iter_mut().find(|s| s.id() == id)
    }

    pub fn region_by_id(&self, id: u64) -> Option<&PastedRegion> {
        self.regions.iter().find(|r| r.id() == id)
    }

    pub fn region_by_id_mut(&mut self, id: u64) -> Option<&mut PastedRegion> {
        self.regions.iter_mut().find(|r| r.id() == id)
    }

    /// Remove whichever edit carries `id`, from either collection.
    pub fn remove_by_id(&mut self, id: u64) -> bool {
        if let Some(index) = self.strokes.iter().position(|s| s.id() == id) {
            self.strokes.remove(index);
            debug!("edit log: removed stroke {id}");
            return true;
        }
        if let Some(index) = self.regions.iter().position(|r| r.id() == id) {
            self.regions.remove(index);
            debug!("edit log: removed region {id}");
            return true;
        }
        false
    }

    /// Both collections merged and sorted oldest-first by id: the painter's
    /// order the compositor applies. Reverse it for hit-test priority.
    pub fn chronological(&self) -> Vec<EditRef<'_>> {
        let mut merged: Vec<EditRef<'_>> = self
            .strokes
            .iter()
            .map(EditRef::Stroke)
            .chain(self.regions.iter().map(EditRef::Region))
            .collect();
        merged.sort_by_key(|edit| edit.id());
        merged
    }

    /// Remove the single most recently created edit across both collections.
    /// Returns its id, or `None` on an empty log (a no-op, not an error).
    pub fn undo(&mut self) -> Option<u64> {
        let newest = self
            .strokes
            .iter()
            .map(|s| s.id())
            .chain(self.regions.iter().map(|r| r.id()))
            .max()?;
        self.remove_by_id(newest);
        debug!("edit log: undo removed {newest}");
        Some(newest)
    }

    pub fn len(&self) -> usize {
        self.strokes.len() + self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.regions.clear();
    }
}
