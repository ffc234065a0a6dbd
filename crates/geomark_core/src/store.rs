//! In-memory marker list.

use crate::marker::Marker;

/// Index of a marker in its store.
pub type MarkerId = usize;

/// Ordered, append-only collection of the markers placed this session.
///
/// Nothing is deduplicated: two markers with the same position and fields
/// are stored (and drawn) twice.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker and return its id.
    pub fn push(&mut self, marker: Marker) -> MarkerId {
        let id = self.markers.len();
        log::debug!("Stored marker {} '{}' at {}", id, marker.title, marker.position);
        self.markers.push(marker);
        id
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// Iterate in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
