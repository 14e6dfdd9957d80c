#![forbid(unsafe_code)]

//! Collision strategies for resolving the pointer to a drop-target key.
//!
//! The rendering adapter republishes one [`DropZone`] per draggable or
//! droppable element after every layout pass: item cards, container columns,
//! and the synthetic whitespace zones. The two strategies differ by drag
//! kind:
//!
//! - **pointer-within** (item drags): the zone actually under the pointer;
//!   when zones nest (an item card inside its column), the smallest area
//!   wins. Items must be insertable between precise siblings, so exact
//!   containment is required.
//! - **closest-corner** (container drags): the zone whose nearest corner is
//!   closest to the pointer. Columns are large regions; demanding exact
//!   containment mid-drag makes wide drags feel dead.

use crate::geometry::{Point, Rect};

/// A registered drop zone: the raw adapter key plus its element bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DropZone {
    pub key: String,
    pub rect: Rect,
}

/// The set of drop zones published by the adapter for the current layout.
///
/// Registration order is preserved and breaks closest-corner ties, so
/// adapters should register in render order (top-left first).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneMap {
    zones: Vec<DropZone>,
}

impl ZoneMap {
    /// Create an empty zone map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone, replacing any prior registration of the same key.
    pub fn insert(&mut self, key: impl Into<String>, rect: Rect) {
        let key = key.into();
        if let Some(existing) = self.zones.iter_mut().find(|z| z.key == key) {
            existing.rect = rect;
        } else {
            self.zones.push(DropZone { key, rect });
        }
    }

    /// Drop all registrations (layout invalidated).
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Number of registered zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether no zones are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Bounds registered for a key, if any.
    #[must_use]
    pub fn rect_of(&self, key: &str) -> Option<Rect> {
        self.zones.iter().find(|z| z.key == key).map(|z| z.rect)
    }

    /// Pointer-containment strategy: the smallest zone containing the point.
    ///
    /// `accept` filters candidate keys (e.g. exclude the dragged element
    /// itself so it doesn't occlude what's underneath).
    #[must_use]
    pub fn hit_pointer_within<F>(&self, p: Point, accept: F) -> Option<&str>
    where
        F: Fn(&str) -> bool,
    {
        self.zones
            .iter()
            .filter(|z| !z.rect.is_empty() && z.rect.contains(p) && accept(&z.key))
            .min_by(|a, b| a.rect.area().total_cmp(&b.rect.area()))
            .map(|z| z.key.as_str())
    }

    /// Closest-corner strategy: the accepted zone whose nearest corner is
    /// closest to the point. Ties keep the earliest registration.
    #[must_use]
    pub fn hit_closest_corner<F>(&self, p: Point, accept: F) -> Option<&str>
    where
        F: Fn(&str) -> bool,
    {
        let mut best: Option<(&DropZone, f32)> = None;
        for zone in self.zones.iter().filter(|z| !z.rect.is_empty()) {
            if !accept(&zone.key) {
                continue;
            }
            let d = zone.rect.corner_distance_sq(p);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((zone, d)),
            }
        }
        best.map(|(z, _)| z.key.as_str())
    }
}
