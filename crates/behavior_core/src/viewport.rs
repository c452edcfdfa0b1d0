//! Viewport-membership source: turns scroll positions and element geometry
//! into `(section, is_intersecting)` transitions.

use std::collections::HashMap;

use page_dom::Document;
use shared::{
    domain::{NodeId, Rect},
    protocol::IntersectionEntry,
};

use crate::config::BehaviorConfig;

/// Horizontal strip of the viewport that counts as "being read".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationBand {
    pub top_offset_px: f64,
    pub bottom_percent: f64,
}

impl ObservationBand {
    pub fn from_config(config: &BehaviorConfig) -> Self {
        Self {
            top_offset_px: config.spy_top_offset_px,
            bottom_percent: config.spy_band_bottom_percent,
        }
    }

    /// Band edges in viewport coordinates.
    pub fn bounds(&self, viewport_height: f64) -> (f64, f64) {
        let bottom = viewport_height * self.bottom_percent.clamp(0.0, 100.0) / 100.0;
        (self.top_offset_px.max(0.0), bottom)
    }

    /// `rect` is in viewport coordinates.
    pub fn intersects(&self, rect: Rect, viewport_height: f64) -> bool {
        let (top, bottom) = self.bounds(viewport_height);
        top < bottom && rect.top < bottom && rect.bottom > top
    }
}

#[derive(Debug)]
pub struct ViewportObserver {
    band: ObservationBand,
    targets: Vec<NodeId>,
    intersecting: HashMap<NodeId, bool>,
}

impl ViewportObserver {
    pub fn new(band: ObservationBand, targets: Vec<NodeId>) -> Self {
        Self {
            band,
            targets,
            intersecting: HashMap::new(),
        }
    }

    pub fn band(&self) -> ObservationBand {
        self.band
    }

    /// Entries for targets whose membership changed since the last call. The
    /// first observation of a target always produces an entry. Targets
    /// without layout are not observed.
    pub fn observe(
        &mut self,
        doc: &Document,
        scroll_y: f64,
        viewport_height: f64,
    ) -> Vec<IntersectionEntry> {
        let mut entries = Vec::new();
        for &target in &self.targets {
            let Some(layout) = doc.element(target).ok().and_then(|e| e.layout()) else {
                continue;
            };
            let in_viewport = Rect {
                top: layout.top - scroll_y,
                bottom: layout.bottom - scroll_y,
            };
            let is_intersecting = self.band.intersects(in_viewport, viewport_height);
            if self.intersecting.insert(target, is_intersecting) != Some(is_intersecting) {
                entries.push(IntersectionEntry {
                    target,
                    is_intersecting,
                });
            }
        }
        entries
    }
}
