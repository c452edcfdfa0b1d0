//! Scroll-linked navigation highlighting.
//!
//! The tracker is a reducer over viewport-membership entries: every section
//! entering the band clears the current designation from all tracked links
//! and hands it to the link pointing at that section. Sections and links are
//! captured once at install time.

use page_dom::{Document, Result};
use shared::{domain::NodeId, protocol::IntersectionEntry};
use tracing::debug;

pub const NAV_LINK_CLASS: &str = "nav-link";
pub const ACTIVE_CLASS: &str = "active";
pub const ARIA_CURRENT: &str = "aria-current";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub node: NodeId,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpyLink {
    pub node: NodeId,
    /// Fragment target without the leading `#`.
    pub target: String,
}

#[derive(Debug)]
pub struct ScrollSpyTracker {
    sections: Vec<Section>,
    links: Vec<SpyLink>,
    active: Option<NodeId>,
}

impl ScrollSpyTracker {
    /// Returns `None` when the page has no identified elements or no
    /// in-page navigation links.
    pub fn install(doc: &Document) -> Option<Self> {
        let sections: Vec<Section> = doc
            .query_all(|e| e.id().is_some())
            .into_iter()
            .filter_map(|node| {
                let id = doc.element(node).ok()?.id()?.to_string();
                Some(Section { node, id })
            })
            .collect();
        let links: Vec<SpyLink> = doc
            .query_all(|e| e.has_class(NAV_LINK_CLASS))
            .into_iter()
            .filter_map(|node| {
                let href = doc.element(node).ok()?.attr("href")?;
                let target = href.strip_prefix('#')?.to_string();
                Some(SpyLink { node, target })
            })
            .collect();

        if sections.is_empty() || links.is_empty() {
            debug!(
                sections = sections.len(),
                links = links.len(),
                "scroll_spy: nothing to track"
            );
            return None;
        }
        debug!(
            sections = sections.len(),
            links = links.len(),
            "scroll_spy: installed"
        );
        Some(Self {
            sections,
            links,
            active: None,
        })
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_nodes(&self) -> Vec<NodeId> {
        self.sections.iter().map(|s| s.node).collect()
    }

    pub fn links(&self) -> &[SpyLink] {
        &self.links
    }

    pub fn active_link(&self) -> Option<NodeId> {
        self.active
    }

    /// Applies entries in delivery order; the last section to enter wins.
    pub fn apply(&mut self, doc: &mut Document, entries: &[IntersectionEntry]) -> Result<()> {
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            let Some(section) = self.sections.iter().find(|s| s.node == entry.target) else {
                debug!(node = entry.target.0, "scroll_spy: entry for untracked element");
                continue;
            };
            let id = section.id.clone();
            self.mark_section(doc, &id)?;
        }
        Ok(())
    }

    /// Clears every tracked link, then marks the first link targeting
    /// `section_id`. Sections without a link leave the links untouched.
    pub fn mark_section(
        &mut self,
        doc: &mut Document,
        section_id: &str,
    ) -> Result<Option<NodeId>> {
        let Some(link) = self
            .links
            .iter()
            .find(|link| link.target == section_id)
            .map(|link| link.node)
        else {
            return Ok(None);
        };

        for tracked in &self.links {
            let element = doc.element_mut(tracked.node)?;
            element.remove_class(ACTIVE_CLASS);
            element.remove_attr(ARIA_CURRENT);
        }
        let element = doc.element_mut(link)?;
        element.add_class(ACTIVE_CLASS);
        element.set_attr(ARIA_CURRENT, "page");

        if self.active != Some(link) {
            debug!(section = section_id, link = link.0, "scroll_spy: active link moved");
        }
        self.active = Some(link);
        Ok(Some(link))
    }
}

#[cfg(test)]
#[path = "tests/scroll_spy_tests.rs"]
mod tests;
