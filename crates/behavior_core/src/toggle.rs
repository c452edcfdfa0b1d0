//! Open/close collaborators: the burger menu, the compact header nav and
//! accordion panels. Their state lives entirely in the document.

use page_dom::{Document, Result};
use shared::domain::NodeId;
use tracing::debug;

use crate::scroll_spy::NAV_LINK_CLASS;

pub const ARIA_EXPANDED: &str = "aria-expanded";
const SHOW_CLASS: &str = "show";
const NO_SCROLL_CLASS: &str = "u-no-scroll";
const COMPACT_OPEN_CLASS: &str = "dr-is-open";
const COLLAPSED_CLASS: &str = "collapsed";
const ACCORDION_TARGET_ATTR: &str = "data-bs-target";

pub trait ToggleController {
    fn is_open(&self, doc: &Document) -> bool;
    fn open(&self, doc: &mut Document) -> Result<()>;
    fn close(&self, doc: &mut Document) -> Result<()>;

    fn toggle(&self, doc: &mut Document) -> Result<()> {
        if self.is_open(doc) {
            self.close(doc)
        } else {
            self.open(doc)
        }
    }
}

fn expanded(doc: &Document, node: NodeId) -> bool {
    doc.element(node)
        .map(|e| e.attr(ARIA_EXPANDED) == Some("true"))
        .unwrap_or(false)
}

fn set_expanded(doc: &mut Document, node: NodeId, expanded: bool) -> Result<()> {
    doc.element_mut(node)?
        .set_attr(ARIA_EXPANDED, if expanded { "true" } else { "false" });
    Ok(())
}

/// Burger menu: `.navbar-toggler` drives `.navbar-collapse`.
#[derive(Debug)]
pub struct MenuToggle {
    toggler: NodeId,
    collapse: NodeId,
    header: Option<NodeId>,
    nav_links: Vec<NodeId>,
    body: NodeId,
    desktop_breakpoint_px: u32,
}

impl MenuToggle {
    pub fn install(doc: &Document, desktop_breakpoint_px: u32) -> Option<Self> {
        let toggler = doc.query(|e| e.has_class("navbar-toggler"))?;
        let collapse = doc.query(|e| e.has_class("navbar-collapse"))?;
        Some(Self {
            toggler,
            collapse,
            header: doc.query(|e| e.has_class("l-header")),
            nav_links: doc.query_all(|e| e.has_class(NAV_LINK_CLASS)),
            body: doc.body(),
            desktop_breakpoint_px,
        })
    }

    pub fn toggler(&self) -> NodeId {
        self.toggler
    }

    /// Returns true when the click was consumed by the menu.
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> Result<bool> {
        if doc.contains(self.toggler, target) {
            self.toggle(doc)?;
            return Ok(true);
        }
        if self.nav_links.iter().any(|link| doc.contains(*link, target)) {
            self.close(doc)?;
            return Ok(false);
        }
        if let Some(header) = self.header {
            if self.is_open(doc) && !doc.contains(header, target) {
                debug!("menu: outside click closes menu");
                self.close(doc)?;
            }
        }
        Ok(false)
    }

    pub fn handle_key(&self, doc: &mut Document, key: &str) -> Result<()> {
        if key == "Escape" && self.is_open(doc) {
            self.close(doc)?;
        }
        Ok(())
    }

    /// Called once the resize debounce has settled.
    pub fn handle_resize_settled(&self, doc: &mut Document, width: u32) -> Result<()> {
        if width >= self.desktop_breakpoint_px && self.is_open(doc) {
            debug!(width, "menu: desktop width reached; closing");
            self.close(doc)?;
        }
        Ok(())
    }
}

impl ToggleController for MenuToggle {
    fn is_open(&self, doc: &Document) -> bool {
        doc.element(self.collapse)
            .map(|e| e.has_class(SHOW_CLASS))
            .unwrap_or(false)
    }

    fn open(&self, doc: &mut Document) -> Result<()> {
        doc.element_mut(self.collapse)?.add_class(SHOW_CLASS);
        set_expanded(doc, self.toggler, true)?;
        doc.element_mut(self.body)?.add_class(NO_SCROLL_CLASS);
        Ok(())
    }

    fn close(&self, doc: &mut Document) -> Result<()> {
        doc.element_mut(self.collapse)?.remove_class(SHOW_CLASS);
        set_expanded(doc, self.toggler, false)?;
        doc.element_mut(self.body)?.remove_class(NO_SCROLL_CLASS);
        Ok(())
    }
}

/// Compact header variant: `.dr-header .dr-nav-toggle` opens `.dr-header-inner`.
#[derive(Debug)]
pub struct CompactHeaderToggle {
    toggler: NodeId,
    inner: NodeId,
}

impl CompactHeaderToggle {
    pub fn install(doc: &Document) -> Option<Self> {
        let header = doc.query(|e| e.has_class("dr-header"))?;
        Some(Self {
            toggler: doc.query_within(header, |e| e.has_class("dr-nav-toggle"))?,
            inner: doc.query_within(header, |e| e.has_class("dr-header-inner"))?,
        })
    }

    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> Result<bool> {
        if !doc.contains(self.toggler, target) {
            return Ok(false);
        }
        self.toggle(doc)?;
        Ok(true)
    }
}

impl ToggleController for CompactHeaderToggle {
    fn is_open(&self, doc: &Document) -> bool {
        expanded(doc, self.toggler)
    }

    fn open(&self, doc: &mut Document) -> Result<()> {
        set_expanded(doc, self.toggler, true)?;
        doc.element_mut(self.inner)?.add_class(COMPACT_OPEN_CLASS);
        Ok(())
    }

    fn close(&self, doc: &mut Document) -> Result<()> {
        set_expanded(doc, self.toggler, false)?;
        doc.element_mut(self.inner)?.remove_class(COMPACT_OPEN_CLASS);
        Ok(())
    }
}

/// One accordion button and the panel its `data-bs-target` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccordionPanel {
    pub button: NodeId,
    pub panel: NodeId,
}

impl ToggleController for AccordionPanel {
    fn is_open(&self, doc: &Document) -> bool {
        expanded(doc, self.button)
    }

    fn open(&self, doc: &mut Document) -> Result<()> {
        doc.element_mut(self.panel)?.add_class(SHOW_CLASS);
        doc.element_mut(self.button)?.remove_class(COLLAPSED_CLASS);
        set_expanded(doc, self.button, true)
    }

    fn close(&self, doc: &mut Document) -> Result<()> {
        doc.element_mut(self.panel)?.remove_class(SHOW_CLASS);
        doc.element_mut(self.button)?.add_class(COLLAPSED_CLASS);
        set_expanded(doc, self.button, false)
    }
}

#[derive(Debug)]
pub struct Accordion {
    buttons: Vec<NodeId>,
}

impl Accordion {
    pub fn install(doc: &Document) -> Option<Self> {
        let buttons = doc.query_all(|e| e.has_class("accordion-button"));
        if buttons.is_empty() {
            return None;
        }
        Some(Self { buttons })
    }

    /// Resolves the panel at click time; a button whose target is missing
    /// does nothing.
    pub fn panel_for(&self, doc: &Document, target: NodeId) -> Option<AccordionPanel> {
        let button = self
            .buttons
            .iter()
            .copied()
            .find(|button| doc.contains(*button, target))?;
        let selector = doc.element(button).ok()?.attr(ACCORDION_TARGET_ATTR)?;
        let panel = doc.get_element_by_id(selector.strip_prefix('#')?)?;
        Some(AccordionPanel { button, panel })
    }

    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> Result<bool> {
        let Some(panel) = self.panel_for(doc, target) else {
            return Ok(false);
        };
        panel.toggle(doc)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tests/toggle_tests.rs"]
mod tests;
