use page_dom::{Document, Result};
use shared::domain::NodeId;
use tracing::debug;
use url::Url;

use crate::scroll_spy::{ACTIVE_CLASS, ARIA_CURRENT, NAV_LINK_CLASS};

/// One-shot marker for navigation links pointing at the current page.
///
/// Pure fragment links (`#section`) belong to the scroll spy and are never
/// considered here. External links never match.
pub struct ActiveMenuMarker;

impl ActiveMenuMarker {
    pub fn run(doc: &mut Document, location: &Url) -> Result<Vec<NodeId>> {
        let current = normalize_path(location.path());
        let mut marked = Vec::new();

        for link in doc.query_all(|e| e.has_class(NAV_LINK_CLASS)) {
            let Some(href) = doc.element(link)?.attr("href") else {
                continue;
            };
            if href.is_empty() || href.starts_with('#') {
                continue;
            }
            let Ok(resolved) = location.join(href) else {
                debug!(href, "active_menu: unparseable href");
                continue;
            };
            if resolved.origin() != location.origin() {
                continue;
            }
            if normalize_path(resolved.path()) == current {
                let element = doc.element_mut(link)?;
                element.add_class(ACTIVE_CLASS);
                element.set_attr(ARIA_CURRENT, "page");
                marked.push(link);
            }
        }

        debug!(path = %current, marked = marked.len(), "active_menu: marked");
        Ok(marked)
    }
}

/// Drops a trailing `index.html` and a trailing slash; the root stays `/`.
pub fn normalize_path(path: &str) -> String {
    let path = match path.strip_suffix("index.html") {
        Some(dir) if dir.is_empty() || dir.ends_with('/') => dir,
        _ => path,
    };
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
