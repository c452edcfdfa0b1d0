use serde::{Deserialize, Serialize};

use crate::domain::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

/// Browser events delivered to the page, one at a time, on the UI thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DomEvent {
    Click {
        target: NodeId,
    },
    Blur {
        target: NodeId,
    },
    Input {
        target: NodeId,
        value: String,
    },
    Change {
        target: NodeId,
        checked: bool,
    },
    Submit {
        form: NodeId,
    },
    KeyDown {
        key: String,
    },
    Resize {
        width: u32,
    },
    /// Layout-driven scroll; intersection entries are derived from element geometry.
    Scroll {
        scroll_y: f64,
        viewport_height: f64,
    },
    /// Raw viewport-membership callback, as delivered by an intersection observer.
    Intersection {
        entries: Vec<IntersectionEntry>,
    },
}

impl DomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Blur { .. } => "blur",
            Self::Input { .. } => "input",
            Self::Change { .. } => "change",
            Self::Submit { .. } => "submit",
            Self::KeyDown { .. } => "keydown",
            Self::Resize { .. } => "resize",
            Self::Scroll { .. } => "scroll",
            Self::Intersection { .. } => "intersection",
        }
    }
}

/// Side effects the page asks its host to perform outside the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PageEffect {
    Navigate { href: String },
}
