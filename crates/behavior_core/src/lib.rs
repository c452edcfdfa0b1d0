//! Client-side behaviors for a static marketing page: form validation,
//! scroll-linked navigation highlighting, and the menu/accordion toggles.

use shared::error::DomError;
use thiserror::Error;

pub mod active_menu;
pub mod config;
mod page;
pub mod rules;
pub mod scroll_spy;
pub mod timers;
pub mod toggle;
pub mod validation;
pub mod viewport;

pub use config::BehaviorConfig;
pub use page::Page;
pub use validation::{SubmitOutcome, ValidationEngine};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid page location '{location}': {source}")]
    InvalidLocation {
        location: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Dom(#[from] DomError),
}
