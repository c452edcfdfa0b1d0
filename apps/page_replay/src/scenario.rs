//! Scripted replay: element-id based steps are resolved against the page and
//! delivered as browser events; `wait` steps move the virtual clock.

use std::time::Duration;

use anyhow::{anyhow, Context};
use behavior_core::{
    scroll_spy::{ACTIVE_CLASS, NAV_LINK_CLASS},
    validation::{FEEDBACK_CLASS, FEEDBACK_VISIBLE_CLASS, INVALID_CLASS},
    Page,
};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{NodeId, SubmissionState},
    protocol::{DomEvent, PageEffect},
};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Click { id: String },
    Blur { id: String },
    /// Replaces the control's value, as one `input` event.
    Type { id: String, value: String },
    Check {
        id: String,
        #[serde(default = "default_checked")]
        checked: bool,
    },
    Submit { id: String },
    Key { key: String },
    Resize { width: u32 },
    Scroll { y: f64, viewport_height: f64 },
    Wait { ms: u64 },
}

fn default_checked() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Wall-clock speed-up for `wait` steps. Zero skips sleeping entirely.
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub elapsed_ms: u64,
    pub submission_state: SubmissionState,
    pub effects: Vec<PageEffect>,
    pub active_links: Vec<String>,
    pub visible_errors: Vec<FieldError>,
}

/// Maps a step onto the event it stands for. `Wait` has no event.
pub fn resolve_step(page: &Page, step: &Step) -> anyhow::Result<Option<DomEvent>> {
    let node = |id: &str| -> anyhow::Result<NodeId> {
        page.document()
            .get_element_by_id(id)
            .ok_or_else(|| anyhow!("no element with id '{id}'"))
    };
    let event = match step {
        Step::Click { id } => DomEvent::Click { target: node(id)? },
        Step::Blur { id } => DomEvent::Blur { target: node(id)? },
        Step::Type { id, value } => DomEvent::Input {
            target: node(id)?,
            value: value.clone(),
        },
        Step::Check { id, checked } => DomEvent::Change {
            target: node(id)?,
            checked: *checked,
        },
        Step::Submit { id } => DomEvent::Submit { form: node(id)? },
        Step::Key { key } => DomEvent::KeyDown { key: key.clone() },
        Step::Resize { width } => DomEvent::Resize { width: *width },
        Step::Scroll { y, viewport_height } => DomEvent::Scroll {
            scroll_y: *y,
            viewport_height: *viewport_height,
        },
        Step::Wait { .. } => return Ok(None),
    };
    Ok(Some(event))
}

pub async fn run_scenario(
    page: &mut Page,
    steps: &[Step],
    options: ReplayOptions,
) -> anyhow::Result<ReplayReport> {
    let started_at = page.now_ms();
    for (index, step) in steps.iter().enumerate() {
        if let Step::Wait { ms } = step {
            if options.speed > 0.0 {
                let real_ms = (*ms as f64 / options.speed).round() as u64;
                tokio::time::sleep(Duration::from_millis(real_ms)).await;
            }
            page.advance_by(*ms);
            debug!(step = index, now_ms = page.now_ms(), "replay: waited");
            continue;
        }
        let event = resolve_step(page, step)
            .with_context(|| format!("step {index} ({step:?}) could not be resolved"))?;
        if let Some(event) = event {
            debug!(step = index, event = event.name(), "replay: dispatching");
            page.dispatch(event);
        }
    }

    let report = ReplayReport {
        steps: steps.len(),
        elapsed_ms: page.now_ms() - started_at,
        submission_state: page.submission_state(),
        effects: page.take_effects(),
        active_links: active_links(page),
        visible_errors: visible_errors(page),
    };
    info!(
        steps = report.steps,
        effects = report.effects.len(),
        errors = report.visible_errors.len(),
        "replay: finished"
    );
    Ok(report)
}

fn active_links(page: &Page) -> Vec<String> {
    let doc = page.document();
    doc.query_all(|e| e.has_class(NAV_LINK_CLASS) && e.has_class(ACTIVE_CLASS))
        .into_iter()
        .filter_map(|node| doc.element(node).ok()?.attr("href").map(str::to_string))
        .collect()
}

/// Shown error messages in document order, each with the id of the invalid
/// control that shares its container.
fn visible_errors(page: &Page) -> Vec<FieldError> {
    let doc = page.document();
    doc.query_all(|e| e.has_class(FEEDBACK_CLASS) && e.has_class(FEEDBACK_VISIBLE_CLASS))
        .into_iter()
        .filter_map(|slot| {
            let message = doc.element(slot).ok()?.text().to_string();
            let field = doc
                .parent(slot)
                .and_then(|container| {
                    doc.query_within(container, |e| e.has_class(INVALID_CLASS))
                })
                .and_then(|field| doc.element(field).ok()?.id().map(str::to_string));
            Some(FieldError { field, message })
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod tests;
