//! Form validation: per-field annotation on blur/input/change, and the
//! all-fields pass on submit.

use page_dom::{Document, Element, Result};
use shared::domain::{FieldKind, NodeId, SubmissionState, Validity};
use tracing::{debug, info};

use crate::{
    config::BehaviorConfig,
    rules::{evaluate_consent, evaluate_field, FieldInput, FieldValue},
};

pub const INVALID_CLASS: &str = "is-invalid";
pub const FEEDBACK_CLASS: &str = "invalid-feedback";
pub const FEEDBACK_VISIBLE_CLASS: &str = "d-block";

const FIELD_CONTAINER_CLASSES: [&str; 3] = ["mb-3", "mb-4", "form-check"];
const CHECKBOX_CONTAINER_CLASSES: [&str; 1] = ["form-check"];

/// Inline error element owned by a field's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorSlot {
    pub container: NodeId,
    pub element: NodeId,
}

impl ErrorSlot {
    fn show(&self, doc: &mut Document, validity: &Validity) -> Result<()> {
        let element = doc.element_mut(self.element)?;
        match validity.message() {
            Some(message) => {
                element.set_text(message);
                element.add_class(FEEDBACK_VISIBLE_CLASS);
            }
            None => element.remove_class(FEEDBACK_VISIBLE_CLASS),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Every invalid control, fields first then the consent checkbox.
    Rejected { invalid: Vec<NodeId> },
    Submitting { href: String, delay_ms: u64 },
    /// A submission is already under way.
    Ignored,
}

#[derive(Debug)]
pub struct ValidationEngine {
    form: NodeId,
    fields: Vec<NodeId>,
    consent: Option<NodeId>,
    submit_button: Option<NodeId>,
    submit_content: Option<String>,
    state: SubmissionState,
    submit_delay_ms: u64,
    success_href: String,
    busy_label: String,
}

impl ValidationEngine {
    /// Captures the form and its controls. Returns `None` when the page has
    /// no such form.
    pub fn install(doc: &Document, config: &BehaviorConfig) -> Option<Self> {
        let form = doc.get_element_by_id(&config.form_id)?;
        let fields = doc.query_all_within(form, |e| {
            matches!(
                field_kind(e),
                Some(kind) if kind != FieldKind::Checkbox
            )
        });
        let consent = doc
            .get_element_by_id(&config.consent_id)
            .filter(|node| doc.contains(form, *node));
        let submit_button = doc.query_within(form, |e| {
            e.tag() == "button" && e.attr("type") == Some("submit")
        });

        debug!(
            form_id = %config.form_id,
            fields = fields.len(),
            has_consent = consent.is_some(),
            has_submit = submit_button.is_some(),
            "validation: installed"
        );

        Some(Self {
            form,
            fields,
            consent,
            submit_button,
            submit_content: None,
            state: SubmissionState::Idle,
            submit_delay_ms: config.submit_delay_ms,
            success_href: config.success_href.clone(),
            busy_label: config.busy_label.clone(),
        })
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn fields(&self) -> &[NodeId] {
        &self.fields
    }

    pub fn consent(&self) -> Option<NodeId> {
        self.consent
    }

    pub fn submit_button(&self) -> Option<NodeId> {
        self.submit_button
    }

    /// Markup the submit button showed before it switched to the busy indicator.
    pub fn original_submit_content(&self) -> Option<&str> {
        self.submit_content.as_deref()
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Computes the field's validity from its current value without touching
    /// the document.
    pub fn evaluate(doc: &Document, field: NodeId) -> Result<Validity> {
        let element = doc.element(field)?;
        let kind = field_kind(element).unwrap_or(FieldKind::Text);
        let value = if kind == FieldKind::Checkbox {
            FieldValue::Checked(element.checked())
        } else {
            FieldValue::Text(element.value())
        };
        Ok(evaluate_field(&FieldInput {
            id: element.id(),
            kind,
            required: element.is_required(),
            value,
        }))
    }

    /// Validates `field` and mirrors the outcome into the document.
    pub fn validate_field(&self, doc: &mut Document, field: NodeId) -> Result<bool> {
        let validity = Self::evaluate(doc, field)?;
        annotate(doc, field, &validity, &FIELD_CONTAINER_CLASSES)?;
        Ok(validity.is_valid())
    }

    pub fn validate_checkbox(&self, doc: &mut Document, checkbox: NodeId) -> Result<bool> {
        let validity = evaluate_consent(doc.element(checkbox)?.checked());
        annotate(doc, checkbox, &validity, &CHECKBOX_CONTAINER_CLASSES)?;
        Ok(validity.is_valid())
    }

    /// Returns the field's inline error element, creating it inside the
    /// field's container on first use. `None` when the field has no container.
    pub fn ensure_error_slot(doc: &mut Document, field: NodeId) -> Result<Option<ErrorSlot>> {
        let is_checkbox = field_kind(doc.element(field)?) == Some(FieldKind::Checkbox);
        let containers: &[&str] = if is_checkbox {
            &CHECKBOX_CONTAINER_CLASSES
        } else {
            &FIELD_CONTAINER_CLASSES
        };
        ensure_slot_in(doc, field, containers)
    }

    /// Blur always validates a tracked field. Returns `None` for other targets.
    pub fn handle_blur(&mut self, doc: &mut Document, target: NodeId) -> Result<Option<bool>> {
        if !self.accepts_field_events(target) {
            return Ok(None);
        }
        self.validate_field(doc, target).map(Some)
    }

    /// Input re-validates only while the field is showing an error.
    pub fn handle_input(&mut self, doc: &mut Document, target: NodeId) -> Result<Option<bool>> {
        if !self.accepts_field_events(target) || !doc.element(target)?.has_class(INVALID_CLASS) {
            return Ok(None);
        }
        self.validate_field(doc, target).map(Some)
    }

    pub fn handle_change(&mut self, doc: &mut Document, target: NodeId) -> Result<Option<bool>> {
        if self.state == SubmissionState::Submitting || self.consent != Some(target) {
            return Ok(None);
        }
        self.validate_checkbox(doc, target).map(Some)
    }

    /// Validates every control without short-circuiting, then either rejects
    /// the submission or switches the submit button to its busy state.
    pub fn submit(&mut self, doc: &mut Document) -> Result<SubmitOutcome> {
        if self.state == SubmissionState::Submitting {
            debug!("validation: submit ignored while submitting");
            return Ok(SubmitOutcome::Ignored);
        }
        self.state = SubmissionState::Validating;

        let mut invalid = Vec::new();
        for &field in &self.fields {
            if !self.validate_field(doc, field)? {
                invalid.push(field);
            }
        }
        if let Some(consent) = self.consent {
            if !self.validate_checkbox(doc, consent)? {
                invalid.push(consent);
            }
        }

        if !invalid.is_empty() {
            self.state = SubmissionState::Rejected;
            info!(invalid = invalid.len(), "validation: submission rejected");
            return Ok(SubmitOutcome::Rejected { invalid });
        }

        if let Some(button) = self.submit_button {
            let busy = busy_markup(&self.busy_label);
            let element = doc.element_mut(button)?;
            self.submit_content = Some(element.text().to_string());
            element.set_disabled(true);
            element.set_text(busy);
        }
        self.state = SubmissionState::Submitting;
        info!(
            href = %self.success_href,
            delay_ms = self.submit_delay_ms,
            "validation: submitting"
        );
        Ok(SubmitOutcome::Submitting {
            href: self.success_href.clone(),
            delay_ms: self.submit_delay_ms,
        })
    }

    fn accepts_field_events(&self, target: NodeId) -> bool {
        self.state != SubmissionState::Submitting && self.fields.contains(&target)
    }
}

pub fn field_kind(element: &Element) -> Option<FieldKind> {
    FieldKind::from_control(element.tag(), element.attr("type"))
}

fn busy_markup(label: &str) -> String {
    format!(
        r#"<span class="spinner-border spinner-border-sm" role="status" aria-hidden="true"></span> {label}"#
    )
}

fn annotate(
    doc: &mut Document,
    field: NodeId,
    validity: &Validity,
    containers: &[&str],
) -> Result<()> {
    let slot = ensure_slot_in(doc, field, containers)?;
    doc.element_mut(field)?
        .toggle_class(INVALID_CLASS, !validity.is_valid());
    match slot {
        Some(slot) => slot.show(doc, validity),
        None => {
            debug!(field = field.0, "validation: no error container; annotation skipped");
            Ok(())
        }
    }
}

fn ensure_slot_in(
    doc: &mut Document,
    field: NodeId,
    containers: &[&str],
) -> Result<Option<ErrorSlot>> {
    let Some(container) = doc.closest(field, |e| e.has_any_class(containers)) else {
        return Ok(None);
    };
    let existing = doc.query_within(container, |e| e.has_class(FEEDBACK_CLASS));
    let element = match existing {
        Some(element) => element,
        None => doc.append_element(container, Element::new("div").with_class(FEEDBACK_CLASS))?,
    };
    Ok(Some(ErrorSlot { container, element }))
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
