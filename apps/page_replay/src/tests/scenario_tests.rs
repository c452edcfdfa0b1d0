use behavior_core::{
    rules::{CONSENT_MESSAGE, EMAIL_MESSAGE, MESSAGE_TOO_SHORT, REQUIRED_MESSAGE},
    BehaviorConfig,
};
use page_dom::{Document, ElementSpec};
use serde_json::json;

use super::*;

const PAGE_FIXTURE: &str = include_str!("../../fixtures/appointment_page.json");
const SCRIPT_FIXTURE: &str = include_str!("../../fixtures/appointment_script.json");
const CONFIG_FIXTURE: &str = include_str!("../../fixtures/page.toml");

fn fixture_page() -> Page {
    let spec: ElementSpec = serde_json::from_str(PAGE_FIXTURE).expect("page fixture");
    let config: BehaviorConfig = toml::from_str(CONFIG_FIXTURE).expect("config fixture");
    let document = Document::from_spec(&spec).expect("document");
    let mut page = Page::new(document, config).expect("page");
    page.initialize().expect("initialize");
    page
}

fn steps(value: serde_json::Value) -> Vec<Step> {
    serde_json::from_value(value).expect("steps")
}

fn error(field: &str, message: &str) -> FieldError {
    FieldError {
        field: Some(field.into()),
        message: message.into(),
    }
}

#[tokio::test]
async fn fixture_script_ends_in_navigation() {
    let mut page = fixture_page();
    let script: Vec<Step> = serde_json::from_str(SCRIPT_FIXTURE).expect("script fixture");

    let report = run_scenario(&mut page, &script, ReplayOptions::default())
        .await
        .expect("replay");

    assert_eq!(report.steps, script.len());
    assert_eq!(report.elapsed_ms, 1_800);
    assert_eq!(report.submission_state, SubmissionState::Submitting);
    assert_eq!(
        report.effects,
        vec![PageEffect::Navigate {
            href: "thank_you.html".into()
        }]
    );
    assert_eq!(report.active_links, vec!["index.html", "#termin"]);
    assert!(report.visible_errors.is_empty());
}

#[tokio::test]
async fn rejected_submit_reports_each_error_with_its_field() {
    let mut page = fixture_page();
    let script = steps(json!([
        {"action": "type", "id": "firstName", "value": "Al"},
        {"action": "type", "id": "email", "value": "not-an-email"},
        {"action": "type", "id": "message", "value": "short"},
        {"action": "submit", "id": "appointmentForm"},
        {"action": "wait", "ms": 2000}
    ]));

    let report = run_scenario(&mut page, &script, ReplayOptions::default())
        .await
        .expect("replay");

    assert_eq!(report.submission_state, SubmissionState::Rejected);
    assert!(report.effects.is_empty());
    assert_eq!(
        report.visible_errors,
        vec![
            error("lastName", REQUIRED_MESSAGE),
            error("email", EMAIL_MESSAGE),
            error("service", REQUIRED_MESSAGE),
            error("message", MESSAGE_TOO_SHORT),
            error("privacyConsent", CONSENT_MESSAGE),
        ]
    );
}

#[tokio::test]
async fn unknown_element_id_fails_the_replay() {
    let mut page = fixture_page();
    let script = steps(json!([
        {"action": "wait", "ms": 10},
        {"action": "click", "id": "nope"}
    ]));

    let err = run_scenario(&mut page, &script, ReplayOptions::default())
        .await
        .err()
        .expect("unknown id");

    assert!(err.to_string().starts_with("step 1"));
    assert!(format!("{err:#}").contains("no element with id 'nope'"));
}

#[tokio::test]
async fn realtime_wait_still_advances_the_virtual_clock() {
    let mut page = fixture_page();
    let script = steps(json!([
        {"action": "click", "id": "menuToggle"},
        {"action": "resize", "width": 1280},
        {"action": "wait", "ms": 200}
    ]));

    let report = run_scenario(&mut page, &script, ReplayOptions { speed: 100.0 })
        .await
        .expect("replay");

    assert_eq!(report.elapsed_ms, 200);
    assert_eq!(page.pending_timers(), 0);
    let toggle = page
        .document()
        .get_element_by_id("menuToggle")
        .expect("toggle");
    assert_eq!(
        page.document().element(toggle).expect("toggle").attr("aria-expanded"),
        Some("false")
    );
}

#[test]
fn check_step_defaults_to_checked() {
    let parsed = steps(json!([
        {"action": "check", "id": "privacyConsent"},
        {"action": "check", "id": "privacyConsent", "checked": false},
        {"action": "key", "key": "Escape"}
    ]));
    assert_eq!(
        parsed,
        vec![
            Step::Check {
                id: "privacyConsent".into(),
                checked: true
            },
            Step::Check {
                id: "privacyConsent".into(),
                checked: false
            },
            Step::Key {
                key: "Escape".into()
            },
        ]
    );
}

#[test]
fn wait_steps_resolve_to_no_event() {
    let page = fixture_page();
    assert_eq!(
        resolve_step(&page, &Step::Wait { ms: 5 }).expect("wait"),
        None
    );
    let form = page
        .document()
        .get_element_by_id("appointmentForm")
        .expect("form");
    assert_eq!(
        resolve_step(
            &page,
            &Step::Submit {
                id: "appointmentForm".into()
            }
        )
        .expect("submit"),
        Some(DomEvent::Submit { form })
    );
}
