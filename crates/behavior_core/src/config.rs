use serde::{Deserialize, Serialize};

/// Tunables for every behavior installed on a page. Missing keys fall back
/// to the defaults below when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Absolute URL of the page being driven; used to match menu links.
    pub location: String,
    pub form_id: String,
    pub consent_id: String,
    pub submit_delay_ms: u64,
    pub success_href: String,
    pub busy_label: String,
    /// Distance below the top of the viewport where the spy band starts.
    pub spy_top_offset_px: f64,
    /// Bottom edge of the spy band, as a percentage of viewport height from the top.
    pub spy_band_bottom_percent: f64,
    pub resize_debounce_ms: u64,
    pub desktop_breakpoint_px: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            location: "http://localhost/".into(),
            form_id: "appointmentForm".into(),
            consent_id: "privacyConsent".into(),
            submit_delay_ms: 800,
            success_href: "thank_you.html".into(),
            busy_label: "Wird gesendet...".into(),
            spy_top_offset_px: 0.0,
            spy_band_bottom_percent: 66.0,
            resize_debounce_ms: 200,
            desktop_breakpoint_px: 1024,
        }
    }
}
