//! Page runtime: owns the document, the installed behaviors, a virtual clock
//! and the timer queue, and routes browser events to the behaviors.

use page_dom::Document;
use shared::{
    domain::{NodeId, SubmissionState},
    error::DomError,
    protocol::{DomEvent, IntersectionEntry, PageEffect},
};
use tracing::{debug, info};
use url::Url;

use crate::{
    active_menu::ActiveMenuMarker,
    config::BehaviorConfig,
    scroll_spy::ScrollSpyTracker,
    timers::{Debouncer, TimerQueue},
    toggle::{Accordion, CompactHeaderToggle, MenuToggle},
    validation::{SubmitOutcome, ValidationEngine},
    viewport::{ObservationBand, ViewportObserver},
    PageError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageTask {
    Navigate { href: String },
    ResizeSettled { width: u32 },
}

pub struct Page {
    document: Document,
    config: BehaviorConfig,
    location: Url,
    now_ms: u64,
    timers: TimerQueue<PageTask>,
    resize_debounce: Debouncer,
    initialized: bool,
    validation: Option<ValidationEngine>,
    scroll_spy: Option<ScrollSpyTracker>,
    viewport: Option<ViewportObserver>,
    menu: Option<MenuToggle>,
    compact_header: Option<CompactHeaderToggle>,
    accordion: Option<Accordion>,
    active_menu_links: Vec<NodeId>,
    effects: Vec<PageEffect>,
}

impl Page {
    pub fn new(document: Document, config: BehaviorConfig) -> Result<Self, PageError> {
        let location = Url::parse(&config.location).map_err(|source| {
            PageError::InvalidLocation {
                location: config.location.clone(),
                source,
            }
        })?;
        Ok(Self {
            document,
            resize_debounce: Debouncer::new(config.resize_debounce_ms),
            config,
            location,
            now_ms: 0,
            timers: TimerQueue::new(),
            initialized: false,
            validation: None,
            scroll_spy: None,
            viewport: None,
            menu: None,
            compact_header: None,
            accordion: None,
            active_menu_links: Vec::new(),
            effects: Vec::new(),
        })
    }

    /// Wires every behavior whose markup is present. Later calls return
    /// `Ok(false)` without touching anything.
    pub fn initialize(&mut self) -> Result<bool, PageError> {
        if self.initialized {
            debug!("page: already initialized");
            return Ok(false);
        }
        self.initialized = true;

        let doc = &self.document;
        self.menu = MenuToggle::install(doc, self.config.desktop_breakpoint_px);
        self.compact_header = CompactHeaderToggle::install(doc);
        self.scroll_spy = ScrollSpyTracker::install(doc);
        self.viewport = self.scroll_spy.as_ref().map(|spy| {
            ViewportObserver::new(ObservationBand::from_config(&self.config), spy.section_nodes())
        });
        self.validation = ValidationEngine::install(doc, &self.config);
        self.accordion = Accordion::install(doc);
        self.active_menu_links = ActiveMenuMarker::run(&mut self.document, &self.location)?;

        info!(
            location = %self.location,
            menu = self.menu.is_some(),
            compact_header = self.compact_header.is_some(),
            scroll_spy = self.scroll_spy.is_some(),
            form = self.validation.is_some(),
            accordion = self.accordion.is_some(),
            "page: initialized"
        );
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn validation(&self) -> Option<&ValidationEngine> {
        self.validation.as_ref()
    }

    pub fn scroll_spy(&self) -> Option<&ScrollSpyTracker> {
        self.scroll_spy.as_ref()
    }

    pub fn menu(&self) -> Option<&MenuToggle> {
        self.menu.as_ref()
    }

    pub fn active_menu_links(&self) -> &[NodeId] {
        &self.active_menu_links
    }

    /// `Idle` when the page has no form.
    pub fn submission_state(&self) -> SubmissionState {
        self.validation
            .as_ref()
            .map(ValidationEngine::state)
            .unwrap_or_default()
    }

    pub fn next_timer_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn effects(&self) -> &[PageEffect] {
        &self.effects
    }

    pub fn take_effects(&mut self) -> Vec<PageEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Delivers one event. Handler failures are logged and swallowed; a
    /// presentational layer never takes the page down.
    pub fn dispatch(&mut self, event: DomEvent) {
        if !self.initialized {
            debug!(event = event.name(), "page: event before initialize ignored");
            return;
        }
        let name = event.name();
        if let Err(err) = self.route(event) {
            debug!(event = name, error = %err, "page: handler failed; ignoring");
        }
    }

    /// Moves the clock forward, firing every timer that falls due on the way.
    pub fn advance_by(&mut self, delta_ms: u64) {
        self.advance_to(self.now_ms.saturating_add(delta_ms));
    }

    pub fn advance_to(&mut self, target_ms: u64) {
        while let Some((id, deadline, task)) = self.timers.pop_due(target_ms) {
            self.now_ms = self.now_ms.max(deadline);
            match task {
                PageTask::Navigate { href } => {
                    info!(href = %href, at_ms = self.now_ms, "page: navigating away");
                    self.effects.push(PageEffect::Navigate { href });
                }
                PageTask::ResizeSettled { width } => {
                    if !self.resize_debounce.settle(id) {
                        continue;
                    }
                    if let Some(menu) = &self.menu {
                        if let Err(err) = menu.handle_resize_settled(&mut self.document, width) {
                            debug!(error = %err, "page: resize handler failed; ignoring");
                        }
                    }
                }
            }
        }
        self.now_ms = self.now_ms.max(target_ms);
    }

    fn route(&mut self, event: DomEvent) -> Result<(), DomError> {
        let doc = &mut self.document;
        match event {
            DomEvent::Click { target } => {
                doc.element(target)?;
                if let Some(menu) = &self.menu {
                    if menu.handle_click(doc, target)? {
                        return Ok(());
                    }
                }
                if let Some(compact) = &self.compact_header {
                    compact.handle_click(doc, target)?;
                }
                if let Some(accordion) = &self.accordion {
                    accordion.handle_click(doc, target)?;
                }
            }
            DomEvent::Blur { target } => {
                if let Some(validation) = &mut self.validation {
                    validation.handle_blur(doc, target)?;
                }
            }
            DomEvent::Input { target, value } => {
                doc.element_mut(target)?.set_value(value);
                if let Some(validation) = &mut self.validation {
                    validation.handle_input(doc, target)?;
                }
            }
            DomEvent::Change { target, checked } => {
                doc.element_mut(target)?.set_checked(checked);
                if let Some(validation) = &mut self.validation {
                    validation.handle_change(doc, target)?;
                }
            }
            DomEvent::Submit { form } => {
                let Some(validation) = &mut self.validation else {
                    return Ok(());
                };
                if validation.form() != form {
                    debug!(form = form.0, "page: submit for untracked form");
                    return Ok(());
                }
                if let SubmitOutcome::Submitting { href, delay_ms } = validation.submit(doc)? {
                    self.timers
                        .schedule(self.now_ms, delay_ms, PageTask::Navigate { href });
                }
            }
            DomEvent::KeyDown { key } => {
                if let Some(menu) = &self.menu {
                    menu.handle_key(doc, &key)?;
                }
            }
            DomEvent::Resize { width } => {
                self.resize_debounce.trigger(
                    &mut self.timers,
                    self.now_ms,
                    PageTask::ResizeSettled { width },
                );
            }
            DomEvent::Scroll {
                scroll_y,
                viewport_height,
            } => {
                let Some(viewport) = &mut self.viewport else {
                    return Ok(());
                };
                let entries = viewport.observe(doc, scroll_y, viewport_height);
                self.apply_intersections(&entries)?;
            }
            DomEvent::Intersection { entries } => {
                self.apply_intersections(&entries)?;
            }
        }
        Ok(())
    }

    fn apply_intersections(&mut self, entries: &[IntersectionEntry]) -> Result<(), DomError> {
        match &mut self.scroll_spy {
            Some(spy) => spy.apply(&mut self.document, entries),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
