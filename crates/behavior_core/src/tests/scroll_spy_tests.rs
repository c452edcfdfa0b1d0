use page_dom::Element;

use super::*;

struct SpyPage {
    doc: Document,
    sections: [NodeId; 3],
    links: [NodeId; 3],
}

fn spy_page() -> SpyPage {
    let mut doc = Document::new();
    let body = doc.body();
    let nav = doc
        .append_element(body, Element::new("nav").with_id("mainNav"))
        .expect("nav");
    let mut links = Vec::new();
    for id in ["a", "b", "c"] {
        links.push(
            doc.append_element(
                nav,
                Element::new("a")
                    .with_class(NAV_LINK_CLASS)
                    .with_attr("href", format!("#{id}")),
            )
            .expect("link"),
        );
    }
    let mut sections = Vec::new();
    for id in ["a", "b", "c"] {
        sections.push(
            doc.append_element(body, Element::new("section").with_id(id))
                .expect("section"),
        );
    }
    SpyPage {
        doc,
        sections: sections.try_into().expect("three sections"),
        links: links.try_into().expect("three links"),
    }
}

fn entering(target: NodeId) -> IntersectionEntry {
    IntersectionEntry {
        target,
        is_intersecting: true,
    }
}

fn active_links(doc: &Document, links: &[NodeId]) -> Vec<NodeId> {
    links
        .iter()
        .copied()
        .filter(|link| {
            let element = doc.element(*link).expect("link");
            element.has_class(ACTIVE_CLASS) || element.attr(ARIA_CURRENT).is_some()
        })
        .collect()
}

#[test]
fn install_captures_identified_elements_and_fragment_links() {
    let page = spy_page();
    let tracker = ScrollSpyTracker::install(&page.doc).expect("installed");
    let ids: Vec<_> = tracker.sections().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["mainNav", "a", "b", "c"]);
    assert_eq!(tracker.links().len(), 3);
    assert_eq!(tracker.links()[1].target, "b");
}

#[test]
fn install_is_skipped_without_fragment_links() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.append_element(body, Element::new("section").with_id("a"))
        .expect("section");
    doc.append_element(
        body,
        Element::new("a")
            .with_class(NAV_LINK_CLASS)
            .with_attr("href", "/about.html"),
    )
    .expect("page link");
    assert!(ScrollSpyTracker::install(&doc).is_none());
}

#[test]
fn entering_section_moves_the_single_active_link() {
    let mut page = spy_page();
    let mut tracker = ScrollSpyTracker::install(&page.doc).expect("installed");
    let [a, b, _] = page.sections;

    tracker.apply(&mut page.doc, &[entering(a)]).expect("a");
    assert_eq!(active_links(&page.doc, &page.links), vec![page.links[0]]);

    tracker.apply(&mut page.doc, &[entering(b)]).expect("b");
    assert_eq!(active_links(&page.doc, &page.links), vec![page.links[1]]);
    assert_eq!(tracker.active_link(), Some(page.links[1]));
    let link = page.doc.element(page.links[1]).expect("link");
    assert_eq!(link.attr(ARIA_CURRENT), Some("page"));
}

#[test]
fn leaving_entries_do_not_change_the_active_link() {
    let mut page = spy_page();
    let mut tracker = ScrollSpyTracker::install(&page.doc).expect("installed");
    let [a, b, _] = page.sections;
    tracker.apply(&mut page.doc, &[entering(a)]).expect("a");

    tracker
        .apply(
            &mut page.doc,
            &[IntersectionEntry {
                target: a,
                is_intersecting: false,
            }],
        )
        .expect("a leaves");
    tracker
        .apply(
            &mut page.doc,
            &[IntersectionEntry {
                target: b,
                is_intersecting: false,
            }],
        )
        .expect("b reported outside");

    assert_eq!(active_links(&page.doc, &page.links), vec![page.links[0]]);
}

#[test]
fn last_entry_in_a_batch_wins() {
    let mut page = spy_page();
    let mut tracker = ScrollSpyTracker::install(&page.doc).expect("installed");
    let [a, b, c] = page.sections;

    tracker
        .apply(&mut page.doc, &[entering(c), entering(a), entering(b)])
        .expect("batch");

    assert_eq!(active_links(&page.doc, &page.links), vec![page.links[1]]);
}

#[test]
fn section_without_link_has_no_visible_effect() {
    let mut page = spy_page();
    let mut tracker = ScrollSpyTracker::install(&page.doc).expect("installed");
    let nav = page.doc.get_element_by_id("mainNav").expect("nav");
    tracker
        .apply(&mut page.doc, &[entering(page.sections[2])])
        .expect("c");

    tracker.apply(&mut page.doc, &[entering(nav)]).expect("nav");

    assert_eq!(active_links(&page.doc, &page.links), vec![page.links[2]]);
    assert_eq!(tracker.mark_section(&mut page.doc, "nowhere"), Ok(None));
}

#[test]
fn marking_the_same_section_twice_is_idempotent() {
    let mut page = spy_page();
    let mut tracker = ScrollSpyTracker::install(&page.doc).expect("installed");

    tracker.mark_section(&mut page.doc, "b").expect("once");
    let once: Vec<_> = page
        .links
        .iter()
        .map(|l| page.doc.element(*l).expect("link").clone())
        .collect();
    tracker.mark_section(&mut page.doc, "b").expect("twice");
    let twice: Vec<_> = page
        .links
        .iter()
        .map(|l| page.doc.element(*l).expect("link").clone())
        .collect();

    assert_eq!(once, twice);
    assert_eq!(tracker.active_link(), Some(page.links[1]));
}

#[test]
fn sections_added_after_install_are_not_tracked() {
    let mut page = spy_page();
    let mut tracker = ScrollSpyTracker::install(&page.doc).expect("installed");
    let body = page.doc.body();
    let late = page
        .doc
        .append_element(body, Element::new("section").with_id("late"))
        .expect("late section");
    let nav = page.doc.get_element_by_id("mainNav").expect("nav");
    page.doc
        .append_element(
            nav,
            Element::new("a")
                .with_class(NAV_LINK_CLASS)
                .with_attr("href", "#late"),
        )
        .expect("late link");

    tracker.apply(&mut page.doc, &[entering(late)]).expect("late");

    assert_eq!(tracker.active_link(), None);
    assert_eq!(tracker.sections().len(), 4);
}
