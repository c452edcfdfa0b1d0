use page_dom::Element;

use super::*;

struct MenuPage {
    doc: Document,
    menu: MenuToggle,
    toggler_icon: NodeId,
    collapse: NodeId,
    link: NodeId,
    content: NodeId,
}

fn menu_page() -> MenuPage {
    let mut doc = Document::new();
    let body = doc.body();
    let header = doc
        .append_element(body, Element::new("header").with_class("l-header"))
        .expect("header");
    let toggler = doc
        .append_element(
            header,
            Element::new("button")
                .with_class("navbar-toggler")
                .with_attr(ARIA_EXPANDED, "false"),
        )
        .expect("toggler");
    let toggler_icon = doc
        .append_element(toggler, Element::new("span").with_class("navbar-toggler-icon"))
        .expect("icon");
    let collapse = doc
        .append_element(header, Element::new("div").with_class("navbar-collapse"))
        .expect("collapse");
    let link = doc
        .append_element(
            collapse,
            Element::new("a")
                .with_class(NAV_LINK_CLASS)
                .with_attr("href", "#about"),
        )
        .expect("link");
    let content = doc
        .append_element(body, Element::new("main"))
        .expect("main");
    let menu = MenuToggle::install(&doc, 1024).expect("menu");
    MenuPage {
        doc,
        menu,
        toggler_icon,
        collapse,
        link,
        content,
    }
}

fn menu_is_open(page: &MenuPage) -> bool {
    let collapse = page.doc.element(page.collapse).expect("collapse");
    let toggler = page.doc.element(page.menu.toggler()).expect("toggler");
    let body = page.doc.element(page.doc.body()).expect("body");
    let open = collapse.has_class("show");
    assert_eq!(
        toggler.attr(ARIA_EXPANDED),
        Some(if open { "true" } else { "false" })
    );
    assert_eq!(body.has_class("u-no-scroll"), open);
    open
}

#[test]
fn toggler_click_opens_and_closes() {
    let mut page = menu_page();
    assert!(page
        .menu
        .handle_click(&mut page.doc, page.toggler_icon)
        .expect("open"));
    assert!(menu_is_open(&page));
    page.menu
        .handle_click(&mut page.doc, page.toggler_icon)
        .expect("close");
    assert!(!menu_is_open(&page));
}

#[test]
fn nav_link_click_closes_the_menu() {
    let mut page = menu_page();
    page.menu.open(&mut page.doc).expect("open");
    page.menu.handle_click(&mut page.doc, page.link).expect("link");
    assert!(!menu_is_open(&page));
}

#[test]
fn outside_click_closes_but_inside_click_does_not() {
    let mut page = menu_page();
    page.menu.open(&mut page.doc).expect("open");
    page.menu
        .handle_click(&mut page.doc, page.collapse)
        .expect("inside");
    assert!(menu_is_open(&page));
    page.menu
        .handle_click(&mut page.doc, page.content)
        .expect("outside");
    assert!(!menu_is_open(&page));
}

#[test]
fn escape_closes_only_when_open() {
    let mut page = menu_page();
    page.menu.handle_key(&mut page.doc, "Escape").expect("noop");
    assert!(!menu_is_open(&page));
    page.menu.open(&mut page.doc).expect("open");
    page.menu.handle_key(&mut page.doc, "Enter").expect("enter");
    assert!(menu_is_open(&page));
    page.menu.handle_key(&mut page.doc, "Escape").expect("escape");
    assert!(!menu_is_open(&page));
}

#[test]
fn settled_desktop_resize_closes() {
    let mut page = menu_page();
    page.menu.open(&mut page.doc).expect("open");
    page.menu
        .handle_resize_settled(&mut page.doc, 800)
        .expect("mobile");
    assert!(menu_is_open(&page));
    page.menu
        .handle_resize_settled(&mut page.doc, 1024)
        .expect("desktop");
    assert!(!menu_is_open(&page));
}

#[test]
fn menu_requires_toggler_and_collapse() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.append_element(body, Element::new("button").with_class("navbar-toggler"))
        .expect("toggler");
    assert!(MenuToggle::install(&doc, 1024).is_none());
}

#[test]
fn compact_header_toggles_inner_panel() {
    let mut doc = Document::new();
    let body = doc.body();
    let header = doc
        .append_element(body, Element::new("header").with_class("dr-header"))
        .expect("header");
    let toggler = doc
        .append_element(header, Element::new("button").with_class("dr-nav-toggle"))
        .expect("toggle");
    let inner = doc
        .append_element(header, Element::new("div").with_class("dr-header-inner"))
        .expect("inner");
    let compact = CompactHeaderToggle::install(&doc).expect("installed");

    assert!(compact.handle_click(&mut doc, toggler).expect("open"));
    assert!(doc.element(inner).expect("inner").has_class("dr-is-open"));
    assert_eq!(
        doc.element(toggler).expect("toggle").attr(ARIA_EXPANDED),
        Some("true")
    );

    assert!(!compact.handle_click(&mut doc, inner).expect("elsewhere"));
    compact.handle_click(&mut doc, toggler).expect("close");
    assert!(!doc.element(inner).expect("inner").has_class("dr-is-open"));
}

#[test]
fn accordion_button_toggles_its_panel() {
    let mut doc = Document::new();
    let body = doc.body();
    let button = doc
        .append_element(
            body,
            Element::new("button")
                .with_class("accordion-button collapsed")
                .with_attr(ACCORDION_TARGET_ATTR, "#faq1")
                .with_attr(ARIA_EXPANDED, "false"),
        )
        .expect("button");
    let label = doc
        .append_element(button, Element::new("span"))
        .expect("label");
    let panel = doc
        .append_element(body, Element::new("div").with_id("faq1").with_class("collapse"))
        .expect("panel");
    let accordion = Accordion::install(&doc).expect("installed");

    assert!(accordion.handle_click(&mut doc, label).expect("open"));
    assert!(doc.element(panel).expect("panel").has_class("show"));
    let element = doc.element(button).expect("button");
    assert!(!element.has_class("collapsed"));
    assert_eq!(element.attr(ARIA_EXPANDED), Some("true"));

    accordion.handle_click(&mut doc, button).expect("close");
    assert!(!doc.element(panel).expect("panel").has_class("show"));
    assert!(doc.element(button).expect("button").has_class("collapsed"));
}

#[test]
fn accordion_button_with_missing_panel_does_nothing() {
    let mut doc = Document::new();
    let body = doc.body();
    let button = doc
        .append_element(
            body,
            Element::new("button")
                .with_class("accordion-button")
                .with_attr(ACCORDION_TARGET_ATTR, "#gone"),
        )
        .expect("button");
    let accordion = Accordion::install(&doc).expect("installed");
    assert!(!accordion.handle_click(&mut doc, button).expect("click"));
    assert_eq!(doc.element(button).expect("button").attr(ARIA_EXPANDED), None);
}
