//! Page state tests
//!
//! Drives the page interaction controller over the headless portfolio page:
//! terminal window controls, the mobile menu, anchor scrolling and the
//! friend-links corner.

use std::time::Duration;
use termfolio::controller::{
    BindError, ControllerSettings, FriendEntry, PageInteractionController, READY_MESSAGE,
};
use termfolio::page::document::{ElementSpec, HeadlessDocument};
use termfolio::page::layout::{portfolio_document, PageMap};
use termfolio::page::{Dom, KeyChord, PageEvent};

type Page = PageInteractionController<HeadlessDocument>;

/// Helper to bind the portfolio page at a viewport width
fn create_page(width: u32) -> (Page, PageMap) {
    create_page_with(width, ControllerSettings::default())
}

fn create_page_with(width: u32, settings: ControllerSettings) -> (Page, PageMap) {
    let (doc, map) = portfolio_document(width);
    let page = PageInteractionController::initialize(doc, settings).expect("bind page");
    (page, map)
}

fn friend(name: &str) -> FriendEntry {
    FriendEntry {
        name: name.to_string(),
        handle: name.to_lowercase(),
        quote: format!("{} says hi", name),
        url: format!("https://{}.example", name.to_lowercase()),
    }
}

fn click(page: &mut Page, target: termfolio::page::NodeId) {
    page.dispatch(PageEvent::Click { target });
}

#[test]
fn test_initialize_logs_ready_message() {
    let (page, _) = create_page(1024);
    assert_eq!(page.dom().console_messages().to_vec(), vec![READY_MESSAGE.to_string()]);
}

#[test]
fn test_initialize_reports_missing_element() {
    let doc = HeadlessDocument::new(1024);
    let result = PageInteractionController::initialize(doc, ControllerSettings::default());
    assert!(matches!(result, Err(BindError::MissingElement { .. })));
}

#[test]
fn test_control_click_sequences() {
    let (mut page, map) = create_page(1024);
    let [red, yellow, green] = map.controls;

    click(&mut page, red);
    assert!(page.is_minimized());
    click(&mut page, red);
    assert!(!page.is_minimized());

    // Yellow only minimizes, green only restores
    click(&mut page, yellow);
    assert!(page.is_minimized());
    click(&mut page, yellow);
    assert!(page.is_minimized());
    assert!(page.dom().has_class(&map.terminal, "minimized"));

    click(&mut page, green);
    assert!(!page.is_minimized());
    click(&mut page, green);
    assert!(!page.is_minimized());
    assert!(!page.dom().has_class(&map.terminal, "minimized"));
}

#[test]
fn test_control_click_does_not_reach_panel() {
    let (mut page, map) = create_page(1024);
    let response = page.dispatch(PageEvent::Click {
        target: map.controls[1],
    });
    assert!(response.propagation_stopped);
    // The panel's restore listener would have undone the minimize
    assert!(page.is_minimized());
}

#[test]
fn test_panel_click_restores_only_when_minimized() {
    let (mut page, map) = create_page(1024);

    click(&mut page, map.terminal_title);
    assert!(!page.is_minimized());

    click(&mut page, map.controls[0]);
    assert!(page.is_minimized());
    click(&mut page, map.terminal_title);
    assert!(!page.is_minimized());
}

#[test]
fn test_keyboard_shortcut_toggles_terminal() {
    let (mut page, _) = create_page(1024);

    let response = page.dispatch(PageEvent::KeyDown(KeyChord::new("`").with_ctrl()));
    assert!(response.default_prevented);
    assert!(page.is_minimized());

    let response = page.dispatch(PageEvent::KeyDown(KeyChord::new("`").with_meta()));
    assert!(response.default_prevented);
    assert!(!page.is_minimized());

    let response = page.dispatch(PageEvent::KeyDown(KeyChord::new("`")));
    assert!(!response.default_prevented);
    assert!(!page.is_minimized());

    let response = page.dispatch(PageEvent::KeyDown(KeyChord::new("a").with_ctrl()));
    assert!(!response.default_prevented);
}

#[test]
fn test_terminal_line_hover() {
    let (mut page, map) = create_page(1024);
    let line = map.terminal_lines[0];

    page.dispatch(PageEvent::MouseEnter { target: line });
    assert_eq!(
        page.dom().style(&line, "background-color"),
        "rgba(255, 255, 255, 0.05)"
    );
    page.dispatch(PageEvent::MouseLeave { target: line });
    assert_eq!(page.dom().style(&line, "background-color"), "transparent");
}

#[test]
fn test_mobile_menu_toggle_and_outside_click() {
    let (mut page, map) = create_page(600);

    click(&mut page, map.menu_button);
    assert!(page.is_menu_open());
    assert!(page.dom().has_class(&map.menu_button, "active"));

    // Clicks inside the sidebar keep it open
    click(&mut page, map.sidebar);
    assert!(page.is_menu_open());

    click(&mut page, map.main);
    assert!(!page.is_menu_open());
    assert!(!page.dom().has_class(&map.menu_button, "active"));
}

#[test]
fn test_outside_click_ignored_on_desktop() {
    let (mut page, map) = create_page(1024);
    click(&mut page, map.menu_button);
    assert!(page.is_menu_open());
    click(&mut page, map.main);
    assert!(page.is_menu_open());
}

#[test]
fn test_resize_to_desktop_closes_menu() {
    let (mut page, map) = create_page(600);
    click(&mut page, map.menu_button);
    assert!(page.is_menu_open());

    page.dom_mut().set_viewport_width(768);
    page.dispatch(PageEvent::Resize);
    assert!(page.is_menu_open(), "768px is still the mobile layout");

    page.dom_mut().set_viewport_width(1024);
    page.dispatch(PageEvent::Resize);
    assert!(!page.is_menu_open());
    assert!(!page.dom().has_class(&map.menu_button, "active"));
}

#[test]
fn test_transition_end_locks_and_unlocks_scroll() {
    let (mut page, map) = create_page(600);

    click(&mut page, map.menu_button);
    page.dispatch(PageEvent::TransitionEnd {
        target: map.sidebar,
    });
    assert_eq!(page.dom().body_style("overflow"), "hidden");

    click(&mut page, map.menu_button);
    page.dispatch(PageEvent::TransitionEnd {
        target: map.sidebar,
    });
    assert_eq!(page.dom().body_style("overflow"), "");
}

#[test]
fn test_transition_end_ignored_on_desktop() {
    let (mut page, map) = create_page(1024);
    click(&mut page, map.menu_button);
    page.dispatch(PageEvent::TransitionEnd {
        target: map.sidebar,
    });
    assert_eq!(page.dom().body_style("overflow"), "");
}

#[test]
fn test_anchor_click_scrolls_and_closes_menu() {
    let (mut page, map) = create_page(600);
    let link = map.nav_links[1];
    click(&mut page, map.menu_button);

    let response = page.dispatch(PageEvent::Click { target: link });
    assert!(response.default_prevented);
    assert_eq!(page.dom().scroll_requests(), &[map.sections[1]]);
    assert!(!page.is_menu_open());
}

#[test]
fn test_anchor_to_missing_target_is_a_no_op() {
    let (mut doc, _) = portfolio_document(1024);
    let body = doc.body();
    let dangling = doc.append(
        body,
        ElementSpec::new("a").attr("href", "#missing").text("nowhere"),
    );
    let bare = doc.append(body, ElementSpec::new("a").attr("href", "#").text("top"));
    let mut page =
        PageInteractionController::initialize(doc, ControllerSettings::default()).expect("bind");

    let response = page.dispatch(PageEvent::Click { target: dangling });
    assert!(response.default_prevented);
    let response = page.dispatch(PageEvent::Click { target: bare });
    assert!(response.default_prevented);
    assert!(page.dom().scroll_requests().is_empty());
}

#[test]
fn test_friend_scenario_single_entry() {
    let (mut page, map) = create_page(1024);

    click(&mut page, map.corner_fold);
    assert!(page.is_expanded());
    assert!(page.dom().has_class(&map.corner_fold, "expanded"));

    let response = page.dispatch(PageEvent::Wheel {
        target: map.corner_fold,
        delta_y: 100.0,
    });
    assert!(response.default_prevented);
    assert_eq!(page.current_index(), 0);
    assert_eq!(page.dom().style(&map.friend_info, "opacity"), "0.7");

    page.advance(Duration::from_millis(150));
    let doc = page.dom();
    assert_eq!(doc.text_content(map.friend_link), "My Goat @ LtHero");
    assert_eq!(doc.text_content(map.friend_quote), "哥哥下雨我就不打伞");
    assert_eq!(
        doc.attribute(&map.friend_link, "href").as_deref(),
        Some("https://tools.lthero.cn/resume/")
    );
    assert_eq!(doc.style(&map.friend_info, "opacity"), "1");
}

#[test]
fn test_wheel_while_collapsed_does_not_rotate() {
    let settings = ControllerSettings {
        friends: vec![friend("Ada"), friend("Grace")],
        ..ControllerSettings::default()
    };
    let (mut page, map) = create_page_with(1024, settings);

    let response = page.dispatch(PageEvent::Wheel {
        target: map.corner_fold,
        delta_y: 100.0,
    });
    assert!(response.default_prevented);
    assert_eq!(page.current_index(), 0);
}

#[test]
fn test_wheel_rotates_both_directions() {
    let settings = ControllerSettings {
        friends: vec![friend("Ada"), friend("Grace"), friend("Linus")],
        ..ControllerSettings::default()
    };
    let (mut page, map) = create_page_with(1024, settings);
    click(&mut page, map.corner_fold);

    page.dispatch(PageEvent::Wheel {
        target: map.friend_info,
        delta_y: -3.0,
    });
    assert_eq!(page.current_index(), 2);
    page.dispatch(PageEvent::Wheel {
        target: map.corner_fold,
        delta_y: 40.0,
    });
    assert_eq!(page.current_index(), 0);
}

#[test]
fn test_rapid_rotation_shows_only_latest_entry() {
    let settings = ControllerSettings {
        friends: vec![friend("Ada"), friend("Grace"), friend("Linus")],
        ..ControllerSettings::default()
    };
    let (mut page, map) = create_page_with(1024, settings);
    page.advance(Duration::from_millis(150));
    click(&mut page, map.corner_fold);

    page.dispatch(PageEvent::Wheel {
        target: map.corner_fold,
        delta_y: 100.0,
    });
    page.advance(Duration::from_millis(100));
    page.dispatch(PageEvent::Wheel {
        target: map.corner_fold,
        delta_y: 100.0,
    });
    page.advance(Duration::from_millis(100));
    // The first swap would have been due by now
    assert_eq!(page.dom().text_content(map.friend_link), "Ada @ ada");

    page.advance(Duration::from_millis(50));
    assert_eq!(page.dom().text_content(map.friend_link), "Linus @ linus");
    assert_eq!(page.dom().text_content(map.friend_quote), "Linus says hi");
}

#[test]
fn test_leave_then_enter_keeps_expanded() {
    let (mut page, map) = create_page(1024);
    click(&mut page, map.corner_fold);

    page.dispatch(PageEvent::MouseLeave {
        target: map.friend_container,
    });
    assert!(page.is_collapse_pending());
    page.advance(Duration::from_millis(300));
    page.dispatch(PageEvent::MouseEnter {
        target: map.friend_container,
    });
    assert!(!page.is_collapse_pending());

    page.advance(Duration::from_secs(2));
    assert!(page.is_expanded());
}

#[test]
fn test_leave_collapses_after_delay() {
    let (mut page, map) = create_page(1024);
    click(&mut page, map.corner_fold);

    page.dispatch(PageEvent::MouseLeave {
        target: map.friend_container,
    });
    page.advance(Duration::from_millis(499));
    assert!(page.is_expanded());
    page.advance(Duration::from_millis(1));
    assert!(!page.is_expanded());
    assert!(!page.dom().has_class(&map.corner_fold, "expanded"));
}

#[test]
fn test_leave_while_collapsed_is_harmless() {
    let (mut page, map) = create_page(1024);
    page.advance(Duration::from_millis(150));
    page.dispatch(PageEvent::MouseLeave {
        target: map.friend_container,
    });
    assert_eq!(page.next_due(), Some(Duration::from_millis(500)));

    page.advance(Duration::from_millis(500));
    assert!(!page.is_expanded());
    assert!(!page.is_collapse_pending());
    assert_eq!(page.next_due(), None);
}
