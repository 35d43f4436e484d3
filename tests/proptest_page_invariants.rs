//! Property-based invariant tests for the page interaction controller.
//!
//! Verifies:
//! 1. Rotation: `i' = (i + sign(delta) + len) % len`, always in bounds
//! 2. Any window-control click sequence matches the red/yellow/green model
//! 3. Any resize above the breakpoint clears the mobile menu state
//! 4. Any wheel sequence over the expanded fold keeps the index in bounds
//!    and settles on the matching entry after the fade delay

use proptest::prelude::*;
use std::time::Duration;
use termfolio::controller::friends::rotate;
use termfolio::controller::{
    Control, ControllerSettings, FriendEntry, PageInteractionController, DEFAULT_FADE_DELAY,
};
use termfolio::page::layout::portfolio_document;
use termfolio::page::{Dom, PageEvent};

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_control() -> impl Strategy<Value = Control> {
    prop_oneof![
        Just(Control::Red),
        Just(Control::Yellow),
        Just(Control::Green),
    ]
}

fn arb_nonzero_delta() -> impl Strategy<Value = f64> {
    prop_oneof![0.001f64..10_000.0, -10_000.0f64..-0.001]
}

fn friends(count: usize) -> Vec<FriendEntry> {
    (0..count)
        .map(|index| FriendEntry {
            name: format!("Friend{}", index),
            handle: format!("f{}", index),
            quote: format!("quote {}", index),
            url: format!("https://f{}.example", index),
        })
        .collect()
}

proptest! {
    #[test]
    fn rotation_steps_by_sign_of_delta(
        len in 1usize..64,
        seed in any::<usize>(),
        delta in arb_nonzero_delta(),
    ) {
        let index = seed % len;
        let step = if delta > 0.0 { 1 } else { len - 1 };
        let next = rotate(index, len, delta);
        prop_assert_eq!(next, (index + step) % len);
        prop_assert!(next < len);
    }

    #[test]
    fn zero_delta_leaves_index(len in 1usize..64, seed in any::<usize>()) {
        let index = seed % len;
        prop_assert_eq!(rotate(index, len, 0.0), index);
        prop_assert_eq!(rotate(index, len, f64::NAN), index);
    }

    #[test]
    fn control_clicks_follow_model(clicks in prop::collection::vec(arb_control(), 0..32)) {
        let (doc, map) = portfolio_document(1024);
        let mut page = PageInteractionController::initialize(doc, ControllerSettings::default())
            .expect("bind page");
        let mut expected = false;

        for control in clicks {
            let index = Control::ALL.iter().position(|c| *c == control).expect("known control");
            page.dispatch(PageEvent::Click { target: map.controls[index] });
            expected = match control {
                Control::Red => !expected,
                Control::Yellow => true,
                Control::Green => false,
            };
            prop_assert_eq!(page.is_minimized(), expected);
            prop_assert_eq!(page.dom().has_class(&map.terminal, "minimized"), expected);
        }
    }

    #[test]
    fn resize_above_breakpoint_clears_active(
        start in 200u32..=768,
        width in 769u32..5000,
    ) {
        let (doc, map) = portfolio_document(start);
        let mut page = PageInteractionController::initialize(doc, ControllerSettings::default())
            .expect("bind page");
        page.dispatch(PageEvent::Click { target: map.menu_button });
        prop_assert!(page.is_menu_open());

        page.dom_mut().set_viewport_width(width);
        page.dispatch(PageEvent::Resize);
        prop_assert!(!page.dom().has_class(&map.sidebar, "active"));
        prop_assert!(!page.dom().has_class(&map.menu_button, "active"));
    }

    #[test]
    fn wheel_sequence_settles_on_current_entry(
        count in 1usize..6,
        deltas in prop::collection::vec(arb_nonzero_delta(), 1..20),
    ) {
        let settings = ControllerSettings {
            friends: friends(count),
            ..ControllerSettings::default()
        };
        let (doc, map) = portfolio_document(1024);
        let mut page = PageInteractionController::initialize(doc, settings).expect("bind page");
        page.dispatch(PageEvent::Click { target: map.corner_fold });

        let mut expected = 0usize;
        for delta_y in deltas {
            page.dispatch(PageEvent::Wheel { target: map.corner_fold, delta_y });
            expected = rotate(expected, count, delta_y);
            prop_assert_eq!(page.current_index(), expected);
            prop_assert!(page.current_index() < count);
        }

        page.advance(DEFAULT_FADE_DELAY);
        let text = page.dom().text_content(map.friend_link);
        prop_assert_eq!(text, format!("Friend{} @ f{}", expected, expected));
        prop_assert_eq!(page.dom().style(&map.friend_info, "opacity"), "1");
        prop_assert_eq!(page.next_due(), None);
    }
}

#[test]
fn fade_delay_is_idle_after_settling() {
    let (doc, _) = portfolio_document(1024);
    let mut page =
        PageInteractionController::initialize(doc, ControllerSettings::default()).expect("bind");
    assert_eq!(page.next_due(), Some(DEFAULT_FADE_DELAY));
    assert_eq!(page.advance(Duration::from_secs(1)), 1);
    assert_eq!(page.next_due(), None);
}
