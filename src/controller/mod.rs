//! # Page Interaction Controller
//!
//! Owns every piece of page-lifetime interaction state and the element
//! handles it acts on. A host builds it once with
//! [`PageInteractionController::initialize`], then feeds it events through
//! [`dispatch`](PageInteractionController::dispatch) and the passage of time
//! through [`advance`](PageInteractionController::advance).
//!
//! ## Clusters
//!
//! | Cluster | State | Elements |
//! |---------|-------|----------|
//! | [`TerminalPanel`] | `is_minimized` | `.terminal`, `.control.*`, `.terminal-line` |
//! | [`ResponsiveNav`] | `active` class | `#mobileMenuBtn`, `#sidebar`, `a[href^="#"]` |
//! | [`FriendRotator`] | index, expanded, timers | `#friendLinksContainer`, `#cornerFold`, `#friendInfo` |
//!
//! ## Event Routing
//!
//! Clicks, wheel and transition-end events bubble from the target up to the
//! document, visiting each node's listeners in turn. A control click stops
//! propagation, so the panel and document listeners never see it. Mouse
//! enter/leave only reach their exact target.

pub mod friends;
pub mod nav;
pub mod terminal;
pub mod timers;

pub use friends::{Deferred, FriendEntry, FriendRotator};
pub use nav::ResponsiveNav;
pub use terminal::{Control, TerminalPanel};
pub use timers::{Scheduler, TimerHandle};

use crate::page::{Dom, EventResponse, KeyChord, PageEvent};
use friends::FriendNodes;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, trace};

/// Element ids, classes and tokens shared with the page markup.
pub mod selectors {
    pub const MENU_BUTTON_ID: &str = "mobileMenuBtn";
    pub const SIDEBAR_ID: &str = "sidebar";
    pub const SKILLS_OUTPUT_ID: &str = "skills-output";
    pub const FRIEND_CONTAINER_ID: &str = "friendLinksContainer";
    pub const CORNER_FOLD_ID: &str = "cornerFold";
    pub const FRIEND_INFO_ID: &str = "friendInfo";

    pub const TERMINAL_CLASS: &str = "terminal";
    pub const CONTROL_CLASS: &str = "control";
    pub const CONTROL_COLORS: [&str; 3] = ["red", "yellow", "green"];
    pub const TERMINAL_LINE_CLASS: &str = "terminal-line";
    pub const FRIEND_LINK_CLASS: &str = "friend-link";
    pub const FRIEND_QUOTE_CLASS: &str = "friend-quote";
    pub const AT_SYMBOL_CLASS: &str = "at-symbol";

    pub const ACTIVE_CLASS: &str = "active";
    pub const MINIMIZED_CLASS: &str = "minimized";
    pub const EXPANDED_CLASS: &str = "expanded";

    pub const HOVER_BACKGROUND: &str = "rgba(255, 255, 255, 0.05)";
    pub const UNHOVERED_BACKGROUND: &str = "transparent";

    /// `KeyboardEvent.key` that toggles the terminal together with Ctrl/Cmd.
    pub const TOGGLE_KEY: &str = "`";
}

pub const DEFAULT_MOBILE_BREAKPOINT_PX: u32 = 768;
pub const DEFAULT_COLLAPSE_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_FADE_DELAY: Duration = Duration::from_millis(150);

pub const READY_MESSAGE: &str =
    "🚀 Terminal loaded successfully! Use Ctrl+` to toggle terminal visibility.";

/// Why the controller could not bind to a page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("required element `{selector}` not found")]
    MissingElement { selector: String },
    #[error("friend list is empty")]
    NoFriends,
}

fn required<N>(node: Option<N>, selector: &str) -> Result<N, BindError> {
    node.ok_or_else(|| BindError::MissingElement {
        selector: selector.to_string(),
    })
}

/// Tunables and content the controller is initialized with.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub friends: Vec<FriendEntry>,
    pub mobile_breakpoint_px: u32,
    pub collapse_delay: Duration,
    pub fade_delay: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            friends: vec![default_friend()],
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
            collapse_delay: DEFAULT_COLLAPSE_DELAY,
            fade_delay: DEFAULT_FADE_DELAY,
        }
    }
}

pub fn default_friend() -> FriendEntry {
    FriendEntry {
        name: "My Goat".to_string(),
        handle: "LtHero".to_string(),
        quote: "哥哥下雨我就不打伞".to_string(),
        url: "https://tools.lthero.cn/resume/".to_string(),
    }
}

pub struct PageInteractionController<D: Dom> {
    dom: D,
    terminal: TerminalPanel<D::Node>,
    nav: ResponsiveNav<D::Node>,
    friends: FriendRotator<D::Node>,
    /// Looked up for parity with the markup; nothing writes to it yet.
    skills_output: Option<D::Node>,
    timers: Scheduler<Deferred>,
}

impl<D: Dom> PageInteractionController<D> {
    /// Look up every element once, announce readiness on the console and
    /// render the first friend entry.
    pub fn initialize(mut dom: D, settings: ControllerSettings) -> Result<Self, BindError> {
        use selectors::*;

        if settings.friends.is_empty() {
            return Err(BindError::NoFriends);
        }

        let menu_button = required(dom.by_id(MENU_BUTTON_ID), "#mobileMenuBtn")?;
        let sidebar = required(dom.by_id(SIDEBAR_ID), "#sidebar")?;
        let terminal = required(
            dom.by_classes(&[TERMINAL_CLASS]).into_iter().next(),
            ".terminal",
        )?;
        let skills_output = dom.by_id(SKILLS_OUTPUT_ID);
        let controls = CONTROL_COLORS
            .map(|color| dom.by_classes(&[CONTROL_CLASS, color]).into_iter().next());
        let lines = dom.by_classes(&[TERMINAL_LINE_CLASS]);
        let hash_links = dom.hash_links();

        let container = required(dom.by_id(FRIEND_CONTAINER_ID), "#friendLinksContainer")?;
        let fold = required(dom.by_id(CORNER_FOLD_ID), "#cornerFold")?;
        let info = required(dom.by_id(FRIEND_INFO_ID), "#friendInfo")?;
        let link = required(
            dom.descendant_by_class(&info, FRIEND_LINK_CLASS),
            "#friendInfo .friend-link",
        )?;
        let quote = required(
            dom.descendant_by_class(&info, FRIEND_QUOTE_CLASS),
            "#friendInfo .friend-quote",
        )?;

        dom.console_log(READY_MESSAGE);
        info!(
            friends = settings.friends.len(),
            links = hash_links.len(),
            "page interactions bound"
        );

        let mut controller = Self {
            terminal: TerminalPanel::new(terminal, controls, lines),
            nav: ResponsiveNav::new(menu_button, sidebar, hash_links, settings.mobile_breakpoint_px),
            friends: FriendRotator::new(
                FriendNodes {
                    container,
                    fold,
                    info,
                    link,
                    quote,
                },
                settings.friends,
                settings.collapse_delay,
                settings.fade_delay,
            ),
            skills_output,
            timers: Scheduler::new(),
            dom,
        };
        controller.update_friend();
        Ok(controller)
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn is_minimized(&self) -> bool {
        self.terminal.is_minimized()
    }

    pub fn is_expanded(&self) -> bool {
        self.friends.is_expanded()
    }

    pub fn is_menu_open(&self) -> bool {
        self.nav.is_open(&self.dom)
    }

    pub fn current_index(&self) -> usize {
        self.friends.current_index()
    }

    pub fn current_friend(&self) -> &FriendEntry {
        self.friends.current()
    }

    pub fn is_collapse_pending(&self) -> bool {
        self.friends.is_collapse_pending()
    }

    pub fn skills_output(&self) -> Option<&D::Node> {
        self.skills_output.as_ref()
    }

    /// Virtual time elapsed since initialization.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Delay until the next deferred task, if any is pending.
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn toggle_terminal(&mut self) {
        self.terminal.toggle(&mut self.dom);
    }

    pub fn update_friend(&mut self) {
        self.friends.update_friend(&mut self.dom, &mut self.timers);
    }

    pub fn dispatch(&mut self, event: PageEvent<D::Node>) -> EventResponse {
        match event {
            PageEvent::Click { target } => self.dispatch_click(&target),
            PageEvent::KeyDown(chord) => self.dispatch_key(&chord),
            PageEvent::Wheel { target, delta_y } => self.dispatch_wheel(&target, delta_y),
            PageEvent::MouseEnter { target } => {
                if self.friends.is_container(&target) {
                    self.friends.on_container_enter(&mut self.timers);
                }
                if self.terminal.is_line(&target) {
                    self.terminal.on_line_enter(&mut self.dom, &target);
                }
                EventResponse::ignored()
            }
            PageEvent::MouseLeave { target } => {
                if self.friends.is_container(&target) {
                    self.friends.on_container_leave(&mut self.timers);
                }
                if self.terminal.is_line(&target) {
                    self.terminal.on_line_leave(&mut self.dom, &target);
                }
                EventResponse::ignored()
            }
            PageEvent::Resize => {
                self.nav.on_resize(&mut self.dom);
                EventResponse::ignored()
            }
            PageEvent::TransitionEnd { target } => {
                let sidebar = self.nav.sidebar().clone();
                if self.dom.contains(&sidebar, &target) {
                    self.nav.on_transition_end(&mut self.dom);
                }
                EventResponse::ignored()
            }
        }
    }

    /// Run every deferred task that falls due within `elapsed`, in order.
    /// Returns how many ran.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let deadline = self.timers.now() + elapsed;
        let mut ran = 0;
        while let Some((handle, task)) = self.timers.pop_due(deadline) {
            self.friends.run(&mut self.dom, handle, task);
            ran += 1;
        }
        self.timers.set_now(deadline);
        ran
    }

    fn dispatch_click(&mut self, target: &D::Node) -> EventResponse {
        let mut response = EventResponse::ignored();
        let mut current = Some(target.clone());
        while let Some(node) = current {
            response.merge(self.click_listeners(&node));
            if response.propagation_stopped {
                trace!("click propagation stopped");
                return response;
            }
            current = self.dom.parent(&node);
        }
        self.nav.on_document_click(&mut self.dom, target);
        response
    }

    fn click_listeners(&mut self, node: &D::Node) -> EventResponse {
        let mut response = EventResponse::ignored();
        if let Some(control) = self.terminal.control_at(node) {
            response.merge(self.terminal.on_control_click(&mut self.dom, control));
        }
        if self.terminal.is_panel(node) {
            self.terminal.on_panel_click(&mut self.dom);
        }
        if self.nav.is_menu_button(node) {
            self.nav.on_menu_button_click(&mut self.dom);
        }
        if self.nav.is_hash_link(node) {
            response.merge(self.nav.on_anchor_click(&mut self.dom, node));
        }
        if self.friends.is_fold(node) {
            self.friends.on_fold_click(&mut self.dom);
        }
        response
    }

    fn dispatch_key(&mut self, chord: &KeyChord) -> EventResponse {
        self.terminal.on_key_down(&mut self.dom, chord)
    }

    fn dispatch_wheel(&mut self, target: &D::Node, delta_y: f64) -> EventResponse {
        let mut response = EventResponse::ignored();
        let mut current = Some(target.clone());
        while let Some(node) = current {
            if self.friends.is_fold(&node) {
                response.merge(self.friends.on_wheel(&mut self.dom, &mut self.timers, delta_y));
            }
            current = self.dom.parent(&node);
        }
        response
    }
}
