//! # Friend Links Rotator
//!
//! A corner widget with two states:
//!
//! ```text
//!   COLLAPSED --click fold--> EXPANDED
//!   EXPANDED --leave, 500ms without re-entry--> COLLAPSED
//! ```
//!
//! While expanded, wheel input on the fold cycles through the friend list
//! with wraparound. Every change of entry is masked by a dim / swap / restore
//! sequence on the info panel.

use super::selectors::{AT_SYMBOL_CLASS, EXPANDED_CLASS};
use super::timers::{Scheduler, TimerHandle};
use crate::page::{Dom, EventResponse, Fragment};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

/// Opacity of the info panel while its content is being swapped.
pub const DIMMED_OPACITY: &str = "0.7";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FriendEntry {
    pub name: String,
    pub handle: String,
    pub quote: String,
    pub url: String,
}

impl FriendEntry {
    /// Link label: name, an `@` span, then the handle.
    pub fn label(&self) -> [Fragment; 3] {
        [
            Fragment::text(format!("{} ", self.name)),
            Fragment::span(AT_SYMBOL_CLASS, "@"),
            Fragment::text(format!(" {}", self.handle)),
        ]
    }
}

/// Work the rotator defers to the timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Collapse if still expanded.
    Collapse,
    /// Render the entry captured when the fade started.
    SwapFriend { index: usize },
}

/// Move `index` one step in the direction of `delta` over `len` entries.
///
/// A zero (or NaN) delta leaves the index where it is.
pub fn rotate(index: usize, len: usize, delta: f64) -> usize {
    if len == 0 {
        return 0;
    }
    if delta > 0.0 {
        (index + 1) % len
    } else if delta < 0.0 {
        (index + len - 1) % len
    } else {
        index % len
    }
}

#[derive(Debug, Clone)]
pub struct FriendNodes<N> {
    pub container: N,
    pub fold: N,
    pub info: N,
    pub link: N,
    pub quote: N,
}

#[derive(Debug, Clone)]
pub struct FriendRotator<N> {
    nodes: FriendNodes<N>,
    friends: Vec<FriendEntry>,
    current_index: usize,
    is_expanded: bool,
    leave_timer: Option<TimerHandle>,
    fade_timer: Option<TimerHandle>,
    collapse_delay: Duration,
    fade_delay: Duration,
}

impl<N: Clone + PartialEq> FriendRotator<N> {
    /// `friends` must not be empty; the controller checks this before binding.
    pub(crate) fn new(
        nodes: FriendNodes<N>,
        friends: Vec<FriendEntry>,
        collapse_delay: Duration,
        fade_delay: Duration,
    ) -> Self {
        Self {
            nodes,
            friends,
            current_index: 0,
            is_expanded: false,
            leave_timer: None,
            fade_timer: None,
            collapse_delay,
            fade_delay,
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.is_expanded
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &FriendEntry {
        &self.friends[self.current_index]
    }

    pub fn is_collapse_pending(&self) -> bool {
        self.leave_timer.is_some()
    }

    pub fn is_container(&self, node: &N) -> bool {
        &self.nodes.container == node
    }

    pub fn is_fold(&self, node: &N) -> bool {
        &self.nodes.fold == node
    }

    /// Click only opens; there is no click-to-collapse.
    pub fn on_fold_click<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        if !self.is_expanded {
            self.expand(dom);
        }
    }

    pub fn on_container_leave(&mut self, timers: &mut Scheduler<Deferred>) {
        if let Some(previous) = self.leave_timer.take() {
            timers.cancel(previous);
        }
        self.leave_timer = Some(timers.schedule(self.collapse_delay, Deferred::Collapse));
        trace!("collapse scheduled");
    }

    pub fn on_container_enter(&mut self, timers: &mut Scheduler<Deferred>) {
        if let Some(pending) = self.leave_timer.take() {
            if timers.cancel(pending) {
                trace!("collapse canceled by re-entry");
            }
        }
    }

    /// Page scroll is suppressed over the fold whether or not it rotates.
    pub fn on_wheel<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        timers: &mut Scheduler<Deferred>,
        delta_y: f64,
    ) -> EventResponse {
        if self.is_expanded && delta_y != 0.0 && !delta_y.is_nan() {
            self.current_index = rotate(self.current_index, self.friends.len(), delta_y);
            debug!(index = self.current_index, "friend rotated");
            self.update_friend(dom, timers);
        }
        EventResponse::prevented()
    }

    /// Dim the panel now, swap in the current entry after the fade delay.
    ///
    /// A swap still pending from an earlier call is replaced, so only the
    /// latest entry is ever shown.
    pub fn update_friend<D: Dom<Node = N>>(&mut self, dom: &mut D, timers: &mut Scheduler<Deferred>) {
        dom.set_style(&self.nodes.info, "opacity", DIMMED_OPACITY);
        if let Some(previous) = self.fade_timer.take() {
            timers.cancel(previous);
        }
        self.fade_timer = Some(timers.schedule(
            self.fade_delay,
            Deferred::SwapFriend {
                index: self.current_index,
            },
        ));
    }

    /// Run a task popped from the timer queue.
    pub fn run<D: Dom<Node = N>>(&mut self, dom: &mut D, handle: TimerHandle, task: Deferred) {
        match task {
            Deferred::Collapse => {
                if self.leave_timer == Some(handle) {
                    self.leave_timer = None;
                }
                if self.is_expanded {
                    self.collapse(dom);
                }
            }
            Deferred::SwapFriend { index } => {
                if self.fade_timer == Some(handle) {
                    self.fade_timer = None;
                }
                self.render(dom, index);
            }
        }
    }

    fn expand<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        self.is_expanded = true;
        dom.add_class(&self.nodes.fold, EXPANDED_CLASS);
        debug!("friend links expanded");
    }

    /// The stylesheet's transition handles the fade-out.
    fn collapse<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        self.is_expanded = false;
        dom.remove_class(&self.nodes.fold, EXPANDED_CLASS);
        debug!("friend links collapsed");
    }

    fn render<D: Dom<Node = N>>(&self, dom: &mut D, index: usize) {
        let Some(friend) = self.friends.get(index) else {
            return;
        };
        dom.set_attribute(&self.nodes.link, "href", &friend.url);
        dom.replace_content(&self.nodes.link, &friend.label());
        dom.set_text(&self.nodes.quote, &friend.quote);
        dom.set_style(&self.nodes.info, "opacity", "1");
    }
}
