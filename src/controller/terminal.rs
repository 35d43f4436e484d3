//! Terminal panel: minimize/restore through the window controls, a click on
//! the panel, or Ctrl/Cmd + backtick, and hover highlighting of its lines.

use super::selectors::{
    HOVER_BACKGROUND, MINIMIZED_CLASS, TOGGLE_KEY, UNHOVERED_BACKGROUND,
};
use crate::page::{Dom, EventResponse, KeyChord};
use tracing::debug;

/// One of the three window-control dots in the terminal header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Always toggles.
    Red,
    /// Minimizes only.
    Yellow,
    /// Restores only.
    Green,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Red, Control::Yellow, Control::Green];

    pub fn class(self) -> &'static str {
        match self {
            Control::Red => "red",
            Control::Yellow => "yellow",
            Control::Green => "green",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerminalPanel<N> {
    terminal: N,
    /// Indexed like [`Control::ALL`]; a missing control is simply unbound.
    controls: [Option<N>; 3],
    lines: Vec<N>,
    is_minimized: bool,
}

impl<N: Clone + PartialEq> TerminalPanel<N> {
    pub fn new(terminal: N, controls: [Option<N>; 3], lines: Vec<N>) -> Self {
        Self {
            terminal,
            controls,
            lines,
            is_minimized: false,
        }
    }

    pub fn is_minimized(&self) -> bool {
        self.is_minimized
    }

    pub fn element(&self) -> &N {
        &self.terminal
    }

    pub fn toggle<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        self.is_minimized = !self.is_minimized;
        if self.is_minimized {
            dom.add_class(&self.terminal, MINIMIZED_CLASS);
        } else {
            dom.remove_class(&self.terminal, MINIMIZED_CLASS);
        }
        debug!(minimized = self.is_minimized, "terminal toggled");
    }

    pub fn control_at(&self, node: &N) -> Option<Control> {
        Control::ALL
            .into_iter()
            .zip(&self.controls)
            .find(|(_, bound)| bound.as_ref() == Some(node))
            .map(|(control, _)| control)
    }

    pub fn is_panel(&self, node: &N) -> bool {
        &self.terminal == node
    }

    pub fn is_line(&self, node: &N) -> bool {
        self.lines.contains(node)
    }

    /// Control clicks never reach the panel or the document.
    pub fn on_control_click<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        control: Control,
    ) -> EventResponse {
        let should_toggle = match control {
            Control::Red => true,
            Control::Yellow => !self.is_minimized,
            Control::Green => self.is_minimized,
        };
        if should_toggle {
            self.toggle(dom);
        }
        EventResponse {
            default_prevented: false,
            propagation_stopped: true,
        }
    }

    /// Click-to-restore; no effect while maximized.
    pub fn on_panel_click<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        if self.is_minimized {
            self.toggle(dom);
        }
    }

    pub fn on_key_down<D: Dom<Node = N>>(&mut self, dom: &mut D, chord: &KeyChord) -> EventResponse {
        if (chord.ctrl || chord.meta) && chord.key == TOGGLE_KEY {
            self.toggle(dom);
            EventResponse::prevented()
        } else {
            EventResponse::ignored()
        }
    }

    pub fn on_line_enter<D: Dom<Node = N>>(&self, dom: &mut D, line: &N) {
        dom.set_style(line, "background-color", HOVER_BACKGROUND);
    }

    pub fn on_line_leave<D: Dom<Node = N>>(&self, dom: &mut D, line: &N) {
        dom.set_style(line, "background-color", UNHOVERED_BACKGROUND);
    }
}
