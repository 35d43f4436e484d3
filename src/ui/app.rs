use crate::controller::{selectors, BindError, PageInteractionController};
use crate::page::layout::{portfolio_document, PageMap};
use crate::page::{Dom, EventResponse, HeadlessDocument, KeyChord, NodeId, PageEvent};
use crate::ui::config::Config;
use crate::ui::theme::Theme;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use std::time::Duration;
use tracing::trace;

/// Width of one terminal cell in CSS pixels, so 96 columns reach the 768px breakpoint.
pub const CELL_WIDTH_PX: u32 = 8;

/// How long the sidebar's slide transition takes before `transitionend` fires.
pub const SIDEBAR_TRANSITION: Duration = Duration::from_millis(300);

/// Wheel delta reported per scroll notch, matching a typical browser line step.
pub const WHEEL_DELTA: f64 = 100.0;

/// A clickable region from the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub area: Rect,
    pub node: NodeId,
}

/// Geometry produced by a render pass.
#[derive(Debug, Clone, Default)]
pub struct FrameLayout {
    /// In paint order: later entries sit on top of earlier ones.
    pub hits: Vec<Hit>,
    /// First content row of every section.
    pub section_rows: Vec<(NodeId, u16)>,
    /// Rows of scrollable content and the height of its viewport.
    pub content_height: u16,
    pub content_viewport: u16,
}

pub struct App {
    pub controller: PageInteractionController<HeadlessDocument>,
    pub map: PageMap,
    pub theme: &'static Theme,
    pub breakpoint_px: u32,
    pub should_quit: bool,
    pub content_scroll: u16,
    layout: FrameLayout,
    hovered: Vec<NodeId>,
    sidebar_was_open: bool,
    pending_transition: Option<Duration>,
}

impl App {
    pub fn new(config: &Config, columns: u16) -> Result<Self, BindError> {
        let (doc, map) = portfolio_document(u32::from(columns) * CELL_WIDTH_PX);
        let controller = PageInteractionController::initialize(doc, config.controller_settings())?;
        Ok(Self {
            controller,
            map,
            theme: Theme::by_name_or_default(&config.theme),
            breakpoint_px: config.mobile_breakpoint_px,
            should_quit: false,
            content_scroll: 0,
            layout: FrameLayout::default(),
            hovered: Vec::new(),
            sidebar_was_open: false,
            pending_transition: None,
        })
    }

    pub fn doc(&self) -> &HeadlessDocument {
        self.controller.dom()
    }

    pub fn is_mobile(&self) -> bool {
        self.doc().viewport_width() <= self.breakpoint_px
    }

    pub fn is_open(&self, node: NodeId) -> bool {
        self.doc().has_class(&node, selectors::ACTIVE_CLASS)
    }

    pub fn layout(&self) -> &FrameLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: FrameLayout) {
        self.layout = layout;
        self.apply_scroll_requests();
    }

    /// Innermost node under a cell, or `<body>` when nothing was drawn there.
    pub fn node_at(&self, column: u16, row: u16) -> NodeId {
        let position = Position::new(column, row);
        self.layout
            .hits
            .iter()
            .rev()
            .find(|hit| hit.area.contains(position))
            .map(|hit| hit.node)
            .unwrap_or_else(|| self.doc().body())
    }

    /// Every node whose region covers a cell.
    fn nodes_at(&self, column: u16, row: u16) -> Vec<NodeId> {
        let position = Position::new(column, row);
        self.layout
            .hits
            .iter()
            .filter(|hit| hit.area.contains(position))
            .map(|hit| hit.node)
            .collect()
    }

    /// Advance page time: deferred friend-link work and the sidebar transition.
    pub fn tick(&mut self, elapsed: Duration) {
        self.controller.advance(elapsed);
        if let Some(remaining) = self.pending_transition {
            if remaining <= elapsed {
                self.pending_transition = None;
                self.dispatch(PageEvent::TransitionEnd {
                    target: self.map.sidebar,
                });
            } else {
                self.pending_transition = Some(remaining - elapsed);
            }
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, _) => {
                self.controller
                    .dom_mut()
                    .set_viewport_width(u32::from(*columns) * CELL_WIDTH_PX);
                self.dispatch(PageEvent::Resize);
                // The closing transition ends at desktop width, where the
                // unlock is skipped; the desktop page must stay scrollable.
                if !self.is_mobile() && self.doc().body_style("overflow") == "hidden" {
                    self.controller.dom_mut().set_body_style("overflow", "");
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) {
        let chord = key_chord(key);
        let response = match &chord {
            Some(chord) => self.dispatch(PageEvent::KeyDown(chord.clone())),
            None => EventResponse::ignored(),
        };
        if response.default_prevented {
            return;
        }
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc if plain => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') if plain => self.scroll_content(1),
            KeyCode::Up | KeyCode::Char('k') if plain => self.scroll_content(-1),
            KeyCode::PageDown => self.scroll_content(i32::from(self.layout.content_viewport)),
            KeyCode::PageUp => self.scroll_content(-i32::from(self.layout.content_viewport)),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.update_hover(mouse.column, mouse.row);
                let target = self.node_at(mouse.column, mouse.row);
                self.dispatch(PageEvent::Click { target });
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                self.update_hover(mouse.column, mouse.row);
                let delta_y = if mouse.kind == MouseEventKind::ScrollDown {
                    WHEEL_DELTA
                } else {
                    -WHEEL_DELTA
                };
                let target = self.node_at(mouse.column, mouse.row);
                let response = self.dispatch(PageEvent::Wheel { target, delta_y });
                if !response.default_prevented {
                    self.scroll_content(if delta_y > 0.0 { 3 } else { -3 });
                }
            }
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.update_hover(mouse.column, mouse.row);
            }
            _ => {}
        }
    }

    /// Emit leave/enter for hover-tracked nodes whose coverage changed.
    fn update_hover(&mut self, column: u16, row: u16) {
        let tracked: Vec<NodeId> = self
            .nodes_at(column, row)
            .into_iter()
            .filter(|node| {
                *node == self.map.friend_container || self.map.terminal_lines.contains(node)
            })
            .collect();

        let left: Vec<NodeId> = self
            .hovered
            .iter()
            .copied()
            .filter(|node| !tracked.contains(node))
            .collect();
        let entered: Vec<NodeId> = tracked
            .iter()
            .copied()
            .filter(|node| !self.hovered.contains(node))
            .collect();

        for target in left {
            self.dispatch(PageEvent::MouseLeave { target });
        }
        for target in entered {
            self.dispatch(PageEvent::MouseEnter { target });
        }
        self.hovered = tracked;
    }

    fn dispatch(&mut self, event: PageEvent<NodeId>) -> EventResponse {
        trace!(?event, "dispatch");
        let response = self.controller.dispatch(event);

        let open = self.is_open(self.map.sidebar);
        if open != self.sidebar_was_open {
            self.sidebar_was_open = open;
            self.pending_transition = Some(SIDEBAR_TRANSITION);
        }
        self.apply_scroll_requests();
        response
    }

    /// Page scrolling, blocked while the body's overflow is hidden.
    fn scroll_content(&mut self, rows: i32) {
        if self.doc().body_style("overflow") == "hidden" {
            return;
        }
        let max = self
            .layout
            .content_height
            .saturating_sub(self.layout.content_viewport);
        let next = (i32::from(self.content_scroll) + rows).clamp(0, i32::from(max));
        self.content_scroll = u16::try_from(next).unwrap_or(max);
    }

    fn apply_scroll_requests(&mut self) {
        let requests = self.controller.dom_mut().take_scroll_requests();
        if let Some(target) = requests.last() {
            if let Some((_, row)) = self
                .layout
                .section_rows
                .iter()
                .find(|(section, _)| section == target)
            {
                self.content_scroll = *row;
            }
        }
    }

    pub fn has_pending_transition(&self) -> bool {
        self.pending_transition.is_some()
    }
}

/// Translate a crossterm key into the page's key representation.
///
/// Terminals report Ctrl+backtick inconsistently; besides the literal
/// character, the NUL that many of them send (reported as Ctrl+Space or
/// Ctrl+@) is treated as the same chord.
pub fn key_chord(key: &KeyEvent) -> Option<KeyChord> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let meta = key.modifiers.contains(KeyModifiers::SUPER);
    let name = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('@') if ctrl => selectors::TOGGLE_KEY.to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        _ => return None,
    };
    Some(KeyChord {
        key: name,
        ctrl,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_backtick_chord() {
        let chord = key_chord(&key(KeyCode::Char('`'), KeyModifiers::CONTROL)).expect("chord");
        assert_eq!(chord, KeyChord::new("`").with_ctrl());
    }

    #[test]
    fn test_ctrl_space_maps_to_backtick() {
        let chord = key_chord(&key(KeyCode::Char(' '), KeyModifiers::CONTROL)).expect("chord");
        assert_eq!(chord.key, "`");
        let plain = key_chord(&key(KeyCode::Char(' '), KeyModifiers::NONE)).expect("chord");
        assert_eq!(plain.key, " ");
    }

    #[test]
    fn test_super_is_meta() {
        let chord = key_chord(&key(KeyCode::Char('`'), KeyModifiers::SUPER)).expect("chord");
        assert!(chord.meta);
        assert!(!chord.ctrl);
    }

    #[test]
    fn test_function_keys_have_no_chord() {
        assert!(key_chord(&key(KeyCode::F(5), KeyModifiers::NONE)).is_none());
    }

    #[test]
    fn test_viewport_width_from_columns() {
        let app = App::new(&Config::default(), 96).expect("bind");
        assert_eq!(app.doc().viewport_width(), 768);
        assert!(app.is_mobile());
        let app = App::new(&Config::default(), 97).expect("bind");
        assert!(!app.is_mobile());
    }
}
