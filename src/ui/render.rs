//! Draws the portfolio page from the headless document and reports the
//! geometry of every interactive region back to the [`App`].

use crate::controller::selectors;
use crate::page::{Dom, Fragment, NodeId};
use crate::ui::app::{App, FrameLayout, Hit};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;
const FRIEND_CARD_WIDTH: u16 = 36;
const FRIEND_CARD_HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, app: &App) -> FrameLayout {
    let theme = app.theme;
    let mut layout = FrameLayout::default();
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)),
        area,
    );

    // Main layout: Body + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    if app.is_mobile() {
        let mobile_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(main_chunks[0]);
        render_main(frame, app, mobile_chunks[1], &mut layout);
        render_top_bar(frame, app, mobile_chunks[0], &mut layout);

        if app.is_open(app.map.sidebar) {
            let overlay = Rect {
                width: SIDEBAR_WIDTH.min(mobile_chunks[1].width),
                ..mobile_chunks[1]
            };
            frame.render_widget(Clear, overlay);
            render_sidebar(frame, app, overlay, &mut layout);
        }
    } else {
        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(main_chunks[0]);
        render_sidebar(frame, app, body_chunks[0], &mut layout);
        render_main(frame, app, body_chunks[1], &mut layout);
    }

    render_friend_links(frame, app, main_chunks[0], &mut layout);
    render_footer(frame, theme, main_chunks[1]);

    layout
}

fn hit(layout: &mut FrameLayout, area: Rect, node: NodeId) {
    layout.hits.push(Hit { area, node });
}

fn render_top_bar(frame: &mut Frame, app: &App, area: Rect, layout: &mut FrameLayout) {
    let theme = app.theme;
    let button = Rect {
        width: 3.min(area.width),
        ..area
    };
    let button_style = if app.is_open(app.map.menu_button) {
        Style::default().fg(theme.bg).bg(theme.accent)
    } else {
        Style::default().fg(theme.accent).bg(theme.surface)
    };
    let label = if app.is_open(app.map.menu_button) { " ✕ " } else { " ☰ " };

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(label, button_style),
            Span::styled(" ~/guest", Style::default().fg(theme.fg_dim)),
        ])),
        area,
    );
    hit(layout, button, app.map.menu_button);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, layout: &mut FrameLayout) {
    let theme = app.theme;
    let doc = app.doc();
    hit(layout, area, app.map.sidebar);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" ~/guest ")
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    for (row, link) in app.map.nav_links.iter().enumerate() {
        let Ok(offset) = u16::try_from(row * 2) else {
            break;
        };
        if offset >= inner.height {
            break;
        }
        let line_area = Rect {
            y: inner.y + offset,
            height: 1,
            ..inner
        };
        let label = format!(" › {}", doc.text_content(*link));
        frame.render_widget(
            Paragraph::new(label).style(Style::default().fg(theme.fg)),
            line_area,
        );
        hit(layout, line_area, *link);
    }
}

fn render_main(frame: &mut Frame, app: &App, area: Rect, layout: &mut FrameLayout) {
    hit(layout, area, app.map.main);

    let terminal_height = if app.controller.is_minimized() {
        3
    } else {
        3 + app.map.terminal_lines.len() as u16
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(terminal_height), Constraint::Min(0)])
        .split(area);

    render_terminal(frame, app, chunks[0], layout);
    render_sections(frame, app, chunks[1], layout);
}

fn render_terminal(frame: &mut Frame, app: &App, area: Rect, layout: &mut FrameLayout) {
    let theme = app.theme;
    let doc = app.doc();
    hit(layout, area, app.map.terminal);

    let minimized = app.controller.is_minimized();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if minimized { theme.fg_dim } else { theme.fg }))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let colors = [theme.red, theme.yellow, theme.green];
    for (index, (control, color)) in app.map.controls.iter().zip(colors).enumerate() {
        let x = inner.x + 1 + index as u16 * 2;
        if x >= inner.right() {
            break;
        }
        let dot = Rect::new(x, inner.y, 1, 1);
        frame.render_widget(Paragraph::new("●").style(Style::default().fg(color)), dot);
        hit(layout, dot, *control);
    }
    let title_x = inner.x + 8;
    if title_x < inner.right() {
        let title = Rect::new(title_x, inner.y, inner.right() - title_x, 1);
        let mut text = doc.text_content(app.map.terminal_title);
        if minimized {
            text.push_str("  [minimized]");
        }
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(theme.fg_dim)),
            title,
        );
    }

    if minimized {
        return;
    }
    for (row, line) in app.map.terminal_lines.iter().enumerate() {
        let y = inner.y + 1 + row as u16;
        if y >= inner.bottom() {
            break;
        }
        let line_area = Rect::new(inner.x, y, inner.width, 1);
        let hovered =
            doc.style(line, "background-color") == selectors::HOVER_BACKGROUND;
        let text = doc.text_content(*line);
        let style = match (hovered, text.starts_with('$')) {
            (true, _) => Style::default().bg(theme.hover_bg).fg(theme.fg),
            (false, true) => Style::default().fg(theme.green),
            (false, false) => Style::default().fg(theme.fg),
        };
        frame.render_widget(Paragraph::new(format!(" {}", text)).style(style), line_area);
        hit(layout, line_area, *line);
    }
}

fn render_sections(frame: &mut Frame, app: &App, area: Rect, layout: &mut FrameLayout) {
    let theme = app.theme;
    let doc = app.doc();
    let mut lines: Vec<Line> = Vec::new();

    for section in &app.map.sections {
        layout
            .section_rows
            .push((*section, u16::try_from(lines.len()).unwrap_or(u16::MAX)));
        for (index, child) in doc.children(*section).iter().enumerate() {
            let text = doc.text_content(*child);
            if index == 0 {
                lines.push(Line::from(Span::styled(
                    format!("## {}", text),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    format!("   {}", text),
                    Style::default().fg(theme.fg_dim),
                )));
            }
        }
        lines.push(Line::from(""));
    }

    layout.content_height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    layout.content_viewport = area.height;

    let locked = doc.body_style("overflow") == "hidden";
    let paragraph = Paragraph::new(lines)
        .scroll((app.content_scroll, 0))
        .style(Style::default().add_modifier(if locked {
            Modifier::DIM
        } else {
            Modifier::empty()
        }));
    frame.render_widget(paragraph, area);
}

fn render_friend_links(frame: &mut Frame, app: &App, body: Rect, layout: &mut FrameLayout) {
    let theme = app.theme;
    let doc = app.doc();
    let map = &app.map;
    let expanded = doc.has_class(&map.corner_fold, selectors::EXPANDED_CLASS);

    let (width, height) = if expanded {
        (FRIEND_CARD_WIDTH, FRIEND_CARD_HEIGHT)
    } else {
        (4, 2)
    };
    let width = width.min(body.width);
    let height = height.min(body.height);
    let fold = Rect::new(
        body.right() - width,
        body.bottom() - height,
        width,
        height,
    );
    hit(layout, fold, map.friend_container);
    hit(layout, fold, map.corner_fold);
    frame.render_widget(Clear, fold);

    if !expanded {
        frame.render_widget(
            Paragraph::new(vec![Line::from("  ◢"), Line::from(" ◢█")])
                .style(Style::default().fg(theme.accent).bg(theme.bg)),
            fold,
        );
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" friends ")
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(fold);
    frame.render_widget(block, fold);
    hit(layout, inner, map.friend_info);

    let dimmed = doc
        .style(&map.friend_info, "opacity")
        .parse::<f32>()
        .is_ok_and(|opacity| opacity < 1.0);
    let base = if dimmed {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };

    let label: Vec<Span> = doc
        .content(map.friend_link)
        .iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => Span::styled(
                text.clone(),
                base.fg(theme.accent).add_modifier(Modifier::UNDERLINED),
            ),
            Fragment::Span { text, .. } => Span::styled(text.clone(), base.fg(theme.secondary)),
        })
        .collect();
    let url = doc.attribute(&map.friend_link, "href").unwrap_or_default();
    let quote = doc.text_content(map.friend_quote);

    if inner.height > 0 {
        let link_area = Rect { height: 1, ..inner };
        frame.render_widget(Paragraph::new(Line::from(label)), link_area);
        hit(layout, link_area, map.friend_link);
    }
    if inner.height > 1 {
        let rest = Rect {
            y: inner.y + 1,
            height: inner.height - 1,
            ..inner
        };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(format!("“{}”", quote), base.fg(theme.fg))),
                Line::from(Span::styled(url, base.fg(theme.fg_dim))),
            ])
            .wrap(Wrap { trim: true }),
            rest,
        );
        hit(layout, rest, map.friend_quote);
    }
}

fn render_footer(frame: &mut Frame, theme: &Theme, area: Rect) {
    let help_text =
        "[Click] Interact  [Wheel] Scroll / rotate friends  [Ctrl+`] Terminal  [Q] Quit";
    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(theme.fg_dim).bg(theme.bg))
        .block(Block::default());
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageEvent;
    use crate::ui::config::Config;
    use crossterm::event::{Event, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        let mut layout = None;
        terminal
            .draw(|frame| layout = Some(render(frame, app)))
            .expect("draw");
        app.set_layout(layout.expect("layout"));
    }

    fn center(node: NodeId, hits: &[Hit]) -> (u16, u16) {
        let hit = hits
            .iter()
            .rev()
            .find(|hit| hit.node == node)
            .unwrap_or_else(|| panic!("{:?} was not drawn", node));
        (hit.area.x + hit.area.width / 2, hit.area.y + hit.area.height / 2)
    }

    #[test]
    fn test_desktop_draws_sidebar_links_and_controls() {
        let mut app = App::new(&Config::default(), 120).expect("bind");
        draw(&mut app, 120, 40);
        let hits = app.layout().hits.clone();

        for link in app.map.nav_links.clone() {
            let (x, y) = center(link, &hits);
            assert_eq!(app.node_at(x, y), link);
        }
        for control in app.map.controls {
            let (x, y) = center(control, &hits);
            assert_eq!(app.node_at(x, y), control);
        }
        assert!(hits.iter().all(|hit| hit.node != app.map.menu_button));
    }

    #[test]
    fn test_mobile_hides_sidebar_until_menu_opens() {
        let mut app = App::new(&Config::default(), 80).expect("bind");
        draw(&mut app, 80, 30);
        assert_eq!(app.node_at(1, 0), app.map.menu_button);
        assert_ne!(app.node_at(5, 5), app.map.sidebar);

        app.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1,
            row: 0,
            modifiers: KeyModifiers::NONE,
        }));
        assert!(app.controller.is_menu_open());
        draw(&mut app, 80, 30);
        let under = app.node_at(5, 3);
        assert!(app.doc().contains(&app.map.sidebar, &under));
    }

    #[test]
    fn test_minimized_terminal_hides_lines() {
        let mut app = App::new(&Config::default(), 120).expect("bind");
        app.controller.toggle_terminal();
        draw(&mut app, 120, 40);
        let doc = app.doc();
        assert!(doc.has_class(&app.map.terminal, "minimized"));
        assert!(app
            .layout()
            .hits
            .iter()
            .all(|hit| !app.map.terminal_lines.contains(&hit.node)));
    }

    #[test]
    fn test_expanded_fold_exposes_friend_info() {
        let mut app = App::new(&Config::default(), 120).expect("bind");
        let fold = app.map.corner_fold;
        app.controller.dispatch(PageEvent::Click { target: fold });
        draw(&mut app, 120, 40);
        let info = app.node_at(110, 36);
        assert!(app.doc().contains(&app.map.friend_info, &info));
    }

    #[test]
    fn test_anchor_click_scrolls_to_section() {
        let mut app = App::new(&Config::default(), 120).expect("bind");
        draw(&mut app, 120, 20);
        let contact = *app.map.sections.last().expect("sections");
        let link = *app.map.nav_links.last().expect("links");
        app.controller.dispatch(PageEvent::Click { target: link });
        app.set_layout(app.layout().clone());
        let row = app
            .layout()
            .section_rows
            .iter()
            .find(|(section, _)| *section == contact)
            .map(|(_, row)| *row)
            .expect("contact row");
        assert_eq!(app.content_scroll, row);
    }
}
