//! # Portfolio Page Layout
//!
//! Builds the portfolio page as a [`HeadlessDocument`], using the same
//! element ids and classes the browser markup uses, and returns a
//! [`PageMap`] so the renderer can find each region without re-querying.

use super::document::{ElementSpec, HeadlessDocument, NodeId};
use crate::controller::selectors;

/// Sections reachable from the sidebar: (id, title, body lines).
const SECTIONS: &[(&str, &str, &[&str])] = &[
    (
        "about",
        "About",
        &[
            "Systems programmer who enjoys terminals, type systems and small tools.",
            "Currently building things in Rust and occasionally TypeScript.",
        ],
    ),
    (
        "projects",
        "Projects",
        &[
            "termfolio - this page, rendered in your terminal.",
            "dotfiles - a tidy home directory, kept under version control.",
            "notes - a static site generator for plain text notes.",
        ],
    ),
    (
        "skills",
        "Skills",
        &[
            "Languages: Rust, TypeScript, Python, Bash",
            "Tools: Git, Docker, Neovim, tmux",
            "Interests: compilers, networking, UI toolkits",
        ],
    ),
    (
        "contact",
        "Contact",
        &[
            "Email: hello@example.com",
            "GitHub: github.com/example",
        ],
    ),
];

const TERMINAL_LINES: &[&str] = &[
    "$ whoami",
    "guest",
    "$ cat skills.txt",
];

const SKILLS_OUTPUT: &str = "rust  typescript  python  bash  git  docker";

/// Node handles for every rendered region of the page.
#[derive(Debug, Clone)]
pub struct PageMap {
    pub menu_button: NodeId,
    pub sidebar: NodeId,
    pub nav_links: Vec<NodeId>,
    pub main: NodeId,
    pub terminal: NodeId,
    pub terminal_title: NodeId,
    /// Red, yellow, green.
    pub controls: [NodeId; 3],
    pub terminal_lines: Vec<NodeId>,
    pub sections: Vec<NodeId>,
    pub friend_container: NodeId,
    pub corner_fold: NodeId,
    pub friend_info: NodeId,
    pub friend_link: NodeId,
    pub friend_quote: NodeId,
}

/// Build the portfolio document at the given viewport width.
pub fn portfolio_document(viewport_width: u32) -> (HeadlessDocument, PageMap) {
    let mut doc = HeadlessDocument::new(viewport_width);
    let body = doc.body();

    let menu_button = doc.append(
        body,
        ElementSpec::new("button")
            .id(selectors::MENU_BUTTON_ID)
            .class("mobile-menu-btn")
            .text("☰"),
    );

    let sidebar = doc.append(
        body,
        ElementSpec::new("nav")
            .id(selectors::SIDEBAR_ID)
            .class("sidebar"),
    );
    doc.append(sidebar, ElementSpec::new("div").class("profile").text("~/guest"));
    let nav_links = SECTIONS
        .iter()
        .map(|(id, title, _)| {
            doc.append(
                sidebar,
                ElementSpec::new("a")
                    .class("nav-link")
                    .attr("href", &format!("#{}", id))
                    .text(title),
            )
        })
        .collect();

    let main = doc.append(body, ElementSpec::new("main").class("main-content"));

    let terminal = doc.append(main, ElementSpec::new("div").class(selectors::TERMINAL_CLASS));
    let header = doc.append(terminal, ElementSpec::new("div").class("terminal-header"));
    let controls = selectors::CONTROL_COLORS.map(|color| {
        doc.append(
            header,
            ElementSpec::new("span").class(&format!("{} {}", selectors::CONTROL_CLASS, color)),
        )
    });
    let terminal_title = doc.append(
        header,
        ElementSpec::new("span")
            .class("terminal-title")
            .text("guest@portfolio: ~"),
    );
    let terminal_body = doc.append(terminal, ElementSpec::new("div").class("terminal-body"));
    let mut terminal_lines: Vec<NodeId> = TERMINAL_LINES
        .iter()
        .map(|line| {
            doc.append(
                terminal_body,
                ElementSpec::new("div")
                    .class(selectors::TERMINAL_LINE_CLASS)
                    .text(line),
            )
        })
        .collect();
    terminal_lines.push(doc.append(
        terminal_body,
        ElementSpec::new("div")
            .id(selectors::SKILLS_OUTPUT_ID)
            .class(selectors::TERMINAL_LINE_CLASS)
            .text(SKILLS_OUTPUT),
    ));

    let sections = SECTIONS
        .iter()
        .map(|(id, title, lines)| {
            let section = doc.append(main, ElementSpec::new("section").id(id).class("section"));
            doc.append(section, ElementSpec::new("h2").text(title));
            for line in lines.iter() {
                doc.append(section, ElementSpec::new("p").text(line));
            }
            section
        })
        .collect();

    let friend_container = doc.append(
        body,
        ElementSpec::new("div")
            .id(selectors::FRIEND_CONTAINER_ID)
            .class("friend-links-container"),
    );
    let corner_fold = doc.append(
        friend_container,
        ElementSpec::new("div")
            .id(selectors::CORNER_FOLD_ID)
            .class("corner-fold"),
    );
    let friend_info = doc.append(
        corner_fold,
        ElementSpec::new("div")
            .id(selectors::FRIEND_INFO_ID)
            .class("friend-info"),
    );
    let friend_link = doc.append(
        friend_info,
        ElementSpec::new("a")
            .class(selectors::FRIEND_LINK_CLASS)
            .attr("target", "_blank"),
    );
    let friend_quote = doc.append(
        friend_info,
        ElementSpec::new("p").class(selectors::FRIEND_QUOTE_CLASS),
    );

    let map = PageMap {
        menu_button,
        sidebar,
        nav_links,
        main,
        terminal,
        terminal_title,
        controls,
        terminal_lines,
        sections,
        friend_container,
        corner_fold,
        friend_info,
        friend_link,
        friend_quote,
    };
    (doc, map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Dom;

    #[test]
    fn test_every_nav_link_targets_a_section() {
        let (doc, map) = portfolio_document(1024);
        assert_eq!(map.nav_links.len(), map.sections.len());
        for link in &map.nav_links {
            let href = doc.attribute(link, "href").expect("nav link has href");
            let target = doc.by_id(href.trim_start_matches('#'));
            assert!(target.is_some(), "{} has no target", href);
        }
    }

    #[test]
    fn test_friend_info_lives_inside_the_fold() {
        let (doc, map) = portfolio_document(1024);
        assert!(doc.contains(&map.corner_fold, &map.friend_info));
        assert!(doc.contains(&map.friend_container, &map.corner_fold));
        assert_eq!(
            doc.descendant_by_class(&map.friend_info, selectors::FRIEND_LINK_CLASS),
            Some(map.friend_link)
        );
    }

    #[test]
    fn test_skills_output_is_a_terminal_line() {
        let (doc, map) = portfolio_document(1024);
        let skills = doc.by_id(selectors::SKILLS_OUTPUT_ID).expect("skills output");
        assert!(map.terminal_lines.contains(&skills));
        assert_eq!(map.terminal_lines.len(), TERMINAL_LINES.len() + 1);
    }
}
