//! Responsive navigation. Menu state is the `active` class on the button and
//! the sidebar; there is no separate flag to drift out of sync.

use super::selectors::ACTIVE_CLASS;
use crate::page::{Dom, EventResponse};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct ResponsiveNav<N> {
    menu_button: N,
    sidebar: N,
    hash_links: Vec<N>,
    breakpoint_px: u32,
}

impl<N: Clone + PartialEq> ResponsiveNav<N> {
    pub fn new(menu_button: N, sidebar: N, hash_links: Vec<N>, breakpoint_px: u32) -> Self {
        Self {
            menu_button,
            sidebar,
            hash_links,
            breakpoint_px,
        }
    }

    pub fn sidebar(&self) -> &N {
        &self.sidebar
    }

    pub fn is_menu_button(&self, node: &N) -> bool {
        &self.menu_button == node
    }

    pub fn is_hash_link(&self, node: &N) -> bool {
        self.hash_links.contains(node)
    }

    pub fn is_mobile<D: Dom<Node = N>>(&self, dom: &D) -> bool {
        dom.viewport_width() <= self.breakpoint_px
    }

    pub fn is_open<D: Dom<Node = N>>(&self, dom: &D) -> bool {
        dom.has_class(&self.sidebar, ACTIVE_CLASS)
    }

    pub fn on_menu_button_click<D: Dom<Node = N>>(&self, dom: &mut D) {
        dom.toggle_class(&self.menu_button, ACTIVE_CLASS);
        let open = dom.toggle_class(&self.sidebar, ACTIVE_CLASS);
        debug!(open, "mobile menu toggled");
    }

    pub fn close<D: Dom<Node = N>>(&self, dom: &mut D) {
        dom.remove_class(&self.menu_button, ACTIVE_CLASS);
        dom.remove_class(&self.sidebar, ACTIVE_CLASS);
    }

    /// Outside clicks dismiss the mobile menu.
    pub fn on_document_click<D: Dom<Node = N>>(&self, dom: &mut D, target: &N) {
        if !self.is_mobile(dom) {
            return;
        }
        if !dom.contains(&self.sidebar, target) && !dom.contains(&self.menu_button, target) {
            if self.is_open(dom) {
                debug!("outside click closed mobile menu");
            }
            self.close(dom);
        }
    }

    /// The desktop layout never shows the mobile menu state.
    pub fn on_resize<D: Dom<Node = N>>(&self, dom: &mut D) {
        if !self.is_mobile(dom) {
            self.close(dom);
        }
    }

    /// Scroll lock follows the settled sidebar state, not the click.
    pub fn on_transition_end<D: Dom<Node = N>>(&self, dom: &mut D) {
        if !self.is_mobile(dom) {
            return;
        }
        let overflow = if self.is_open(dom) { "hidden" } else { "" };
        dom.set_body_style("overflow", overflow);
        trace!(overflow, "sidebar transition settled");
    }

    /// Default navigation is always suppressed, even when nothing matches.
    pub fn on_anchor_click<D: Dom<Node = N>>(&self, dom: &mut D, anchor: &N) -> EventResponse {
        let href = dom.attribute(anchor, "href").unwrap_or_default();
        let fragment = href.strip_prefix('#').unwrap_or(&href);
        let target = if fragment.is_empty() {
            None
        } else {
            dom.by_id(fragment)
        };

        match target {
            Some(target) => {
                dom.scroll_into_view(&target);
                debug!(%href, "scrolled to anchor");
                if self.is_mobile(dom) {
                    self.close(dom);
                }
            }
            None => trace!(%href, "anchor target missing"),
        }
        EventResponse::prevented()
    }
}
