//! # UI Module
//!
//! This module renders the portfolio page inside a terminal and turns
//! crossterm input into page events.
//!
//! ## Components
//!
//! - [`App`] - Owns the page controller and maps cells to elements
//! - [`mod@render`] - Rendering functions for drawing the TUI
//! - [`config`] - Persisted user settings
//! - [`theme`] - Built-in color palettes
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────┐
//! │ ~/guest      │ ● ● ●   guest@portfolio: ~       │
//! │  › About     │ $ whoami                         │
//! │  › Projects  │ ...                              │
//! │  › Skills    ├──────────────────────────────────┤
//! │  › Contact   │ ## about                         │
//! │              │ ...                  ┌──────────┐│
//! │              │                      │ friends  ││
//! ├──────────────┴──────────────────────┴──────────┘│
//! │                    Footer                        │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Below the breakpoint the sidebar collapses into a `☰` button on a
//! one-row top bar and opens as an overlay.

pub mod app;
pub mod config;
pub mod render;
pub mod theme;

pub use app::App;
pub use render::render;
