//! Termfolio - interaction layer for a terminal-styled portfolio page
//!
//! This library provides the page interaction controller (terminal panel,
//! responsive navigation, friend-link rotation), the element-tree
//! abstraction it drives, and two hosts: a `ratatui` terminal UI and, on
//! `wasm32`, the browser DOM.

pub mod controller;
pub mod page;

#[cfg(not(target_arch = "wasm32"))]
pub mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;
