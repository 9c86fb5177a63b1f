// SPDX-License-Identifier: MPL-2.0
//! `iced_lightbox` is a folder-based image gallery built with the Iced GUI
//! framework.
//!
//! It shows a keyboard-navigable thumbnail grid and opens images in a modal
//! lightbox overlay with wraparound navigation, demonstrating
//! internationalization with Fluent, user preference management, and modular
//! UI design.

#![doc(html_root_url = "https://docs.rs/iced_lightbox/0.1.0")]

pub mod app;
pub mod config;
pub mod error;
pub mod gallery;
pub mod i18n;
pub mod icon;
pub mod media;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
