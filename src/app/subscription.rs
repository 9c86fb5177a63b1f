// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! This module handles routing of native events (keyboard, mouse, window)
//! to either the grid or the lightbox depending on which surface is active.

use super::Message;
use crate::ui::grid;
use crate::ui::lightbox;
use iced::{event, time, Subscription};
use std::time::Duration;

/// Creates the event subscription for the current overlay state.
///
/// While the lightbox is open it owns the keyboard and pointer: Escape and
/// the arrow keys must act on the overlay, never on the grid underneath, and
/// cursor movement feeds the swipe tracker. With the overlay closed, raw
/// events go to the grid for keyboard selection.
///
/// Window close requests and resizes are handled in both states. File drops
/// are only accepted while the grid is visible.
pub fn create_event_subscription(lightbox_open: bool) -> Subscription<Message> {
    if lightbox_open {
        event::listen_with(|event, status, window_id| {
            if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
                return Some(Message::WindowCloseRequested(window_id));
            }

            if let event::Event::Window(iced::window::Event::Resized(size)) = &event {
                return Some(Message::WindowResized(*size));
            }

            match status {
                event::Status::Ignored => Some(Message::Lightbox(lightbox::Message::RawEvent {
                    window: window_id,
                    event: event.clone(),
                })),
                event::Status::Captured => None,
            }
        })
    } else {
        event::listen_with(|event, status, window_id| {
            if let event::Event::Window(iced::window::Event::CloseRequested) = &event {
                return Some(Message::WindowCloseRequested(window_id));
            }

            if let event::Event::Window(iced::window::Event::Resized(size)) = &event {
                return Some(Message::WindowResized(*size));
            }

            if let event::Event::Window(iced::window::Event::FileDropped(path)) = &event {
                return Some(Message::FileDropped(path.clone()));
            }

            match status {
                event::Status::Ignored => Some(Message::Grid(grid::Message::RawEvent {
                    window: window_id,
                    event: event.clone(),
                })),
                event::Status::Captured => None,
            }
        })
    }
}

/// Creates a periodic tick subscription for the loading timeout and
/// notification auto-dismiss. Idle applications subscribe to nothing.
pub fn create_tick_subscription(
    is_loading: bool,
    has_notifications: bool,
) -> Subscription<Message> {
    if is_loading || has_notifications {
        time::every(Duration::from_millis(100)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}
