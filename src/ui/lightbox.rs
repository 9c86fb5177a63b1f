// SPDX-License-Identifier: MPL-2.0
//! Lightbox component encapsulating overlay state and update logic.
//!
//! The lightbox shows one gallery image at full size above the thumbnail
//! grid. It owns the current selection while open, navigates with wraparound
//! in both directions, and closes back to the thumbnail it was opened from.

use crate::error::Error;
use crate::gallery::GalleryItem;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::ui::design_tokens::{opacity, palette, radius, shadow, sizing, spacing, typography};
use crate::ui::theming::ColorScheme;
use fluent_bundle::FluentArgs;
use iced::widget::{button, center, container, mouse_area, opaque, text, Column, Row, Text};
use iced::{alignment, event, keyboard, mouse, window, Color, Element, Length, Point, Task, Theme};
use std::time::{Duration, Instant};

/// Minimum horizontal drag distance, in logical pixels, for a gesture to
/// count as a swipe. Shorter drags are treated as clicks.
pub const SWIPE_THRESHOLD: f32 = 50.0;

const LOADING_TIMEOUT: Duration = Duration::from_secs(10); // Timeout for image loading

/// Whether the overlay is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
}

/// Messages emitted by lightbox widgets and routed raw events.
#[derive(Debug, Clone)]
pub enum Message {
    /// A full-size image finished loading for the given gallery index.
    ImageLoaded {
        index: usize,
        result: Result<ImageData, Error>,
    },
    ToggleErrorDetails,
    RawEvent {
        window: window::Id,
        event: event::Event,
    },
    Close,
    NavigateNext,
    NavigatePrevious,
    /// Pointer pressed over the image surface (potential swipe start).
    SwipeStarted,
    /// Pointer released over the image surface.
    SwipeEnded,
}

/// Side effects the application should perform after handling a lightbox message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// The overlay closed; focus should return to the thumbnail at `origin`.
    Closed { origin: usize },
    /// The selection moved to `index`; the image for it should be loaded.
    Navigated { index: usize },
}

#[derive(Debug, Clone)]
pub struct ErrorState {
    friendly_key: &'static str,
    details: String,
    show_details: bool,
}

impl ErrorState {
    fn from_error(error: &Error) -> Self {
        Self {
            friendly_key: error.i18n_key(),
            details: error.to_string(),
            show_details: false,
        }
    }

    fn timeout() -> Self {
        Self {
            friendly_key: "error-load-timeout",
            details: String::new(),
            show_details: false,
        }
    }

    pub fn friendly_key(&self) -> &'static str {
        self.friendly_key
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

/// Complete lightbox component state.
///
/// Constructed per gallery via [`State::new`]; the item count fixes the
/// wraparound modulus for the lifetime of this instance. Rescanning a folder
/// replaces the whole state.
#[derive(Debug, Clone, Default)]
pub struct State {
    item_count: usize,
    visibility: Visibility,
    current_index: usize,
    /// Index of the thumbnail that opened the overlay, for focus restore.
    origin_index: Option<usize>,
    image: Option<ImageData>,
    error: Option<ErrorState>,
    is_loading: bool,
    loading_started_at: Option<Instant>,
    cursor_position: Option<Point>,
    swipe_start_x: Option<f32>,
}

impl State {
    /// Creates a closed lightbox over a gallery of `item_count` images.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn origin_index(&self) -> Option<usize> {
        self.origin_index
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorState> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Opens the overlay on the image at `index`.
    ///
    /// Returns `false` without any state change when the gallery is empty or
    /// the index is out of range. On success the caller is expected to load
    /// the image for the new selection.
    pub fn open(&mut self, index: usize) -> bool {
        if self.item_count == 0 || index >= self.item_count {
            return false;
        }

        self.current_index = index;
        self.origin_index = Some(index);
        self.visibility = Visibility::Open;
        self.start_loading();
        true
    }

    /// Closes the overlay and clears the loaded image.
    ///
    /// Returns the origin thumbnail index so the caller can restore focus
    /// to it, or `None` if the overlay was not open.
    pub fn close(&mut self) -> Option<usize> {
        if !self.is_open() {
            return None;
        }

        self.visibility = Visibility::Closed;
        self.image = None;
        self.error = None;
        self.is_loading = false;
        self.loading_started_at = None;
        self.swipe_start_x = None;
        self.origin_index.take()
    }

    /// Advances the selection forward, wrapping from the last image to the
    /// first. Returns the new index, or `None` when closed or when there is
    /// nothing to navigate to (zero or one image).
    pub fn next(&mut self) -> Option<usize> {
        if !self.is_open() || self.item_count <= 1 {
            return None;
        }

        self.current_index = (self.current_index + 1) % self.item_count;
        self.start_loading();
        Some(self.current_index)
    }

    /// Moves the selection backward, wrapping from the first image to the
    /// last. Returns the new index, or `None` when closed or when there is
    /// nothing to navigate to.
    pub fn previous(&mut self) -> Option<usize> {
        if !self.is_open() || self.item_count <= 1 {
            return None;
        }

        self.current_index = (self.current_index + self.item_count - 1) % self.item_count;
        self.start_loading();
        Some(self.current_index)
    }

    /// Interprets a completed horizontal drag as a navigation gesture.
    ///
    /// The drag must exceed [`SWIPE_THRESHOLD`] to trigger; a drag of exactly
    /// the threshold does nothing. Dragging leftward (end before start)
    /// advances to the next image, dragging rightward goes to the previous
    /// one. Returns the new index when navigation happened.
    pub fn handle_swipe(&mut self, start_x: f32, end_x: f32) -> Option<usize> {
        if !self.is_open() {
            return None;
        }

        let distance = end_x - start_x;
        if distance.abs() <= SWIPE_THRESHOLD {
            return None;
        }

        if distance < 0.0 {
            self.next()
        } else {
            self.previous()
        }
    }

    /// Marks the start of an image load for the current selection.
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.loading_started_at = Some(Instant::now());
        self.error = None;
    }

    /// Checks if loading has timed out.
    /// Returns `true` if a timeout occurred; the view then shows an error card.
    pub fn check_loading_timeout(&mut self) -> bool {
        if self.is_loading {
            if let Some(started_at) = self.loading_started_at {
                if started_at.elapsed() > LOADING_TIMEOUT {
                    self.is_loading = false;
                    self.loading_started_at = None;
                    self.error = Some(ErrorState::timeout());
                    return true;
                }
            }
        }
        false
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::ImageLoaded { index, result } => {
                // A load for a selection we already navigated away from is stale
                if !self.is_open() || index != self.current_index {
                    return (Effect::None, Task::none());
                }

                self.is_loading = false;
                self.loading_started_at = None;

                match result {
                    Ok(image) => {
                        self.image = Some(image);
                        self.error = None;
                    }
                    Err(error) => {
                        self.image = None;
                        self.error = Some(ErrorState::from_error(&error));
                    }
                }
                (Effect::None, Task::none())
            }
            Message::ToggleErrorDetails => {
                if let Some(error) = self.error.as_mut() {
                    error.show_details = !error.show_details;
                }
                (Effect::None, Task::none())
            }
            Message::Close => match self.close() {
                Some(origin) => (Effect::Closed { origin }, Task::none()),
                None => (Effect::None, Task::none()),
            },
            Message::NavigateNext => match self.next() {
                Some(index) => (Effect::Navigated { index }, Task::none()),
                None => (Effect::None, Task::none()),
            },
            Message::NavigatePrevious => match self.previous() {
                Some(index) => (Effect::Navigated { index }, Task::none()),
                None => (Effect::None, Task::none()),
            },
            Message::SwipeStarted => {
                self.swipe_start_x = self.cursor_position.map(|p| p.x);
                (Effect::None, Task::none())
            }
            Message::SwipeEnded => {
                let start_x = self.swipe_start_x.take();
                let end_x = self.cursor_position.map(|p| p.x);
                if let (Some(start_x), Some(end_x)) = (start_x, end_x) {
                    match self.handle_swipe(start_x, end_x) {
                        Some(index) => (Effect::Navigated { index }, Task::none()),
                        None => (Effect::None, Task::none()),
                    }
                } else {
                    (Effect::None, Task::none())
                }
            }
            Message::RawEvent { event, .. } => self.handle_raw_event(event),
        }
    }

    fn handle_raw_event(&mut self, event: event::Event) -> (Effect, Task<Message>) {
        if !self.is_open() {
            return (Effect::None, Task::none());
        }

        match event {
            event::Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::CursorMoved { position } => {
                    self.cursor_position = Some(position);
                    (Effect::None, Task::none())
                }
                mouse::Event::CursorLeft => {
                    self.cursor_position = None;
                    self.swipe_start_x = None;
                    (Effect::None, Task::none())
                }
                _ => (Effect::None, Task::none()),
            },
            event::Event::Keyboard(keyboard_event) => match keyboard_event {
                keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::Escape),
                    ..
                } => self.handle_message(Message::Close),
                keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::ArrowRight),
                    ..
                } => self.handle_message(Message::NavigateNext),
                keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::ArrowLeft),
                    ..
                } => self.handle_message(Message::NavigatePrevious),
                _ => (Effect::None, Task::none()),
            },
            _ => (Effect::None, Task::none()),
        }
    }
}

/// Renders the lightbox overlay layer.
///
/// The caller stacks this element over the thumbnail grid. Clicks on the
/// dimmed backdrop close the overlay; the content area swallows its own
/// events so clicking the image or controls never falls through.
pub fn view<'a>(
    state: &'a State,
    item: Option<&'a GalleryItem>,
    show_caption: bool,
    i18n: &'a I18n,
    scheme: &ColorScheme,
) -> Element<'a, Message> {
    let overlay_background = scheme.overlay_background;
    let overlay_text = scheme.overlay_text;
    let overlay_text_secondary = scheme.overlay_text_secondary;

    // Close control, top-right
    let close_button = button(
        Text::new("✕")
            .size(typography::TITLE_SM)
            .align_x(alignment::Horizontal::Center),
    )
    .on_press(Message::Close)
    .padding(spacing::XS)
    .style(overlay_button_style);

    let top_bar = Row::new()
        .width(Length::Fill)
        .push(iced::widget::Space::new().width(Length::Fill))
        .push(close_button);

    // Central surface: spinner text, error card, or the image itself
    let surface: Element<'a, Message> = if state.is_loading() {
        Text::new(i18n.tr("lightbox-loading"))
            .size(typography::TITLE_MD)
            .style(move |_theme: &Theme| text::Style {
                color: Some(overlay_text_secondary),
            })
            .into()
    } else if let Some(error) = state.error() {
        error_card(error, i18n, overlay_text)
    } else if let Some(image) = state.image() {
        // Swipe gestures are read from presses and releases over the image
        mouse_area(
            iced::widget::image(image.handle.clone())
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .on_press(Message::SwipeStarted)
        .on_release(Message::SwipeEnded)
        .into()
    } else {
        Text::new("").into()
    };

    let image_area = container(surface)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center);

    // Caption and position line under the image
    let mut footer = Column::new()
        .spacing(spacing::XXS)
        .align_x(alignment::Horizontal::Center);

    if show_caption {
        if let Some(item) = item {
            footer = footer.push(
                Text::new(item.caption.clone())
                    .size(typography::BODY)
                    .style(move |_theme: &Theme| text::Style {
                        color: Some(overlay_text),
                    }),
            );
        }
    }

    if state.item_count() > 0 {
        let mut args = FluentArgs::new();
        args.set("current", state.current_index() + 1);
        args.set("total", state.item_count());
        footer = footer.push(
            Text::new(i18n.tr_with_args("lightbox-position", &args))
                .size(typography::CAPTION)
                .style(move |_theme: &Theme| text::Style {
                    color: Some(overlay_text_secondary),
                }),
        );
    }

    let mut content = Column::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::MD)
        .spacing(spacing::SM)
        .push(top_bar)
        .push(image_area)
        .push(
            container(footer)
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Center),
        );

    // Navigation controls are pointless for a single image
    if state.item_count() > 1 {
        let previous_button = button(
            Text::new("‹")
                .size(typography::NAV_GLYPH)
                .align_x(alignment::Horizontal::Center),
        )
        .on_press(Message::NavigatePrevious)
        .width(Length::Fixed(sizing::NAV_BUTTON))
        .style(overlay_button_style);

        let next_button = button(
            Text::new("›")
                .size(typography::NAV_GLYPH)
                .align_x(alignment::Horizontal::Center),
        )
        .on_press(Message::NavigateNext)
        .width(Length::Fixed(sizing::NAV_BUTTON))
        .style(overlay_button_style);

        content = content.push(
            Row::new()
                .width(Length::Fill)
                .spacing(spacing::LG)
                .align_y(alignment::Vertical::Center)
                .push(iced::widget::Space::new().width(Length::Fill))
                .push(previous_button)
                .push(next_button)
                .push(iced::widget::Space::new().width(Length::Fill)),
        );
    }

    // Backdrop clicks close; the opaque content layer swallows its own events
    opaque(
        mouse_area(
            center(opaque(content)).style(move |_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(overlay_background)),
                ..Default::default()
            }),
        )
        .on_press(Message::Close),
    )
}

fn error_card<'a>(error: &'a ErrorState, i18n: &'a I18n, text_color: Color) -> Element<'a, Message> {
    let toggle_key = if error.show_details {
        "error-details-hide"
    } else {
        "error-details-show"
    };

    let mut card = Column::new()
        .spacing(spacing::SM)
        .align_x(alignment::Horizontal::Center)
        .push(
            Text::new(i18n.tr(error.friendly_key()))
                .size(typography::TITLE_SM)
                .style(move |_theme: &Theme| text::Style {
                    color: Some(text_color),
                }),
        );

    if !error.details().is_empty() {
        card = card.push(
            button(Text::new(i18n.tr(toggle_key)).size(typography::CAPTION))
                .on_press(Message::ToggleErrorDetails)
                .padding(spacing::XXS)
                .style(overlay_button_style),
        );

        if error.show_details {
            card = card.push(
                Text::new(error.details())
                    .size(typography::CAPTION)
                    .style(move |_theme: &Theme| text::Style {
                        color: Some(Color {
                            a: opacity::OVERLAY_HOVER,
                            ..text_color
                        }),
                    }),
            );
        }
    }

    container(card)
        .padding(spacing::MD)
        .style(|_theme: &Theme| container::Style {
            background: Some(iced::Background::Color(Color {
                a: opacity::OVERLAY_MEDIUM,
                ..palette::GRAY_900
            })),
            border: iced::Border {
                color: palette::ERROR_500,
                width: crate::ui::design_tokens::border::WIDTH_SM,
                radius: radius::MD.into(),
            },
            ..Default::default()
        })
        .into()
}

/// Style function for the overlay controls (close, previous, next).
fn overlay_button_style(_theme: &Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active => button::Style {
            background: Some(iced::Background::Color(Color {
                a: opacity::OVERLAY_MEDIUM,
                ..palette::GRAY_900
            })),
            text_color: palette::WHITE,
            border: iced::Border {
                radius: radius::MD.into(),
                ..Default::default()
            },
            shadow: shadow::NONE,
            snap: true,
        },
        button::Status::Hovered => button::Style {
            background: Some(iced::Background::Color(Color {
                a: opacity::OVERLAY_HOVER,
                ..palette::GRAY_900
            })),
            text_color: palette::WHITE,
            border: iced::Border {
                radius: radius::MD.into(),
                ..Default::default()
            },
            shadow: shadow::NONE,
            snap: true,
        },
        button::Status::Pressed => button::Style {
            background: Some(iced::Background::Color(Color {
                a: opacity::OVERLAY_PRESSED,
                ..palette::GRAY_900
            })),
            text_color: palette::WHITE,
            border: iced::Border {
                radius: radius::MD.into(),
                ..Default::default()
            },
            shadow: shadow::NONE,
            snap: true,
        },
        button::Status::Disabled => button::Style {
            background: Some(iced::Background::Color(Color {
                a: opacity::OVERLAY_SUBTLE,
                ..palette::GRAY_900
            })),
            text_color: Color {
                a: opacity::OVERLAY_MEDIUM,
                ..palette::WHITE
            },
            border: iced::Border {
                radius: radius::MD.into(),
                ..Default::default()
            },
            shadow: shadow::NONE,
            snap: true,
        },
    }
}
