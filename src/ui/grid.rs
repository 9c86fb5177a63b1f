// SPDX-License-Identifier: MPL-2.0
//! Thumbnail grid component encapsulating state and update logic.
//!
//! The grid is the browsing surface of the application: a scrollable wall of
//! thumbnails with one selected cell. Activating a cell hands the selection
//! to the lightbox; when the lightbox closes, the grid takes the selection
//! back and scrolls the originating thumbnail into view.

use crate::error::Error;
use crate::gallery::Gallery;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::ui::design_tokens::{palette, radius, sizing, spacing, typography};
use crate::ui::styles;
use crate::ui::theming::ColorScheme;
use iced::widget::scrollable::{AbsoluteOffset, RelativeOffset, Viewport};
use iced::widget::{button, container, operation, text, Column, Id, Row, Scrollable, Text};
use iced::{alignment, event, keyboard, window, Background, Element, Length, Rectangle, Task, Theme};

/// Identifier used for the grid scrollable widget.
pub const SCROLLABLE_ID: &str = "gallery-grid-scrollable";

const THUMBNAIL_SIZE: f32 = 160.0; // Square edge of the image box inside a cell
const CELL_WIDTH: f32 = 176.0; // Horizontal pitch of one grid cell, padding included
const ROW_HEIGHT: f32 = 204.0; // Vertical pitch of one row, caption line included

/// Load state of one thumbnail cell.
#[derive(Debug, Clone, Default)]
pub enum ThumbnailSlot {
    #[default]
    Pending,
    Ready(ImageData),
    Failed,
}

/// Messages emitted by grid widgets and routed raw events.
#[derive(Debug, Clone)]
pub enum Message {
    /// A thumbnail finished loading for the given gallery index.
    ThumbnailLoaded {
        index: usize,
        result: Result<ImageData, Error>,
    },
    ThumbnailClicked(usize),
    /// Request to open the folder dialog from the empty state.
    OpenFolderRequested,
    ViewportChanged {
        bounds: Rectangle,
        offset: AbsoluteOffset,
    },
    RawEvent {
        window: window::Id,
        event: event::Event,
    },
}

/// Side effects the application should perform after handling a grid message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// A thumbnail was activated; the lightbox should open on `index`.
    Activated { index: usize },
    OpenFolderDialog,
}

/// Complete grid component state.
#[derive(Debug, Default)]
pub struct State {
    slots: Vec<ThumbnailSlot>,
    selected: Option<usize>,
    viewport_width: f32,
    viewport_height: f32,
    /// Topmost fully visible row, kept in sync with the scrollable offset.
    scroll_offset_row: usize,
}

impl State {
    /// Creates a grid of `item_count` pending thumbnails.
    #[must_use]
    pub fn new(item_count: usize) -> Self {
        Self {
            slots: vec![ThumbnailSlot::default(); item_count],
            ..Self::default()
        }
    }

    pub fn item_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn slot(&self, index: usize) -> Option<&ThumbnailSlot> {
        self.slots.get(index)
    }

    /// Selects the cell at `index` and scrolls it into view.
    ///
    /// Returns `false` without any state change when the index is out of
    /// range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }

        self.selected = Some(index);
        self.ensure_visible();
        true
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.scroll_offset_row = self.scroll_offset_row.min(self.max_scroll_row());
    }

    /// Number of cells per row at the current viewport width, at least one.
    pub fn columns(&self) -> usize {
        ((self.viewport_width / CELL_WIDTH) as usize).max(1)
    }

    fn visible_rows(&self) -> usize {
        ((self.viewport_height / ROW_HEIGHT) as usize).max(1)
    }

    fn total_rows(&self) -> usize {
        let columns = self.columns();
        (self.slots.len() + columns - 1) / columns
    }

    fn max_scroll_row(&self) -> usize {
        self.total_rows().saturating_sub(self.visible_rows())
    }

    /// Adjusts the scroll bookkeeping so the selected row is on screen.
    fn ensure_visible(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };

        let row = selected / self.columns();
        let visible = self.visible_rows();

        if row < self.scroll_offset_row {
            self.scroll_offset_row = row;
        } else if row >= self.scroll_offset_row + visible {
            self.scroll_offset_row = row + 1 - visible;
        }
        self.scroll_offset_row = self.scroll_offset_row.min(self.max_scroll_row());
    }

    fn scroll_fraction(&self) -> f32 {
        let max = self.max_scroll_row();
        if max == 0 {
            return 0.0;
        }
        self.scroll_offset_row as f32 / max as f32
    }

    /// Task snapping the scrollable to the tracked scroll row.
    pub fn snap_task(&self) -> Task<Message> {
        operation::snap_to(
            Id::new(SCROLLABLE_ID),
            RelativeOffset {
                x: 0.0,
                y: self.scroll_fraction(),
            },
        )
    }

    fn select_right(&mut self) -> bool {
        let Some(last) = self.slots.len().checked_sub(1) else {
            return false;
        };

        match self.selected {
            None => self.selected = Some(0),
            Some(index) if index < last => self.selected = Some(index + 1),
            Some(_) => return false,
        }
        self.ensure_visible();
        true
    }

    fn select_left(&mut self) -> bool {
        if self.slots.is_empty() {
            return false;
        }

        match self.selected {
            None => self.selected = Some(0),
            Some(index) if index > 0 => self.selected = Some(index - 1),
            Some(_) => return false,
        }
        self.ensure_visible();
        true
    }

    fn select_down(&mut self) -> bool {
        if self.slots.is_empty() {
            return false;
        }

        match self.selected {
            None => self.selected = Some(0),
            Some(index) if index + self.columns() < self.slots.len() => {
                self.selected = Some(index + self.columns());
            }
            Some(_) => return false,
        }
        self.ensure_visible();
        true
    }

    fn select_up(&mut self) -> bool {
        if self.slots.is_empty() {
            return false;
        }

        match self.selected {
            None => self.selected = Some(0),
            Some(index) if index >= self.columns() => {
                self.selected = Some(index - self.columns());
            }
            Some(_) => return false,
        }
        self.ensure_visible();
        true
    }

    fn activate_selected(&self) -> Effect {
        match self.selected {
            Some(index) => Effect::Activated { index },
            None => Effect::None,
        }
    }

    pub fn handle_message(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::ThumbnailLoaded { index, result } => {
                if let Some(slot) = self.slots.get_mut(index) {
                    *slot = match result {
                        Ok(image) => ThumbnailSlot::Ready(image),
                        Err(_) => ThumbnailSlot::Failed,
                    };
                }
                (Effect::None, Task::none())
            }
            Message::ThumbnailClicked(index) => {
                if self.select(index) {
                    (Effect::Activated { index }, Task::none())
                } else {
                    (Effect::None, Task::none())
                }
            }
            Message::OpenFolderRequested => (Effect::OpenFolderDialog, Task::none()),
            Message::ViewportChanged { bounds, offset } => {
                self.viewport_width = bounds.width;
                self.viewport_height = bounds.height;
                self.scroll_offset_row = (offset.y / ROW_HEIGHT).max(0.0) as usize;
                (Effect::None, Task::none())
            }
            Message::RawEvent { event, .. } => self.handle_raw_event(event),
        }
    }

    fn handle_raw_event(&mut self, event: event::Event) -> (Effect, Task<Message>) {
        match event {
            event::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(named),
                ..
            }) => match named {
                keyboard::key::Named::ArrowRight => self.keyboard_move(Self::select_right),
                keyboard::key::Named::ArrowLeft => self.keyboard_move(Self::select_left),
                keyboard::key::Named::ArrowDown => self.keyboard_move(Self::select_down),
                keyboard::key::Named::ArrowUp => self.keyboard_move(Self::select_up),
                keyboard::key::Named::Enter | keyboard::key::Named::Space => {
                    (self.activate_selected(), Task::none())
                }
                _ => (Effect::None, Task::none()),
            },
            _ => (Effect::None, Task::none()),
        }
    }

    fn keyboard_move(&mut self, mover: fn(&mut Self) -> bool) -> (Effect, Task<Message>) {
        if mover(self) {
            (Effect::None, self.snap_task())
        } else {
            (Effect::None, Task::none())
        }
    }
}

/// Renders the thumbnail grid, or the empty state when the gallery has no
/// images.
pub fn view<'a>(
    state: &'a State,
    gallery: &'a Gallery,
    show_captions: bool,
    i18n: &'a I18n,
    scheme: &ColorScheme,
) -> Element<'a, Message> {
    if gallery.is_empty() {
        return empty_view(i18n);
    }

    let caption_color = scheme.text_secondary;
    let columns = state.columns();

    let mut rows = Column::new().spacing(spacing::XS).padding(spacing::MD);

    for (row_index, chunk) in gallery.items().chunks(columns).enumerate() {
        let mut row = Row::new().spacing(spacing::XS);

        for (cell_index, item) in chunk.iter().enumerate() {
            let index = row_index * columns + cell_index;
            let is_selected = state.selected() == Some(index);

            let thumbnail: Element<'a, Message> = match state.slot(index) {
                Some(ThumbnailSlot::Ready(image)) => iced::widget::image(image.handle.clone())
                    .width(Length::Fixed(THUMBNAIL_SIZE))
                    .height(Length::Fixed(THUMBNAIL_SIZE))
                    .into(),
                Some(ThumbnailSlot::Failed) => Text::new("⚠")
                    .size(sizing::ICON_LG)
                    .color(palette::WARNING_500)
                    .into(),
                _ => container(Text::new(""))
                    .width(Length::Fixed(THUMBNAIL_SIZE))
                    .height(Length::Fixed(THUMBNAIL_SIZE))
                    .style(placeholder_style)
                    .into(),
            };

            let mut cell = Column::new()
                .spacing(spacing::XXS)
                .align_x(alignment::Horizontal::Center)
                .push(
                    container(thumbnail)
                        .width(Length::Fixed(THUMBNAIL_SIZE))
                        .height(Length::Fixed(THUMBNAIL_SIZE))
                        .align_x(alignment::Horizontal::Center)
                        .align_y(alignment::Vertical::Center),
                );

            if show_captions {
                cell = cell.push(
                    Text::new(item.caption.as_str())
                        .size(typography::CAPTION)
                        .style(move |_theme: &Theme| text::Style {
                            color: Some(caption_color),
                        }),
                );
            }

            row = row.push(
                button(cell)
                    .padding(spacing::XXS)
                    .style(styles::button::thumbnail(is_selected))
                    .on_press(Message::ThumbnailClicked(index)),
            );
        }

        rows = rows.push(row);
    }

    Scrollable::new(rows)
        .id(Id::new(SCROLLABLE_ID))
        .width(Length::Fill)
        .height(Length::Fill)
        .on_scroll(|viewport: Viewport| Message::ViewportChanged {
            bounds: viewport.bounds(),
            offset: viewport.absolute_offset(),
        })
        .into()
}

/// Renders the empty state shown when no folder is open or the folder holds
/// no supported images.
fn empty_view(i18n: &I18n) -> Element<'_, Message> {
    let title = Text::new(i18n.tr("gallery-empty-title"))
        .size(typography::TITLE_MD)
        .color(palette::GRAY_400);

    let message = Text::new(i18n.tr("gallery-empty-message"))
        .size(typography::BODY)
        .color(palette::GRAY_400);

    let open_button = button(Text::new(i18n.tr("gallery-open-folder")))
        .padding([spacing::SM, spacing::LG])
        .style(styles::button::primary)
        .on_press(Message::OpenFolderRequested);

    let content = Column::new()
        .spacing(spacing::LG)
        .align_x(alignment::Horizontal::Center)
        .push(title)
        .push(message)
        .push(open_button);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
}

fn placeholder_style(theme: &Theme) -> container::Style {
    let is_light = matches!(theme, Theme::Light);

    container::Style {
        background: Some(Background::Color(if is_light {
            palette::GRAY_200
        } else {
            palette::GRAY_700
        })),
        border: iced::Border {
            radius: radius::MD.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}
