// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! The window is a stack of layers: the thumbnail grid with its status bar
//! at the bottom, the lightbox overlay above it while open, and toast
//! notifications on top of everything.

use super::Message;
use crate::gallery::Gallery;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::grid;
use crate::ui::lightbox;
use crate::ui::notifications::{self, Toast};
use crate::ui::styles;
use crate::ui::theming::{ColorScheme, ThemeMode};
use fluent_bundle::FluentArgs;
use iced::widget::{container, text, Column, Row, Space, Stack, Text};
use iced::{alignment, Element, Length, Theme};

/// Context required to render the application view.
pub struct ViewContext<'a> {
    pub i18n: &'a I18n,
    pub gallery: &'a Gallery,
    pub grid: &'a grid::State,
    pub lightbox: &'a lightbox::State,
    pub notifications: &'a notifications::Manager,
    pub show_captions: bool,
    pub theme_mode: ThemeMode,
}

/// Renders the layered application view.
pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let scheme = ColorScheme::for_mode(ctx.theme_mode);

    let grid_view = grid::view(ctx.grid, ctx.gallery, ctx.show_captions, ctx.i18n, &scheme)
        .map(Message::Grid);

    let mut base = Column::new();
    if !ctx.gallery.is_empty() {
        base = base.push(status_bar(ctx.i18n, ctx.gallery, &scheme));
    }
    base = base.push(
        container(grid_view)
            .width(Length::Fill)
            .height(Length::Fill),
    );

    let mut layers = Stack::new()
        .width(Length::Fill)
        .height(Length::Fill)
        .push(base);

    if ctx.lightbox.is_open() {
        let item = ctx.gallery.get(ctx.lightbox.current_index());
        layers = layers.push(
            lightbox::view(ctx.lightbox, item, ctx.show_captions, ctx.i18n, &scheme)
                .map(Message::Lightbox),
        );
    }

    if ctx.notifications.has_notifications() {
        layers = layers.push(Toast::view_overlay(ctx.notifications, ctx.i18n).map(Message::Notification));
    }

    layers.into()
}

/// Bar above the grid showing the open folder and how many images it holds.
fn status_bar<'a>(
    i18n: &'a I18n,
    gallery: &'a Gallery,
    scheme: &ColorScheme,
) -> Element<'a, Message> {
    let text_secondary = scheme.text_secondary;

    let folder_name = gallery
        .directory()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut args = FluentArgs::new();
    args.set("count", gallery.len());
    let count_label = i18n.tr_with_args("gallery-image-count", &args);

    let bar = Row::new()
        .width(Length::Fill)
        .padding([spacing::XS, spacing::MD])
        .align_y(alignment::Vertical::Center)
        .push(Text::new(folder_name).size(typography::BODY))
        .push(Space::new().width(Length::Fill))
        .push(
            Text::new(count_label)
                .size(typography::CAPTION)
                .style(move |_theme: &Theme| text::Style {
                    color: Some(text_secondary),
                }),
        );

    container(bar)
        .width(Length::Fill)
        .style(styles::container::panel)
        .into()
}
