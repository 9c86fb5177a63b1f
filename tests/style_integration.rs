// SPDX-License-Identifier: MPL-2.0
//! Integration tests to validate style and design token coherence.

use iced::Theme;
use iced_lightbox::ui::design_tokens::{opacity, palette, radius, spacing};
use iced_lightbox::ui::styles::{button, container};
use iced_lightbox::ui::theming::{ColorScheme, ThemeMode};

#[test]
fn all_button_styles_compile() {
    let theme = Theme::Dark;

    // Smoke-test all button styles compile and are callable
    let _ = button::primary(&theme, iced::widget::button::Status::Active);
    let _ = button::thumbnail(true)(&theme, iced::widget::button::Status::Hovered);
    let _ = container::panel(&theme);
}

#[test]
fn design_tokens_are_accessible() {
    // Palette
    let _ = palette::PRIMARY_500;
    let _ = palette::WHITE;

    // Spacing
    let _ = spacing::MD;

    // Opacity
    let _ = opacity::OVERLAY_STRONG;

    // Radius
    let _ = radius::MD;
}

#[test]
fn color_schemes_oppose_between_modes() {
    let light = ColorScheme::for_mode(ThemeMode::Light);
    let dark = ColorScheme::for_mode(ThemeMode::Dark);

    // Surface colors should be visually opposite between light and dark
    assert!(light.surface_primary.r > dark.surface_primary.r);

    // Text colors should also be opposite between light and dark
    assert!(light.text_primary.r < dark.text_primary.r);
}

#[test]
fn overlay_backdrop_is_translucent_in_both_modes() {
    for mode in [ThemeMode::Light, ThemeMode::Dark] {
        let scheme = ColorScheme::for_mode(mode);
        assert!(scheme.overlay_background.a > 0.0);
        assert!(scheme.overlay_background.a < 1.0);
    }
}

#[test]
fn selected_thumbnail_border_uses_brand_color() {
    let theme = Theme::Light;

    let selected = button::thumbnail(true)(&theme, iced::widget::button::Status::Active);
    let unselected = button::thumbnail(false)(&theme, iced::widget::button::Status::Active);

    assert_eq!(selected.border.color, palette::PRIMARY_500);
    assert_ne!(selected.border.color, unselected.border.color);
}
