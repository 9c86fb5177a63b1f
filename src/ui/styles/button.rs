// SPDX-License-Identifier: MPL-2.0
//! Centralized button styles.

use crate::ui::design_tokens::{
    border,
    palette::{self, WHITE},
    radius, shadow,
};
use iced::widget::button;
use iced::{Background, Border, Color, Theme};

/// Primary action button (open folder, confirm).
pub fn primary(_theme: &Theme, status: button::Status) -> button::Style {
    match status {
        button::Status::Active | button::Status::Pressed => button::Style {
            background: Some(Background::Color(palette::PRIMARY_500)),
            text_color: WHITE,
            border: Border {
                color: palette::PRIMARY_600,
                width: border::WIDTH_SM,
                radius: radius::SM.into(),
            },
            shadow: shadow::NONE,
            snap: true,
        },
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(palette::PRIMARY_400)),
            text_color: WHITE,
            border: Border {
                color: palette::PRIMARY_500,
                width: border::WIDTH_SM,
                radius: radius::SM.into(),
            },
            shadow: shadow::MD,
            snap: true,
        },
        _ => button::Style::default(),
    }
}

/// Grid cell wrapping a thumbnail. The border marks the selected cell and
/// gives feedback on hover; layout stays stable because the border width
/// never changes, only its color.
pub fn thumbnail(is_selected: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme: &Theme, status: button::Status| {
        let is_light = matches!(theme, Theme::Light);

        let border_color = if is_selected {
            palette::PRIMARY_500
        } else if status == button::Status::Hovered {
            palette::PRIMARY_400
        } else {
            Color::TRANSPARENT
        };

        let background = match status {
            button::Status::Hovered | button::Status::Pressed => Some(Background::Color(
                if is_light {
                    palette::GRAY_200
                } else {
                    palette::GRAY_700
                },
            )),
            _ => None,
        };

        button::Style {
            background,
            text_color: if is_light {
                palette::GRAY_900
            } else {
                WHITE
            },
            border: Border {
                color: border_color,
                width: border::WIDTH_MD,
                radius: radius::MD.into(),
            },
            shadow: shadow::NONE,
            snap: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_button_uses_brand_colors() {
        let theme = Theme::Dark;
        let style = primary(&theme, button::Status::Active);

        if let Some(Background::Color(bg)) = style.background {
            assert_eq!(bg, palette::PRIMARY_500);
        } else {
            panic!("Expected background color");
        }
    }

    #[test]
    fn selected_thumbnail_has_brand_border() {
        let theme = Theme::Dark;

        let selected = thumbnail(true)(&theme, button::Status::Active);
        let unselected = thumbnail(false)(&theme, button::Status::Active);

        assert_eq!(selected.border.color, palette::PRIMARY_500);
        assert_eq!(unselected.border.color, Color::TRANSPARENT);
        assert_eq!(selected.border.width, unselected.border.width);
    }
}
