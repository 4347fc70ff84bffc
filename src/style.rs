use iced::{Border, Color, Theme};
use iced::widget::container;

/// Accent colours for stat cards and badges. Fixed table instead of building colour names at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
}

impl Accent {
    pub fn color(self) -> Color {
        match self {
            Accent::Blue => Color::from_rgb8(0x3b, 0x82, 0xf6),
            Accent::Green => Color::from_rgb8(0x22, 0xc5, 0x5e),
            Accent::Purple => Color::from_rgb8(0xa8, 0x55, 0xf7),
            Accent::Orange => Color::from_rgb8(0xf9, 0x73, 0x16),
            Accent::Red => Color::from_rgb8(0xef, 0x44, 0x44),
        }
    }

    /// Same hue at low alpha, for card backgrounds.
    pub fn tint(self) -> Color {
        Color { a: 0.15, ..self.color() }
    }
}

pub const ERROR_TEXT: Color = Color { r: 0.86, g: 0.15, b: 0.15, a: 1.0 };
pub const MUTED_TEXT: Color = Color { r: 0.45, g: 0.45, b: 0.5, a: 1.0 };
pub const OVERLAY: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.7 };

pub fn accent_card(accent: Accent) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(accent.tint().into()),
        border: Border {
            color: accent.color(),
            width: 1.0,
            radius: 6.0.into(),
        },
        ..container::Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_keeps_hue() {
        let accent = Accent::Orange;
        assert_eq!(accent.tint().r, accent.color().r);
        assert!(accent.tint().a < 1.0);
    }
}
