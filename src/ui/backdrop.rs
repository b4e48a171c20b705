/// Level backdrops: the colour scheme each level's corridor view is drawn in.
///
/// Looked up by a validated level id through the configured level list;
/// there is no fallback backdrop for an unknown level.

use crossterm::style::Color;
use serde::Deserialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Residence,
    Copse,
    Hospital,
    Dungeon,
}

/// Palette used by the renderer for one level.
#[derive(Clone, Copy, Debug)]
pub struct Backdrop {
    pub ceiling: Color,
    pub floor: Color,
    pub wall: Color,
    pub wall_far: Color,
    pub edge: Color,
    /// Glyph tiled over wall faces.
    pub texture: char,
}

impl Theme {
    pub fn backdrop(self) -> Backdrop {
        match self {
            Theme::Residence => Backdrop {
                ceiling: Color::Rgb { r: 60, g: 48, b: 40 },
                floor: Color::Rgb { r: 96, g: 64, b: 40 },
                wall: Color::Rgb { r: 170, g: 150, b: 120 },
                wall_far: Color::Rgb { r: 110, g: 96, b: 80 },
                edge: Color::Rgb { r: 70, g: 50, b: 35 },
                texture: '▒',
            },
            Theme::Copse => Backdrop {
                ceiling: Color::Rgb { r: 20, g: 40, b: 60 },
                floor: Color::Rgb { r: 30, g: 70, b: 30 },
                wall: Color::Rgb { r: 40, g: 110, b: 50 },
                wall_far: Color::Rgb { r: 25, g: 70, b: 35 },
                edge: Color::Rgb { r: 90, g: 60, b: 30 },
                texture: '♣',
            },
            Theme::Hospital => Backdrop {
                ceiling: Color::Rgb { r: 200, g: 205, b: 210 },
                floor: Color::Rgb { r: 120, g: 140, b: 140 },
                wall: Color::Rgb { r: 180, g: 220, b: 210 },
                wall_far: Color::Rgb { r: 120, g: 160, b: 150 },
                edge: Color::Rgb { r: 90, g: 110, b: 110 },
                texture: '░',
            },
            Theme::Dungeon => Backdrop {
                ceiling: Color::Rgb { r: 15, g: 15, b: 20 },
                floor: Color::Rgb { r: 45, g: 40, b: 40 },
                wall: Color::Rgb { r: 90, g: 85, b: 80 },
                wall_far: Color::Rgb { r: 55, g: 50, b: 50 },
                edge: Color::Rgb { r: 30, g: 25, b: 25 },
                texture: '▓',
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrap {
        theme: Theme,
    }

    #[test]
    fn theme_names_parse_lowercase() {
        let w: Wrap = toml::from_str("theme = \"copse\"").unwrap();
        assert_eq!(w.theme, Theme::Copse);
        assert!(toml::from_str::<Wrap>("theme = \"castle\"").is_err());
    }

    #[test]
    fn near_wall_differs_from_far() {
        for t in [Theme::Residence, Theme::Copse, Theme::Hospital, Theme::Dungeon] {
            let b = t.backdrop();
            assert_ne!(b.wall, b.wall_far);
        }
    }
}
