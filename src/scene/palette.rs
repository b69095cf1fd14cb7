use crate::foundation::color::Color;

/// Named orb color. Declaration order is the hit cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteId {
    Purple,
    Blue,
    Cyan,
    Pink,
}

impl PaletteId {
    /// Cycle order.
    pub const CYCLE: [PaletteId; 4] = [
        PaletteId::Purple,
        PaletteId::Blue,
        PaletteId::Cyan,
        PaletteId::Pink,
    ];

    pub fn color(self) -> Color {
        match self {
            Self::Purple => Color::from_rgb_u32(0x9D4EDD),
            Self::Blue => Color::from_rgb_u32(0x5865F2),
            Self::Cyan => Color::from_rgb_u32(0x00B4D8),
            Self::Pink => Color::from_rgb_u32(0xFF6D00),
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Purple => 0,
            Self::Blue => 1,
            Self::Cyan => 2,
            Self::Pink => 3,
        }
    }
}

/// Cursor into [`PaletteId::CYCLE`]. Always in range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PaletteCursor {
    index: usize,
}

impl PaletteCursor {
    pub fn starting_at(palette: PaletteId) -> Self {
        Self {
            index: palette.position(),
        }
    }

    pub fn current(self) -> PaletteId {
        PaletteId::CYCLE[self.index]
    }

    /// Step one entry forward, wrapping after the last.
    #[must_use]
    pub fn advanced(self) -> Self {
        Self {
            index: (self.index + 1) % PaletteId::CYCLE.len(),
        }
    }

    pub fn index(self) -> usize {
        self.index
    }
}
