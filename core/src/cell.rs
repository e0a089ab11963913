use serde::{Deserialize, Serialize};

/// Player-visible state of one board cell. Whether a cell actually holds a
/// mine lives in the immutable [`MineField`](crate::MineField); this enum is
/// only what a renderer should show.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    /// Revealed safe cell carrying its adjacent-mine count (0..=8).
    Revealed(u8),
    /// Mine shown after a loss.
    Mine,
    /// Mine shown after a loss underneath a flag the player had placed.
    FlaggedMine,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flag_marked(self) -> bool {
        matches!(self, Self::Flagged | Self::FlaggedMine)
    }
}
