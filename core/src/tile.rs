use serde::{Deserialize, Serialize};

/// What lies under a tile. Numbers are only assigned once mines have been placed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileContent {
    Empty,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Mine,
}

impl TileContent {
    /// Content for a safe tile with `count` adjacent mines, counts above eight saturate.
    pub const fn from_count(count: u8) -> Self {
        use TileContent::*;
        match count {
            0 => Empty,
            1 => One,
            2 => Two,
            3 => Three,
            4 => Four,
            5 => Five,
            6 => Six,
            7 => Seven,
            _ => Eight,
        }
    }

    /// Adjacent mine count, `None` for a mine.
    pub const fn count(self) -> Option<u8> {
        use TileContent::*;
        match self {
            Empty => Some(0),
            One => Some(1),
            Two => Some(2),
            Three => Some(3),
            Four => Some(4),
            Five => Some(5),
            Six => Some(6),
            Seven => Some(7),
            Eight => Some(8),
            Mine => None,
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for TileContent {
    fn default() -> Self {
        Self::Empty
    }
}

/// Visibility of a tile. `Revealed` is terminal, `Clicked` is a pressed-down highlight of a hidden tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Hidden,
    Clicked,
    Revealed,
}

impl Default for TileState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Player annotation, only meaningful while the tile is not revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileMark {
    Unmarked,
    Flag,
    QuestionMark,
}

impl Default for TileMark {
    fn default() -> Self {
        Self::Unmarked
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub content: TileContent,
    pub state: TileState,
    pub mark: TileMark,
}

impl Tile {
    pub const fn is_revealed(self) -> bool {
        matches!(self.state, TileState::Revealed)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self.mark, TileMark::Flag)
    }

    pub const fn is_mine(self) -> bool {
        self.content.is_mine()
    }

    /// Highlights a hidden, unflagged tile. Returns whether the state changed.
    pub(crate) fn press(&mut self) -> bool {
        if matches!(self.state, TileState::Hidden) && !self.is_flagged() {
            self.state = TileState::Clicked;
            true
        } else {
            false
        }
    }

    /// Drops the highlight of a clicked tile. Returns whether the state changed.
    pub(crate) fn release(&mut self) -> bool {
        if matches!(self.state, TileState::Clicked) {
            self.state = TileState::Hidden;
            true
        } else {
            false
        }
    }

    /// Opens a covered, unflagged tile. Returns whether it was opened by this call.
    pub(crate) fn open(&mut self) -> bool {
        if self.is_revealed() || self.is_flagged() {
            return false;
        }
        self.state = TileState::Revealed;
        self.mark = TileMark::Unmarked;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_map_to_numbers() {
        assert_eq!(TileContent::from_count(0), TileContent::Empty);
        assert_eq!(TileContent::from_count(3), TileContent::Three);
        assert_eq!(TileContent::from_count(8), TileContent::Eight);
        assert_eq!(TileContent::Five.count(), Some(5));
        assert_eq!(TileContent::Mine.count(), None);
    }

    #[test]
    fn flagged_tiles_cannot_be_pressed_or_opened() {
        let mut tile = Tile {
            mark: TileMark::Flag,
            ..Default::default()
        };

        assert!(!tile.press());
        assert!(!tile.open());
        assert_eq!(tile.state, TileState::Hidden);
    }

    #[test]
    fn press_release_round_trip_until_revealed() {
        let mut tile = Tile::default();

        assert!(tile.press());
        assert_eq!(tile.state, TileState::Clicked);
        assert!(tile.release());
        assert!(!tile.release());

        assert!(tile.press());
        assert!(tile.open());
        assert!(!tile.press());
        assert!(!tile.release());
        assert!(tile.is_revealed());
    }

    #[test]
    fn opening_clears_question_mark() {
        let mut tile = Tile {
            mark: TileMark::QuestionMark,
            ..Default::default()
        };

        assert!(tile.open());
        assert_eq!(tile.mark, TileMark::Unmarked);
    }
}
