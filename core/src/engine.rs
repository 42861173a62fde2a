use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::reveal::reveal_tile;
use crate::*;

/// Valid transitions:
/// - Ready -> Active
/// - Ready -> Won
/// - Active -> Won
/// - Active -> Lost
///
/// Any state goes back to Ready on reset or resize.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Nothing revealed yet, mines are not placed
    Ready,
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Ready
    }
}

/// Authoritative state of one game: the grid, its counters, and the components that mutate it.
#[derive(Clone, Debug)]
pub struct GameState<S = RandomSampler> {
    config: GameConfig,
    grid: Grid,
    generator: MineGenerator<S>,
    chord: ChordController,
    revealed_count: CellCount,
    flagged_count: Saturating<CellCount>,
    lost: bool,
    mines_placed: bool,
    question_marks_enabled: bool,
}

impl GameState<RandomSampler> {
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RandomSampler::new(seed))
    }
}

impl<S: Sampler> GameState<S> {
    /// Starts a game for `config` as given, use [`GameConfig::new`] to get a normalized config.
    pub fn new(config: GameConfig, sampler: S) -> Self {
        Self {
            config,
            grid: Grid::new(config.size),
            generator: MineGenerator::new(sampler),
            chord: ChordController::default(),
            revealed_count: 0,
            flagged_count: Saturating(0),
            lost: false,
            mines_placed: false,
            question_marks_enabled: false,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> Coord {
        self.grid.width()
    }

    pub fn height(&self) -> Coord {
        self.grid.height()
    }

    pub fn tile_count(&self) -> CellCount {
        self.grid.tile_count()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    /// How many mines have not been flagged yet, negative when there are more flags than mines
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count.0 as isize)
    }

    pub fn question_marks_enabled(&self) -> bool {
        self.question_marks_enabled
    }

    pub fn is_chording(&self) -> bool {
        self.chord.is_chording()
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        let coords = self.grid.validate_coords(coords)?;
        Ok(*self.grid.tile(coords))
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Won once every tile that is not a mine has been revealed, phrased to stay clear of unsigned underflow.
    pub fn is_won(&self) -> bool {
        !self.lost
            && self.revealed_count > 0
            && self.grid.tile_count() <= self.config.mines + self.revealed_count
    }

    pub fn is_active(&self) -> bool {
        !(self.is_lost() || self.is_won())
    }

    pub fn status(&self) -> GameStatus {
        if self.is_lost() {
            GameStatus::Lost
        } else if self.is_won() {
            GameStatus::Won
        } else if self.revealed_count == 0 {
            GameStatus::Ready
        } else {
            GameStatus::Active
        }
    }

    /// Rebuilds the field when any dimension or the (normalized) mine count differs from the current one.
    pub fn resize(&mut self, size: Coord2, mines: CellCount) -> ResizeOutcome {
        let config = GameConfig::new(size, mines);
        if config == self.config {
            return ResizeOutcome::Unchanged;
        }

        log::debug!(
            "Resizing from {:?} to {:?}",
            self.config,
            config
        );
        self.config = config;
        self.reset_game();
        ResizeOutcome::Changed
    }

    /// Clears the field keeping its dimensions, mine count, and the question mark setting.
    pub fn reset_game(&mut self) {
        self.grid = Grid::new(self.config.size);
        self.chord = ChordController::default();
        self.revealed_count = 0;
        self.flagged_count = Saturating(0);
        self.lost = false;
        self.mines_placed = false;
        log::debug!("New game with {:?}", self.config);
    }

    /// Flips question mark usage, turning it off removes every question mark. Returns the new setting.
    pub fn toggle_question_mark_usage(&mut self) -> bool {
        self.question_marks_enabled = !self.question_marks_enabled;

        if !self.question_marks_enabled {
            self.grid
                .iter_mut()
                .filter(|tile| tile.mark == TileMark::QuestionMark)
                .for_each(|tile| tile.mark = TileMark::Unmarked);
        }
        log::debug!("Question marks enabled: {}", self.question_marks_enabled);
        self.question_marks_enabled
    }

    /// Reveals a tile, placing the mines first when this is the opening move.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_active()?;

        let tile = self.grid.tile(coords);
        if tile.is_revealed() || tile.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.mines_placed {
            self.generator
                .generate(&mut self.grid, self.config.mines, coords)?;
            self.mines_placed = true;
        }

        let report = reveal_tile(&mut self.grid, coords);
        Ok(self.apply(report))
    }

    /// Cycles the mark of a hidden tile: none, flag, question mark (when enabled), none.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use MarkOutcome::*;

        let coords = self.grid.validate_coords(coords)?;
        self.check_active()?;

        let question_marks = self.question_marks_enabled;
        let tile = self.grid.tile_mut(coords);
        if tile.state != TileState::Hidden {
            return Ok(NoChange);
        }

        tile.mark = match tile.mark {
            TileMark::Unmarked => {
                self.flagged_count += 1;
                TileMark::Flag
            }
            TileMark::Flag => {
                self.flagged_count -= 1;
                if question_marks {
                    TileMark::QuestionMark
                } else {
                    TileMark::Unmarked
                }
            }
            TileMark::QuestionMark => TileMark::Unmarked,
        };
        log::debug!("Marked tile at {:?} as {:?}", coords, tile.mark);
        Ok(Changed)
    }

    pub fn begin_chord(&mut self, coords: Coord2) -> Result<()> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_active()?;

        self.chord.begin(&mut self.grid, coords);
        Ok(())
    }

    /// Finishes a chord. Once the game has ended the chord is only dropped and `AlreadyEnded` is returned.
    pub fn end_chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if let Err(err) = self.check_active() {
            self.cancel_chord();
            return Err(err);
        }

        Ok(match self.chord.end(&mut self.grid, coords) {
            ChordOutcome::Abandoned => RevealOutcome::NoChange,
            ChordOutcome::Revealed(report) => self.apply(report),
        })
    }

    /// Moves the pressed-down highlight of `radius` from `old` to `new`. Either side may be outside the field.
    ///
    /// Nothing happens when the position did not change, unless `force` is set. Returns whether any tile changed.
    pub fn set_hover(
        &mut self,
        old: Option<Coord2>,
        new: Option<Coord2>,
        radius: Radius,
        force: bool,
    ) -> Result<bool> {
        let old = old.map(|coords| self.grid.validate_coords(coords)).transpose()?;
        let new = new.map(|coords| self.grid.validate_coords(coords)).transpose()?;
        self.check_active()?;

        if old == new && !force {
            return Ok(false);
        }

        let mut changed = false;
        if let Some(old) = old {
            for index in self.grid.neighborhood(old, radius) {
                changed |= self.grid[index].release();
            }
        }
        if let Some(new) = new {
            for index in self.grid.neighborhood(new, radius) {
                changed |= self.grid[index].press();
            }
        }
        log::trace!("Hover {:?} -> {:?} (radius {}), changed: {}", old, new, radius, changed);
        Ok(changed)
    }

    /// Drops a chord in progress without revealing, clearing every pressed highlight. Allowed after the game ended.
    pub fn cancel_chord(&mut self) {
        if self.chord.is_chording() {
            log::debug!("Chord cancelled");
        }
        self.chord.cancel(&mut self.grid);
    }

    fn apply(&mut self, report: RevealReport) -> RevealOutcome {
        self.revealed_count += report.revealed;

        if report.hit_mine {
            self.lost = true;
            log::debug!("Game lost after {} reveals", self.revealed_count);
            RevealOutcome::HitMine
        } else if self.is_won() {
            log::debug!("Game won");
            RevealOutcome::Won
        } else if report.revealed > 0 {
            RevealOutcome::Revealed
        } else {
            RevealOutcome::NoChange
        }
    }

    fn check_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GameError::AlreadyEnded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn fixed(mines: Vec<CellCount>) -> impl Sampler {
        move |_: &[CellCount], _: usize| mines.clone()
    }

    /// 3x3 field with mines at the top corners, first click must be in the bottom row.
    fn corners_game() -> GameState<impl Sampler> {
        GameState::new(GameConfig::new((3, 3), 2), fixed(vec![0, 2]))
    }

    #[test]
    fn fresh_game_is_ready() {
        let game = corners_game();

        assert_eq!(game.status(), GameStatus::Ready);
        assert!(game.is_active());
        assert!(!game.is_won());
        assert_eq!(game.tile_at((2, 2)).unwrap(), Tile::default());
        assert_eq!(game.tile_at((3, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn first_reveal_places_mines_and_floods() {
        let mut game = corners_game();

        let outcome = game.reveal((1, 2)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(game.grid().mine_count(), 2);
        assert_eq!(game.revealed_count(), 6);
        assert_eq!(game.status(), GameStatus::Active);
        assert_eq!(game.tile_at((1, 0)).unwrap().content, TileContent::Two);
        assert!(!game.tile_at((1, 0)).unwrap().is_revealed());
    }

    #[test]
    fn revealing_the_last_safe_tile_wins() {
        let mut game = corners_game();

        game.reveal((1, 2)).unwrap();
        let outcome = game.reveal((1, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert!(game.is_won());
        assert!(!game.is_active());
        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(game.reveal((0, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut game = corners_game();

        game.reveal((1, 2)).unwrap();
        let outcome = game.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert!(game.is_lost());
        assert!(!game.is_won());
        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(game.toggle_mark((2, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn repeated_reveal_changes_nothing() {
        let mut game = corners_game();
        game.reveal((1, 2)).unwrap();

        assert_eq!(game.reveal((1, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.revealed_count(), 6);
    }

    #[test]
    fn flagged_first_click_does_not_generate() {
        let mut game = corners_game();
        game.toggle_mark((1, 2)).unwrap();

        assert_eq!(game.reveal((1, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(game.grid().mine_count(), 0);
        assert_eq!(game.status(), GameStatus::Ready);
    }

    #[test]
    fn mark_cycle_without_question_marks() {
        let mut game = corners_game();
        let cycle: Vec<TileMark> = (0..4)
            .map(|_| {
                game.toggle_mark((0, 0)).unwrap();
                game.tile_at((0, 0)).unwrap().mark
            })
            .collect();

        assert_eq!(
            cycle,
            [TileMark::Flag, TileMark::Unmarked, TileMark::Flag, TileMark::Unmarked]
        );
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn mark_cycle_with_question_marks() {
        let mut game = corners_game();
        assert!(game.toggle_question_mark_usage());

        game.toggle_mark((0, 0)).unwrap();
        assert_eq!(game.tile_at((0, 0)).unwrap().mark, TileMark::Flag);
        assert_eq!(game.mines_left(), 1);
        game.toggle_mark((0, 0)).unwrap();
        assert_eq!(game.tile_at((0, 0)).unwrap().mark, TileMark::QuestionMark);
        assert_eq!(game.mines_left(), 2);
        game.toggle_mark((0, 0)).unwrap();
        assert_eq!(game.tile_at((0, 0)).unwrap().mark, TileMark::Unmarked);
        assert_eq!(game.mines_left(), 2);
    }

    #[test]
    fn disabling_question_marks_demotes_them() {
        let mut game = corners_game();
        game.toggle_question_mark_usage();
        game.toggle_mark((0, 0)).unwrap();
        game.toggle_mark((0, 0)).unwrap();
        game.toggle_mark((2, 0)).unwrap();

        assert!(!game.toggle_question_mark_usage());
        assert_eq!(game.tile_at((0, 0)).unwrap().mark, TileMark::Unmarked);
        assert_eq!(game.tile_at((2, 0)).unwrap().mark, TileMark::Flag);
        assert_eq!(game.flagged_count(), 1);
    }

    #[test]
    fn flags_may_exceed_mines() {
        let mut game = corners_game();
        for x in 0..3 {
            game.toggle_mark((x, 0)).unwrap();
        }

        assert_eq!(game.flagged_count(), 3);
        assert_eq!(game.mines_left(), -1);
    }

    #[test]
    fn revealed_tiles_cannot_be_marked() {
        let mut game = corners_game();
        game.reveal((1, 2)).unwrap();

        assert_eq!(game.toggle_mark((1, 2)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn resize_only_rebuilds_on_change() {
        let mut game = corners_game();
        game.reveal((1, 2)).unwrap();

        assert_eq!(game.resize((3, 3), 2), ResizeOutcome::Unchanged);
        assert_eq!(game.revealed_count(), 6);

        assert_eq!(game.resize((4, 3), 2), ResizeOutcome::Changed);
        assert_eq!(game.revealed_count(), 0);
        assert_eq!((game.width(), game.height()), (4, 3));
        assert_eq!(game.tile_count(), 12);
        assert_eq!(game.status(), GameStatus::Ready);
    }

    #[test]
    fn resize_clamps_and_compares_normalized_config() {
        let mut game = corners_game();

        assert_eq!(game.resize((3, 3), 20), ResizeOutcome::Changed);
        assert_eq!(game.total_mines(), 8);
        assert_eq!(game.resize((3, 3), 20), ResizeOutcome::Unchanged);
    }

    #[test]
    fn reset_keeps_config_and_question_marks() {
        let mut game = corners_game();
        game.toggle_question_mark_usage();
        game.reveal((1, 2)).unwrap();
        game.reveal((0, 0)).unwrap();

        game.reset_game();

        assert_eq!(game.status(), GameStatus::Ready);
        assert!(!game.is_lost());
        assert!(game.question_marks_enabled());
        assert_eq!(game.config(), GameConfig::new((3, 3), 2));
        assert_eq!(game.grid(), &Grid::new((3, 3)));
    }

    #[test]
    fn hover_moves_the_pressed_highlight() {
        let mut game = corners_game();

        assert!(game.set_hover(None, Some((0, 0)), 0, false).unwrap());
        assert_eq!(game.tile_at((0, 0)).unwrap().state, TileState::Clicked);

        assert!(!game.set_hover(Some((0, 0)), Some((0, 0)), 0, false).unwrap());
        assert!(game.set_hover(Some((0, 0)), Some((2, 2)), 1, false).unwrap());
        assert_eq!(game.tile_at((0, 0)).unwrap().state, TileState::Hidden);
        assert_eq!(game.tile_at((1, 1)).unwrap().state, TileState::Clicked);

        assert!(game.set_hover(Some((2, 2)), None, 1, false).unwrap());
        assert!(game.grid().iter().all(|tile| tile.state == TileState::Hidden));
    }

    #[test]
    fn hover_skips_flags() {
        let mut game = corners_game();
        game.toggle_mark((1, 1)).unwrap();

        game.set_hover(None, Some((1, 1)), 1, true).unwrap();

        assert_eq!(game.tile_at((1, 1)).unwrap().state, TileState::Hidden);
        assert_eq!(game.tile_at((0, 0)).unwrap().state, TileState::Clicked);
    }

    #[test]
    fn chord_reveals_and_wins() {
        let mut game = GameState::new(GameConfig::new((3, 3), 2), fixed(vec![3, 5]));
        game.reveal((1, 1)).unwrap();
        game.toggle_mark((0, 1)).unwrap();
        game.toggle_mark((2, 1)).unwrap();

        game.begin_chord((1, 1)).unwrap();
        assert!(game.is_chording());
        let outcome = game.end_chord((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert!(!game.is_chording());
        assert_eq!(game.revealed_count(), 7);
    }

    #[test]
    fn chord_interrupted_by_a_loss_is_dropped() {
        let mut game = corners_game();
        game.reveal((1, 2)).unwrap();
        game.begin_chord((1, 1)).unwrap();
        assert_eq!(
            game.grid().iter().filter(|tile| tile.state == TileState::Clicked).count(),
            3
        );

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(game.end_chord((1, 1)), Err(GameError::AlreadyEnded));

        assert!(!game.is_chording());
        assert!(game.grid().iter().all(|tile| tile.state != TileState::Clicked));
    }

    #[test]
    fn cancel_chord_releases_a_moved_highlight() {
        let mut game = corners_game();
        game.begin_chord((0, 0)).unwrap();
        game.set_hover(Some((0, 0)), Some((2, 2)), 1, false).unwrap();

        game.cancel_chord();

        assert!(!game.is_chording());
        assert!(game.grid().iter().all(|tile| tile.state == TileState::Hidden));
    }

    #[test]
    fn full_field_config_fails_generation_loudly() {
        let mut game = GameState::new(
            GameConfig::new_unchecked((3, 3), 9),
            |candidates: &[CellCount], amount: usize| candidates[..amount.min(candidates.len())].to_vec(),
        );

        assert_eq!(
            game.reveal((1, 1)),
            Err(GameError::NotEnoughCandidates {
                requested: 9,
                available: 8
            })
        );
        assert_eq!(game.status(), GameStatus::Ready);
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn single_tile_field_is_won_by_the_first_reveal() {
        let mut game = GameState::seeded(GameConfig::new((1, 1), 5), 3);

        assert_eq!(game.reveal((0, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
    }
}
