use serde::{Deserialize, Serialize};

use crate::*;

/// Face shown by the mood indicator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Smile,
    /// A tile or chord is being held down
    Surprised,
    Dead,
    Cool,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Smile
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerSignal {
    Start,
    Stop,
    Reset,
}

/// What the display collaborators need to refresh after a call into the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Value for the flag counter, zero once the game is won
    pub mines_left: isize,
    pub mood: Mood,
    pub timer: Option<TimerSignal>,
    /// Content of the tile under the pointer, `None` when the pointer is off the field
    pub hovered: Option<TileContent>,
    /// Whether the field needs repainting
    pub redraw: bool,
}

/// One game plus the pointer gesture driving it, the entry point for an input layer.
#[derive(Clone, Debug)]
pub struct Session<S = RandomSampler> {
    game: GameState<S>,
    gesture: PointerGesture,
}

impl Session<RandomSampler> {
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(GameState::seeded(config, seed))
    }
}

impl<S: Sampler> Session<S> {
    pub fn new(game: GameState<S>) -> Self {
        Self {
            game,
            gesture: PointerGesture::default(),
        }
    }

    pub fn game(&self) -> &GameState<S> {
        &self.game
    }

    pub fn gesture(&self) -> &PointerGesture {
        &self.gesture
    }

    pub fn handle(&mut self, event: PointerEvent) -> Result<Feedback> {
        let before = self.game.status();
        let redraw = self.gesture.handle(&mut self.game, event)?;
        let timer = timer_signal(before, self.game.status());
        if let Some(signal) = timer {
            log::debug!("Timer {:?}, game is now {:?}", signal, self.game.status());
        }
        Ok(self.feedback(timer, redraw))
    }

    pub fn new_game(&mut self) -> Feedback {
        self.game.reset_game();
        self.gesture.reset();
        self.feedback(Some(TimerSignal::Reset), true)
    }

    /// Applies new dimensions, a new game only starts when they differ from the current ones.
    pub fn resize(&mut self, size: Coord2, mines: CellCount) -> Feedback {
        match self.game.resize(size, mines) {
            ResizeOutcome::Changed => {
                self.gesture.reset();
                self.feedback(Some(TimerSignal::Reset), true)
            }
            ResizeOutcome::Unchanged => self.feedback(None, false),
        }
    }

    pub fn toggle_question_mark_usage(&mut self) -> Feedback {
        let had_question_marks = self
            .game
            .grid()
            .iter()
            .any(|tile| tile.mark == TileMark::QuestionMark);
        self.game.toggle_question_mark_usage();
        self.feedback(None, had_question_marks)
    }

    pub fn mood(&self) -> Mood {
        match self.game.status() {
            GameStatus::Lost => Mood::Dead,
            GameStatus::Won => Mood::Cool,
            GameStatus::Ready | GameStatus::Active if self.gesture.is_pressing() => Mood::Surprised,
            GameStatus::Ready | GameStatus::Active => Mood::Smile,
        }
    }

    fn feedback(&self, timer: Option<TimerSignal>, redraw: bool) -> Feedback {
        let mines_left = if self.game.is_won() {
            0
        } else {
            self.game.mines_left()
        };
        let hovered = self
            .gesture
            .position()
            .and_then(|coords| self.game.tile_at(coords).ok())
            .map(|tile| tile.content);

        Feedback {
            mines_left,
            mood: self.mood(),
            timer,
            hovered,
            redraw,
        }
    }
}

fn timer_signal(before: GameStatus, after: GameStatus) -> Option<TimerSignal> {
    match (before, after) {
        (GameStatus::Ready, GameStatus::Active) => Some(TimerSignal::Start),
        (before, after) if !before.is_finished() && after.is_finished() => Some(TimerSignal::Stop),
        _ => None,
    }
}
