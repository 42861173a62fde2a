use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// Pointer buttons currently held down.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Buttons: u8 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
        const TERTIARY  = 1 << 2;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Button {
    Primary,
    Secondary,
    Tertiary,
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        match button {
            Button::Primary => Buttons::PRIMARY,
            Button::Secondary => Buttons::SECONDARY,
            Button::Tertiary => Buttons::TERTIARY,
        }
    }
}

/// Logical pointer events, already translated to field coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    Press(Button, Coord2),
    /// `None` when the button was let go outside the field
    Release(Button, Option<Coord2>),
    Move(Coord2),
    /// The pointer left the field
    Leave,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Idle,
    /// Both primary and secondary, or tertiary, are held and the neighborhood is highlighted
    Chording,
    /// A two-button chord finished while one of the buttons is still held, its release must not act
    DebounceAfterChord,
}

impl Default for GesturePhase {
    fn default() -> Self {
        Self::Idle
    }
}

const CHORD_PAIR: Buttons = Buttons::PRIMARY.union(Buttons::SECONDARY);

/// Turns pointer events into game calls.
///
/// Valid transitions:
/// - Idle -> Chording: secondary pressed while primary is held (or the reverse), or tertiary pressed
/// - Chording -> Idle: the chord ends with no other chord button held
/// - Chording -> DebounceAfterChord: the chord ends with a primary or secondary button still held
/// - DebounceAfterChord -> Idle: primary and secondary are both released, or the pointer leaves
/// - DebounceAfterChord -> Chording: tertiary pressed
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerGesture {
    phase: GesturePhase,
    held: Buttons,
    position: Option<Coord2>,
}

impl PointerGesture {
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn held(&self) -> Buttons {
        self.held
    }

    /// Tile under the pointer, if it is over the field.
    pub fn position(&self) -> Option<Coord2> {
        self.position
    }

    /// Whether a reveal is being held down, a chord in progress or a primary press.
    pub fn is_pressing(&self) -> bool {
        match self.phase {
            GesturePhase::Chording => true,
            GesturePhase::Idle => {
                self.position.is_some() && self.held.intersects(Buttons::PRIMARY | Buttons::TERTIARY)
            }
            GesturePhase::DebounceAfterChord => false,
        }
    }

    /// Forgets the gesture in progress, keeping track of buttons and position.
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
    }

    /// Applies `event` to `game`. Returns whether any tile changed.
    pub fn handle<S: Sampler>(&mut self, game: &mut GameState<S>, event: PointerEvent) -> Result<bool> {
        use PointerEvent::*;

        log::trace!(
            "{:?} in {:?} holding {:?}",
            event,
            self.phase,
            self.held
        );
        match event {
            Press(button, coords) => {
                game.grid().validate_coords(coords)?;
                self.held.insert(button.into());
                self.on_press(game, button, coords)
            }
            Release(button, coords) => {
                coords.map(|coords| game.grid().validate_coords(coords)).transpose()?;
                self.held.remove(button.into());
                self.on_release(game, button, coords)
            }
            Move(coords) => {
                game.grid().validate_coords(coords)?;
                self.on_move(game, coords)
            }
            Leave => self.on_leave(game),
        }
    }

    fn on_press<S: Sampler>(&mut self, game: &mut GameState<S>, button: Button, coords: Coord2) -> Result<bool> {
        let previous = self.position.replace(coords);
        if !game.is_active() {
            return Ok(false);
        }

        match (self.phase, button) {
            (GesturePhase::Chording, _) => Ok(false),
            (_, Button::Tertiary) => self.start_chord(game, previous, coords),
            (GesturePhase::DebounceAfterChord, _) => Ok(false),
            (GesturePhase::Idle, _) if self.held.contains(Buttons::TERTIARY) => Ok(false),
            (GesturePhase::Idle, _) if self.held.contains(CHORD_PAIR) => self.start_chord(game, previous, coords),
            (GesturePhase::Idle, Button::Primary) => game.set_hover(previous, Some(coords), 0, true),
            (GesturePhase::Idle, Button::Secondary) => Ok(game.toggle_mark(coords)?.has_update()),
        }
    }

    fn on_release<S: Sampler>(
        &mut self,
        game: &mut GameState<S>,
        button: Button,
        coords: Option<Coord2>,
    ) -> Result<bool> {
        let previous = core::mem::replace(&mut self.position, coords);

        match (self.phase, button) {
            (GesturePhase::DebounceAfterChord, Button::Primary | Button::Secondary) => {
                if !self.held.intersects(CHORD_PAIR) {
                    log::trace!("Chord buttons released, back to idle");
                    self.phase = GesturePhase::Idle;
                }
                Ok(false)
            }
            (GesturePhase::DebounceAfterChord, Button::Tertiary) => Ok(false),
            (GesturePhase::Chording, Button::Primary | Button::Secondary) if self.held.contains(Buttons::TERTIARY) => {
                Ok(false)
            }
            (GesturePhase::Chording, _) => self.finish_chord(game, previous, coords),
            (GesturePhase::Idle, Button::Primary) if game.is_active() && !self.held.contains(Buttons::TERTIARY) => {
                match coords {
                    Some(coords) if game.tile_at(coords)?.state == TileState::Clicked => {
                        Ok(game.reveal(coords)?.has_update())
                    }
                    // released away from the tile that was shown pressed
                    _ => game.set_hover(previous, None, 0, true),
                }
            }
            (GesturePhase::Idle, _) => Ok(false),
        }
    }

    fn on_move<S: Sampler>(&mut self, game: &mut GameState<S>, coords: Coord2) -> Result<bool> {
        let previous = self.position.replace(coords);
        if !game.is_active() {
            return Ok(false);
        }

        // coming back onto the field redraws the highlight even if the tile is the same
        let entering = previous.is_none();
        match self.phase {
            GesturePhase::Chording => game.set_hover(previous, Some(coords), 1, entering),
            GesturePhase::Idle if self.held.contains(Buttons::PRIMARY) => {
                game.set_hover(previous, Some(coords), 0, entering)
            }
            _ => Ok(false),
        }
    }

    fn on_leave<S: Sampler>(&mut self, game: &mut GameState<S>) -> Result<bool> {
        let previous = self.position.take();
        if self.phase == GesturePhase::DebounceAfterChord {
            self.phase = GesturePhase::Idle;
        }
        if !game.is_active() {
            return Ok(false);
        }

        let radius = if self.phase == GesturePhase::Chording { 1 } else { 0 };
        game.set_hover(previous, None, radius, true)
    }

    fn start_chord<S: Sampler>(
        &mut self,
        game: &mut GameState<S>,
        previous: Option<Coord2>,
        coords: Coord2,
    ) -> Result<bool> {
        // a primary press may have highlighted a single tile elsewhere
        game.set_hover(previous, None, 0, true)?;
        game.begin_chord(coords)?;
        self.phase = GesturePhase::Chording;
        log::trace!("Chording at {:?}", coords);
        Ok(true)
    }

    fn finish_chord<S: Sampler>(
        &mut self,
        game: &mut GameState<S>,
        previous: Option<Coord2>,
        coords: Option<Coord2>,
    ) -> Result<bool> {
        self.phase = if self.held.intersects(CHORD_PAIR) {
            GesturePhase::DebounceAfterChord
        } else {
            GesturePhase::Idle
        };

        match coords {
            Some(coords) if game.is_active() => {
                // the release can land where the highlight was never moved to
                game.set_hover(previous, Some(coords), 1, false)?;
                let outcome = game.end_chord(coords)?;
                log::trace!("Chord finished at {:?} with {:?}, now {:?}", coords, outcome, self.phase);
            }
            _ => {
                game.cancel_chord();
                log::trace!("Chord dropped off the field or after the game ended, now {:?}", self.phase);
            }
        }
        Ok(true)
    }
}
