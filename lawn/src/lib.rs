//! A small lawn defense game as a headless state machine.
//!
//! The host owns the frame loop and the drawing. It forwards clicks, key
//! presses and elapsed time to [`Game`], then reads back the entities and the
//! HUD values to render them.

mod entity;
mod game;

pub use entity::{Defender, Invader};
pub use game::{Game, GameState, Hud, Key, Rules};
