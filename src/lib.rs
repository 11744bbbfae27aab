//! Game-state engine for a tile-pairing memory game: level unlocks, deck
//! shuffling, the flip/match state machine, hints and persisted best tries.

pub mod game;

pub use game::*;
