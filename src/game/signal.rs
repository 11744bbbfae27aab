use super::deck::Visibility;
use super::error::GameError;

/// Notifications for the presentation layer, drained from the session
/// after each call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    TileFlipped {
        index: usize,
        visibility: Visibility,
    },
    PairMatched {
        first: usize,
        second: usize,
    },
    PairMismatched {
        first: usize,
        second: usize,
    },
    LevelCompleted {
        level: u8,
        attempts: u32,
        next_unlocked: Option<u8>,
    },
    GameWon,
    HintGranted {
        first: usize,
        second: usize,
    },
    HintRejected(GameError),
    LevelRejected(GameError),
    ProgressReset,
}
