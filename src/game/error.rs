use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Tile count {0} is odd, decks are built from pairs")]
    InvalidTileCount(usize),
    #[error("Level needs {requested} symbols but the palette only has {available}")]
    PaletteExhausted { requested: usize, available: usize },
    #[error("You haven't passed level {0} yet")]
    LockedLevel(u8),
    #[error("There is no level {0}")]
    UnknownLevel(u8),
    #[error("You have no more hints")]
    NoHintsRemaining,
    #[error("A hint is already showing, find that pair first")]
    HintAlreadyPendingThisRound,
    #[error("No hidden pair left to hint")]
    NoPairAvailable,
}

impl GameError {
    /// User-facing rejections that leave the round untouched. Everything else
    /// is a broken level table.
    pub const fn is_recoverable(self) -> bool {
        !matches!(
            self,
            Self::InvalidTileCount(_) | Self::PaletteExhausted { .. }
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
