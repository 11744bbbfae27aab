use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use super::palette::{PALETTE, Symbol};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    /// Face up from a player flip, waiting for resolution.
    Revealed,
    /// Face up from a hint. Does not count toward the two-flip limit and can
    /// still be flipped.
    Hinted,
    Matched,
}

impl Visibility {
    pub const fn is_flippable(self) -> bool {
        matches!(self, Self::Hidden | Self::Hinted)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub content: Symbol,
    pub visibility: Visibility,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    tiles: Vec<Tile>,
}

impl Deck {
    /// Takes the first `tile_count / 2` palette symbols, doubles them and
    /// shuffles the result with Fisher-Yates.
    pub fn build<R: Rng + ?Sized>(tile_count: usize, rng: &mut R) -> Result<Self> {
        if tile_count % 2 != 0 {
            return Err(GameError::InvalidTileCount(tile_count));
        }
        let pair_count = tile_count / 2;
        if pair_count > PALETTE.len() {
            return Err(GameError::PaletteExhausted {
                requested: pair_count,
                available: PALETTE.len(),
            });
        }

        let used = &PALETTE[..pair_count];
        let mut contents: Vec<Symbol> = used.iter().chain(used).copied().collect();
        contents.shuffle(rng);

        log::debug!("Built deck of {} tiles", tile_count);
        Ok(Self::from_contents(contents))
    }

    /// Deck with a fixed layout, every tile hidden.
    pub fn from_contents(contents: impl IntoIterator<Item = Symbol>) -> Self {
        let tiles = contents
            .into_iter()
            .map(|content| Tile {
                content,
                visibility: Visibility::Hidden,
            })
            .collect();
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn visibility(&self, index: usize) -> Option<Visibility> {
        self.tiles.get(index).map(|t| t.visibility)
    }

    pub(crate) fn set_visibility(&mut self, index: usize, visibility: Visibility) {
        if let Some(tile) = self.tiles.get_mut(index) {
            tile.visibility = visibility;
        }
    }

    pub fn indices_with(&self, visibility: Visibility) -> impl Iterator<Item = usize> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.visibility == visibility)
            .map(|(i, _)| i)
    }

    pub fn revealed_count(&self) -> usize {
        self.indices_with(Visibility::Revealed).count()
    }

    pub fn all_matched(&self) -> bool {
        self.tiles.iter().all(|t| t.visibility == Visibility::Matched)
    }
}
