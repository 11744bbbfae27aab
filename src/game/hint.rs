use super::deck::{Deck, Visibility};
use super::error::{GameError, Result};

/// First hidden pair in scan order: outer index ascending, inner index
/// ascending from `outer + 1`.
pub fn find_pair(deck: &Deck) -> Option<(usize, usize)> {
    let hidden: Vec<usize> = deck.indices_with(Visibility::Hidden).collect();
    for (pos, &i) in hidden.iter().enumerate() {
        let content = deck.tile(i)?.content;
        if let Some(&j) = hidden[pos + 1..]
            .iter()
            .find(|&&j| deck.tile(j).is_some_and(|t| t.content == content))
        {
            return Some((i, j));
        }
    }
    None
}

/// Hints left this round and whether a granted hint still awaits a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HintState {
    remaining: u8,
    pending: bool,
}

impl HintState {
    pub fn new(allowance: u8) -> Self {
        Self {
            remaining: allowance,
            pending: false,
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Called on every successful match.
    pub fn clear_pending(&mut self) {
        self.pending = false;
    }

    pub fn use_hint(&mut self, deck: &mut Deck) -> Result<(usize, usize)> {
        if self.remaining == 0 {
            return Err(GameError::NoHintsRemaining);
        }
        if self.pending {
            return Err(GameError::HintAlreadyPendingThisRound);
        }
        let (i, j) = find_pair(deck).ok_or(GameError::NoPairAvailable)?;

        deck.set_visibility(i, Visibility::Hinted);
        deck.set_visibility(j, Visibility::Hinted);
        self.remaining -= 1;
        self.pending = true;
        log::debug!("Hint reveals {} and {}, {} left", i, j, self.remaining);
        Ok((i, j))
    }
}
