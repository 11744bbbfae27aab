use super::deck::{Deck, Visibility};

/// Two face-up tiles waiting for the delayed resolution step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingPair {
    pub first: usize,
    pub second: usize,
    pub is_match: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flip {
    /// Matched or already face-up tile, out of range index, or a pair is
    /// still waiting for resolution.
    Ignored,
    Revealed(usize),
    PairPending(PendingPair),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        first: usize,
        second: usize,
        level_complete: bool,
    },
    Mismatched {
        first: usize,
        second: usize,
    },
}

/// Flip/match state machine over one deck. Holds at most one pending pair,
/// so no more than two tiles are ever `Revealed`.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchEngine {
    deck: Deck,
    attempts: u32,
    pending: Option<PendingPair>,
}

impl MatchEngine {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            attempts: 0,
            pending: None,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub(crate) fn deck_mut(&mut self) -> &mut Deck {
        &mut self.deck
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn pending(&self) -> Option<PendingPair> {
        self.pending
    }

    pub fn is_complete(&self) -> bool {
        self.deck.all_matched()
    }

    pub fn flip(&mut self, index: usize) -> Flip {
        if self.pending.is_some() {
            return Flip::Ignored;
        }
        let Some(tile) = self.deck.tile(index).copied() else {
            return Flip::Ignored;
        };
        if !tile.visibility.is_flippable() {
            return Flip::Ignored;
        }

        let first = self.deck.indices_with(Visibility::Revealed).next();
        self.deck.set_visibility(index, Visibility::Revealed);

        let Some(first) = first else {
            log::trace!("flip {} ({:?})", index, tile.content);
            return Flip::Revealed(index);
        };

        self.attempts = self.attempts.saturating_add(1);
        let is_match = self
            .deck
            .tile(first)
            .is_some_and(|t| t.content == tile.content);
        let pair = PendingPair {
            first,
            second: index,
            is_match,
        };
        log::trace!("flip {} completes attempt {}: {:?}", index, self.attempts, pair);
        self.pending = Some(pair);
        Flip::PairPending(pair)
    }

    /// Finalizes the pending pair. `None` when nothing is pending.
    pub fn resolve(&mut self) -> Option<Resolution> {
        let PendingPair {
            first,
            second,
            is_match,
        } = self.pending.take()?;

        if is_match {
            self.deck.set_visibility(first, Visibility::Matched);
            self.deck.set_visibility(second, Visibility::Matched);
            Some(Resolution::Matched {
                first,
                second,
                level_complete: self.deck.all_matched(),
            })
        } else {
            self.deck.set_visibility(first, Visibility::Hidden);
            self.deck.set_visibility(second, Visibility::Hidden);
            Some(Resolution::Mismatched { first, second })
        }
    }

    /// Settles a pending pair as a mismatch even when the symbols agree.
    /// Used before the round is torn down.
    pub fn cancel_pending(&mut self) -> Option<(usize, usize)> {
        let pair = self.pending.take()?;
        self.deck.set_visibility(pair.first, Visibility::Hidden);
        self.deck.set_visibility(pair.second, Visibility::Hidden);
        Some((pair.first, pair.second))
    }
}
