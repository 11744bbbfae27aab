use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::catalog::LevelCatalog;
use super::deck::{Deck, Visibility};
use super::engine::{Flip, MatchEngine, Resolution};
use super::error::{GameError, Result};
use super::hint::HintState;
use super::progress::{KeyValueStore, ProgressStore};
use super::signal::Signal;

pub const DEFAULT_RESOLVE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time both tiles of an attempt stay face up before they are resolved.
    pub resolve_delay: Duration,
    /// Fixed seed for reproducible shuffles.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_delay: DEFAULT_RESOLVE_DELAY,
            seed: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Start,
    Play,
}

/// Handle for one scheduled resolution. Tickets issued before a level
/// change, restart or reset no longer resolve anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    deadline: Instant,
}

impl ResolutionTicket {
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    Ignored,
    Revealed,
    AwaitingResolution(ResolutionTicket),
}

/// Single writer over round state, unlocks and best tries.
pub struct GameSession<S> {
    catalog: LevelCatalog,
    progress: ProgressStore<S>,
    best_tries: BTreeMap<u8, u32>,
    config: SessionConfig,
    rng: StdRng,
    phase: Phase,
    level: u8,
    engine: Option<MatchEngine>,
    hints: HintState,
    generation: u64,
    pending: Option<ResolutionTicket>,
    signals: VecDeque<Signal>,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(store: S, config: SessionConfig) -> Result<Self> {
        let progress = ProgressStore::new(store);
        let saved = progress.load(LevelCatalog::builtin().levels().iter().map(|l| l.number));
        let catalog = saved
            .levels
            .as_deref()
            .map(LevelCatalog::from_snapshot)
            .unwrap_or_default();

        let level = match saved.current_level {
            Some(n) if catalog.is_unlocked(n) => n,
            Some(n) => {
                log::warn!("Saved level {} is not playable, starting from the first level", n);
                first_unlocked(&catalog)
            }
            None => first_unlocked(&catalog),
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let hints = HintState::new(allowance(&catalog, level));

        let mut session = Self {
            catalog,
            progress,
            best_tries: saved.best_tries,
            config,
            rng,
            phase: Phase::Start,
            level,
            engine: None,
            hints,
            generation: 0,
            pending: None,
            signals: VecDeque::new(),
        };
        session.ensure_deck()?;
        log::debug!("Session ready at level {}", level);
        Ok(session)
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore<S> {
        &self.progress
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start screen "Play".
    pub fn start(&mut self) {
        self.phase = Phase::Play;
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.engine.as_ref().map(MatchEngine::deck)
    }

    pub fn attempts(&self) -> u32 {
        self.engine.as_ref().map_or(0, MatchEngine::attempts)
    }

    pub fn hints_remaining(&self) -> u8 {
        self.hints.remaining()
    }

    pub fn hint_pending(&self) -> bool {
        self.hints.is_pending()
    }

    pub fn best_try(&self, level: u8) -> Option<u32> {
        self.best_tries.get(&level).copied()
    }

    pub fn pending_ticket(&self) -> Option<ResolutionTicket> {
        self.pending
    }

    pub fn drain_signals(&mut self) -> impl Iterator<Item = Signal> + '_ {
        self.signals.drain(..)
    }

    /// Builds the deck for the active level unless one already exists.
    pub fn ensure_deck(&mut self) -> Result<&Deck> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => {
                let tile_count = self
                    .catalog
                    .get(self.level)
                    .ok_or(GameError::UnknownLevel(self.level))?
                    .tile_count;
                MatchEngine::new(Deck::build(tile_count, &mut self.rng)?)
            }
        };
        Ok(self.engine.insert(engine).deck())
    }

    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome> {
        self.ensure_deck()?;
        let Some(engine) = self.engine.as_mut() else {
            return Ok(FlipOutcome::Ignored);
        };

        Ok(match engine.flip(index) {
            Flip::Ignored => FlipOutcome::Ignored,
            Flip::Revealed(index) => {
                self.signals.push_back(Signal::TileFlipped {
                    index,
                    visibility: Visibility::Revealed,
                });
                FlipOutcome::Revealed
            }
            Flip::PairPending(pair) => {
                self.signals.push_back(Signal::TileFlipped {
                    index: pair.second,
                    visibility: Visibility::Revealed,
                });
                self.generation = self.generation.wrapping_add(1);
                let ticket = ResolutionTicket {
                    generation: self.generation,
                    deadline: Instant::now() + self.config.resolve_delay,
                };
                self.pending = Some(ticket);
                FlipOutcome::AwaitingResolution(ticket)
            }
        })
    }

    /// Timer callback for a ticket handed out by [`Self::flip`].
    pub fn resolve(&mut self, ticket: ResolutionTicket) -> Option<Resolution> {
        if self.pending != Some(ticket) {
            log::debug!("Ignoring stale resolution ticket {}", ticket.generation);
            return None;
        }
        self.resolve_pending()
    }

    /// Resolves the pending pair once its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<Resolution> {
        let ticket = self.pending?;
        if now < ticket.deadline {
            return None;
        }
        self.resolve(ticket)
    }

    /// Resolves the pending pair right away, ignoring the deadline.
    pub fn resolve_pending(&mut self) -> Option<Resolution> {
        let resolution = self.engine.as_mut()?.resolve()?;
        self.pending = None;

        match resolution {
            Resolution::Matched {
                first,
                second,
                level_complete,
            } => {
                log::debug!("Matched {} and {}", first, second);
                self.hints.clear_pending();
                self.signals.push_back(Signal::PairMatched { first, second });
                if level_complete {
                    self.complete_level();
                }
            }
            Resolution::Mismatched { first, second } => {
                log::debug!("Mismatched {} and {}", first, second);
                self.signals.push_back(Signal::PairMismatched { first, second });
            }
        }
        Some(resolution)
    }

    pub fn use_hint(&mut self) -> Result<(usize, usize)> {
        self.ensure_deck()?;
        let Some(engine) = self.engine.as_mut() else {
            return Err(GameError::NoPairAvailable);
        };

        match self.hints.use_hint(engine.deck_mut()) {
            Ok((first, second)) => {
                self.signals.push_back(Signal::HintGranted { first, second });
                Ok((first, second))
            }
            Err(err) => {
                self.signals.push_back(Signal::HintRejected(err));
                Err(err)
            }
        }
    }

    /// Enters an unlocked level with a fresh deck. A pending pair is settled
    /// as a mismatch first. Rejections leave everything untouched.
    pub fn select_level(&mut self, number: u8) -> Result<()> {
        if let Err(err) = self.catalog.select(number) {
            log::debug!("Level {} rejected: {}", number, err);
            self.signals.push_back(Signal::LevelRejected(err));
            return Err(err);
        }
        self.cancel_pending();
        self.set_level(number);
        self.reset_round();
        self.ensure_deck()?;
        Ok(())
    }

    pub fn restart_level(&mut self) -> Result<()> {
        self.cancel_pending();
        self.reset_round();
        self.ensure_deck()?;
        Ok(())
    }

    /// Wipes every persisted record and unlock and starts over at the first
    /// level. Irreversible.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.cancel_pending();
        if let Err(err) = self.progress.clear_all() {
            log::error!("Could not clear saved progress: {}", err);
        }
        self.catalog = LevelCatalog::builtin();
        self.best_tries.clear();
        self.level = first_unlocked(&self.catalog);
        self.reset_round();
        self.ensure_deck()?;
        log::info!("Progress reset");
        self.signals.push_back(Signal::ProgressReset);
        Ok(())
    }

    fn cancel_pending(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if let Some((first, second)) = engine.cancel_pending() {
            log::debug!("Cancelled pending pair {} and {}", first, second);
            self.signals.push_back(Signal::PairMismatched { first, second });
        }
        self.pending = None;
    }

    fn reset_round(&mut self) {
        self.engine = None;
        self.pending = None;
        self.generation = self.generation.wrapping_add(1);
        self.hints = HintState::new(allowance(&self.catalog, self.level));
    }

    fn set_level(&mut self, number: u8) {
        self.level = number;
        if let Err(err) = self.progress.save_current_level(number) {
            log::error!("Could not save current level: {}", err);
        }
    }

    fn complete_level(&mut self) {
        let level = self.level;
        let attempts = self.attempts();

        if self.catalog.is_last(level) {
            log::info!("Final level {} cleared in {} attempts", level, attempts);
            self.signals.push_back(Signal::GameWon);
            self.phase = Phase::Start;
            self.reset_round();
            self.rebuild_deck();
            return;
        }

        match self.progress.record_best(level, attempts) {
            Ok(true) => {
                self.best_tries.insert(level, attempts);
            }
            Ok(false) => {}
            Err(err) => log::error!("Could not save best try for level {}: {}", level, err),
        }

        let next_unlocked = self.catalog.unlock_next(level);
        if let Err(err) = self.progress.save_unlocks(self.catalog.levels()) {
            log::error!("Could not save unlocked levels: {}", err);
        }
        log::info!("Level {} cleared in {} attempts", level, attempts);
        self.signals.push_back(Signal::LevelCompleted {
            level,
            attempts,
            next_unlocked,
        });

        if let Some(next) = next_unlocked {
            self.set_level(next);
        }
        self.reset_round();
        self.rebuild_deck();
    }

    fn rebuild_deck(&mut self) {
        if let Err(err) = self.ensure_deck() {
            log::error!("Could not build deck for level {}: {}", self.level, err);
        }
    }
}

fn allowance(catalog: &LevelCatalog, level: u8) -> u8 {
    catalog.get(level).map_or(0, |l| l.hint_allowance)
}

fn first_unlocked(catalog: &LevelCatalog) -> u8 {
    catalog
        .levels()
        .iter()
        .find(|l| l.unlocked)
        .map_or(0, |l| l.number)
}
