use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

pub const LEVEL_COUNT: u8 = 6;
const PRE_UNLOCKED: u8 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub number: u8,
    pub unlocked: bool,
    pub tile_count: usize,
    pub hint_allowance: u8,
}

/// Tile count and hint allowance of each built-in level.
fn builtin_config(number: u8) -> Option<(usize, u8)> {
    match number {
        0 => Some((4, 1)),
        1 => Some((8, 2)),
        2 => Some((12, 3)),
        3 => Some((16, 3)),
        4 => Some((20, 4)),
        5 => Some((24, 2)),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    pub fn builtin() -> Self {
        let levels = (0..LEVEL_COUNT)
            .filter_map(|number| {
                let (tile_count, hint_allowance) = builtin_config(number)?;
                Some(Level {
                    number,
                    unlocked: number < PRE_UNLOCKED,
                    tile_count,
                    hint_allowance,
                })
            })
            .collect();
        Self { levels }
    }

    /// Built-in table with unlock flags taken from a persisted snapshot.
    /// Counts and allowances in the snapshot are ignored.
    pub fn from_snapshot(snapshot: &[Level]) -> Self {
        let mut catalog = Self::builtin();
        for saved in snapshot {
            match catalog.levels.iter_mut().find(|l| l.number == saved.number) {
                Some(level) => level.unlocked = saved.unlocked,
                None => {
                    log::warn!("Ignoring unknown level {} in saved catalog", saved.number)
                }
            }
        }
        catalog
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn get(&self, number: u8) -> Option<&Level> {
        self.levels.iter().find(|l| l.number == number)
    }

    pub fn is_unlocked(&self, number: u8) -> bool {
        self.get(number).is_some_and(|l| l.unlocked)
    }

    pub fn is_last(&self, number: u8) -> bool {
        self.levels.last().is_some_and(|l| l.number == number)
    }

    pub fn select(&self, number: u8) -> Result<&Level> {
        let level = self.get(number).ok_or(GameError::UnknownLevel(number))?;
        if level.unlocked {
            Ok(level)
        } else {
            Err(GameError::LockedLevel(number))
        }
    }

    /// Unlocks the level after `current`. Returns the next level's number
    /// whenever one exists, whether or not it was already unlocked.
    pub fn unlock_next(&mut self, current: u8) -> Option<u8> {
        let next = current.checked_add(1)?;
        let level = self.levels.iter_mut().find(|l| l.number == next)?;
        if !level.unlocked {
            level.unlocked = true;
            log::info!("Unlocked level {}", next);
        }
        Some(next)
    }
}
