use std::fmt::Write;

use pairflip::{Deck, GameSession, KeyValueStore, Signal, Tile, Visibility};

pub const GRID_COLS: usize = 4;

pub const HELP: &str = "\
Commands:
  <n>        flip tile n
  h, hint    reveal a matching pair
  l <n>      switch to level n
  r          restart this level
  reset      wipe all progress
  q          quit";

pub fn start_screen() -> String {
    concat!(
        "\n  Memory\n",
        "  Flip over tiles looking for pairs\n",
        "  Press Enter to play, q to quit\n",
    )
    .to_string()
}

fn tile_cell(index: usize, tile: &Tile) -> String {
    let face = match tile.visibility {
        Visibility::Hidden => "?".to_string(),
        Visibility::Revealed => tile.content.glyph().to_string(),
        Visibility::Hinted => format!("{}*", tile.content.glyph()),
        Visibility::Matched => "✓".to_string(),
    };
    format!("{:>2}:{:<3}", index + 1, face)
}

pub fn play_screen<S: KeyValueStore>(session: &GameSession<S>) -> String {
    let mut out = String::new();
    let level = session.level();

    let _ = writeln!(out);
    let _ = writeln!(out, "Remaining Hints: {}", session.hints_remaining());
    let _ = writeln!(out, "Level {}", level);

    let buttons: Vec<String> = session
        .catalog()
        .levels()
        .iter()
        .map(|l| {
            if l.unlocked {
                format!("Lv{}", l.number)
            } else {
                format!("(Lv{})", l.number)
            }
        })
        .collect();
    let _ = writeln!(out, "{}", buttons.join(" "));

    let best = session
        .best_try(level)
        .map_or_else(|| "-".to_string(), |best| best.to_string());
    let _ = writeln!(out, "Tries {}    Best Try : {}", session.attempts(), best);

    if let Some(deck) = session.deck() {
        for (row, tiles) in deck.tiles().chunks(GRID_COLS).enumerate() {
            let cells: Vec<String> = tiles
                .iter()
                .enumerate()
                .map(|(col, tile)| tile_cell(row * GRID_COLS + col, tile))
                .collect();
            let _ = writeln!(out, "  {}", cells.join(" "));
        }
    }
    out
}

/// `deck` is the board as it stands after the signal was raised.
pub fn describe(signal: Signal, deck: Option<&Deck>) -> Option<String> {
    match signal {
        Signal::TileFlipped { .. } => None,
        Signal::PairMatched { .. } => Some("Match!".to_string()),
        Signal::PairMismatched { .. } => Some("No match.".to_string()),
        Signal::LevelCompleted {
            level,
            attempts,
            next_unlocked,
        } => Some(match next_unlocked {
            Some(next) => format!(
                "Level {} cleared in {} tries! On to level {}.",
                level, attempts, next
            ),
            None => format!("Level {} cleared in {} tries!", level, attempts),
        }),
        Signal::GameWon => Some("Congrats! You beat the Game!".to_string()),
        Signal::HintGranted { first, second } => {
            let tiles = format!("Hint: tiles {} and {}", first + 1, second + 1);
            Some(match deck.and_then(|d| d.tile(first)) {
                Some(tile) => format!("{} are both {}.", tiles, tile.content.name()),
                None => format!("{} match.", tiles),
            })
        }
        Signal::HintRejected(err) | Signal::LevelRejected(err) => Some(err.to_string()),
        Signal::ProgressReset => Some("All progress has been reset.".to_string()),
    }
}
