use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use pairflip::{
    FileStore, FlipOutcome, GameError, GameSession, KeyValueStore, MemoryStore, Phase,
    SessionConfig,
};
use thiserror::Error;

use super::cli::Cli;
use super::view;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("game configuration is broken: {0}")]
    Game(#[from] GameError),
}

const RESET_PROMPT: &str = concat!(
    "Are you sure you want to reset the game? ",
    "This action will lose all your progress. [y/N] ",
);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Flip(usize),
    Hint,
    Level(u8),
    Restart,
    Reset,
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let head = words.next()?;
        let command = match head {
            "h" | "hint" => Command::Hint,
            "l" | "level" => Command::Level(words.next()?.parse().ok()?),
            "r" | "restart" => Command::Restart,
            "reset" => Command::Reset,
            "?" | "help" => Command::Help,
            "q" | "quit" => Command::Quit,
            _ => {
                let number: usize = head.parse().ok()?;
                Command::Flip(number.checked_sub(1)?)
            }
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

pub fn launch(cli: &Cli) -> Result<(), AppError> {
    let config = SessionConfig {
        resolve_delay: Duration::from_millis(cli.resolve_delay_ms),
        seed: cli.seed,
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    if cli.memory {
        let mut session = GameSession::new(MemoryStore::new(), config)?;
        run(&mut session, stdin.lock(), &mut stdout)
    } else {
        let dir = cli.data_dir();
        log::debug!("Saving progress under {}", dir.display());
        let mut session = GameSession::new(FileStore::new(dir), config)?;
        run(&mut session, stdin.lock(), &mut stdout)
    }
}

/// Recoverable rejections already reached the player as signals.
fn check<T>(result: pairflip::Result<T>) -> Result<(), AppError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.is_recoverable() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn flush_signals<S: KeyValueStore, W: Write>(
    session: &mut GameSession<S>,
    out: &mut W,
) -> io::Result<()> {
    let signals: Vec<_> = session.drain_signals().collect();
    for signal in signals {
        if let Some(text) = view::describe(signal, session.deck()) {
            writeln!(out, "{}", text)?;
        }
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    write!(out, "{}", text)?;
    out.flush()
}

pub fn run<S, R, W>(session: &mut GameSession<S>, mut input: R, out: &mut W) -> Result<(), AppError>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    loop {
        match session.phase() {
            Phase::Start => {
                write!(out, "{}", view::start_screen())?;
                prompt(out, "> ")?;
                let Some(line) = read_line(&mut input)? else {
                    return Ok(());
                };
                if Command::parse(&line) == Some(Command::Quit) {
                    return Ok(());
                }
                session.start();
            }
            Phase::Play => {
                write!(out, "{}", view::play_screen(session))?;
                prompt(out, "> ")?;
                let Some(line) = read_line(&mut input)? else {
                    return Ok(());
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => return Ok(()),
                    Some(command) => handle(session, command, &mut input, out)?,
                    None => writeln!(out, "{}", view::HELP)?,
                }
                flush_signals(session, out)?;
            }
        }
    }
}

fn handle<S, R, W>(
    session: &mut GameSession<S>,
    command: Command,
    input: &mut R,
    out: &mut W,
) -> Result<(), AppError>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    match command {
        Command::Flip(index) => {
            if let FlipOutcome::AwaitingResolution(ticket) = session.flip(index)? {
                write!(out, "{}", view::play_screen(session))?;
                out.flush()?;
                thread::sleep(ticket.deadline().saturating_duration_since(Instant::now()));
                session.resolve(ticket);
            }
        }
        Command::Hint => check(session.use_hint())?,
        Command::Level(number) => check(session.select_level(number))?,
        Command::Restart => check(session.restart_level())?,
        Command::Reset => {
            prompt(out, RESET_PROMPT)?;
            let answer = read_line(input)?.unwrap_or_default();
            if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
                check(session.reset_progress())?;
            }
        }
        Command::Help => writeln!(out, "{}", view::HELP)?,
        Command::Quit => {}
    }
    Ok(())
}
