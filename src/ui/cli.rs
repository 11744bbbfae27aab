use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

const DATA_DIR_NAME: &str = "pairflip";

#[derive(Parser, Debug)]
#[command(name = "pairflip", version, about = "Flip over tiles looking for pairs")]
pub struct Cli {
    /// Directory holding saved progress [default: ~/.config/pairflip]
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long, conflicts_with = "data_dir")]
    pub memory: bool,

    /// Seed for reproducible decks
    #[arg(long)]
    pub seed: Option<u64>,

    /// How long a flipped pair stays visible before it is resolved
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub resolve_delay_ms: u64,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

impl Cli {
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".config").join(DATA_DIR_NAME),
            None => PathBuf::from(format!(".{}", DATA_DIR_NAME)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = Cli::try_parse_from(["pairflip"]).unwrap();

        assert_eq!(cli.resolve_delay_ms, 1000);
        assert_eq!(cli.seed, None);
        assert!(!cli.memory);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let cli =
            Cli::try_parse_from(["pairflip", "--data-dir", "/tmp/saves", "--seed", "9"]).unwrap();

        assert_eq!(cli.data_dir(), PathBuf::from("/tmp/saves"));
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn memory_conflicts_with_data_dir() {
        assert!(Cli::try_parse_from(["pairflip", "--memory", "--data-dir", "x"]).is_err());
    }
}
