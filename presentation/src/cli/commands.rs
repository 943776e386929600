//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for agora
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version, about = "Agents deliberate over a knowledge graph and vote on experiments")]
#[command(long_about = r#"
Agora runs a round-robin session of research agents. Each turn one agent
reasons over its memory, then issues commands: message the others, walk
the knowledge graph, look up examples, propose an experiment generation
script, or vote on the open proposal. A passed vote runs the script and
queues its experiments.

The session is saved after every turn and resumed on the next start
unless --fresh is given.

Configuration files are loaded from (in priority order):
1. AGORA_* environment variables (nested keys use "__")
2. --config <path>     Explicit config file
3. ./agora.toml        Project-level config (or ./.agora.toml)
4. ~/.config/agora/config.toml   Global config

Example:
  agora --rounds 5
  agora --fresh --turns 1 -vv
  AGORA_SESSION__SEED=7 agora --config experiments/agora.toml
"#)]
pub struct Cli {
    /// Stop after this many completed rounds (overrides [session] max_rounds)
    #[arg(long, value_name = "N")]
    pub rounds: Option<u64>,

    /// Run at most this many turns in this invocation
    #[arg(long, value_name = "N")]
    pub turns: Option<usize>,

    /// Ignore the saved session and start over
    #[arg(long)]
    pub fresh: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["agora", "--rounds", "3", "--turns", "10", "--fresh", "-vv"]);
        assert_eq!(cli.rounds, Some(3));
        assert_eq!(cli.turns, Some(10));
        assert!(cli.fresh);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["agora"]);
        assert_eq!(cli.rounds, None);
        assert!(!cli.fresh);
        assert!(!cli.no_config);
        assert!(!cli.show_config);
    }
}
