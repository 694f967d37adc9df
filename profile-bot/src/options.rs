use clap::{Args, Parser, Subcommand, ValueEnum};
use route::Coordinate;
use std::path::PathBuf;

/// Build elevation profiles of routes entered as coordinates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Terrain-data service endpoint.
    #[arg(long, env = "TOPODATA_ENDPOINT", default_value = topodata::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Elevation lookup timeout, in seconds.
    #[arg(long, env = "TOPODATA_TIMEOUT", default_value_t = 5)]
    pub timeout: u64,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve route profiles to Telegram chats.
    Telegram(Telegram),

    /// Build a single route interactively on stdin.
    Console,

    /// Print the profile of a fixed route.
    Batch {
        /// Route points as "lat,lon", in order.
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<Coordinate>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct Telegram {
    /// Bot API token.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Bot API server.
    #[arg(long, default_value = "https://api.telegram.org")]
    pub api_url: String,

    /// Which kind of keyboard `/menu` offers.
    #[arg(long, value_enum, default_value_t = Keyboard::Reply)]
    pub keyboard: Keyboard,

    /// Picture sent along with every start point prompt.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Keyboard {
    /// Persistent keyboard replacing the phone's own.
    Reply,

    /// Buttons attached to the menu message.
    Inline,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, Keyboard};
    use clap::Parser;

    #[test]
    fn test_batch_points() {
        let cli = Cli::try_parse_from([
            "profile-bot",
            "batch",
            "55.115502,82.9442",
            "-33.5,-70.25",
        ])
        .unwrap();
        assert_eq!(cli.endpoint, topodata::DEFAULT_ENDPOINT);
        assert_eq!(cli.timeout, 5);
        let Command::Batch { points } = cli.cmd else {
            panic!("expected batch");
        };
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].latitude(), -33.5);
        assert_eq!(points[1].longitude(), -70.25);
    }

    #[test]
    fn test_batch_rejects_bad_point() {
        assert!(Cli::try_parse_from(["profile-bot", "batch", "91,0"]).is_err());
        assert!(Cli::try_parse_from(["profile-bot", "batch"]).is_err());
    }

    #[test]
    fn test_telegram() {
        let cli = Cli::try_parse_from([
            "profile-bot",
            "--timeout",
            "2",
            "telegram",
            "--token",
            "123:abc",
            "--keyboard",
            "inline",
        ])
        .unwrap();
        assert_eq!(cli.timeout, 2);
        let Command::Telegram(telegram) = cli.cmd else {
            panic!("expected telegram");
        };
        assert_eq!(telegram.token, "123:abc");
        assert_eq!(telegram.keyboard, Keyboard::Inline);
        assert_eq!(telegram.api_url, "https://api.telegram.org");
        assert!(telegram.image.is_none());
    }
}
