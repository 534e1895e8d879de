use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone, PartialEq, Eq)]
#[command(name = "json2toon")]
#[command(
    about = "Web utility that converts JSON to TOON through a chat-completion model",
    long_about = "Web utility that converts JSON to TOON through a chat-completion model\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/json2toon/config.toml\n    2. ~/.config/json2toon/config.toml\n\nOPENROUTER_API_KEY and JSON2TOON_* environment variables (or a .env file) override the file."
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Listen on this address instead of the configured one.
    #[arg(long, value_name = "HOST:PORT")]
    pub bind: Option<SocketAddr>,

    /// Debug logging, including redacted dumps of upstream HTTP traffic.
    #[arg(short, long)]
    pub verbose: bool,
}
