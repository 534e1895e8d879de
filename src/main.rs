use anyhow::Result;
use clap::Parser;
use json2toon::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    json2toon::logging::init(args.verbose);
    json2toon::run(args).await
}
