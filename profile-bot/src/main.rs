mod batch;
mod console;
mod options;
mod telegram;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use options::{Cli, Command as CliCmd};
use route::{RouteCommands, RouteService};
use std::{sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        endpoint,
        timeout,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let client = topodata::Client::builder()
        .endpoint(endpoint)
        .timeout(Duration::from_secs(timeout))
        .build()?;
    log::info!("terrain service: {}", client.endpoint());
    let commands: Arc<dyn RouteCommands> = Arc::new(RouteService::new(client));

    match cmd {
        CliCmd::Telegram(opts) => telegram::run(opts, commands).await,
        CliCmd::Console => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            console::run(commands.as_ref(), stdin, tokio::io::stdout()).await
        }
        CliCmd::Batch { points } => {
            let profile = batch::profile(commands.as_ref(), &points).await?;
            println!("{profile}");
            Ok(())
        }
    }
}
