//! Line oriented front end for a single local session.

use anyhow::Result;
use route::{RouteCommands, SessionId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const HELP: &str = "Commands: start, next, profile, quit. \
                    Enter coordinates as latitude, longitude when asked.";

pub async fn run<R, W>(commands: &dyn RouteCommands, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let id = SessionId::from("console");
    let mut lines = input.lines();
    output.write_all(format!("{HELP}\n").as_bytes()).await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "start" => commands.start_route(&id).await.to_string(),
            "next" => commands.advance_route(&id).await.to_string(),
            "profile" => commands.show_profile(&id).await.to_string(),
            text => {
                if commands.awaiting_coordinate(&id).await {
                    match commands.supply_coordinate(&id, text).await {
                        Ok(reply) => reply.to_string(),
                        Err(e) => e.to_string(),
                    }
                } else {
                    HELP.to_string()
                }
            }
        };
        output.write_all(format!("{reply}\n").as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}
