use anyhow::{bail, Result};
use route::{Coordinate, Reply, RouteCommands, SessionId};

/// Looks up every point of a fixed route and returns its profile.
pub async fn profile(commands: &dyn RouteCommands, points: &[Coordinate]) -> Result<Reply> {
    let id = SessionId::from("batch");
    commands.start_route(&id).await;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            commands.advance_route(&id).await;
        }
        let reply = commands.supply_coordinate(&id, &point.to_string()).await?;
        if reply == Reply::InvalidCoordinate {
            bail!("no elevation for point {} ({point})", i + 1);
        }
    }
    Ok(commands.show_profile(&id).await)
}
