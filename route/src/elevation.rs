use crate::Coordinate;
use async_trait::async_trait;
use topodata::TopodataError;

/// Anything that can answer "how high is the ground here".
#[async_trait]
pub trait ElevationSource: Send + Sync {
    /// Returns the ground elevation, in meters, at `coordinate`.
    async fn elevation(&self, coordinate: Coordinate) -> Result<f64, TopodataError>;
}

#[async_trait]
impl ElevationSource for topodata::Client {
    async fn elevation(&self, coordinate: Coordinate) -> Result<f64, TopodataError> {
        topodata::Client::elevation(self, coordinate.into()).await
    }
}
