// ── Directions engine port ──

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{Coordinate, Itinerary};

/// A service that computes driving routes between two points.
///
/// Implementations report "no path" as [`CoreError::RouteNotFound`] and
/// any other engine-side rejection as [`CoreError::RoutingEngine`].
#[async_trait]
pub trait DirectionsEngine: Send + Sync {
    /// All alternatives the engine produced, primary route first.
    async fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Itinerary>, CoreError>;
}
