//! Spot repository interface

use async_trait::async_trait;

use super::model::{NewSpot, Spot};
use crate::domain::DomainResult;

/// Bounding rectangle filter for [`SpotRepository::find_within`].
///
/// Bounds are independent per axis: `latitude` in `[lat1, lat2]` and
/// `longitude` in `[long1, long2]`. An inverted range matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WithinQuery {
    pub lot_id: Option<i32>,
    pub lat1: f64,
    pub long1: f64,
    pub lat2: f64,
    pub long2: f64,
    pub limit: u64,
}

impl WithinQuery {
    pub fn contains(&self, spot: &Spot) -> bool {
        self.lot_id.map_or(true, |lot_id| spot.lot_id == lot_id)
            && spot.latitude >= self.lat1
            && spot.longitude >= self.long1
            && spot.latitude <= self.lat2
            && spot.longitude <= self.long2
    }
}

#[async_trait]
pub trait SpotRepository: Send + Sync {
    /// Insert a validated spot; the store assigns the id.
    async fn insert(&self, spot: NewSpot) -> DomainResult<Spot>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Spot>>;

    /// Overwrite every column of an existing spot.
    async fn update(&self, spot: Spot) -> DomainResult<Spot>;

    /// Remove a spot row. Returns `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> DomainResult<bool>;

    /// Spots inside the rectangle, at most `query.limit`, in storage order.
    async fn find_within(&self, query: &WithinQuery) -> DomainResult<Vec<Spot>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spot::SpotStatus;

    fn spot(lot_id: i32, latitude: f64, longitude: f64) -> Spot {
        Spot {
            id: 1,
            lot_id,
            latitude,
            longitude,
            status_code: SpotStatus::Available.code(),
        }
    }

    fn square(lot_id: Option<i32>) -> WithinQuery {
        WithinQuery {
            lot_id,
            lat1: 0.0,
            long1: 0.0,
            lat2: 10.0,
            long2: 10.0,
            limit: 100,
        }
    }

    #[test]
    fn edges_are_inclusive() {
        let q = square(None);
        assert!(q.contains(&spot(1, 0.0, 0.0)));
        assert!(q.contains(&spot(1, 10.0, 10.0)));
        assert!(!q.contains(&spot(1, 10.01, 5.0)));
        assert!(!q.contains(&spot(1, 5.0, -0.01)));
    }

    #[test]
    fn lot_filter_is_optional() {
        assert!(square(None).contains(&spot(9, 5.0, 5.0)));
        assert!(square(Some(5)).contains(&spot(5, 5.0, 5.0)));
        assert!(!square(Some(5)).contains(&spot(9, 5.0, 5.0)));
    }

    #[test]
    fn inverted_rectangle_matches_nothing() {
        let q = WithinQuery {
            lat1: 10.0,
            lat2: 0.0,
            ..square(None)
        };
        assert!(!q.contains(&spot(1, 5.0, 5.0)));
    }
}
