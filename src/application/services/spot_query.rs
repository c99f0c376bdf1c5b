//! Bounded spatial lookup over spots.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{DomainResult, RepositoryProvider, SpotProjection, WithinQuery};

/// Upper bound on the number of spots a single region lookup returns.
pub const MAX_SPOTS_WITHIN_REGION: u64 = 100;

/// Lenient float conversion for query parameters.
///
/// Reads the longest numeric prefix (optional sign, digits, optional
/// fraction, optional exponent) after leading whitespace. Anything without
/// such a prefix, including a missing value, becomes `0.0`. This hides
/// caller mistakes such as `lat1=abc` and is kept for compatibility with
/// existing clients.
pub fn coerce_coordinate(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let scan_digits = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = scan_digits(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = scan_digits(end + 1);
        if frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = scan_digits(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}

/// Axis-aligned rectangle: lower bounds `(lat1, long1)`, upper bounds
/// `(lat2, long2)`. Orientation is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub lat1: f64,
    pub long1: f64,
    pub lat2: f64,
    pub long2: f64,
}

impl BoundingBox {
    pub fn new(lat1: f64, long1: f64, lat2: f64, long2: f64) -> Self {
        Self {
            lat1,
            long1,
            lat2,
            long2,
        }
    }

    /// Build from raw parameters via [`coerce_coordinate`].
    pub fn coerce(
        lat1: Option<&str>,
        long1: Option<&str>,
        lat2: Option<&str>,
        long2: Option<&str>,
    ) -> Self {
        Self::new(
            coerce_coordinate(lat1),
            coerce_coordinate(long1),
            coerce_coordinate(lat2),
            coerce_coordinate(long2),
        )
    }
}

pub struct SpotQueryEngine {
    repos: Arc<dyn RepositoryProvider>,
}

impl SpotQueryEngine {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Spots inside `area`, restricted to `lot_id` when given.
    ///
    /// Returns at most [`MAX_SPOTS_WITHIN_REGION`] projections. Their order
    /// is whatever the store yields and carries no meaning.
    pub async fn find_within(
        &self,
        lot_id: Option<i32>,
        area: BoundingBox,
    ) -> DomainResult<Vec<SpotProjection>> {
        let query = WithinQuery {
            lot_id,
            lat1: area.lat1,
            long1: area.long1,
            lat2: area.lat2,
            long2: area.long2,
            limit: MAX_SPOTS_WITHIN_REGION,
        };

        let spots = self.repos.spots().find_within(&query).await?;
        debug!(?lot_id, ?area, found = spots.len(), "Spots within region");

        Ok(spots
            .iter()
            .take(MAX_SPOTS_WITHIN_REGION as usize)
            .map(|spot| spot.projection())
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSpot, SpotStatus};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    #[test]
    fn coercion_reads_numeric_prefix() {
        assert_eq!(coerce_coordinate(Some("10")), 10.0);
        assert_eq!(coerce_coordinate(Some("-3.25")), -3.25);
        assert_eq!(coerce_coordinate(Some("  +7.5")), 7.5);
        assert_eq!(coerce_coordinate(Some("12abc")), 12.0);
        assert_eq!(coerce_coordinate(Some("5.")), 5.0);
        assert_eq!(coerce_coordinate(Some(".5")), 0.5);
        assert_eq!(coerce_coordinate(Some("1e2")), 100.0);
        assert_eq!(coerce_coordinate(Some("1e")), 1.0);
        assert_eq!(coerce_coordinate(Some("2.5E-1x")), 0.25);
    }

    #[test]
    fn coercion_falls_back_to_zero() {
        assert_eq!(coerce_coordinate(None), 0.0);
        assert_eq!(coerce_coordinate(Some("")), 0.0);
        assert_eq!(coerce_coordinate(Some("abc")), 0.0);
        assert_eq!(coerce_coordinate(Some("-")), 0.0);
        assert_eq!(coerce_coordinate(Some(".")), 0.0);
        assert_eq!(coerce_coordinate(Some("NaN")), 0.0);
    }

    async fn seeded() -> (Arc<dyn RepositoryProvider>, i32, i32) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let a = repos.lots().create("A").await.unwrap().id;
        let b = repos.lots().create("B").await.unwrap().id;

        let points = [
            (a, 0.0, 0.0),
            (a, 5.0, 5.0),
            (a, 10.0, 10.0),
            (a, 10.5, 5.0),
            (b, 5.0, 5.0),
            (b, -1.0, 5.0),
            (b, 5.0, 11.0),
        ];
        for (lot_id, latitude, longitude) in points {
            repos
                .spots()
                .insert(NewSpot {
                    lot_id,
                    latitude,
                    longitude,
                    status: SpotStatus::Available,
                })
                .await
                .unwrap();
        }
        (repos, a, b)
    }

    #[tokio::test]
    async fn finds_spots_across_all_lots() {
        let (repos, _, _) = seeded().await;
        let engine = SpotQueryEngine::new(repos);

        let found = engine
            .find_within(None, BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .await
            .unwrap();

        assert_eq!(found.len(), 4);
        for p in &found {
            assert!((0.0..=10.0).contains(&p.latitude));
            assert!((0.0..=10.0).contains(&p.longitude));
            assert_eq!(p.status, SpotStatus::Available);
        }
    }

    #[tokio::test]
    async fn lot_filter_restricts_results() {
        let (repos, a, b) = seeded().await;
        let engine = SpotQueryEngine::new(repos);
        let area = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        let in_a = engine.find_within(Some(a), area).await.unwrap();
        assert_eq!(in_a.len(), 3);
        assert!(in_a.iter().all(|p| p.lot_id == a));

        let in_b = engine.find_within(Some(b), area).await.unwrap();
        assert_eq!(in_b.len(), 1);
        assert_eq!((in_b[0].latitude, in_b[0].longitude), (5.0, 5.0));
    }

    #[tokio::test]
    async fn garbage_bounds_collapse_to_origin() {
        let (repos, _, _) = seeded().await;
        let engine = SpotQueryEngine::new(repos);

        let found = engine
            .find_within(None, BoundingBox::coerce(Some("x"), None, Some("y"), Some("")))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].latitude, found[0].longitude), (0.0, 0.0));
    }

    #[tokio::test]
    async fn inverted_rectangle_is_not_reordered() {
        let (repos, _, _) = seeded().await;
        let engine = SpotQueryEngine::new(repos);
        let found = engine
            .find_within(None, BoundingBox::new(10.0, 10.0, 0.0, 0.0))
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn results_are_capped() {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let lot_id = repos.lots().create("Big").await.unwrap().id;
        for i in 0..150 {
            repos
                .spots()
                .insert(NewSpot {
                    lot_id,
                    latitude: (i % 10) as f64,
                    longitude: (i / 15) as f64,
                    status: SpotStatus::Available,
                })
                .await
                .unwrap();
        }

        let engine = SpotQueryEngine::new(repos);
        let found = engine
            .find_within(None, BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .await
            .unwrap();
        assert_eq!(found.len(), MAX_SPOTS_WITHIN_REGION as usize);
    }
}
