//! Spot registry: the only write path for spot records.
//!
//! Every write runs validate → reservation cleanup → persist inside one
//! unit of work, so a failure at any step leaves storage untouched.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    DomainError, DomainResult, NewSpot, RepositoryProvider, Spot, SpotAttributes, SpotStatus,
    UnitOfWork,
};

/// Service for spot create/update/delete and reservation-driven transitions
pub struct SpotRegistry {
    repos: Arc<dyn RepositoryProvider>,
}

impl SpotRegistry {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn find(&self, id: i32) -> DomainResult<Spot> {
        self.repos
            .spots()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Spot", id))
    }

    pub async fn create(&self, attributes: SpotAttributes) -> DomainResult<Spot> {
        let uow = self.repos.begin().await?;

        let new_spot = validate(&*uow, &attributes).await?;
        let spot = uow.spots().insert(new_spot).await?;
        uow.commit().await?;

        metrics::counter!("parkspot_spot_writes_total", "op" => "create").increment(1);
        info!(
            spot_id = spot.id,
            lot_id = spot.lot_id,
            status = %spot.status(),
            "Spot created"
        );
        Ok(spot)
    }

    /// Merge `changes` onto the stored spot, validate the result and save it.
    ///
    /// Saving with `AVAILABLE` or `UNAVAILABLE` destroys every reservation
    /// on the spot, whether or not the status actually changed.
    pub async fn update(&self, id: i32, changes: SpotAttributes) -> DomainResult<Spot> {
        let uow = self.repos.begin().await?;

        let stored = uow
            .spots()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Spot", id))?;
        let attributes = SpotAttributes::from_spot(&stored).merge(changes);
        let NewSpot {
            lot_id,
            latitude,
            longitude,
            status,
        } = validate(&*uow, &attributes).await?;

        let released = if status.is_directly_writable() {
            uow.reservations().destroy_all_by_spot(id).await?
        } else {
            0
        };

        let spot = uow
            .spots()
            .update(Spot {
                id,
                lot_id,
                latitude,
                longitude,
                status_code: status.code(),
            })
            .await?;
        uow.commit().await?;

        metrics::counter!("parkspot_spot_writes_total", "op" => "update").increment(1);
        if released > 0 {
            metrics::counter!("parkspot_reservations_released_total").increment(released);
        }
        info!(spot_id = id, status = %status, released, "Spot updated");
        Ok(spot)
    }

    /// Remove a spot together with its reservation.
    ///
    /// Only the first reservation found is destroyed. A spot without a
    /// reservation is deleted all the same.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        let uow = self.repos.begin().await?;

        if uow.spots().find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Spot", id));
        }

        let released = uow.reservations().destroy_one_by_spot(id).await?;
        if !uow.spots().delete(id).await? {
            return Err(DomainError::not_found("Spot", id));
        }
        uow.commit().await?;

        metrics::counter!("parkspot_spot_writes_total", "op" => "delete").increment(1);
        if released {
            metrics::counter!("parkspot_reservations_released_total").increment(1);
        }
        info!(spot_id = id, released, "Spot deleted");
        Ok(())
    }

    /// Reservation subsystem: claim an `AVAILABLE` spot.
    pub async fn mark_reserved(&self, id: i32) -> DomainResult<Spot> {
        self.claim(id, SpotStatus::Reserved).await
    }

    /// Reservation subsystem: occupy an `AVAILABLE` or `RESERVED` spot.
    pub async fn mark_occupied(&self, id: i32) -> DomainResult<Spot> {
        self.claim(id, SpotStatus::Occupied).await
    }

    /// Status-only write that skips the general rules and the cleanup
    /// cascade; reservations belong to the claim being made.
    async fn claim(&self, id: i32, to: SpotStatus) -> DomainResult<Spot> {
        let uow = self.repos.begin().await?;

        let mut spot = uow
            .spots()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Spot", id))?;
        let from = spot.status();
        if !from.can_be_claimed_as(to) {
            return Err(DomainError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        spot.status_code = to.code();
        let spot = uow.spots().update(spot).await?;
        uow.commit().await?;

        metrics::counter!("parkspot_spot_writes_total", "op" => "claim").increment(1);
        info!(spot_id = id, %from, %to, "Spot claimed");
        Ok(spot)
    }
}

/// Run the spot rules, resolving `lot_id` inside the same unit of work.
async fn validate(uow: &dyn UnitOfWork, attributes: &SpotAttributes) -> DomainResult<NewSpot> {
    let lot_found = match attributes.lot_id() {
        Some(lot_id) => uow.lots().exists(lot_id).await?,
        None => false,
    };

    attributes.validate(lot_found).map_err(|errors| {
        debug!(%errors, "Spot rejected");
        DomainError::Invalid(errors)
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewReservation, NumericInput};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        registry: SpotRegistry,
        lot_id: i32,
    }

    async fn fixture() -> Fixture {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let lot_id = repos.lots().create("L1").await.unwrap().id;
        Fixture {
            registry: SpotRegistry::new(repos.clone()),
            repos,
            lot_id,
        }
    }

    impl Fixture {
        async fn available_spot(&self) -> Spot {
            self.registry
                .create(SpotAttributes::new(self.lot_id, 5.0, 5.0, SpotStatus::Available))
                .await
                .unwrap()
        }

        async fn reserve(&self, spot_id: i32) {
            self.repos
                .reservations()
                .create(NewReservation::for_spot(spot_id))
                .await
                .unwrap();
        }

        async fn reservations(&self, spot_id: i32) -> u64 {
            self.repos.reservations().count_by_spot(spot_id).await.unwrap()
        }

        fn status_only(status: &str) -> SpotAttributes {
            SpotAttributes {
                status: Some(status.to_string()),
                ..Default::default()
            }
        }
    }

    #[tokio::test]
    async fn create_persists_all_fields() {
        let f = fixture().await;
        let spot = f
            .registry
            .create(SpotAttributes::new(f.lot_id, 5.0, -5.0, SpotStatus::Unavailable))
            .await
            .unwrap();

        assert_eq!(spot.lot_id, f.lot_id);
        assert_eq!((spot.latitude, spot.longitude), (5.0, -5.0));
        assert!(spot.is_unavailable());
        assert_eq!(f.registry.find(spot.id).await.unwrap(), spot);
    }

    #[tokio::test]
    async fn create_with_unknown_lot_persists_nothing() {
        let f = fixture().await;
        let err = f
            .registry
            .create(SpotAttributes::new(f.lot_id + 1, 5.0, 5.0, SpotStatus::Available))
            .await
            .unwrap_err();

        let DomainError::Invalid(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.full_messages(), vec!["lot_id is invalid"]);
        assert!(f.repos.spots().find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_claimed_statuses() {
        let f = fixture().await;
        for status in [SpotStatus::Reserved, SpotStatus::Occupied] {
            let err = f
                .registry
                .create(SpotAttributes::new(f.lot_id, 5.0, 5.0, status))
                .await
                .unwrap_err();
            let DomainError::Invalid(errors) = err else {
                panic!("expected validation error");
            };
            assert_eq!(errors.on("status"), vec!["is invalid"]);
        }
    }

    #[tokio::test]
    async fn saving_available_again_destroys_dangling_reservation() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;
        f.reserve(spot.id).await;

        let updated = f
            .registry
            .update(spot.id, Fixture::status_only("AVAILABLE"))
            .await
            .unwrap();

        assert!(updated.is_available());
        assert_eq!(f.reservations(spot.id).await, 0);
    }

    #[tokio::test]
    async fn saving_unavailable_destroys_reservations() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;

        f.registry
            .update(spot.id, Fixture::status_only("UNAVAILABLE"))
            .await
            .unwrap();
        assert_eq!(f.reservations(spot.id).await, 0);
    }

    #[tokio::test]
    async fn coordinate_edit_also_runs_cleanup() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;

        let updated = f
            .registry
            .update(
                spot.id,
                SpotAttributes {
                    latitude: Some(NumericInput::Number(7.5)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.latitude, 7.5);
        assert_eq!(updated.longitude, 5.0);
        assert_eq!(f.reservations(spot.id).await, 0);
    }

    #[tokio::test]
    async fn invalid_update_keeps_record_and_reservations() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;

        let err = f
            .registry
            .update(
                spot.id,
                SpotAttributes {
                    longitude: Some(NumericInput::Number(200.0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Invalid(_)));
        assert_eq!(f.registry.find(spot.id).await.unwrap().longitude, 5.0);
        assert_eq!(f.reservations(spot.id).await, 1);
    }

    #[tokio::test]
    async fn update_of_reserved_spot_must_release_it() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.registry.mark_reserved(spot.id).await.unwrap();

        let err = f
            .registry
            .update(
                spot.id,
                SpotAttributes {
                    latitude: Some(NumericInput::Number(1.0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        let DomainError::Invalid(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.full_messages(), vec!["status is invalid"]);
    }

    #[tokio::test]
    async fn update_of_missing_spot_is_not_found() {
        let f = fixture().await;
        let err = f
            .registry
            .update(99, Fixture::status_only("AVAILABLE"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_spot_and_its_reservation() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;

        f.registry.delete(spot.id).await.unwrap();

        assert_eq!(f.reservations(spot.id).await, 0);
        assert!(matches!(
            f.registry.find(spot.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_with_duplicate_reservations_relies_on_the_store_cascade() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;
        f.reserve(spot.id).await;

        f.registry.delete(spot.id).await.unwrap();
        // delete itself drops one reservation; removing the spot drops the other
        assert_eq!(f.reservations(spot.id).await, 0);
    }

    #[tokio::test]
    async fn delete_without_reservation_succeeds() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.registry.delete(spot.id).await.unwrap();
        assert!(f.repos.spots().find_by_id(spot.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_of_missing_spot_is_not_found() {
        let f = fixture().await;
        assert!(matches!(
            f.registry.delete(12).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn claims_follow_the_transition_table() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.reserve(spot.id).await;

        let reserved = f.registry.mark_reserved(spot.id).await.unwrap();
        assert!(reserved.is_reserved());
        assert_eq!(f.reservations(spot.id).await, 1);

        let err = f.registry.mark_reserved(spot.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let occupied = f.registry.mark_occupied(spot.id).await.unwrap();
        assert!(occupied.is_occupied());
        assert_eq!(f.reservations(spot.id).await, 1);

        let err = f.registry.mark_occupied(spot.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Illegal status transition: OCCUPIED -> OCCUPIED");

        let released = f
            .registry
            .update(spot.id, Fixture::status_only("AVAILABLE"))
            .await
            .unwrap();
        assert!(released.is_available());
        assert_eq!(f.reservations(spot.id).await, 0);
    }

    #[tokio::test]
    async fn unavailable_spot_cannot_be_claimed() {
        let f = fixture().await;
        let spot = f.available_spot().await;
        f.registry
            .update(spot.id, Fixture::status_only("UNAVAILABLE"))
            .await
            .unwrap();

        assert!(matches!(
            f.registry.mark_reserved(spot.id).await,
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(matches!(
            f.registry.mark_occupied(spot.id).await,
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(matches!(
            f.registry.mark_occupied(404).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
