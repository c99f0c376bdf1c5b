//! In-memory storage implementation
//!
//! Tables live in ordered maps keyed by id, so iteration order matches the
//! primary-key order the SQL backend uses. A unit of work holds the write
//! gate for its whole lifetime, mutates a private copy of the tables and
//! swaps it in on commit.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::{
    DomainError, DomainResult, Lot, LotRepository, NewReservation, NewSpot, RepositoryProvider,
    Reservation, ReservationRepository, Spot, SpotRepository, UnitOfWork, WithinQuery,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    lots: BTreeMap<i32, Lot>,
    spots: BTreeMap<i32, Spot>,
    reservations: BTreeMap<i32, Reservation>,
    lot_seq: i32,
    spot_seq: i32,
    reservation_seq: i32,
}

/// Repository view over one copy of the tables.
///
/// The shared view takes the write gate around each mutation; a view owned
/// by a unit of work has no gate because the unit already holds it.
struct MemoryTables {
    tables: Arc<Mutex<Tables>>,
    gate: Option<Arc<AsyncMutex<()>>>,
}

impl MemoryTables {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        let _permit = match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        };
        f(&mut self.lock())
    }
}

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    shared: MemoryTables,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            shared: MemoryTables {
                tables: Arc::new(Mutex::new(Tables::default())),
                gate: Some(Arc::new(AsyncMutex::new(()))),
            },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn lots(&self) -> &dyn LotRepository {
        &self.shared
    }

    fn spots(&self) -> &dyn SpotRepository {
        &self.shared
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.shared
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let gate = self
            .shared
            .gate
            .clone()
            .ok_or_else(|| DomainError::Storage("shared tables have no write gate".into()))?;
        let permit = gate.lock_owned().await;
        let snapshot = self.shared.lock().clone();

        Ok(Box::new(MemoryUnitOfWork {
            staged: MemoryTables {
                tables: Arc::new(Mutex::new(snapshot)),
                gate: None,
            },
            target: self.shared.tables.clone(),
            _permit: permit,
        }))
    }

    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}

struct MemoryUnitOfWork {
    staged: MemoryTables,
    target: Arc<Mutex<Tables>>,
    _permit: OwnedMutexGuard<()>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn lots(&self) -> &dyn LotRepository {
        &self.staged
    }

    fn spots(&self) -> &dyn SpotRepository {
        &self.staged
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.staged
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        let staged = std::mem::take(&mut *self.staged.lock());
        *self.target.lock().unwrap_or_else(|e| e.into_inner()) = staged;
        Ok(())
    }
}

// ── Repository impls ────────────────────────────────────────────

#[async_trait]
impl LotRepository for MemoryTables {
    async fn create(&self, name: &str) -> DomainResult<Lot> {
        Ok(self
            .write(|t| {
                t.lot_seq += 1;
                let lot = Lot {
                    id: t.lot_seq,
                    name: name.to_string(),
                    created_at: Utc::now(),
                };
                t.lots.insert(lot.id, lot.clone());
                lot
            })
            .await)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Lot>> {
        Ok(self.lock().lots.get(&id).cloned())
    }
}

#[async_trait]
impl SpotRepository for MemoryTables {
    async fn insert(&self, spot: NewSpot) -> DomainResult<Spot> {
        Ok(self
            .write(|t| {
                t.spot_seq += 1;
                let spot = Spot {
                    id: t.spot_seq,
                    lot_id: spot.lot_id,
                    latitude: spot.latitude,
                    longitude: spot.longitude,
                    status_code: spot.status.code(),
                };
                t.spots.insert(spot.id, spot.clone());
                spot
            })
            .await)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Spot>> {
        Ok(self.lock().spots.get(&id).cloned())
    }

    async fn update(&self, spot: Spot) -> DomainResult<Spot> {
        self.write(|t| match t.spots.get_mut(&spot.id) {
            Some(stored) => {
                *stored = spot.clone();
                Ok(spot)
            }
            None => Err(DomainError::not_found("Spot", spot.id)),
        })
        .await
    }

    /// Reservations on the spot go with it, like the SQL foreign key's
    /// `ON DELETE CASCADE`.
    async fn delete(&self, id: i32) -> DomainResult<bool> {
        Ok(self
            .write(|t| {
                let removed = t.spots.remove(&id).is_some();
                if removed {
                    t.reservations.retain(|_, r| r.spot_id != id);
                }
                removed
            })
            .await)
    }

    async fn find_within(&self, query: &WithinQuery) -> DomainResult<Vec<Spot>> {
        Ok(self
            .lock()
            .spots
            .values()
            .filter(|s| query.contains(s))
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReservationRepository for MemoryTables {
    async fn create(&self, reservation: NewReservation) -> DomainResult<Reservation> {
        Ok(self
            .write(|t| {
                t.reservation_seq += 1;
                let r = Reservation {
                    id: t.reservation_seq,
                    spot_id: reservation.spot_id,
                    user_id: reservation.user_id,
                    created_at: Utc::now(),
                };
                t.reservations.insert(r.id, r.clone());
                r
            })
            .await)
    }

    async fn find_by_spot(&self, spot_id: i32) -> DomainResult<Vec<Reservation>> {
        Ok(self
            .lock()
            .reservations
            .values()
            .filter(|r| r.spot_id == spot_id)
            .cloned()
            .collect())
    }

    async fn destroy_all_by_spot(&self, spot_id: i32) -> DomainResult<u64> {
        Ok(self
            .write(|t| {
                let before = t.reservations.len();
                t.reservations.retain(|_, r| r.spot_id != spot_id);
                (before - t.reservations.len()) as u64
            })
            .await)
    }

    async fn destroy_one_by_spot(&self, spot_id: i32) -> DomainResult<bool> {
        Ok(self
            .write(|t| {
                let first = t
                    .reservations
                    .values()
                    .find(|r| r.spot_id == spot_id)
                    .map(|r| r.id);
                first.and_then(|id| t.reservations.remove(&id)).is_some()
            })
            .await)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpotStatus;

    fn new_spot(lot_id: i32, latitude: f64, longitude: f64) -> NewSpot {
        NewSpot {
            lot_id,
            latitude,
            longitude,
            status: SpotStatus::Available,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let repos = InMemoryRepositoryProvider::new();
        let lot = repos.lots().create("North").await.unwrap();
        let a = repos.spots().insert(new_spot(lot.id, 1.0, 1.0)).await.unwrap();
        let b = repos.spots().insert(new_spot(lot.id, 2.0, 2.0)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(repos.lots().exists(lot.id).await.unwrap());
        assert!(!repos.lots().exists(lot.id + 1).await.unwrap());
    }

    #[tokio::test]
    async fn commit_publishes_staged_writes() {
        let repos = InMemoryRepositoryProvider::new();
        let uow = repos.begin().await.unwrap();
        let lot = uow.lots().create("Staged").await.unwrap();

        assert!(repos.lots().find_by_id(lot.id).await.unwrap().is_none());
        uow.commit().await.unwrap();
        assert!(repos.lots().find_by_id(lot.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropped_unit_rolls_back() {
        let repos = InMemoryRepositoryProvider::new();
        let lot = repos.lots().create("Main").await.unwrap();
        let spot = repos.spots().insert(new_spot(lot.id, 1.0, 1.0)).await.unwrap();
        repos
            .reservations()
            .create(NewReservation::for_spot(spot.id))
            .await
            .unwrap();

        {
            let uow = repos.begin().await.unwrap();
            uow.reservations().destroy_all_by_spot(spot.id).await.unwrap();
            uow.spots().delete(spot.id).await.unwrap();
        }

        assert!(repos.spots().find_by_id(spot.id).await.unwrap().is_some());
        assert_eq!(repos.reservations().count_by_spot(spot.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn destroy_one_leaves_the_rest() {
        let repos = InMemoryRepositoryProvider::new();
        for _ in 0..3 {
            repos
                .reservations()
                .create(NewReservation::for_spot(9))
                .await
                .unwrap();
        }
        repos
            .reservations()
            .create(NewReservation::for_spot(10))
            .await
            .unwrap();

        assert!(repos.reservations().destroy_one_by_spot(9).await.unwrap());
        assert_eq!(repos.reservations().count_by_spot(9).await.unwrap(), 2);
        assert_eq!(repos.reservations().destroy_all_by_spot(9).await.unwrap(), 2);
        assert!(!repos.reservations().destroy_one_by_spot(9).await.unwrap());
        assert_eq!(repos.reservations().count_by_spot(10).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_spot_is_not_found() {
        let repos = InMemoryRepositoryProvider::new();
        let err = repos
            .spots()
            .update(Spot {
                id: 42,
                lot_id: 1,
                latitude: 0.0,
                longitude: 0.0,
                status_code: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Spot", .. }));
    }
}
