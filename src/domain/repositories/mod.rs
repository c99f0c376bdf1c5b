//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `UnitOfWork`: the same repositories scoped to one atomic write
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::lot::LotRepository;
use super::reservation::ReservationRepository;
use super::spot::SpotRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Single-statement reads go straight through the accessors. Anything that
/// touches more than one row opens a [`UnitOfWork`]:
///
/// ```ignore
/// let uow = repos.begin().await?;
/// uow.reservations().destroy_all_by_spot(spot.id).await?;
/// let spot = uow.spots().update(spot).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn lots(&self) -> &dyn LotRepository;
    fn spots(&self) -> &dyn SpotRepository;
    fn reservations(&self) -> &dyn ReservationRepository;

    /// Open an atomic unit. Nothing it writes is visible until `commit`.
    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>>;

    /// Cheap round-trip to the backing store, for health checks.
    async fn ping(&self) -> DomainResult<()>;
}

// ── UnitOfWork ──────────────────────────────────────────────────

/// Repositories bound to one open transaction.
///
/// Dropping a unit without calling [`UnitOfWork::commit`] rolls back
/// everything written through it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn lots(&self) -> &dyn LotRepository;
    fn spots(&self) -> &dyn SpotRepository;
    fn reservations(&self) -> &dyn ReservationRepository;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}
