//! Lot repository interface

use async_trait::async_trait;

use super::model::Lot;
use crate::domain::DomainResult;

#[async_trait]
pub trait LotRepository: Send + Sync {
    /// Insert a lot. Lot management lives elsewhere; this is for seeding.
    async fn create(&self, name: &str) -> DomainResult<Lot>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Lot>>;

    /// Whether a lot with this id exists
    async fn exists(&self, id: i32) -> DomainResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
