//! SeaORM implementation of LotRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};
use tracing::debug;

use super::repository_provider::{db_err, SeaOrmStore};
use crate::domain::lot::{Lot, LotRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::lot;

fn model_to_domain(m: lot::Model) -> Lot {
    Lot {
        id: m.id,
        name: m.name,
        created_at: m.created_at,
    }
}

#[async_trait]
impl<C> LotRepository for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn create(&self, name: &str) -> DomainResult<Lot> {
        debug!("Creating lot: {}", name);

        let model = lot::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = model.insert(&self.conn).await.map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Lot>> {
        let model = lot::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn exists(&self, id: i32) -> DomainResult<bool> {
        let count = lot::Entity::find_by_id(id)
            .count(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }
}
