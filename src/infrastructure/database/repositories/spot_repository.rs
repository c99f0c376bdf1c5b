//! SeaORM implementation of SpotRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;

use super::repository_provider::{db_err, SeaOrmStore};
use crate::domain::spot::{NewSpot, Spot, SpotRepository, SpotStatus, WithinQuery};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::spot;

// ── Conversion helpers ──────────────────────────────────────────

/// Rows with a code outside the status table are reported, never decoded.
fn model_to_domain(m: spot::Model) -> DomainResult<Spot> {
    if SpotStatus::from_code(m.status).is_none() {
        return Err(DomainError::Storage(format!(
            "spot {} has unknown status code {}",
            m.id, m.status
        )));
    }
    Ok(Spot {
        id: m.id,
        lot_id: m.lot_id,
        latitude: m.latitude,
        longitude: m.longitude,
        status_code: m.status,
    })
}

// ── SpotRepository impl ─────────────────────────────────────────

#[async_trait]
impl<C> SpotRepository for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn insert(&self, s: NewSpot) -> DomainResult<Spot> {
        debug!("Inserting spot in lot {}", s.lot_id);

        let now = Utc::now();
        let model = spot::ActiveModel {
            lot_id: Set(s.lot_id),
            latitude: Set(s.latitude),
            longitude: Set(s.longitude),
            status: Set(s.status.code()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let model = model.insert(&self.conn).await.map_err(db_err)?;
        model_to_domain(model)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Spot>> {
        spot::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn update(&self, s: Spot) -> DomainResult<Spot> {
        debug!("Updating spot: {}", s.id);

        let existing = spot::Entity::find_by_id(s.id)
            .one(&self.conn)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Spot", s.id));
        };

        let mut active: spot::ActiveModel = existing.into();
        active.lot_id = Set(s.lot_id);
        active.latitude = Set(s.latitude);
        active.longitude = Set(s.longitude);
        active.status = Set(s.status_code);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.conn).await.map_err(db_err)?;
        model_to_domain(model)
    }

    async fn delete(&self, id: i32) -> DomainResult<bool> {
        let result = spot::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn find_within(&self, q: &WithinQuery) -> DomainResult<Vec<Spot>> {
        let mut select = spot::Entity::find()
            .filter(spot::Column::Latitude.gte(q.lat1))
            .filter(spot::Column::Longitude.gte(q.long1))
            .filter(spot::Column::Latitude.lte(q.lat2))
            .filter(spot::Column::Longitude.lte(q.long2));
        if let Some(lot_id) = q.lot_id {
            select = select.filter(spot::Column::LotId.eq(lot_id));
        }

        let models = select
            .order_by_asc(spot::Column::Id)
            .limit(q.limit)
            .all(&self.conn)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
