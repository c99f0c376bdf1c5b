//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use super::repository_provider::{db_err, SeaOrmStore};
use crate::domain::reservation::{NewReservation, Reservation, ReservationRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::reservation;

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        spot_id: m.spot_id,
        user_id: m.user_id,
        created_at: m.created_at,
    }
}

#[async_trait]
impl<C> ReservationRepository for SeaOrmStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn create(&self, r: NewReservation) -> DomainResult<Reservation> {
        debug!("Saving reservation for spot {}", r.spot_id);

        let model = reservation::ActiveModel {
            spot_id: Set(r.spot_id),
            user_id: Set(r.user_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let model = model.insert(&self.conn).await.map_err(db_err)?;
        Ok(model_to_domain(model))
    }

    async fn find_by_spot(&self, spot_id: i32) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .order_by_asc(reservation::Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count_by_spot(&self, spot_id: i32) -> DomainResult<u64> {
        reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .count(&self.conn)
            .await
            .map_err(db_err)
    }

    async fn destroy_all_by_spot(&self, spot_id: i32) -> DomainResult<u64> {
        let result = reservation::Entity::delete_many()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .exec(&self.conn)
            .await
            .map_err(db_err)?;
        debug!("Destroyed {} reservation(s) for spot {}", result.rows_affected, spot_id);
        Ok(result.rows_affected)
    }

    async fn destroy_one_by_spot(&self, spot_id: i32) -> DomainResult<bool> {
        let first = reservation::Entity::find()
            .filter(reservation::Column::SpotId.eq(spot_id))
            .order_by_asc(reservation::Column::Id)
            .one(&self.conn)
            .await
            .map_err(db_err)?;

        let Some(first) = first else {
            return Ok(false);
        };

        reservation::Entity::delete_by_id(first.id)
            .exec(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(true)
    }
}
