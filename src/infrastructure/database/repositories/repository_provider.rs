//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, Statement, TransactionTrait,
};

use crate::domain::lot::LotRepository;
use crate::domain::repositories::{RepositoryProvider, UnitOfWork};
use crate::domain::reservation::ReservationRepository;
use crate::domain::spot::SpotRepository;
use crate::domain::{DomainError, DomainResult};

/// Repositories over one SeaORM connection: the pool or a transaction.
pub struct SeaOrmStore<C> {
    pub(super) conn: C,
}

impl<C> SeaOrmStore<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

pub(super) fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

/// Unified repository provider backed by SeaORM.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let spot = repos.spots().find_by_id(7).await?;
/// let uow = repos.begin().await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    store: SeaOrmStore<DatabaseConnection>,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            store: SeaOrmStore::new(db),
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn lots(&self) -> &dyn LotRepository {
        &self.store
    }

    fn spots(&self) -> &dyn SpotRepository {
        &self.store
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.store
    }

    async fn begin(&self) -> DomainResult<Box<dyn UnitOfWork>> {
        let txn = self.store.conn.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmUnitOfWork {
            store: SeaOrmStore::new(txn),
        }))
    }

    async fn ping(&self) -> DomainResult<()> {
        let conn = &self.store.conn;
        conn.execute(Statement::from_string(
            conn.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

/// A unit of work is a database transaction; dropping it rolls back.
struct SeaOrmUnitOfWork {
    store: SeaOrmStore<DatabaseTransaction>,
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    fn lots(&self) -> &dyn LotRepository {
        &self.store
    }

    fn spots(&self) -> &dyn SpotRepository {
        &self.store
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.store
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.store.into_inner().commit().await.map_err(db_err)
    }
}
