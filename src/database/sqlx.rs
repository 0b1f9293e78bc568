use sqlx::pool::PoolConnection;
use sqlx::{Executor, PgPool, Postgres, Transaction};

use crate::core::ports::repository::{Store, TxStore};
use crate::error::Error;

mod answer;
mod content;
mod identity;
mod quiz;

/// Repository over any Postgres executor: a pooled connection or an open transaction.
pub struct PgSqlx<E> {
    executor: E,
}

impl<E> PgSqlx<E>
where
    for<'e> &'e mut E: Executor<'e, Database = Postgres>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E> Store for PgSqlx<E> where for<'e> &'e mut E: Executor<'e, Database = Postgres> {}

impl TxStore for PgSqlx<Transaction<'static, Postgres>> {
    async fn commit(self) -> Result<(), Error> {
        self.executor.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        self.executor.rollback().await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PgSqlxManager {
    pool: PgPool,
}

impl PgSqlxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<PgSqlx<Transaction<'static, Postgres>>, Error> {
        Ok(PgSqlx::new(self.pool.begin().await?))
    }

    pub async fn acquire(&self) -> Result<PgSqlx<PoolConnection<Postgres>>, Error> {
        Ok(PgSqlx::new(self.pool.acquire().await?))
    }
}
