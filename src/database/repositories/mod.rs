//! Database repositories module
//!
//! [`CommonRepository`] is the single entry point for entity access. The
//! filters, sort and join sets each entity gets by default live in an
//! [`EntityDefaults`] registry keyed by table name, so a new entity is added
//! by registering its defaults and an [`Entity`] impl.

pub mod user;
pub mod place;

use std::collections::HashMap;
use std::sync::Arc;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use tracing::debug;
use crate::database::query::{
    apply_ops, with_sort, Condition, Entity, Pager, Query, QueryOp, Search, SortField, Table,
    PLACES, TABLE_COLUMNS, USERS,
};
use crate::models::place::USER_RELATION;
use crate::models::UserStatus;
use crate::utils::errors::{PlaceBotError, Result};

/// A transaction every repository bound to it shares
pub type SharedTransaction = Arc<Mutex<Transaction<'static, Postgres>>>;

#[derive(Debug, Clone, Default)]
struct TableDefaults {
    filters: Vec<Condition>,
    sort: Vec<SortField>,
    joins: Vec<&'static str>,
}

/// Per-entity baseline filters, default sort and full column/join set
#[derive(Debug, Clone)]
pub struct EntityDefaults {
    tables: HashMap<&'static str, TableDefaults>,
}

impl EntityDefaults {
    /// Registry without any entity registered
    pub fn empty() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        table: &'static Table,
        filters: Vec<Condition>,
        sort: Vec<SortField>,
        joins: Vec<&'static str>,
    ) -> &mut Self {
        self.tables.insert(table.name, TableDefaults { filters, sort, joins });
        self
    }

    pub fn filters(&self, table: &Table) -> &[Condition] {
        self.tables.get(table.name).map(|d| d.filters.as_slice()).unwrap_or(&[])
    }

    pub fn sort(&self, table: &Table) -> &[SortField] {
        self.tables.get(table.name).map(|d| d.sort.as_slice()).unwrap_or(&[])
    }

    pub fn joins(&self, table: &Table) -> &[&'static str] {
        self.tables.get(table.name).map(|d| d.joins.as_slice()).unwrap_or(&[])
    }
}

impl Default for EntityDefaults {
    fn default() -> Self {
        let mut defaults = Self::empty();
        defaults
            .register(
                &USERS,
                vec![Condition::ne("status_id", UserStatus::Deleted)],
                vec![SortField::desc("created_at")],
                vec![TABLE_COLUMNS],
            )
            .register(
                &PLACES,
                vec![],
                vec![SortField::desc("id")],
                vec![TABLE_COLUMNS, USER_RELATION],
            );
        defaults
    }
}

#[derive(Clone)]
enum DbHandle {
    Pool(PgPool),
    Transaction(SharedTransaction),
}

/// Runs a built sqlx query on whatever the repository is bound to.
macro_rules! on_db {
    ($repo:expr, $query:expr, $method:ident) => {
        match &$repo.db {
            DbHandle::Pool(pool) => $query.$method(pool).await,
            DbHandle::Transaction(tx) => {
                let mut tx = tx.lock().await;
                $query.$method(&mut **tx).await
            }
        }
    };
}

#[derive(Clone)]
pub struct CommonRepository {
    db: DbHandle,
    defaults: Arc<EntityDefaults>,
}

impl std::fmt::Debug for CommonRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bound = match self.db {
            DbHandle::Pool(_) => "pool",
            DbHandle::Transaction(_) => "transaction",
        };
        f.debug_struct("CommonRepository")
            .field("bound_to", &bound)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl CommonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self::with_defaults(pool, EntityDefaults::default())
    }

    pub fn with_defaults(pool: PgPool, defaults: EntityDefaults) -> Self {
        Self {
            db: DbHandle::Pool(pool),
            defaults: Arc::new(defaults),
        }
    }

    pub fn defaults(&self) -> &EntityDefaults {
        &self.defaults
    }

    /// Repository running every operation inside `tx`
    pub fn with_transaction(&self, tx: SharedTransaction) -> Self {
        Self {
            db: DbHandle::Transaction(tx),
            defaults: Arc::clone(&self.defaults),
        }
    }

    /// Open a transaction to bind repositories to with [`Self::with_transaction`]
    pub async fn begin(&self) -> Result<SharedTransaction> {
        match &self.db {
            DbHandle::Pool(pool) => Ok(Arc::new(Mutex::new(pool.begin().await?))),
            DbHandle::Transaction(_) => Err(PlaceBotError::InvalidInput(
                "Repository is already bound to a transaction".to_string(),
            )),
        }
    }

    /// Commit `tx`; every repository bound to it must have been dropped
    pub async fn commit(tx: SharedTransaction) -> Result<()> {
        Self::unshare(tx)?.commit().await?;
        Ok(())
    }

    pub async fn rollback(tx: SharedTransaction) -> Result<()> {
        Self::unshare(tx)?.rollback().await?;
        Ok(())
    }

    fn unshare(tx: SharedTransaction) -> Result<Transaction<'static, Postgres>> {
        Arc::try_unwrap(tx)
            .map(Mutex::into_inner)
            .map_err(|_| PlaceBotError::InvalidInput("Transaction is still in use".to_string()))
    }

    fn query<E: Entity, S: Search + ?Sized>(&self, search: &S, pager: Pager, ops: &[QueryOp]) -> Query {
        let query = Query::new(E::TABLE)
            .with_baseline(self.defaults.filters(E::TABLE))
            .with_search(search)
            .with_pager(pager);
        apply_ops(query, ops)
    }

    /// Zero rows is `None`; a second matching row is [`PlaceBotError::Ambiguous`]
    pub async fn one<E, S>(&self, search: &S, ops: &[QueryOp]) -> Result<Option<E>>
    where
        E: Entity,
        S: Search + ?Sized + Sync,
    {
        let query = self.query::<E, S>(search, Pager::Two, ops);
        let mut rows: Vec<E> = self.fetch_all(&query).await?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            _ => Err(PlaceBotError::Ambiguous { entity: E::TABLE.name }),
        }
    }

    /// Rows matching `search`; the entity's default sort applies when `ops`
    /// set none
    pub async fn list<E, S>(&self, search: &S, pager: Pager, ops: &[QueryOp]) -> Result<Vec<E>>
    where
        E: Entity,
        S: Search + ?Sized + Sync,
    {
        let mut query = self.query::<E, S>(search, pager, ops);
        if query.sort().is_empty() {
            query = with_sort(self.defaults.sort(E::TABLE).to_vec()).apply(query);
        }
        self.fetch_all(&query).await
    }

    pub async fn count<E, S>(&self, search: &S, ops: &[QueryOp]) -> Result<i64>
    where
        E: Entity,
        S: Search + ?Sized + Sync,
    {
        let query = self.query::<E, S>(search, Pager::NoLimit, ops);
        let mut qb = query.count_sql()?;
        debug!(sql = qb.sql(), table = E::TABLE.name, "count");
        let q = qb.build_query_as::<(i64,)>();
        let (count,) = on_db!(self, q, fetch_one)?;
        Ok(count)
    }

    /// Insert `entity`, returning it with store-assigned columns filled in
    pub async fn add<E: Entity>(&self, entity: &E, ops: &[QueryOp]) -> Result<E> {
        let query = apply_ops(Query::new(E::TABLE), ops);
        let mut qb = query.insert_sql(entity)?;
        debug!(sql = qb.sql(), table = E::TABLE.name, "insert");
        let q = qb.build_query_as::<E>();
        let stored = on_db!(self, q, fetch_one)?;
        Ok(stored)
    }

    /// `true` when at least one row changed; no match is not an error
    pub async fn update<E: Entity>(&self, entity: &E, ops: &[QueryOp]) -> Result<bool> {
        let query = apply_ops(Query::new(E::TABLE), ops);
        let mut qb = query.update_sql(entity)?;
        debug!(sql = qb.sql(), table = E::TABLE.name, "update");
        let q = qb.build();
        let result = on_db!(self, q, execute)?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_all<E: Entity>(&self, query: &Query) -> Result<Vec<E>> {
        let mut qb = query.select_sql()?;
        debug!(sql = qb.sql(), table = query.table().name, "select");
        let q = qb.build_query_as::<E>();
        let rows = on_db!(self, q, fetch_all)?;
        Ok(rows)
    }
}
