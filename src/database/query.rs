//! Composable query construction
//!
//! A [`Query`] starts from a search, the entity's baseline filters and a
//! pager, then passes through [`QueryOp`]s applied left to right. Rendering
//! produces a `sqlx::QueryBuilder` with every value bound as a parameter.

use std::collections::BTreeSet;
use std::fmt;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder};
use crate::models::place::USER_RELATION;
use crate::models::UserStatus;
use crate::utils::errors::{PlaceBotError, Result};

/// Selects every own column of the queried table.
pub const TABLE_COLUMNS: &str = "*";

/// Many-to-one link from a table to the table owning it
#[derive(Debug)]
pub struct Relation {
    pub name: &'static str,
    pub table: &'static Table,
    pub local_column: &'static str,
}

/// Static description of a persisted entity's table
#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [&'static str],
    /// Set by the store on insert
    pub generated: &'static [&'static str],
    /// Never written by a default update
    pub immutable: &'static [&'static str],
    pub relations: &'static [Relation],
}

impl Table {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    fn unknown_column(&self, column: &str) -> PlaceBotError {
        PlaceBotError::UnknownColumn {
            table: self.name,
            column: column.to_string(),
        }
    }
}

pub static USERS: Table = Table {
    name: "users",
    primary_key: "id",
    columns: &["id", "nickname", "status_id", "created_at"],
    generated: &["created_at"],
    immutable: &["id", "created_at"],
    relations: &[],
};

pub static PLACES: Table = Table {
    name: "places",
    primary_key: "id",
    columns: &["id", "user_id", "place_name", "place_priority"],
    generated: &["id"],
    immutable: &["id"],
    relations: &[Relation {
        name: USER_RELATION,
        table: &USERS,
        local_column: "user_id",
    }],
};

/// A persisted entity the query layer can read and write
pub trait Entity: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static Table;

    /// Value of an own column, `None` for names the table does not have
    fn column_value(&self, column: &str) -> Option<SqlValue>;
}

/// Search criteria; every present field becomes one conjunctive condition
pub trait Search {
    fn conditions(&self) -> Vec<Condition>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    BigInt(i64),
    Int(i32),
    Text(String),
    Timestamp(DateTime<Utc>),
    BigIntList(Vec<i64>),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::BigInt(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(value)
    }
}

impl From<Vec<i64>> for SqlValue {
    fn from(value: Vec<i64>) -> Self {
        SqlValue::BigIntList(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
    Gte,
    Lte,
    In,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static str,
    pub cmp: Cmp,
    pub value: SqlValue,
}

impl Condition {
    pub fn new(column: &'static str, cmp: Cmp, value: impl Into<SqlValue>) -> Self {
        Self { column, cmp, value: value.into() }
    }

    pub fn eq(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Cmp::Eq, value)
    }

    pub fn ne(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Cmp::Ne, value)
    }

    pub fn gte(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Cmp::Gte, value)
    }

    pub fn lte(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self::new(column, Cmp::Lte, value)
    }

    pub fn any_of(column: &'static str, values: Vec<i64>) -> Self {
        Self::new(column, Cmp::In, values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortField {
    pub fn asc(column: &'static str) -> Self {
        Self { column, direction: SortDirection::Asc }
    }

    pub fn desc(column: &'static str) -> Self {
        Self { column, direction: SortDirection::Desc }
    }
}

/// Row window for a select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pager {
    #[default]
    NoLimit,
    One,
    /// Used by "exactly one expected" lookups to detect a second match
    Two,
    Page { offset: i64, limit: i64 },
}

impl Pager {
    /// 1-based page number of `size` rows
    pub fn page(number: i64, size: i64) -> Self {
        let size = size.max(0);
        Pager::Page {
            offset: (number.max(1) - 1).saturating_mul(size),
            limit: size,
        }
    }

    pub fn limit(&self) -> Option<i64> {
        match self {
            Pager::NoLimit => None,
            Pager::One => Some(1),
            Pager::Two => Some(2),
            Pager::Page { limit, .. } => Some(*limit),
        }
    }

    pub fn offset(&self) -> Option<i64> {
        match self {
            Pager::Page { offset, .. } if *offset > 0 => Some(*offset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    table: &'static Table,
    conditions: Vec<Condition>,
    baseline: Vec<Condition>,
    baseline_enabled: bool,
    columns: BTreeSet<&'static str>,
    sort: Vec<SortField>,
    pager: Pager,
}

impl Query {
    pub fn new(table: &'static Table) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            baseline: Vec::new(),
            baseline_enabled: true,
            columns: BTreeSet::new(),
            sort: Vec::new(),
            pager: Pager::NoLimit,
        }
    }

    pub fn with_search<S: Search + ?Sized>(mut self, search: &S) -> Self {
        self.conditions.extend(search.conditions());
        self
    }

    pub fn with_baseline(mut self, filters: &[Condition]) -> Self {
        self.baseline.extend_from_slice(filters);
        self
    }

    pub fn with_pager(mut self, pager: Pager) -> Self {
        self.pager = pager;
        self
    }

    pub fn table(&self) -> &'static Table {
        self.table
    }

    pub fn columns(&self) -> &BTreeSet<&'static str> {
        &self.columns
    }

    pub fn sort(&self) -> &[SortField] {
        &self.sort
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn baseline_enabled(&self) -> bool {
        self.baseline_enabled
    }

    /// Conditions the rendered WHERE clause conjoins, baseline first
    pub fn effective_conditions(&self) -> Vec<&Condition> {
        let baseline = self.baseline.iter().filter(|_| self.baseline_enabled);
        baseline.chain(self.conditions.iter()).collect()
    }

    fn validate(&self) -> Result<()> {
        for column in &self.columns {
            if *column != TABLE_COLUMNS
                && !self.table.has_column(column)
                && self.table.relation(column).is_none()
            {
                return Err(self.table.unknown_column(column));
            }
        }
        for field in &self.sort {
            if !self.table.has_column(field.column) {
                return Err(self.table.unknown_column(field.column));
            }
        }
        for condition in self.effective_conditions() {
            if !self.table.has_column(condition.column) {
                return Err(self.table.unknown_column(condition.column));
            }
        }
        Ok(())
    }

    /// Own columns to read or write: the explicit selection, or all of them
    fn own_columns(&self) -> Vec<&'static str> {
        let explicit: Vec<&'static str> = self
            .table
            .columns
            .iter()
            .copied()
            .filter(|c| self.columns.contains(c))
            .collect();

        if explicit.is_empty() || self.columns.contains(TABLE_COLUMNS) {
            self.table.columns.to_vec()
        } else {
            explicit
        }
    }

    fn joined_relations(&self) -> Vec<&'static Relation> {
        self.table
            .relations
            .iter()
            .filter(|r| self.columns.contains(r.name))
            .collect()
    }

    pub fn select_sql(&self) -> Result<QueryBuilder<'static, Postgres>> {
        self.validate()?;

        let mut qb = QueryBuilder::new("SELECT ");
        let mut separated = qb.separated(", ");
        for column in self.own_columns() {
            separated.push(format!("t.\"{}\"", column));
        }
        let relations = self.joined_relations();
        for relation in &relations {
            for column in relation.table.columns {
                separated.push(format!(
                    "\"{rel}\".\"{col}\" AS \"{rel}__{col}\"",
                    rel = relation.name,
                    col = column
                ));
            }
        }

        qb.push(format!(" FROM \"{}\" AS t", self.table.name));
        for relation in &relations {
            qb.push(format!(
                " LEFT JOIN \"{table}\" AS \"{rel}\" ON \"{rel}\".\"{pk}\" = t.\"{local}\"",
                table = relation.table.name,
                rel = relation.name,
                pk = relation.table.primary_key,
                local = relation.local_column
            ));
        }

        self.push_where(&mut qb);

        if !self.sort.is_empty() {
            qb.push(" ORDER BY ");
            let mut separated = qb.separated(", ");
            for field in &self.sort {
                let direction = match field.direction {
                    SortDirection::Asc => "ASC",
                    SortDirection::Desc => "DESC",
                };
                separated.push(format!("t.\"{}\" {}", field.column, direction));
            }
        }

        if let Some(limit) = self.pager.limit() {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }
        if let Some(offset) = self.pager.offset() {
            qb.push(" OFFSET ");
            qb.push_bind(offset);
        }

        Ok(qb)
    }

    pub fn count_sql(&self) -> Result<QueryBuilder<'static, Postgres>> {
        self.validate()?;

        let mut qb = QueryBuilder::new(format!("SELECT count(*) FROM \"{}\" AS t", self.table.name));
        self.push_where(&mut qb);
        Ok(qb)
    }

    /// INSERT of the selected own columns minus store-generated ones,
    /// returning the stored row
    pub fn insert_sql<E: Entity>(&self, entity: &E) -> Result<QueryBuilder<'static, Postgres>> {
        self.validate()?;

        let columns: Vec<&'static str> = self
            .own_columns()
            .into_iter()
            .filter(|c| !self.table.generated.contains(c))
            .collect();

        if columns.is_empty() {
            return Err(PlaceBotError::InvalidInput(format!(
                "No columns to insert into {}",
                self.table.name
            )));
        }

        let mut qb = QueryBuilder::new(format!("INSERT INTO \"{}\" (", self.table.name));
        let mut separated = qb.separated(", ");
        for column in &columns {
            separated.push(format!("\"{}\"", column));
        }
        qb.push(") VALUES (");
        let mut first = true;
        for column in &columns {
            let value = entity
                .column_value(column)
                .ok_or_else(|| self.table.unknown_column(column))?;
            if !first {
                qb.push(", ");
            }
            first = false;
            push_value(&mut qb, &value);
        }
        qb.push(") RETURNING ");
        self.push_returning(&mut qb);

        Ok(qb)
    }

    /// Primary-key scoped UPDATE of the selected own columns; without a
    /// selection every mutable column is written
    pub fn update_sql<E: Entity>(&self, entity: &E) -> Result<QueryBuilder<'static, Postgres>> {
        self.validate()?;

        let explicit = self.columns.iter().any(|c| self.table.has_column(c));
        let columns: Vec<&'static str> = self
            .own_columns()
            .into_iter()
            .filter(|c| *c != self.table.primary_key)
            .filter(|c| explicit || !self.table.immutable.contains(c))
            .collect();

        if columns.is_empty() {
            return Err(PlaceBotError::InvalidInput(format!(
                "No columns to update in {}",
                self.table.name
            )));
        }

        let mut qb = QueryBuilder::new(format!("UPDATE \"{}\" SET ", self.table.name));
        let mut first = true;
        for column in &columns {
            let value = entity
                .column_value(column)
                .ok_or_else(|| self.table.unknown_column(column))?;
            if !first {
                qb.push(", ");
            }
            first = false;
            qb.push(format!("\"{}\" = ", column));
            push_value(&mut qb, &value);
        }

        let pk = self.table.primary_key;
        let pk_value = entity
            .column_value(pk)
            .ok_or_else(|| self.table.unknown_column(pk))?;
        qb.push(format!(" WHERE \"{}\" = ", pk));
        push_value(&mut qb, &pk_value);

        Ok(qb)
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let conditions = self.effective_conditions();
        if conditions.is_empty() {
            return;
        }

        qb.push(" WHERE ");
        for (i, condition) in conditions.into_iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            let column = format!("t.\"{}\"", condition.column);
            match condition.cmp {
                Cmp::Eq => qb.push(format!("{} = ", column)),
                Cmp::Ne => qb.push(format!("{} <> ", column)),
                Cmp::Gte => qb.push(format!("{} >= ", column)),
                Cmp::Lte => qb.push(format!("{} <= ", column)),
                Cmp::In => qb.push(format!("{} = ANY(", column)),
            };
            push_value(qb, &condition.value);
            if condition.cmp == Cmp::In {
                qb.push(")");
            }
        }
    }

    fn push_returning(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        let mut separated = qb.separated(", ");
        for column in self.table.columns {
            separated.push(format!("\"{}\"", column));
        }
    }
}

fn push_value(qb: &mut QueryBuilder<'static, Postgres>, value: &SqlValue) {
    match value {
        SqlValue::BigInt(v) => qb.push_bind(*v),
        SqlValue::Int(v) => qb.push_bind(*v),
        SqlValue::Text(v) => qb.push_bind(v.clone()),
        SqlValue::Timestamp(v) => qb.push_bind(*v),
        SqlValue::BigIntList(v) => qb.push_bind(v.clone()),
    };
}

/// A pure `Query -> Query` transformation
pub struct QueryOp(Box<dyn Fn(Query) -> Query + Send + Sync>);

impl QueryOp {
    pub fn new(f: impl Fn(Query) -> Query + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn apply(&self, query: Query) -> Query {
        (self.0)(query)
    }
}

impl fmt::Debug for QueryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueryOp")
    }
}

/// Applies `ops` left to right
pub fn apply_ops(query: Query, ops: &[QueryOp]) -> Query {
    ops.iter().fold(query, |query, op| op.apply(query))
}

/// Adds own columns, [`TABLE_COLUMNS`] or relation names to the selection
pub fn with_columns(columns: &[&'static str]) -> QueryOp {
    let columns = columns.to_vec();
    QueryOp::new(move |mut query| {
        query.columns.extend(columns.iter().copied());
        query
    })
}

/// Appends sort fields after any already present
pub fn with_sort(fields: Vec<SortField>) -> QueryOp {
    QueryOp::new(move |mut query| {
        query.sort.extend(fields.iter().copied());
        query
    })
}

/// Drops the entity's baseline filters, e.g. to see soft-deleted rows
pub fn without_baseline() -> QueryOp {
    QueryOp::new(|mut query| {
        query.baseline_enabled = false;
        query
    })
}

/// Restricts tables with a status column to enabled rows
pub fn with_enabled_only() -> QueryOp {
    QueryOp::new(|mut query| {
        let filter = Condition::eq("status_id", UserStatus::Enabled);
        if query.table.has_column(filter.column) && !query.baseline.contains(&filter) {
            query.baseline.push(filter);
        }
        query
    })
}
