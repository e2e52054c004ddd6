//! Store Adapter
//!
//! Executes query configs against a PostgreSQL table. The adapter owns the
//! model schema, runs validation and translation, assembles the final
//! statement, and binds every user-supplied value as a parameter.

use aq_core::{
    validate, ModelSchema, QueryConfig, Scalar, SortDirection, SortOrder, StoreAdapter, StoreError,
};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::filter::{quote_ident, SqlParams};
use crate::translate::{translate, TranslatedQuery};

/// PostgreSQL store adapter for one table.
#[derive(Clone)]
pub struct PgStoreAdapter {
    pool: PgPool,
    table: String,
    schema: ModelSchema,
}

impl PgStoreAdapter {
    /// Create an adapter with an explicit attribute whitelist.
    pub fn new<I, S>(pool: PgPool, table: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pool,
            table: table.into(),
            schema: ModelSchema::new(attributes),
        }
    }

    /// Create an adapter whose schema is the table's column list, read from
    /// `information_schema` in ordinal position order.
    pub async fn from_information_schema(
        pool: PgPool,
        table: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let table = table.into();
        let columns: Vec<String> = sqlx::query_scalar(
            "SELECT column_name FROM information_schema.columns \
             WHERE table_name = $1 ORDER BY ordinal_position",
        )
        .bind(&table)
        .fetch_all(&pool)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        if columns.is_empty() {
            return Err(StoreError::backend(format!(
                "table {table} has no columns or does not exist"
            )));
        }

        tracing::info!(table = %table, attributes = columns.len(), "schema loaded");

        Ok(Self::new(pool, table, columns))
    }

    /// The attribute whitelist queries are checked against.
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// The table queries run against.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Validate, translate, and execute a query config, returning each
    /// matching row as a JSON object.
    pub async fn fetch(&self, config: &QueryConfig) -> Result<Vec<serde_json::Value>, StoreError> {
        validate(config, &self.schema)?;
        let translated = translate(config, &self.schema)?;
        let (sql, params) = build_json_select(&self.table, &translated);
        tracing::debug!(%sql, params = params.len(), "executing query config");

        let mut query = sqlx::query_scalar::<_, Json<serde_json::Value>>(&sql);
        for value in params.values() {
            query = match value {
                Scalar::Null => query.bind(None::<String>),
                Scalar::Bool(b) => query.bind(*b),
                Scalar::Int(n) => query.bind(*n),
                Scalar::Float(f) => query.bind(*f),
                Scalar::Text(s) => query.bind(s.clone()),
            };
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    /// Validate, translate, and execute a query config, decoding rows into a
    /// typed struct.
    pub async fn fetch_as<T>(&self, config: &QueryConfig) -> Result<Vec<T>, StoreError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        validate(config, &self.schema)?;
        let translated = translate(config, &self.schema)?;
        let (sql, params) = build_select(&self.table, &translated);
        tracing::debug!(%sql, params = params.len(), "executing query config");

        let mut query = sqlx::query_as::<_, T>(&sql);
        for value in params.values() {
            query = match value {
                Scalar::Null => query.bind(None::<String>),
                Scalar::Bool(b) => query.bind(*b),
                Scalar::Int(n) => query.bind(*n),
                Scalar::Float(f) => query.bind(*f),
                Scalar::Text(s) => query.bind(s.clone()),
            };
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))
    }
}

#[async_trait]
impl StoreAdapter for PgStoreAdapter {
    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    async fn execute(&self, config: &QueryConfig) -> Result<Vec<serde_json::Value>, StoreError> {
        self.fetch(config).await
    }
}

/// Build a `SELECT *` statement for a translated query (standalone function
/// for testing).
pub fn build_select(table: &str, query: &TranslatedQuery) -> (String, SqlParams) {
    let mut params = SqlParams::new();
    let sql = format!(
        "SELECT * FROM {}{}",
        quote_ident(table),
        build_query_tail(query, &mut params)
    );
    (sql, params)
}

/// Build a statement returning each matching row as a single `jsonb` column
/// (standalone function for testing).
pub fn build_json_select(table: &str, query: &TranslatedQuery) -> (String, SqlParams) {
    let mut params = SqlParams::new();
    let sql = format!(
        "SELECT to_jsonb(t) AS item FROM {} AS t{}",
        quote_ident(table),
        build_query_tail(query, &mut params)
    );
    (sql, params)
}

/// WHERE, ORDER BY, LIMIT, and OFFSET for a translated query. Page bounds
/// are bound as parameters after the filter's.
fn build_query_tail(query: &TranslatedQuery, params: &mut SqlParams) -> String {
    let mut sql = String::new();

    let where_clause = query.filter.to_sql(params);
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&where_clause);
    }

    if let Some(sort) = &query.sort {
        let order_clause = build_order_clause(sort);
        if !order_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&order_clause);
        }
    }

    if let Some(limit) = query.page.limit {
        let placeholder = params.push(Scalar::Int(limit as i64));
        sql.push_str(&format!(" LIMIT {placeholder}"));
    }
    if let Some(offset) = query.page.offset {
        let placeholder = params.push(Scalar::Int(offset as i64));
        sql.push_str(&format!(" OFFSET {placeholder}"));
    }

    sql
}

/// Build ORDER BY clause from a sort order (standalone function for testing)
pub fn build_order_clause(sort: &SortOrder) -> String {
    if sort.is_empty() {
        return String::new();
    }

    let order_parts: Vec<String> = sort
        .criteria()
        .iter()
        .map(|criterion| {
            let direction = match criterion.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            format!("{} {}", quote_ident(&criterion.attribute), direction)
        })
        .collect();

    format!("ORDER BY {}", order_parts.join(", "))
}
