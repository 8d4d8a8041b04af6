use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlPool};
use sqlx::types::Json;
use sqlx::{MySql, Row};

use crate::database::manager::DatabaseError;
use crate::database::models::{camel_case, EntityDef};
use crate::pagination::SortOrder;

/// SQL text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Builds soft-delete aware SELECTs over one SuiteCRM table.
///
/// Rows come back as a single JSON column built with `JSON_OBJECT`, keyed by
/// camelCase field names. Identifiers only ever come from `EntityDef`s;
/// values are always bound.
pub struct QueryBuilder {
    entity: &'static EntityDef,
    conditions: Vec<String>,
    params: Vec<Value>,
    order: Option<(&'static str, SortOrder)>,
    page: Option<(u32, u64)>,
}

impl QueryBuilder {
    pub fn new(entity: &'static EntityDef) -> Self {
        Self {
            entity,
            conditions: vec!["t.`deleted` = 0".to_string()],
            params: Vec::new(),
            order: None,
            page: None,
        }
    }

    pub fn where_eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.conditions.push(format!("t.{} = ?", quote_identifier(column)));
        self.params.push(value.into());
        self
    }

    /// `(col1 LIKE ? OR col2 LIKE ?)` with `%term%` bound for each column
    pub fn where_contains_any(mut self, columns: &[&'static str], term: &str) -> Self {
        if columns.is_empty() {
            return self;
        }
        let pattern = format!("%{}%", escape_like(term));
        let parts: Vec<String> = columns
            .iter()
            .map(|column| format!("t.{} LIKE ?", quote_identifier(column)))
            .collect();
        self.conditions.push(format!("({})", parts.join(" OR ")));
        for _ in columns {
            self.params.push(Value::String(pattern.clone()));
        }
        self
    }

    pub fn order_by(mut self, column: &'static str, order: SortOrder) -> Self {
        self.order = Some((column, order));
        self
    }

    pub fn paginate(mut self, limit: u32, offset: u64) -> Self {
        self.page = Some((limit, offset));
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut query = format!(
            "SELECT {} AS `row` FROM {} t WHERE {}",
            json_object("t", self.entity.columns),
            quote_identifier(self.entity.table),
            self.conditions.join(" AND ")
        );
        let mut params = self.params.clone();

        if let Some((column, order)) = self.order {
            query.push_str(&format!(" ORDER BY t.{} {}", quote_identifier(column), order.as_sql()));
        }
        if let Some((limit, offset)) = self.page {
            query.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::from(limit));
            params.push(Value::from(offset));
        }

        SqlResult { query, params }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        SqlResult {
            query: format!(
                "SELECT COUNT(*) AS `count` FROM {} t WHERE {}",
                quote_identifier(self.entity.table),
                self.conditions.join(" AND ")
            ),
            params: self.params.clone(),
        }
    }

    pub async fn select_all(&self, pool: &MySqlPool) -> Result<Vec<Value>, DatabaseError> {
        fetch_rows(pool, &self.to_sql()).await
    }

    pub async fn select_optional(&self, pool: &MySqlPool) -> Result<Option<Value>, DatabaseError> {
        let sql = self.to_sql();
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        match q.fetch_optional(pool).await? {
            Some(row) => Ok(Some(row_json(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn count(&self, pool: &MySqlPool) -> Result<i64, DatabaseError> {
        let sql = self.to_count_sql();
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}

/// Run a query whose rows carry a single JSON column named `row`
pub async fn fetch_rows(pool: &MySqlPool, sql: &SqlResult) -> Result<Vec<Value>, DatabaseError> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param(q, p);
    }
    let rows = q.fetch_all(pool).await?;
    rows.iter().map(row_json).collect()
}

fn row_json(row: &sqlx::mysql::MySqlRow) -> Result<Value, DatabaseError> {
    let Json(value): Json<Value> = row.try_get("row")?;
    Ok(value)
}

/// `JSON_OBJECT('dateEntered', t.`date_entered`, ...)`
pub fn json_object(alias: &str, columns: &[&str]) -> String {
    let pairs: Vec<String> = columns
        .iter()
        .map(|column| format!("'{}', {}.{}", camel_case(column), alias, quote_identifier(column)))
        .collect();
    format!("JSON_OBJECT({})", pairs.join(", "))
}

/// Quote a MySQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub fn bind_param<'q>(
    q: sqlx::query::Query<'q, MySql, MySqlArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                q.bind(u)
            } else if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(Json(v)),
    }
}
