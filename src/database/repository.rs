use serde_json::Value;
use sqlx::mysql::MySqlPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{EntityDef, RelationKind};
use crate::database::query_builder::{fetch_rows, json_object, quote_identifier, QueryBuilder, SqlResult};
use crate::pagination::{PageRequest, PaginatedResponse};

/// Read access to one SuiteCRM entity and its relations
pub struct Repository {
    entity: &'static EntityDef,
    pool: MySqlPool,
}

impl Repository {
    pub fn new(entity: &'static EntityDef, pool: MySqlPool) -> Self {
        Self { entity, pool }
    }

    pub fn entity(&self) -> &'static EntityDef {
        self.entity
    }

    pub fn query(&self) -> QueryBuilder {
        QueryBuilder::new(self.entity)
    }

    /// Run `base` as a page: count without pagination, then fetch the rows with it
    pub async fn select_page(
        &self,
        base: QueryBuilder,
        request: &PageRequest,
    ) -> Result<PaginatedResponse<Value>, DatabaseError> {
        let total = base.count(&self.pool).await?;
        let mut rows = base
            .order_by(request.sort_column, request.sort_order)
            .paginate(request.limit, request.offset())
            .select_all(&self.pool)
            .await?;

        for row in rows.iter_mut() {
            self.load_relations(row, &request.relations).await?;
        }

        Ok(PaginatedResponse::new(rows, total, request))
    }

    pub async fn select_one(
        &self,
        base: QueryBuilder,
        relations: &[&'static str],
    ) -> Result<Option<Value>, DatabaseError> {
        match base.select_optional(&self.pool).await? {
            Some(mut row) => {
                self.load_relations(&mut row, relations).await?;
                Ok(Some(row))
            }
            None => Ok(None),
        }
    }

    pub async fn select_404(
        &self,
        base: QueryBuilder,
        relations: &[&'static str],
        not_found: impl FnOnce() -> String,
    ) -> Result<Value, DatabaseError> {
        self.select_one(base, relations)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(not_found()))
    }

    /// Attach the named relations to `row` under their relation names
    pub async fn load_relations(&self, row: &mut Value, relations: &[&'static str]) -> Result<(), DatabaseError> {
        if relations.is_empty() {
            return Ok(());
        }

        let id = match row.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => return Ok(()),
        };

        for name in relations {
            let relation = self.entity.relation(name).ok_or_else(|| {
                DatabaseError::QueryError(format!("{} has no relation '{}'", self.entity.name, name))
            })?;

            let value = match &relation.kind {
                RelationKind::CustomFields { .. } => fetch_rows(&self.pool, &relation_sql(&relation.kind, &id))
                    .await?
                    .into_iter()
                    .next()
                    .unwrap_or(Value::Null),
                RelationKind::Link { .. } => {
                    Value::Array(fetch_rows(&self.pool, &relation_sql(&relation.kind, &id)).await?)
                }
            };

            if let Value::Object(map) = row {
                map.insert(relation.name.to_string(), value);
            }
        }

        Ok(())
    }
}

/// SELECT for one relation of the record with primary key `id`
pub fn relation_sql(kind: &RelationKind, id: &str) -> SqlResult {
    match kind {
        RelationKind::CustomFields { table, columns } => SqlResult {
            query: format!(
                "SELECT {} AS `row` FROM {} c WHERE c.`id_c` = ?",
                json_object("c", columns),
                quote_identifier(table)
            ),
            params: vec![Value::String(id.to_string())],
        },
        RelationKind::Link {
            table,
            local_key,
            remote_key,
            target,
            filter,
        } => {
            let mut query = format!(
                "SELECT {} AS `row` FROM {} t INNER JOIN {} l ON l.{} = t.`id` \
                 WHERE l.{} = ? AND l.`deleted` = 0 AND t.`deleted` = 0",
                json_object("t", target.columns),
                quote_identifier(target.table),
                quote_identifier(table),
                quote_identifier(remote_key),
                quote_identifier(local_key)
            );
            let mut params = vec![Value::String(id.to_string())];
            if let Some((column, value)) = filter {
                query.push_str(&format!(" AND l.{} = ?", quote_identifier(column)));
                params.push(Value::String(value.to_string()));
            }
            SqlResult { query, params }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ACCOUNT, CONTACT};
    use serde_json::json;

    #[test]
    fn custom_fields_sql_uses_id_c() {
        let kind = &ACCOUNT.relation("customFields").unwrap().kind;
        let sql = relation_sql(kind, "acc-1");
        assert!(sql.query.starts_with("SELECT JSON_OBJECT('idC', c.`id_c`"));
        assert!(sql.query.ends_with("FROM `accounts_cstm` c WHERE c.`id_c` = ?"));
        assert_eq!(sql.params, vec![json!("acc-1")]);
    }

    #[test]
    fn link_sql_joins_through_link_table() {
        let kind = &CONTACT.relation("emailAddresses").unwrap().kind;
        let sql = relation_sql(kind, "c-1");
        assert!(sql.query.contains(
            "FROM `email_addresses` t INNER JOIN `email_addr_bean_rel` l ON l.`email_address_id` = t.`id`"
        ));
        assert!(sql
            .query
            .ends_with("WHERE l.`bean_id` = ? AND l.`deleted` = 0 AND t.`deleted` = 0 AND l.`bean_module` = ?"));
        assert_eq!(sql.params, vec![json!("c-1"), json!("Contacts")]);
    }
}
