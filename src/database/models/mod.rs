//! Read-only views of the SuiteCRM tables served by the API.
//!
//! CRM entities are described by static [`EntityDef`]s and travel as JSON
//! objects with camelCase keys. `User` and `Session` are typed rows because
//! the auth flow reads individual fields from them.

pub mod account;
pub mod contact;
pub mod email_address;
pub mod fitac;
pub mod project;
pub mod session;
pub mod user;

pub use account::ACCOUNT;
pub use contact::CONTACT;
pub use email_address::EMAIL_ADDRESS;
pub use fitac::FITAC;
pub use project::PROJECT;
pub use session::Session;
pub use user::User;

/// A SuiteCRM module table and the relations that can be loaded with it
pub struct EntityDef {
    pub name: &'static str,
    pub table: &'static str,
    /// Column names in the table; each is exposed under its camelCase form
    pub columns: &'static [&'static str],
    /// Field used when the client does not pass `sortBy`
    pub default_sort: &'static str,
    pub relations: &'static [RelationDef],
    /// Relations loaded on every read, in addition to the requested ones
    pub default_relations: &'static [&'static str],
}

pub struct RelationDef {
    pub name: &'static str,
    pub kind: RelationKind,
}

pub enum RelationKind {
    /// One-to-one `_cstm` table keyed by `id_c`
    CustomFields {
        table: &'static str,
        columns: &'static [&'static str],
    },
    /// Many-to-many through a SuiteCRM link table (`local_key` points at this entity)
    Link {
        table: &'static str,
        local_key: &'static str,
        remote_key: &'static str,
        target: &'static EntityDef,
        /// Extra `column = value` constraint on the link table, e.g. `bean_module`
        filter: Option<(&'static str, &'static str)>,
    },
}

impl EntityDef {
    /// Map an API field name (`dateEntered`) back to its column (`date_entered`)
    pub fn column_for_field(&self, field: &str) -> Option<&'static str> {
        self.columns.iter().copied().find(|column| camel_case(column) == field)
    }

    pub fn relation(&self, name: &str) -> Option<&'static RelationDef> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn relation_names(&self) -> Vec<&'static str> {
        self.relations.iter().map(|r| r.name).collect()
    }
}

/// `proy_proyectostele_id_c` -> `proyProyectosteleIdC`
pub fn camel_case(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut upper = false;
    for ch in column.chars() {
        if ch == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_columns_to_camel_case() {
        assert_eq!(camel_case("date_entered"), "dateEntered");
        assert_eq!(camel_case("proy_proyectostele_id_c"), "proyProyectosteleIdC");
        assert_eq!(camel_case("fitac_v1_c"), "fitacV1C");
        assert_eq!(camel_case("id"), "id");
    }

    #[test]
    fn resolves_fields_and_relations() {
        assert_eq!(FITAC.column_for_field("statusId"), Some("status_id"));
        assert_eq!(FITAC.column_for_field("status_id"), None);
        assert!(FITAC.relation("projects").is_some());
        assert!(FITAC.relation("accounts").is_none());
        assert_eq!(ACCOUNT.default_relations, &["customFields"]);
    }

    #[test]
    fn every_entity_can_sort_by_its_default() {
        for entity in [&FITAC, &ACCOUNT, &CONTACT, &PROJECT, &EMAIL_ADDRESS] {
            assert!(
                entity.column_for_field(entity.default_sort).is_some(),
                "{} cannot sort by {}",
                entity.name,
                entity.default_sort
            );
        }
    }
}
