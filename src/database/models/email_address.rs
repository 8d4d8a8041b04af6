use super::{EntityDef, RelationDef, RelationKind, CONTACT};

pub static EMAIL_ADDRESS: EntityDef = EntityDef {
    name: "EmailAddress",
    table: "email_addresses",
    columns: &[
        "id",
        "email_address",
        "email_address_caps",
        "invalid_email",
        "opt_out",
        "confirm_opt_in",
        "confirm_opt_in_date",
        "confirm_opt_in_sent_date",
        "confirm_opt_in_fail_date",
        "confirm_opt_in_token",
        "date_created",
        "date_modified",
        "deleted",
    ],
    default_sort: "dateCreated",
    relations: &EMAIL_ADDRESS_RELATIONS,
    default_relations: &[],
};

static EMAIL_ADDRESS_RELATIONS: [RelationDef; 1] = [RelationDef {
    name: "contacts",
    kind: RelationKind::Link {
        table: "email_addr_bean_rel",
        local_key: "email_address_id",
        remote_key: "bean_id",
        target: &CONTACT,
        filter: Some(("bean_module", "Contacts")),
    },
}];
