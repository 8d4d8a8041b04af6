use super::{EntityDef, RelationDef, RelationKind, PROJECT};

pub static ACCOUNT: EntityDef = EntityDef {
    name: "Account",
    table: "accounts",
    columns: &[
        "id",
        "name",
        "date_entered",
        "date_modified",
        "modified_user_id",
        "created_by",
        "description",
        "deleted",
        "assigned_user_id",
        "account_type",
        "industry",
        "annual_revenue",
        "phone_fax",
        "billing_address_street",
        "billing_address_city",
        "billing_address_state",
        "billing_address_postalcode",
        "billing_address_country",
        "rating",
        "phone_office",
        "phone_alternate",
        "website",
        "ownership",
        "employees",
        "ticker_symbol",
        "shipping_address_street",
        "shipping_address_city",
        "shipping_address_state",
        "shipping_address_postalcode",
        "shipping_address_country",
        "parent_id",
        "sic_code",
        "campaign_id",
    ],
    default_sort: "dateEntered",
    relations: &ACCOUNT_RELATIONS,
    default_relations: &["customFields"],
};

static ACCOUNT_RELATIONS: [RelationDef; 2] = [
    RelationDef {
        name: "customFields",
        kind: RelationKind::CustomFields {
            table: "accounts_cstm",
            columns: &[
                "id_c",
                "tipo_doc_administrado_c",
                "nro_doc_identificacion_c",
                "tipo_administrado_c",
                "ubigeo_c",
                "partida_eletronica_c",
                "oficina_registral_c",
                "hoja_ruta_c",
                "status_c",
                "cod_consultor_c",
                "url_inscripcion_c",
                "fecha_presentacion_c",
                "objeto_social_c",
                "asiento_socios_c",
            ],
        },
    },
    RelationDef {
        name: "projects",
        kind: RelationKind::Link {
            table: "proy_proyectostele_accounts_c",
            local_key: "proy_proyectostele_accountsaccounts_ida",
            remote_key: "proy_proyectostele_accountsproy_proyectostele_idb",
            target: &PROJECT,
            filter: None,
        },
    },
];
