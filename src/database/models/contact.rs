use super::{EntityDef, RelationDef, RelationKind, EMAIL_ADDRESS};

pub static CONTACT: EntityDef = EntityDef {
    name: "Contact",
    table: "contacts",
    columns: &[
        "id",
        "date_entered",
        "date_modified",
        "modified_user_id",
        "created_by",
        "description",
        "deleted",
        "assigned_user_id",
        "salutation",
        "first_name",
        "last_name",
        "title",
        "photo",
        "department",
        "do_not_call",
        "phone_home",
        "phone_mobile",
        "phone_work",
        "phone_other",
        "phone_fax",
        "lawful_basis",
        "date_reviewed",
        "lawful_basis_source",
        "primary_address_street",
        "primary_address_city",
        "primary_address_state",
        "primary_address_postalcode",
        "primary_address_country",
        "alt_address_street",
        "alt_address_city",
        "alt_address_state",
        "alt_address_postalcode",
        "alt_address_country",
        "assistant",
        "assistant_phone",
        "lead_source",
        "reports_to_id",
        "birthdate",
        "campaign_id",
        "joomla_account_id",
        "portal_account_disabled",
        "portal_user_type",
    ],
    default_sort: "dateEntered",
    relations: &CONTACT_RELATIONS,
    default_relations: &[],
};

static CONTACT_RELATIONS: [RelationDef; 2] = [
    RelationDef {
        name: "customFields",
        kind: RelationKind::CustomFields {
            table: "contacts_cstm",
            columns: &[
                "id_c",
                "ubigeo_contact_c",
                "numero_asiento_partida_c",
                "tipo_doc_contac_c",
                "doc_ident_contact_c",
                "tuitionnumber_c",
                "rol_c",
                "status_c",
                "url_inscripcion_c",
                "vigencia_colegiatura_c",
                "acreditacion_otros_c",
                "acreditacion_ambiental_c",
                "acreditacion_social_c",
                "person_type_c",
                "poderes_partida_registral_c",
                "poderes_zona_registral_c",
            ],
        },
    },
    RelationDef {
        name: "emailAddresses",
        kind: RelationKind::Link {
            table: "email_addr_bean_rel",
            local_key: "bean_id",
            remote_key: "email_address_id",
            target: &EMAIL_ADDRESS,
            filter: Some(("bean_module", "Contacts")),
        },
    },
];
