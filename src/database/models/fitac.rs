use super::{EntityDef, RelationDef, RelationKind, PROJECT};

pub static FITAC: EntityDef = EntityDef {
    name: "Fitac",
    table: "fitac_fitac",
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
        "document_name",
        "filename",
        "file_ext",
        "file_mime_type",
        "active_date",
        "exp_date",
        "category_id",
        "subcategory_id",
        "status_id",
        "med_prev_mit",
        "parti_cuidadana",
        "cronograma",
        "dj_rni_seia",
        "contact_id_c",
        "proy_proyectostele_id_c",
        "recursos",
        "foto_montaje",
    ],
    default_sort: "dateEntered",
    relations: &FITAC_RELATIONS,
    default_relations: &[],
};

static FITAC_RELATIONS: [RelationDef; 2] = [
    RelationDef {
        name: "customFields",
        kind: RelationKind::CustomFields {
            table: "fitac_fitac_cstm",
            columns: FITAC_CUSTOM_COLUMNS,
        },
    },
    RelationDef {
        name: "projects",
        kind: RelationKind::Link {
            table: "fitac_fitac_proy_proyectostele_c",
            local_key: "fitac_fitac_proy_proyectostelefitac_fitac_idb",
            remote_key: "fitac_fitac_proy_proyectosteleproy_proyectostele_ida",
            target: &PROJECT,
            filter: None,
        },
    },
];

const FITAC_CUSTOM_COLUMNS: &[&str] = &[
    "id_c",
    "fitac_v1_c",
    "fitac_v2_c",
    "fitac_v3_c",
    "fitac_v4_c",
    "fitac_v5_c",
    "fitac_v6_c",
    "fitac_v7_c",
    "fitac_v8_c",
    "fitac_v9_c",
    "fitac_v10_c",
    "fitac_v11_c",
    "fitac_v12_c",
    "fitac_v13_c",
    "fitac_v14_c",
    "fitac_v15_c",
    "parrafo_no_conforme_c",
    "nro_oficio_rep_c",
    "fecha_oficio_c",
    "copias_c",
    "hr_inicial_c",
    "fecha_ingreso_c",
    "tipo_expediente_c",
    "link_fitac_c",
    "link_oficio_c",
    "account_id_c",
    "link_rni_c",
    "link_seia_c",
    "fitac_v16_c",
    "fitac_v17_c",
    "fitac_v18_c",
    "nro_informe_rep_c",
    "link_informe_rep_c",
    "fecha_informe_rep_c",
    "account_id1_c",
    "fta_v19_c",
    "fecha_acuse_c",
    "tipo_proyecto_c",
    "informe_abandono_c",
    "fecha_informe_abandono_c",
    "url_informe_abandono_c",
    "nro_oficio_abandono_c",
    "fecha_oficio_abandono_c",
    "url_oficio_abandono_c",
    "estado_atencion_c",
    "hr_ampliacion_c",
    "notificacion_c",
    "notificacion_abandono_c",
    "numero_solicitud_c",
    "url_medidas_contingencia_c",
    "url_medidas_ambientales_c",
    "oficio_resol_doc_id_c",
    "informe_resol_doc_id_c",
    "fitac_doc_id_c",
];
