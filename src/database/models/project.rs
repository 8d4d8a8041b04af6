use super::{EntityDef, RelationDef, RelationKind, ACCOUNT, FITAC};

pub static PROJECT: EntityDef = EntityDef {
    name: "Project",
    table: "proy_proyectostele",
    columns: &[
        "id",
        "date_entered",
        "date_modified",
        "modified_user_id",
        "created_by",
        "description",
        "deleted",
        "assigned_user_id",
        "document_name",
        "filename",
        "file_ext",
        "file_mime_type",
        "active_date",
        "exp_date",
        "category_id",
        "subcategory_id",
        "status_id",
        "direccion_proy_city",
        "direccion_proy_state",
        "direccion_proy_postalcode",
        "direccion_proy_country",
        "direccion_proy",
        "inicio_obra_proy",
        "monto_proy",
        "presupuesto_ambi",
        "vida_util_proy",
        "proy_number",
        "proy_area_peri",
        "proy_coord_utm",
        "proy_zone_utm",
        "proy_coord_geo",
        "proy_ubigeo",
        "rni_teorico",
        "altura_extension",
        "tipo_infraestructura",
        "area_peri",
        "latitud",
        "longitud",
    ],
    default_sort: "dateEntered",
    relations: &PROJECT_RELATIONS,
    default_relations: &[],
};

static PROJECT_RELATIONS: [RelationDef; 3] = [
    RelationDef {
        name: "customFields",
        kind: RelationKind::CustomFields {
            table: "proy_proyectostele_cstm",
            columns: &[
                "id_c",
                "tipo_mimetizacion_c",
                "seia_noseia_c",
                "zonificacion_desplegagle_c",
                "he_c",
                "hs_c",
                "cant_postes_c",
                "long_aereo_c",
                "long_subterraneo_c",
                "canalizado_nuevo_c",
                "anp_za_c",
                "num_antenas_c",
                "num_nodos_c",
                "proy_servicio_c",
                "objetive_c",
                "radiodifusion_c",
                "medidas_contingencia_c",
                "medidas_socioambientales_c",
                "construccion_fechas_c",
                "operacion_fechas_c",
                "cierre_fechas_c",
                "link_otra_mimetizacion_c",
                "url_kmz_c",
                "actividad_excluida_c",
                "url_exclusion_c",
            ],
        },
    },
    RelationDef {
        name: "fitacs",
        kind: RelationKind::Link {
            table: "fitac_fitac_proy_proyectostele_c",
            local_key: "fitac_fitac_proy_proyectosteleproy_proyectostele_ida",
            remote_key: "fitac_fitac_proy_proyectostelefitac_fitac_idb",
            target: &FITAC,
            filter: None,
        },
    },
    RelationDef {
        name: "accounts",
        kind: RelationKind::Link {
            table: "proy_proyectostele_accounts_c",
            local_key: "proy_proyectostele_accountsproy_proyectostele_idb",
            remote_key: "proy_proyectostele_accountsaccounts_ida",
            target: &ACCOUNT,
            filter: None,
        },
    },
];
