//! Static waste-characterization taxonomy.
//!
//! The 15 top-level categories and their subcategory fields are plain data.
//! Aggregation walks this table and never branches on a category name, so
//! the table can change shape without touching the aggregator.

use serde::Serialize;

/// A numeric survey field that belongs to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    /// Column name on a raw survey row.
    pub field_key: &'static str,
    /// Human-readable name shown in the detail table.
    pub display_name: &'static str,
}

/// A top-level waste category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: u32,
    pub name: &'static str,
    pub subcategories: &'static [Subcategory],
}

const fn sub(field_key: &'static str, display_name: &'static str) -> Subcategory {
    Subcategory {
        field_key,
        display_name,
    }
}

/// The fixed taxonomy, in display order.
pub static CATEGORIES: [Category; 15] = [
    Category {
        id: 1,
        name: "MATERIA ORGÁNICA",
        subcategories: &[
            sub("materia_organica_jardin_kg", "De jardín"),
            sub("materia_organica_cocina_kg", "De cocina"),
        ],
    },
    Category {
        id: 2,
        name: "GRASAS Y ACEITES",
        subcategories: &[sub("grasas_aceite_comestible_kg", "Aceite comestible")],
    },
    Category {
        id: 3,
        name: "MEDICINA",
        subcategories: &[
            sub("medicina_jarabe_kg", "Jarabe"),
            sub("medicina_tabletas_kg", "Tabletas"),
        ],
    },
    Category {
        id: 4,
        name: "PAPELES Y CARTÓN",
        subcategories: &[
            sub("papel_blanco_kg", "Papel blanco"),
            sub("papel_periodico_kg", "Papel periódico"),
            sub("papel_archivo_kg", "Papel archivo"),
            sub("carton_kg", "Cartón"),
            sub("tetra_brik_kg", "Tetra-brik"),
        ],
    },
    Category {
        id: 5,
        name: "PLÁSTICOS",
        subcategories: &[
            sub("plastico_pet_kg", "PET"),
            sub("plastico_mixto_kg", "Plástico mixto"),
            sub("bot_aceite_kg", "Botella de aceite"),
            sub("bolsas_kg", "Bolsas"),
        ],
    },
    Category {
        id: 6,
        name: "VIDRIOS",
        subcategories: &[
            sub("vidrio_blanco_kg", "Blanco"),
            sub("vidrio_verde_kg", "Verde"),
            sub("vidrio_otros_kg", "Otros"),
        ],
    },
    Category {
        id: 7,
        name: "METAL",
        subcategories: &[
            sub("latas_ferrosas_kg", "Latas ferrosas"),
            sub("aluminio_kg", "Aluminio"),
            sub("acero_kg", "Acero"),
            sub("metal_otros_kg", "Otros"),
        ],
    },
    Category {
        id: 8,
        name: "TEXTILES",
        subcategories: &[sub("textiles_ropa_kg", "Ropa, mantas, manteles, etc.")],
    },
    Category {
        id: 9,
        name: "CAUCHO",
        subcategories: &[sub("caucho_zapatos_neumaticos_kg", "Zapatos, neumáticos")],
    },
    Category {
        id: 10,
        name: "CUERO",
        subcategories: &[sub("cuero_zapatos_neumaticos_kg", "Zapatos, carteras, etc.")],
    },
    Category {
        id: 11,
        name: "RESIDUOS SANITARIOS",
        subcategories: &[sub("papel_higienico_kg", "Papel higiénico")],
    },
    Category {
        id: 12,
        name: "MADERAS",
        subcategories: &[sub("maderas_kg", "Maderas")],
    },
    Category {
        id: 13,
        name: "BATERÍAS",
        subcategories: &[sub("baterias_tel_lamparas_kg", "De teléfono, lámparas")],
    },
    Category {
        id: 14,
        name: "EQUIPOS ELECTRÓNICOS",
        subcategories: &[sub("electronicos_electrodomesticos_kg", "Electrodomésticos")],
    },
    Category {
        id: 15,
        name: "ESCOMBROS",
        subcategories: &[sub("escombros_otros_kg", "Otros")],
    },
];

/// Short chart labels keyed by canonical category name.
pub static ABBREVIATIONS: [(&str, &str); 15] = [
    ("MATERIA ORGÁNICA", "M. ORGÁNICA"),
    ("GRASAS Y ACEITES", "GRASAS/ACEITES"),
    ("MEDICINA", "MEDICINA"),
    ("PAPELES Y CARTÓN", "PAPEL/CARTÓN"),
    ("PLÁSTICOS", "PLÁSTICOS"),
    ("VIDRIOS", "VIDRIOS"),
    ("METAL", "METAL"),
    ("TEXTILES", "TEXTILES"),
    ("CAUCHO", "CAUCHO"),
    ("CUERO", "CUERO"),
    ("RESIDUOS SANITARIOS", "SANITARIOS"),
    ("MADERAS", "MADERAS"),
    ("BATERÍAS", "BATERÍAS"),
    ("EQUIPOS ELECTRÓNICOS", "ELECTRÓNICOS"),
    ("ESCOMBROS", "ESCOMBROS"),
];

/// Returns the full taxonomy.
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Returns the short chart label for a category name.
///
/// Names missing from the table are returned unchanged.
pub fn abbreviate(name: &str) -> &str {
    match ABBREVIATIONS.iter().find(|(full, _)| *full == name) {
        Some((_, short)) => *short,
        None => name,
    }
}

/// Iterates every field key in taxonomy order.
pub fn field_keys(taxonomy: &[Category]) -> impl Iterator<Item = &'static str> + '_ {
    taxonomy
        .iter()
        .flat_map(|c| c.subcategories.iter().map(|s| s.field_key))
}
