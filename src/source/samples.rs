//! Built-in datasets used when the database is not reachable.

use crate::models::RawRow;

/// Development dataset used when no database URL is configured.
pub fn demo_rows() -> Vec<RawRow> {
    vec![
        RawRow::new(
            1,
            "Centro de Daule",
            &[
                ("materia_organica_jardin_kg", 10.0),
                ("materia_organica_cocina_kg", 15.0),
                ("grasas_aceite_comestible_kg", 2.0),
                ("papel_blanco_kg", 5.0),
            ],
        ),
        RawRow::new(
            2,
            "Barrio Norte",
            &[
                ("materia_organica_jardin_kg", 8.0),
                ("materia_organica_cocina_kg", 12.0),
                ("grasas_aceite_comestible_kg", 1.0),
                ("papel_blanco_kg", 3.0),
            ],
        ),
        RawRow::new(
            3,
            "Zona Sur",
            &[
                ("materia_organica_jardin_kg", 12.0),
                ("materia_organica_cocina_kg", 18.0),
                ("grasas_aceite_comestible_kg", 3.0),
                ("papel_blanco_kg", 6.0),
            ],
        ),
    ]
}

/// Smaller dataset substituted after a failed query.
pub fn fallback_rows() -> Vec<RawRow> {
    vec![
        RawRow::new(
            1,
            "Centro de Daule",
            &[
                ("materia_organica_jardin_kg", 10.0),
                ("materia_organica_cocina_kg", 15.0),
            ],
        ),
        RawRow::new(
            2,
            "Barrio Norte",
            &[
                ("materia_organica_jardin_kg", 8.0),
                ("materia_organica_cocina_kg", 12.0),
            ],
        ),
    ]
}
