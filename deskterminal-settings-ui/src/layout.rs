//! Row grouping for the editor.

use deskterminal_config::FieldDescriptor;

/// Split `fields` into rows, starting a new row whenever the field kind
/// differs from the previous field.
pub fn group_rows(fields: &[FieldDescriptor]) -> Vec<&[FieldDescriptor]> {
    fields.chunk_by(|a, b| a.kind == b.kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskterminal_config::{FieldKind, SCHEMA};

    #[test]
    fn rows_cover_the_schema_in_order() {
        let rows = group_rows(SCHEMA);
        let names: Vec<_> = rows.iter().flat_map(|r| r.iter().map(|f| f.name)).collect();
        let expected: Vec<_> = SCHEMA.iter().map(|f| f.name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn each_row_has_a_single_kind() {
        for row in group_rows(SCHEMA) {
            assert!(row.iter().all(|f| f.kind == row[0].kind));
        }
    }

    #[test]
    fn default_schema_rows() {
        let kinds: Vec<_> = group_rows(SCHEMA).iter().map(|r| (r[0].kind, r.len())).collect();
        assert_eq!(
            kinds,
            vec![
                (FieldKind::Int, 5),
                (FieldKind::Bool, 1),
                (FieldKind::Text, 2),
                (FieldKind::Path, 1),
                (FieldKind::Color, 20),
            ]
        );
    }
}
