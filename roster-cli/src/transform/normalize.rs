//! Cell cleanup: trim everything, and undo float formatting on agent NPNs

use crate::reconcile::ComparisonField;
use crate::table::Table;

/// Trim every cell; cells of the `AgentNPN` column also lose a spurious
/// decimal part (`"12345.0"` -> `"12345"`).
pub fn normalize_table(table: &Table) -> Table {
    let npn_column = ComparisonField::AgentNpn.column_name();

    table.map_cells(|column, value| {
        if column == npn_column {
            normalize_npn(value)
        } else {
            value.trim().to_string()
        }
    })
}

/// Normalize a single NPN cell.
///
/// A value made only of ASCII digits with at most one `.` keeps the part
/// before the `.`; anything else is only trimmed.
pub fn normalize_npn(value: &str) -> String {
    let trimmed = value.trim();

    if is_plain_number(trimmed) {
        match trimmed.split_once('.') {
            Some((integer, _)) => integer.to_string(),
            None => trimmed.to_string(),
        }
    } else {
        trimmed.to_string()
    }
}

fn is_plain_number(value: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;

    for c in value.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => digits += 1,
            _ => return false,
        }
    }

    digits > 0 && dots <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npn_examples() {
        assert_eq!(normalize_npn("12345.0"), "12345");
        assert_eq!(normalize_npn("12345"), "12345");
        assert_eq!(normalize_npn("ABC-12"), "ABC-12");
        assert_eq!(normalize_npn(""), "");
    }

    #[test]
    fn test_npn_edge_cases() {
        assert_eq!(normalize_npn(" 12345.0 "), "12345");
        assert_eq!(normalize_npn("12.34"), "12");
        assert_eq!(normalize_npn("1.2.3"), "1.2.3");
        assert_eq!(normalize_npn("."), ".");
        assert_eq!(normalize_npn("-5.0"), "-5.0");
        assert_eq!(normalize_npn("1e5"), "1e5");
    }

    #[test]
    fn test_only_npn_column_is_stripped() {
        let table = Table::from_rows(
            ["Agent", "AgentNPN", "Carrier"],
            vec![vec!["  Alice ", " 111.0", "2.0 "]],
        );
        let normalized = normalize_table(&table);

        assert_eq!(normalized.row(0), vec!["Alice", "111", "2.0"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = Table::from_rows(
            ["UplineAgency", "AgentNPN", "States"],
            vec![
                vec![" Acme ", " 12345.0 ", " CA"],
                vec!["Beta", ".5", ""],
                vec!["", "A.B", "NY "],
            ],
        );

        let once = normalize_table(&table);
        let twice = normalize_table(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_table_untouched() {
        let table = Table::from_rows(["AgentNPN"], vec![vec!["1.0"]]);
        let _ = normalize_table(&table);
        assert_eq!(table.cell(0, "AgentNPN"), Some("1.0"));
    }
}
