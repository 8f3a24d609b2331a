//! Compiles `Field:direction` expressions into sort descriptors.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// `{"property": name, "direction": "ascending" | "descending"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortDescriptor {
    pub property: String,
    pub direction: Direction,
}

/// Splits on the first `:`. Only `desc` and `descending` (any case) sort
/// descending; everything else, including a missing direction, ascends.
pub fn compile_sort(expr: &str) -> SortDescriptor {
    let (property, direction) = match expr.split_once(':') {
        Some((property, direction)) => (property, direction),
        None => (expr, ""),
    };
    let direction = match direction.trim().to_lowercase().as_str() {
        "desc" | "descending" => Direction::Descending,
        _ => Direction::Ascending,
    };
    SortDescriptor {
        property: property.trim().to_string(),
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert_eq!(compile_sort("Date:DESC").direction, Direction::Descending);
        assert_eq!(compile_sort("Date: descending ").direction, Direction::Descending);
        assert_eq!(compile_sort("Date:asc").direction, Direction::Ascending);
        assert_eq!(compile_sort("Date:down").direction, Direction::Ascending);
        assert_eq!(compile_sort("Date").direction, Direction::Ascending);
    }

    #[test]
    fn test_splits_on_first_colon() {
        let sort = compile_sort(" Due: date :desc");
        assert_eq!(sort.property, "Due");
        assert_eq!(sort.direction, Direction::Ascending);
    }

    #[test]
    fn test_serialized_shape() {
        assert_eq!(
            serde_json::to_value(compile_sort("Date:desc")).unwrap(),
            serde_json::json!({ "property": "Date", "direction": "descending" })
        );
    }
}
