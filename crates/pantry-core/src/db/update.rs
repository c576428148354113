//! Partial-update statement construction.
//!
//! Patches describe which columns change; [`build_update`] turns those
//! column assignments into one parameterized `UPDATE`.

use rusqlite::types::Value;

/// One `column = ?` pair of an update statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: &'static str,
    pub value: Value,
}

impl Assignment {
    pub fn new(column: &'static str, value: Value) -> Self {
        Self { column, value }
    }
}

/// A typed partial update for one table.
///
/// `assignments` receives the fully updated row and picks the values of the
/// columns the patch touches, so encoding happens once in the row conversion.
pub trait ColumnPatch {
    /// Row type the assignments are read from.
    type Row;

    /// Id of the record being patched.
    fn id(&self) -> &str;

    /// Columns this patch changes, with their new stored values.
    fn assignments(&self, row: &Self::Row) -> Vec<Assignment>;
}

/// Builds `UPDATE {table} SET ... WHERE {key_column} = ? [AND condition]`.
///
/// Returns `None` when there is nothing to assign. Placeholders are numbered
/// in assignment order, followed by the key.
pub fn build_update(
    table: &str,
    assignments: Vec<Assignment>,
    key_column: &str,
    key: &str,
    condition: Option<&str>,
) -> Option<(String, Vec<Value>)> {
    if assignments.is_empty() {
        return None;
    }

    let mut set_clauses = Vec::with_capacity(assignments.len());
    let mut params = Vec::with_capacity(assignments.len() + 1);
    for (index, assignment) in assignments.into_iter().enumerate() {
        set_clauses.push(format!("{} = ?{}", assignment.column, index + 1));
        params.push(assignment.value);
    }
    params.push(Value::Text(key.to_string()));

    let mut sql = format!(
        "UPDATE {table} SET {} WHERE {key_column} = ?{}",
        set_clauses.join(", "),
        params.len()
    );
    if let Some(condition) = condition {
        sql.push_str(" AND ");
        sql.push_str(condition);
    }
    Some((sql, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_update_numbers_placeholders() {
        let (sql, params) = build_update(
            "recipes",
            vec![
                Assignment::new("title", Value::Text("Soup".to_string())),
                Assignment::new("prepTime", Value::Null),
            ],
            "id",
            "abc",
            Some("deletedAt IS NULL"),
        )
        .unwrap();

        assert_eq!(
            sql,
            "UPDATE recipes SET title = ?1, prepTime = ?2 WHERE id = ?3 AND deletedAt IS NULL"
        );
        assert_eq!(
            params,
            vec![
                Value::Text("Soup".to_string()),
                Value::Null,
                Value::Text("abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_update_empty_is_none() {
        assert!(build_update("meal_plans", Vec::new(), "id", "abc", None).is_none());
    }
}
