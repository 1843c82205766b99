use crate::spec::{Datatype, Spec};

/// Render the `CREATE TABLE` statement for `spec`.
///
/// Text columns become `VARCHAR(width)`; booleans and integers share a single
/// `INTEGER` column type (booleans load as 0/1). Every column is `NOT NULL`.
///
/// Example:
/// ```text
/// CREATE TABLE IF NOT EXISTS `testformat1` (
///   `name` VARCHAR(10) NOT NULL,
///   `valid` INTEGER NOT NULL,
///   `count` INTEGER NOT NULL
/// );
/// ```
pub fn create_table_sql(table: &str, spec: &Spec) -> String {
    let columns: Vec<String> = spec
        .columns
        .iter()
        .map(|col| {
            let ty = match col.datatype {
                Datatype::Text => format!("VARCHAR({})", col.width),
                Datatype::Boolean | Datatype::Integer => "INTEGER".to_string(),
            };
            format!("  {} {} NOT NULL", quote_ident(&col.name), ty)
        })
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
        quote_ident(table),
        columns.join(",\n")
    )
}

/// Render a positional `INSERT` for `spec`: one `?` per column, in column
/// order, so a decoded row binds as-is.
pub fn insert_sql(table: &str, spec: &Spec) -> String {
    let names: Vec<String> = spec.column_names().map(quote_ident).collect();
    let placeholders = vec!["?"; names.len()];

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Backtick-quote an identifier, doubling embedded backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
