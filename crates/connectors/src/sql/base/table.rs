use crate::sql::base::{dialect::Dialect, error::DbError};

/// The polled table and the two columns read from it.
///
/// Names are quoted into SQL text, so only plain identifiers are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
    pub id_column: String,
    pub content_column: String,
}

impl TableRef {
    pub fn new(
        schema: Option<&str>,
        table: &str,
        id_column: &str,
        content_column: &str,
    ) -> Result<Self, DbError> {
        if let Some(schema) = schema {
            validate_identifier(schema)?;
        }
        validate_identifier(table)?;
        validate_identifier(id_column)?;
        validate_identifier(content_column)?;

        Ok(TableRef {
            schema: schema.map(str::to_string),
            table: table.to_string(),
            id_column: id_column.to_string(),
            content_column: content_column.to_string(),
        })
    }

    /// `schema.table`, quoted for the dialect.
    pub fn qualified_name(&self, dialect: &dyn Dialect) -> String {
        match &self.schema {
            Some(schema) => format!(
                "{}.{}",
                dialect.quote_identifier(schema),
                dialect.quote_identifier(&self.table)
            ),
            None => dialect.quote_identifier(&self.table),
        }
    }
}

fn validate_identifier(ident: &str) -> Result<(), DbError> {
    let valid = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidIdentifier(ident.to_string()))
    }
}
