use crate::sql::base::{dialect::Dialect, requests::FetchRequest, table::TableRef};

/// A rendered statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub sql: String,
    pub params: Vec<u64>,
}

pub struct QueryGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Generates the newest-first SELECT for a fetch request.
    ///
    /// `SELECT id, content FROM t [WHERE id > ?] ORDER BY id DESC LIMIT ?`
    pub fn select(&self, table: &TableRef, request: &FetchRequest) -> SelectQuery {
        let id = self.dialect.quote_identifier(&table.id_column);
        let content = self.dialect.quote_identifier(&table.content_column);
        let from = table.qualified_name(self.dialect);

        let mut sql = format!("SELECT {id}, {content} FROM {from}");
        let mut params = Vec::with_capacity(2);

        if let Some(after) = request.after {
            sql.push_str(&format!(
                " WHERE {id} > {}",
                self.dialect.get_placeholder(params.len())
            ));
            params.push(after);
        }

        sql.push_str(&format!(
            " ORDER BY {id} DESC LIMIT {}",
            self.dialect.get_placeholder(params.len())
        ));
        params.push(request.limit as u64);

        SelectQuery { sql, params }
    }
}
