use regex::Captures;
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

use super::{cap, strip_quotes};
use crate::context::ExecutionContext;
use crate::value::{fmt_num, RuntimeError};

fn db_error(err: rusqlite::Error) -> RuntimeError {
    RuntimeError::new(err.to_string())
}

fn with_db_suffix(name: &str) -> String {
    if name.ends_with(".db") {
        name.to_string()
    } else {
        format!("{}.db", name)
    }
}

fn fmt_sql_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Null => "None".to_string(),
        SqlValue::Integer(i) => i.to_string(),
        SqlValue::Real(x) => fmt_num(*x),
        SqlValue::Text(s) => format!("'{}'", s),
        SqlValue::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn fmt_row(row: &[SqlValue]) -> String {
    let parts: Vec<String> = row.iter().map(fmt_sql_value).collect();
    format!("({})", parts.join(", "))
}

/// Literal comma list into SQL parameters: floats if the fragment has a
/// dot, integers when they parse, text otherwise.
fn parse_sql_values(text: &str) -> Vec<SqlValue> {
    text.split(',')
        .map(|raw| {
            let v = strip_quotes(raw);
            if v.contains('.') {
                if let Ok(x) = v.parse::<f64>() {
                    return SqlValue::Real(x);
                }
            }
            match v.parse::<i64>() {
                Ok(i) => SqlValue::Integer(i),
                Err(_) => SqlValue::Text(v.to_string()),
            }
        })
        .collect()
}

impl ExecutionContext {
    fn db(&mut self) -> Result<&Connection, RuntimeError> {
        self.db.as_ref().ok_or_else(|| {
            RuntimeError::new(
                "No database connection. Use 'create database \"name\"' or 'connect to database \"name\"' first",
            )
        })
    }

    fn collect_rows(conn: &Connection, sql: &str) -> Result<Vec<Vec<SqlValue>>, RuntimeError> {
        let mut stmt = conn.prepare(sql).map_err(db_error)?;
        let columns = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..columns)
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        Ok(rows)
    }

    pub(crate) fn create_database(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let db_name = with_db_suffix(cap(caps, 1));
        self.db = Some(Connection::open(&db_name).map_err(db_error)?);
        self.emit(format!(
            "Database '{}' created and connected successfully",
            db_name
        ));
        Ok(format!("connect(\"{}\")", db_name))
    }

    pub(crate) fn connect_database(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let db_name = with_db_suffix(cap(caps, 1));
        self.db = Some(Connection::open(&db_name).map_err(db_error)?);
        self.emit(format!("Connected to database '{}' successfully", db_name));
        Ok(format!("connect(\"{}\")", db_name))
    }

    pub(crate) fn create_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let columns_str = cap(caps, 2).to_string();

        // Column definitions are "name type" pairs; a bare name gets TEXT.
        let columns: Vec<String> = columns_str
            .split(',')
            .map(|def| {
                let def = def.trim();
                match def.split_once(char::is_whitespace) {
                    Some((name, col_type)) => {
                        format!("{} {}", name, col_type.trim().to_uppercase())
                    }
                    None => format!("{} TEXT", def),
                }
            })
            .collect();
        let columns_sql = columns.join(", ");
        let sql = format!("CREATE TABLE IF NOT EXISTS {} ({})", table, columns_sql);

        self.db()?.execute(&sql, []).map_err(db_error)?;
        self.emit(format!(
            "Table '{}' created with columns: {}",
            table, columns_sql
        ));
        Ok(format!("execute(\"{}\")", sql))
    }

    pub(crate) fn insert_into_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let values = parse_sql_values(cap(caps, 2));
        let placeholders: Vec<&str> = values.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            table,
            placeholders.join(", ")
        );

        self.db()?
            .execute(&sql, rusqlite::params_from_iter(values.iter()))
            .map_err(db_error)?;
        let shown: Vec<String> = values.iter().map(fmt_sql_value).collect();
        self.emit(format!(
            "Inserted values [{}] into table '{}'",
            shown.join(", "),
            table
        ));
        Ok(format!("execute(\"{}\")", sql))
    }

    pub(crate) fn select_all_from_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let sql = format!("SELECT * FROM {}", table);
        let rows = Self::collect_rows(self.db()?, &sql)?;

        if rows.is_empty() {
            self.emit(format!("Table '{}' is empty", table));
        } else {
            self.emit(format!("All data from table '{}':", table));
            for (i, row) in rows.iter().enumerate() {
                self.emit(format!("  Row {}: {}", i + 1, fmt_row(row)));
            }
        }
        Ok(format!("query(\"{}\")", sql))
    }

    pub(crate) fn select_from_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let columns = cap(caps, 1).to_string();
        let table = cap(caps, 2).to_string();
        let sql = format!("SELECT {} FROM {}", columns, table);
        let rows = Self::collect_rows(self.db()?, &sql)?;

        if rows.is_empty() {
            self.emit(format!("No results found in table '{}'", table));
        } else {
            self.emit(format!("Results from table '{}':", table));
            for (i, row) in rows.iter().enumerate() {
                self.emit(format!("  Row {}: {}", i + 1, fmt_row(row)));
            }
        }
        Ok(format!("query(\"{}\")", sql))
    }

    pub(crate) fn update_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let set_clause = cap(caps, 2).to_string();
        let where_clause = cap(caps, 3).to_string();
        let sql = format!("UPDATE {} SET {} WHERE {}", table, set_clause, where_clause);

        let updated = self.db()?.execute(&sql, []).map_err(db_error)?;
        self.emit(format!("Updated {} row(s) in table '{}'", updated, table));
        Ok(format!("execute(\"{}\")", sql))
    }

    pub(crate) fn delete_from_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let where_clause = cap(caps, 2).to_string();
        let sql = format!("DELETE FROM {} WHERE {}", table, where_clause);

        let deleted = self.db()?.execute(&sql, []).map_err(db_error)?;
        self.emit(format!("Deleted {} row(s) from table '{}'", deleted, table));
        Ok(format!("execute(\"{}\")", sql))
    }

    pub(crate) fn drop_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let sql = format!("DROP TABLE IF EXISTS {}", table);
        self.db()?.execute(&sql, []).map_err(db_error)?;
        self.emit(format!("Table '{}' dropped successfully", table));
        Ok(format!("execute(\"{}\")", sql))
    }

    pub(crate) fn list_tables(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let sql = "SELECT name FROM sqlite_master WHERE type='table'";
        let rows = Self::collect_rows(self.db()?, sql)?;

        if rows.is_empty() {
            self.emit("No tables found in database");
        } else {
            self.emit("Tables in database:");
            for row in &rows {
                if let Some(SqlValue::Text(name)) = row.first() {
                    self.emit(format!("  - {}", name));
                }
            }
        }
        Ok(format!("query(\"{}\")", sql))
    }

    pub(crate) fn describe_table(&mut self, caps: &Captures<'_>) -> Result<String, RuntimeError> {
        let table = cap(caps, 1).to_string();
        let sql = format!("PRAGMA table_info({})", table);
        let rows = Self::collect_rows(self.db()?, &sql)?;

        if rows.is_empty() {
            self.emit(format!("Table '{}' does not exist", table));
        } else {
            self.emit(format!("Structure of table '{}':", table));
            // PRAGMA columns: cid, name, type, notnull, dflt_value, pk
            for row in &rows {
                let name = row.get(1).map(fmt_sql_value).unwrap_or_default();
                let col_type = match row.get(2) {
                    Some(SqlValue::Text(t)) => t.clone(),
                    _ => String::new(),
                };
                let not_null = matches!(row.get(3), Some(SqlValue::Integer(n)) if *n != 0);
                let default = match row.get(4) {
                    Some(SqlValue::Null) | None => None,
                    Some(other) => Some(fmt_sql_value(other)),
                };
                let pk = matches!(row.get(5), Some(SqlValue::Integer(n)) if *n != 0);

                let mut line = format!("  - {}: {}", name.trim_matches('\''), col_type);
                if not_null {
                    line.push_str(" NOT NULL");
                }
                if let Some(default) = default {
                    line.push_str(&format!(" DEFAULT {}", default));
                }
                if pk {
                    line.push_str(" (PRIMARY KEY)");
                }
                self.emit(line);
            }
        }
        Ok(format!("query(\"{}\")", sql))
    }

    pub(crate) fn close_database(&mut self, _caps: &Captures<'_>) -> Result<String, RuntimeError> {
        if self.db.take().is_some() {
            self.emit("Database connection closed");
            Ok("close()".to_string())
        } else {
            Err(RuntimeError::new("No database connection to close"))
        }
    }
}
