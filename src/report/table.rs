use std::fmt;

use serde_json::Value;

use crate::blockchair::Record;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Empty),
            },
            Value::String(s) => Cell::Text(s.clone()),
            // nested objects are flattened before we get here, so this is an array
            other => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Flattens nested objects into `parent.child` keys.
fn flatten_into(prefix: Option<&str>, record: &Record, out: &mut Vec<(String, Cell)>) {
    for (key, value) in record {
        let name = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(Some(&name), nested, out),
            value => out.push((name, Cell::from(value))),
        }
    }
}

impl Table {
    /// Builds a table with one row per record. Columns are ordered by first appearance.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut table = Table::default();

        for record in records {
            let mut flat = Vec::new();
            flatten_into(None, record, &mut flat);

            let mut row = vec![Cell::Empty; table.columns.len()];
            for (name, cell) in flat {
                match table.column_index(&name) {
                    Some(index) => row[index] = cell,
                    None => {
                        table.columns.push(name);
                        for existing in table.rows.iter_mut() {
                            existing.push(Cell::Empty);
                        }
                        row.push(cell);
                    }
                }
            }
            table.rows.push(row);
        }

        table
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    #[cfg(test)]
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let index = self.column_index(name)?;
        self.rows.get(row).map(|row| &row[index])
    }

    /// Appends `target`, computed from `source`. Skipped when `source` is absent.
    pub fn derive(&mut self, source: &str, target: &str, f: impl Fn(&Cell) -> Cell) {
        let Some(index) = self.column_index(source) else {
            return;
        };
        for row in self.rows.iter_mut() {
            let derived = f(&row[index]);
            row.push(derived);
        }
        self.columns.push(target.to_string());
    }

    pub fn rename(&mut self, pairs: &[(&str, &str)]) {
        for column in self.columns.iter_mut() {
            if let Some((_, to)) = pairs.iter().find(|(from, _)| *from == column.as_str()) {
                *column = to.to_string();
            }
        }
    }

    pub fn reverse_rows(&mut self) {
        self.rows.reverse();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
