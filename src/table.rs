//! Row-indexed table types for tonelaje.
//!
//! Provides the [`Table`] type: an ordered sequence of fixed-shape rows of
//! dynamically typed [`Value`] cells, plus an index-aligned
//! [`Table::append_column`] operation. Row identity is positional and stable:
//! no table operation reorders, drops, or duplicates rows, so per-row results
//! produced by one pipeline stage always line up with the rows seen by the
//! next.

use std::{fmt, io::Read, io::Write, path::Path};

use crate::error::{Error, Result};

/// A single dynamically typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Value {
    /// Returns true if this value is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric coercion.
    ///
    /// `Float` and `Int` convert directly; `Text` is trimmed and parsed as
    /// `f64`; `Bool` and `Null` never coerce. Non-finite values (a NaN or
    /// infinite `Float`, or a parse producing one) are treated as
    /// non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f).filter(|f| f.is_finite()),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            Self::Bool(_) | Self::Null => None,
        }
    }

    /// Boolean view; `None` for every non-bool variant.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text content of a string-typed cell.
    ///
    /// `Text` yields its content, `Null` yields the empty string, and every
    /// other variant yields `None`. Used for reading cells that are text by
    /// construction, such as the rendered `issues` column; cells that may
    /// hold any type stringify via [`Value::render`] instead.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Null => Some(""),
            _ => None,
        }
    }

    /// Flat scalar rendering used for CSV export (`Null` renders empty).
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Parses a raw CSV field into the narrowest matching variant.
    ///
    /// Empty fields become `Null`; `true`/`false` become `Bool`; integer and
    /// float literals become `Int`/`Float`; everything else stays `Text`.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Null;
        }
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        Self::Text(raw.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Self::Null, Self::Float)
    }
}

/// An in-memory table of ordered rows.
///
/// This is the primary data type for tonelaje. Columns are ordered and named;
/// every row holds exactly one [`Value`] per column. Pipeline stages take a
/// table by reference and return a new table with extra columns appended, so
/// the caller's input is never mutated.
///
/// # Example
///
/// ```
/// use tonelaje::{Table, Value};
///
/// let mut table = Table::new(vec!["tonnage".into(), "state".into()]).unwrap();
/// table.push_row(vec![Value::Float(120.0), Value::from("TX")]).unwrap();
/// assert_eq!(table.num_rows(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given column names.
    ///
    /// # Errors
    ///
    /// Returns an error if a column name appears more than once.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(Error::duplicate_column(name));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Appends a row to the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the row arity does not match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::shape_mismatch(format!(
                "row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the ordered column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the table has a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Returns the positional index of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns an iterator over one column's values in row order.
    ///
    /// Returns `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Returns a view of the row at `index`, or `None` if out of bounds.
    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        if index < self.rows.len() {
            Some(RowRef { table: self, index })
        } else {
            None
        }
    }

    /// Returns an iterator over row views in positional order.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        (0..self.rows.len()).map(move |index| RowRef { table: self, index })
    }

    /// Appends a new column, aligned by row index.
    ///
    /// This is the only merge operation in the crate: `values[i]` becomes the
    /// new cell of row `i`, so results computed per row can only re-attach at
    /// the exact row they came from. On error the table is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the column already exists or `values` does not
    /// have exactly one entry per row.
    pub fn append_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::duplicate_column(name));
        }
        if values.len() != self.rows.len() {
            return Err(Error::shape_mismatch(format!(
                "column '{}' has {} values but table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Loads a table from a CSV file with a header row.
    ///
    /// Cell types are inferred per cell via [`Value::infer`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| Error::io(e, path))?;
        Self::from_csv_reader(file)
    }

    /// Loads a table from any CSV reader with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid CSV or a record has the
    /// wrong arity.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut table = Self::new(headers.iter().map(str::to_string).collect())?;

        for record in csv_reader.records() {
            let record = record?;
            let row: Vec<Value> = record.iter().map(Value::infer).collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Saves the table to a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| Error::io(e, path))?;
        self.write_csv(file)
    }

    /// Writes the table as CSV to any writer, header row first.
    ///
    /// Every cell renders as a flat scalar via [`Value::render`].
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(Value::render))?;
        }
        csv_writer.flush().map_err(|e| Error::Io {
            path: None,
            source: e,
        })?;
        Ok(())
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowRef<'a> {
    /// Returns the positional index of this row.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the cell under `column`, or `None` if the column is absent.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = self.table.column_index(column)?;
        Some(&self.table.rows[self.index][idx])
    }
}
