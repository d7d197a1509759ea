//! Structural descriptions that decoded tables produce for diagnostic
//! reporting.
//!
//! Turning a [`DumpDescription`] into console or HTML output is left to the
//! reporting layer; this module only defines the shape.

use std::fmt::Display;

/// Placeholder rendered for a value the table's version does not carry.
pub const NOT_POPULATED: &str = "not populated";

/// Column headers used by the field/value tables of fixed-shape records.
pub const FIELD_COLUMNS: [&str; 2] = ["Field", "Value"];

/// A table or subtable describing itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpDescription {
    info: String,
    column_headers: Vec<String>,
    rows: Vec<Vec<String>>,
    children: Vec<DumpDescription>,
}

impl DumpDescription {
    /// A description with a title line and no tabular data.
    pub fn new(info: impl Into<String>) -> Self {
        Self {
            info: info.into(),
            ..Default::default()
        }
    }

    /// Sets the column headers every later row has to match.
    pub fn with_columns<S: AsRef<str>>(mut self, headers: &[S]) -> Self {
        self.column_headers = headers.iter().map(|h| h.as_ref().to_owned()).collect();
        self
    }

    /// Appends a data row.
    ///
    /// # Panics
    ///
    /// Panics in debug builds when the row width differs from the number of
    /// column headers.
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(
            row.len(),
            self.column_headers.len(),
            "row width must match the column headers"
        );
        self.rows.push(row);
    }

    /// Appends a `Field | Value` row.
    pub fn push_field(&mut self, name: &str, value: impl Display) {
        self.push_row(vec![name.to_owned(), value.to_string()]);
    }

    /// Appends a `Field | Value` row for a version-gated value, rendering
    /// [`NOT_POPULATED`] when it is absent.
    pub fn push_optional_field<T: Display>(&mut self, name: &str, value: Option<T>) {
        let value = value.map_or_else(|| NOT_POPULATED.to_owned(), |v| v.to_string());
        self.push_row(vec![name.to_owned(), value]);
    }

    pub fn push_child(&mut self, child: DumpDescription) {
        self.children.push(child);
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn column_headers(&self) -> &[String] {
        &self.column_headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn children(&self) -> &[DumpDescription] {
        &self.children
    }
}

/// Implemented by every decoded table and character mapping.
pub trait Dump {
    fn dump(&self) -> DumpDescription;
}
