//! A minimal rectangular table shared by every export format.

use std::fmt;

use rust_decimal::Decimal;

/// One spreadsheet cell. `Empty` renders as a blank cell in XLSX and an empty
/// field in CSV.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Bool(bool),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// `Empty` for `None`, otherwise the integer.
    pub fn optional_int(value: Option<impl Into<i64>>) -> Self {
        value.map_or(Cell::Empty, |v| Cell::Integer(v.into()))
    }

    /// `Empty` for `None` or blank text.
    #[must_use]
    pub fn optional_text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Cell::Text(v.to_owned()),
            _ => Cell::Empty,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(n) => write!(f, "{n}"),
            Cell::Decimal(d) => write!(f, "{d}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Empty => Ok(()),
        }
    }
}

/// Named sheet with a header row and rows of the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new<I, S>(name: impl Into<String>, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with `Empty` and dropping extra
    /// cells so the sheet stays rectangular.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Empty);
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `index`, if both exist.
    #[must_use]
    pub fn cell(&self, index: usize, column: &str) -> Option<&Cell> {
        let col = self.headers.iter().position(|h| h == column)?;
        self.rows.get(index)?.get(col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_kept_rectangular() {
        let mut sheet = Sheet::new("S", ["a", "b", "c"]);
        sheet.push_row(vec![Cell::text("x")]);
        sheet.push_row(vec![
            Cell::Integer(1),
            Cell::Integer(2),
            Cell::Integer(3),
            Cell::Integer(4),
        ]);

        assert!(sheet.rows.iter().all(|r| r.len() == 3));
        assert_eq!(sheet.cell(0, "c"), Some(&Cell::Empty));
        assert_eq!(sheet.cell(1, "c"), Some(&Cell::Integer(3)));
        assert_eq!(sheet.cell(0, "missing"), None);
    }

    #[test]
    fn cells_render_as_plain_text() {
        assert_eq!(Cell::Decimal(Decimal::new(100_000, 3)).to_string(), "100.000");
        assert_eq!(Cell::Bool(false).to_string(), "false");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::optional_int(None::<u32>), Cell::Empty);
        assert_eq!(Cell::optional_text(Some("")), Cell::Empty);
    }
}
