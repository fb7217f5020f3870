use crate::color::{MaybePaint, TABLE_HEADER};
use std::fmt::{self, Write};

/// Separator between two columns
const GUTTER: &str = "  ";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    cells: Vec<String>,
}

impl Row {
    fn is_awk_safe(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| !cell.is_empty() && !cell.contains(char::is_whitespace))
    }

    fn columns(&self) -> usize {
        self.cells.len()
    }
}

pub(crate) trait IntoRow: Into<Row> + Sized {
    fn into_row(self) -> Row {
        self.into()
    }
}

impl<T> IntoRow for T where T: Into<Row> + Sized {}

impl From<Vec<String>> for Row {
    fn from(value: Vec<String>) -> Self {
        Row { cells: value }
    }
}

impl From<Vec<&str>> for Row {
    fn from(value: Vec<&str>) -> Self {
        let value: Vec<String> = value.into_iter().map(|s| s.to_owned()).collect();

        value.into()
    }
}

/// A plain-text table whose columns are padded to a common width
pub(crate) struct Table {
    body: Vec<Row>,
    header: Row,
    print_header: bool,
}

impl Table {
    /// Create a table with the given column headers. Headers are printed as the
    /// first line and must not contain whitespace so the output stays easy to
    /// split with `awk` and friends.
    pub(crate) fn with_header<S: IntoRow>(header: S) -> Table {
        let header = header.into_row();

        assert!(
            header.is_awk_safe(),
            "table header is not awk safe, contains whitespace"
        );

        Table {
            body: Vec::new(),
            header,
            print_header: true,
        }
    }

    pub(crate) fn print_header(&mut self, print_header: bool) {
        self.print_header = print_header;
    }

    pub(crate) fn add_row<S: IntoRow>(&mut self, row: S) {
        let row = row.into_row();

        assert_eq!(
            row.columns(),
            self.header.columns(),
            "table has {} columns but a row with {} columns was inserted",
            self.header.columns(),
            row.columns()
        );

        self.body.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .header
            .cells
            .iter()
            .map(|cell| cell.chars().count())
            .collect();

        for row in self.body.iter() {
            for (i, cell) in row.cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        widths
    }
}

fn write_row(
    f: &mut fmt::Formatter<'_>,
    row: &Row,
    widths: &[usize],
    paint: impl Fn(String) -> String,
) -> fmt::Result {
    let last = row.cells.len().saturating_sub(1);

    for (i, cell) in row.cells.iter().enumerate() {
        // The last column is not padded so lines carry no trailing spaces
        let cell = if i == last {
            cell.clone()
        } else {
            format!("{:<width$}{}", cell, GUTTER, width = widths[i])
        };

        f.write_str(&paint(cell))?;
    }

    f.write_char('\n')
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        if self.print_header {
            write_row(f, &self.header, &widths, |cell| {
                TABLE_HEADER.maybe_paint(cell.as_str()).to_string()
            })?;
        }

        for row in self.body.iter() {
            write_row(f, row, &widths, |cell| cell)?;
        }

        Ok(())
    }
}

pub(crate) trait IntoTable: Into<Table> + Sized {
    fn into_table(self) -> Table {
        self.into()
    }
}

impl<T> IntoTable for T where T: Into<Table> + Sized {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ColorMode;
    use crate::color::configure_color;

    fn table() -> Table {
        let mut tab = Table::with_header(vec!["KEY", "COLLECTION"]);

        tab.add_row(vec!["auth.user", "users"]);
        tab.add_row(vec!["admin.permission", "permissions"]);

        tab
    }

    #[test]
    fn test_columns_are_aligned() {
        configure_color(ColorMode::Off);

        assert_eq!(
            table().to_string(),
            "KEY               COLLECTION\n\
             auth.user         users\n\
             admin.permission  permissions\n"
        );
    }

    #[test]
    fn test_headerless_table() {
        configure_color(ColorMode::Off);

        let mut tab = table();
        tab.print_header(false);

        assert_eq!(
            tab.to_string(),
            "auth.user         users\n\
             admin.permission  permissions\n"
        );
    }

    #[test]
    #[should_panic(expected = "not awk safe")]
    fn test_header_with_whitespace() {
        Table::with_header(vec!["MODEL KEY"]);
    }

    #[test]
    #[should_panic(expected = "columns")]
    fn test_row_with_wrong_column_count() {
        let mut tab = Table::with_header(vec!["KEY"]);

        tab.add_row(vec!["a", "b"]);
    }
}
