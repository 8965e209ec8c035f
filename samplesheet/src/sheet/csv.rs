use super::scsv::RawSection;
use super::SampleSheetError;
use std::collections::BTreeMap;

/// A tabular section: a header row and data rows of the same width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// The cell under `column`, if the table has such a column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.table
            .column(column)
            .map(|col| self.cells[col].as_str())
    }

    /// All cells of this row, aligned with [`Table::headers`].
    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}

impl Table {
    /// Build a table, padding short rows with empty cells and truncating long
    /// rows to the header width.
    pub fn new<H, R>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<String>>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Table { headers, rows }
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` in the header. When a header name is repeated the
    /// last occurrence wins.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().rposition(|h| h == name)
    }

    /// True if `name` is one of the column headers.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The row at `row`.
    pub fn record(&self, row: usize) -> Option<Record<'_>> {
        self.rows.get(row).map(|cells| Record { table: self, cells })
    }

    /// Iterate over all rows in order.
    pub fn records(&self) -> impl ExactSizeIterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(move |cells| Record { table: self, cells })
    }

    /// Single cell lookup.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        self.record(row).and_then(|r| r.get(column))
    }

    /// A new table with the same headers holding the rows at `indices`, in
    /// the order given.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }
}

/// Interpret the lines of a section as CSV with a header row.
pub(crate) fn parse_table(section: &RawSection<'_>) -> Result<Table, SampleSheetError> {
    if section.lines.is_empty() {
        return Ok(Table::default());
    }
    let malformed = |source: csv::Error| SampleSheetError::MalformedTable {
        section: section.name.fragment().to_string(),
        line: section.name.location_line(),
        source,
    };

    let joined = section.lines.join("\n");
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(joined.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(malformed)
        })
        .collect::<Result<_, _>>()?;
    Ok(Table::new(headers, rows))
}

/// Interpret the lines of a section as `key,value` pairs.
///
/// Each line is split on its first comma only; a line without a comma maps to
/// an empty value. Later duplicate keys overwrite earlier ones.
pub(crate) fn parse_key_values(section: &RawSection<'_>) -> BTreeMap<String, String> {
    section
        .lines
        .iter()
        .map(|line| match line.split_once(',') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::scsv::split_sections;
    use super::{parse_key_values, parse_table, Table};
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn table(input: &str) -> Result<Table> {
        let sections = split_sections(input);
        Ok(parse_table(&sections[0])?)
    }

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn simple_table() -> Result<()> {
        let t = table("[RunData]\nA,B,Sample_ID\n1,2,S1\n")?;
        assert_eq!(t.headers(), strings(&["A", "B", "Sample_ID"]).as_slice());
        assert_eq!(t.len(), 1);
        assert_eq!(t.get(0, "A"), Some("1"));
        assert_eq!(t.get(0, "B"), Some("2"));
        assert_eq!(t.get(0, "Sample_ID"), Some("S1"));
        assert_eq!(t.get(0, "Lane"), None);
        assert_eq!(t.get(1, "A"), None);
        Ok(())
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_truncated() -> Result<()> {
        let t = table("[Data]\nSample_ID,Index,Index2\nS1,AAAA\nS2,CCCC,GGGG,extra\n")?;
        let r0 = t.record(0).unwrap();
        assert_eq!(r0.cells(), strings(&["S1", "AAAA", ""]).as_slice());
        let r1 = t.record(1).unwrap();
        assert_eq!(r1.cells(), strings(&["S2", "CCCC", "GGGG"]).as_slice());
        Ok(())
    }

    #[test]
    fn quoted_cells() -> Result<()> {
        let t = table("[Data]\nSample_ID,Description\nS1,\"lung, left\"\n")?;
        assert_eq!(t.get(0, "Description"), Some("lung, left"));
        Ok(())
    }

    #[test]
    fn cells_keep_surrounding_spaces() -> Result<()> {
        let t = table("[Data]\nSample_ID, Index\nS1, AAAA\n")?;
        assert_eq!(t.get(0, " Index"), Some(" AAAA"));
        assert!(!t.has_column("Index"));
        Ok(())
    }

    #[test]
    fn header_only_and_empty() -> Result<()> {
        let t = table("[Data]\nSample_ID,Index\n")?;
        assert!(t.is_empty());
        assert_eq!(t.headers().len(), 2);

        let t = table("[Data]\n[Next]\n")?;
        assert!(t.is_empty());
        assert!(t.headers().is_empty());
        Ok(())
    }

    #[test]
    fn repeated_header_last_wins() -> Result<()> {
        let t = table("[Data]\nSample_ID,Index,Index\nS1,AAAA,CCCC\n")?;
        assert_eq!(t.get(0, "Index"), Some("CCCC"));
        Ok(())
    }

    #[test]
    fn select_keeps_headers_and_order() {
        let t = Table::new(
            ["Sample_ID"],
            vec![strings(&["S1"]), strings(&["S2"]), strings(&["S3"])],
        );
        let s = t.select(&[2, 0]);
        assert_eq!(s.headers(), t.headers());
        assert_eq!(s.get(0, "Sample_ID"), Some("S3"));
        assert_eq!(s.get(1, "Sample_ID"), Some("S1"));
    }

    #[test]
    fn key_values() {
        let sections = split_sections(
            "[Header]\nRunName , my run \nRunDescription,a,b,c\nFlag\nRunName,second\n",
        );
        let kv = parse_key_values(&sections[0]);
        assert_eq!(kv.len(), 3);
        assert_eq!(kv["RunName"], "second");
        assert_eq!(kv["RunDescription"], "a,b,c");
        assert_eq!(kv["Flag"], "");
    }
}
