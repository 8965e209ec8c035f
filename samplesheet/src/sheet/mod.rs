//! Sectioned sample sheet parsing.
//!
//! A sample sheet is a flat text file split into `[Name]` sections. Sections
//! whose name ends in `Data` hold a CSV table; every other section holds
//! `key,value` lines.
pub(crate) mod csv;
pub(crate) mod scsv;

pub use self::csv::{Record, Table};
use self::csv::{parse_key_values, parse_table};
use self::scsv::{split_sections, RawSection};
use crate::sheetconst::DATA_SUFFIX;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Failures while loading a sample sheet.
#[derive(Debug, Error)]
pub enum SampleSheetError {
    /// The path does not exist or cannot be opened or read.
    #[error("sample sheet {} is not accessible", path.display())]
    FileNotAccessible {
        /// The offending path.
        path: PathBuf,
        /// The underlying io failure.
        #[source]
        source: io::Error,
    },

    /// The file content is not valid UTF-8.
    #[error("sample sheet {} is not valid UTF-8 text", path.display())]
    InvalidEncoding {
        /// The offending path.
        path: PathBuf,
    },

    /// A tabular section could not be read as CSV.
    #[error("failed to parse [{section}] (header at line {line}) as CSV")]
    MalformedTable {
        /// Name of the section.
        section: String,
        /// Line of the section header.
        line: u32,
        /// The underlying CSV failure.
        #[source]
        source: ::csv::Error,
    },

    /// A section name appeared twice while duplicates are rejected.
    #[error("duplicate [{name}] at line {line}")]
    DuplicateSection {
        /// Name of the repeated section.
        name: String,
        /// Line of the repeated header.
        line: u32,
    },
}

/// How to interpret the lines of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// `key,value` metadata lines.
    KeyValue,
    /// A CSV table with a header row.
    Table,
}

/// Decides the kind of a section from its name.
pub trait SectionClassifier {
    /// The kind of the section called `name`.
    fn classify(&self, name: &str) -> SectionKind;
}

/// Sections whose name ends in `Data` are tables, everything else is
/// key-value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSuffix;

impl SectionClassifier for DataSuffix {
    fn classify(&self, name: &str) -> SectionKind {
        if name.ends_with(DATA_SUFFIX) {
            SectionKind::Table
        } else {
            SectionKind::KeyValue
        }
    }
}

impl<F: Fn(&str) -> SectionKind> SectionClassifier for F {
    fn classify(&self, name: &str) -> SectionKind {
        self(name)
    }
}

/// The content of one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Metadata section. Order of keys is irrelevant.
    KeyValue(BTreeMap<String, String>),
    /// Tabular section.
    Table(Table),
}

impl Section {
    /// The kind of this section.
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::KeyValue(_) => SectionKind::KeyValue,
            Section::Table(_) => SectionKind::Table,
        }
    }

    /// The table, if this is a tabular section.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Section::Table(t) => Some(t),
            Section::KeyValue(_) => None,
        }
    }

    /// The key-value pairs, if this is a metadata section.
    pub fn as_key_values(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Section::KeyValue(kv) => Some(kv),
            Section::Table(_) => None,
        }
    }
}

/// What to do when a section name is repeated within one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateSections {
    /// The later section replaces the earlier one.
    #[default]
    LastWins,
    /// Fail with [`SampleSheetError::DuplicateSection`].
    Reject,
}

/// A parsed sample sheet: sections keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: BTreeMap<String, Section>,
}

impl Document {
    /// Load a sample sheet from `path` with the default parser.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SampleSheetError> {
        SheetParser::new().parse_path(path)
    }

    /// The section called `name`.
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// The section called `name` if it exists and is tabular.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.get(name).and_then(Section::as_table)
    }

    /// The section called `name` if it exists and is key-value.
    pub fn key_values(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.get(name).and_then(Section::as_key_values)
    }

    /// Section names in sorted order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.keys().map(String::as_str)
    }

    /// Iterate over `(name, section)` pairs in sorted order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> + '_ {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True if no sections were found.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl FromStr for Document {
    type Err = SampleSheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SheetParser::new().parse_str(s)
    }
}

/// Configurable sample sheet parser.
///
/// ```
/// use samplesheet::{DuplicateSections, SheetParser};
///
/// let doc = SheetParser::new()
///     .duplicate_sections(DuplicateSections::Reject)
///     .parse_str("[Header]\nRunName,test\n[BCLConvert_Data]\nSample_ID,Index\nS1,AAAA\n")
///     .unwrap();
/// assert_eq!(doc.table("BCLConvert_Data").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SheetParser<C = DataSuffix> {
    classifier: C,
    duplicates: DuplicateSections,
}

impl SheetParser<DataSuffix> {
    /// Parser using the `...Data` naming rule and last-wins duplicates.
    pub fn new() -> Self {
        SheetParser::default()
    }
}

impl<C: SectionClassifier> SheetParser<C> {
    /// Replace the section classification rule.
    pub fn with_classifier<D: SectionClassifier>(self, classifier: D) -> SheetParser<D> {
        SheetParser {
            classifier,
            duplicates: self.duplicates,
        }
    }

    /// Set the policy for repeated section names.
    pub fn duplicate_sections(mut self, policy: DuplicateSections) -> Self {
        self.duplicates = policy;
        self
    }

    /// Read and parse the file at `path`. The file is closed before parsing
    /// begins, on success and on failure.
    pub fn parse_path(&self, path: impl AsRef<Path>) -> Result<Document, SampleSheetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SampleSheetError::FileNotAccessible {
            path: path.to_owned(),
            source,
        })?;
        self.parse_reader(file, path)
    }

    /// Read all of `reader` and parse it. `path` is only used in errors.
    pub fn parse_reader<R: Read>(
        &self,
        mut reader: R,
        path: impl AsRef<Path>,
    ) -> Result<Document, SampleSheetError> {
        let path = path.as_ref();
        let mut buf = String::new();
        reader
            .read_to_string(&mut buf)
            .map_err(|source| match source.kind() {
                io::ErrorKind::InvalidData => SampleSheetError::InvalidEncoding {
                    path: path.to_owned(),
                },
                _ => SampleSheetError::FileNotAccessible {
                    path: path.to_owned(),
                    source,
                },
            })?;
        drop(reader);
        self.parse_str(&buf)
    }

    /// Parse sample sheet text.
    pub fn parse_str(&self, input: &str) -> Result<Document, SampleSheetError> {
        let mut sections = BTreeMap::new();
        for raw in split_sections(input) {
            let name = raw.name.fragment().to_string();
            let section = self.finalize(&raw)?;
            match sections.entry(name) {
                Entry::Vacant(e) => {
                    e.insert(section);
                }
                Entry::Occupied(mut e) => match self.duplicates {
                    DuplicateSections::LastWins => {
                        e.insert(section);
                    }
                    DuplicateSections::Reject => {
                        return Err(SampleSheetError::DuplicateSection {
                            name: e.key().clone(),
                            line: raw.name.location_line(),
                        });
                    }
                },
            }
        }
        Ok(Document { sections })
    }

    fn finalize(&self, raw: &RawSection<'_>) -> Result<Section, SampleSheetError> {
        Ok(match self.classifier.classify(raw.name.fragment()) {
            SectionKind::Table => Section::Table(parse_table(raw)?),
            SectionKind::KeyValue => Section::KeyValue(parse_key_values(raw)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SHEET: &str = r#"
[Header],,,,
FileFormatVersion,2,,,
RunName,MyRun,,,
InstrumentPlatform,NextSeq1k2k,,,

[Reads],,,,
Read1Cycles,151,,,
Index1Cycles,10,,,

[BCLConvert_Settings],,,,
SoftwareVersion,3.7.4,,,

[BCLConvert_Data],,,,
Lane,Sample_ID,Index,Index2,
1,S1,AAAAAAAAAA,CCCCCCCCCC,
1,S2,GGGGGGGGGG,TTTTTTTTTT,
"#;

    #[test]
    fn load_full_sheet() -> Result<()> {
        let doc: Document = SHEET.parse()?;
        assert_eq!(
            doc.section_names().collect::<Vec<_>>(),
            vec!["BCLConvert_Data", "BCLConvert_Settings", "Header", "Reads"]
        );
        let header = doc.key_values("Header").unwrap();
        assert_eq!(header["FileFormatVersion"], "2,,,");
        assert_eq!(header["RunName"], "MyRun,,,");

        let data = doc.table("BCLConvert_Data").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(1, "Sample_ID"), Some("S2"));
        assert_eq!(data.get(0, "Index2"), Some("CCCCCCCCCC"));
        assert!(doc.table("Header").is_none());
        assert_eq!(doc.get("Reads").map(Section::kind), Some(SectionKind::KeyValue));
        Ok(())
    }

    #[test]
    fn run_data_section() -> Result<()> {
        let doc: Document = "[RunData]\nA,B,Sample_ID\n1,2,S1\n".parse()?;
        let table = doc.table("RunData").unwrap();
        let expected = Table::new(
            ["A", "B", "Sample_ID"],
            vec![vec!["1".to_string(), "2".to_string(), "S1".to_string()]],
        );
        assert_eq!(table, &expected);
        Ok(())
    }

    #[test]
    fn old_mac_line_endings() -> Result<()> {
        let sheet = "[Header]\rRunName,x\r[BCLConvert_Data]\rLane,Sample_ID,Index\r\
                     1,S1,AAAA\r1,S2,AAAA\r";
        let doc: Document = sheet.parse()?;
        assert_eq!(doc.key_values("Header").unwrap()["RunName"], "x");
        let data = doc.table("BCLConvert_Data").unwrap();
        assert_eq!(crate::detect_collisions(data).len(), 2);
        Ok(())
    }

    #[test]
    fn empty_data_section() -> Result<()> {
        let doc: Document = "[BCLConvert_Data]\n\n[Other]\n".parse()?;
        assert_eq!(doc.table("BCLConvert_Data"), Some(&Table::default()));
        assert_eq!(doc.key_values("Other").map(BTreeMap::len), Some(0));
        Ok(())
    }

    #[test]
    fn duplicate_sections_last_wins() -> Result<()> {
        let doc: Document = "[Header]\nRunName,first\n[Header]\nOther,x\n".parse()?;
        let header = doc.key_values("Header").unwrap();
        assert_eq!(header.get("RunName"), None);
        assert_eq!(header["Other"], "x");
        Ok(())
    }

    #[test]
    fn duplicate_sections_rejected() {
        let res = SheetParser::new()
            .duplicate_sections(DuplicateSections::Reject)
            .parse_str("[Header]\nRunName,first\n\n[Header]\nOther,x\n");
        match res {
            Err(SampleSheetError::DuplicateSection { name, line }) => {
                assert_eq!(name, "Header");
                assert_eq!(line, 4);
            }
            other => panic!("expected duplicate section error, got {other:?}"),
        }
    }

    #[test]
    fn custom_classifier() -> Result<()> {
        let parser = SheetParser::new().with_classifier(|name: &str| {
            if name.eq_ignore_ascii_case("data") {
                SectionKind::Table
            } else {
                SectionKind::KeyValue
            }
        });
        let doc = parser.parse_str("[data]\nSample_ID,Index\nS1,AAAA\n[SomeData]\nx,y\n")?;
        assert_eq!(doc.table("data").map(Table::len), Some(1));
        assert_eq!(doc.key_values("SomeData").unwrap()["x"], "y");
        Ok(())
    }

    #[test]
    fn from_path() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(SHEET.as_bytes())?;
        let doc = Document::from_path(file.path())?;
        assert_eq!(doc.len(), 4);
        Ok(())
    }

    #[test]
    fn missing_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("SampleSheet.csv");
        match Document::from_path(&path) {
            Err(SampleSheetError::FileNotAccessible { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileNotAccessible, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn invalid_utf8() {
        let res = SheetParser::new().parse_reader(&b"[Header]\nName,\xff\xfe\n"[..], "bad.csv");
        assert!(matches!(res, Err(SampleSheetError::InvalidEncoding { .. })));
    }

    #[test]
    fn nothing_but_noise() -> Result<()> {
        let doc: Document = "just,some\nlines\n".parse()?;
        assert!(doc.is_empty());
        Ok(())
    }
}
