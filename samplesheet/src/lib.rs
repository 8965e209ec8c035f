//! samplesheet
//!
//! Parsing of sectioned sample sheets and detection of index collisions
//! between samples sharing a lane.
#![deny(missing_docs)]

pub mod collision;
pub mod sheet;

pub use collision::{
    check_collisions, detect_collisions, CollisionCheck, CollisionGroup, Collisions, GroupingKey,
};
pub use sheet::{
    DataSuffix, Document, DuplicateSections, Record, SampleSheetError, Section, SectionClassifier,
    SectionKind, SheetParser, Table,
};

/// Well-known column and section names.
pub mod sheetconst {
    /// Column holding the logical sample identifier.
    pub const SAMPLE_ID: &str = "Sample_ID";
    /// Column holding the first index read barcode.
    pub const INDEX: &str = "Index";
    /// Column holding the optional second index read barcode.
    pub const INDEX2: &str = "Index2";
    /// Column holding the optional lane number.
    pub const LANE: &str = "Lane";
    /// The per-sample table consumed by BCL Convert.
    pub const BCLCONVERT_DATA: &str = "BCLConvert_Data";
    /// Suffix marking a section as tabular.
    pub const DATA_SUFFIX: &str = "Data";
}
