//! samplesheet_check
//!
//! Pre-flight check of a sequencing sample sheet: fails when two samples
//! share the same barcodes on the same lane.
#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    unused
)]

pub mod config;
pub mod report;
pub mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use config::CheckConfig;
use log::{debug, info, warn};
use report::{banner, render_collisions, TableView};
use samplesheet::{CollisionCheck, DuplicateSections, GroupingKey, SheetParser, Table};
use std::io::Write;
use std::path::PathBuf;

/// Check an Illumina sample sheet for Sample_ID collisions.
#[derive(Parser, Debug, Clone)]
#[clap(name = "samplesheet_check", version)]
pub struct CheckArgs {
    /// Path to the SampleSheet.csv file
    #[clap(value_name = "CSV")]
    pub csv_path: PathBuf,

    /// Print the checked table, and a notice when no collisions are found
    #[clap(short, long)]
    pub verbose: bool,

    /// Tabular section to check [default: BCLConvert_Data]
    #[clap(long, value_name = "NAME")]
    pub section: Option<String>,

    /// Fail if a section name appears more than once
    #[clap(long, overrides_with = "no_strict")]
    pub strict: bool,

    /// Keep the last of repeated sections, even if the config file sets
    /// strict_sections
    #[clap(long, overrides_with = "strict")]
    pub no_strict: bool,

    /// TOML file with defaults for --section and --strict
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl CheckArgs {
    /// Merge command line flags over the config file.
    pub fn resolve(&self) -> Result<CheckConfig> {
        let mut config = CheckConfig::load(self.config.as_deref())?;
        if let Some(section) = &self.section {
            config.data_section.clone_from(section);
        }
        if self.strict {
            config.strict_sections = true;
        } else if self.no_strict {
            config.strict_sections = false;
        }
        Ok(config)
    }
}

/// Parse the sample sheet named in `args`, check its data section and write
/// the report to `out`.
pub fn run(args: &CheckArgs, out: &mut impl Write) -> Result<CollisionCheck> {
    let config = args.resolve()?;
    let policy = if config.strict_sections {
        DuplicateSections::Reject
    } else {
        DuplicateSections::LastWins
    };

    let doc = SheetParser::new()
        .duplicate_sections(policy)
        .parse_path(&args.csv_path)
        .with_context(|| format!("failed to load {}", args.csv_path.display()))?;
    debug!(
        "parsed sections [{}] from {}",
        doc.section_names().collect::<Vec<_>>().join("], ["),
        args.csv_path.display()
    );

    let empty = Table::default();
    let data = match doc.get(&config.data_section) {
        Some(section) => section.as_table().unwrap_or_else(|| {
            warn!(
                "[{}] is not a tabular section, treating it as empty",
                config.data_section
            );
            &empty
        }),
        None => {
            warn!(
                "[{}] not found in {}, treating it as empty",
                config.data_section,
                args.csv_path.display()
            );
            &empty
        }
    };

    if args.verbose {
        writeln!(out, "{}", banner(&config.data_section))?;
        write!(out, "{}", TableView::new(data))?;
    }

    let check = match GroupingKey::resolve(data) {
        Ok(key) => {
            debug!("grouping rows by {}", key.columns().join(", "));
            key.check(data)
        }
        Err(missing) => CollisionCheck::NotApplicable(missing),
    };
    match &check {
        CollisionCheck::Collisions(collisions) => {
            writeln!(out, "{}", banner("Collisions"))?;
            write!(out, "{}", render_collisions(collisions))?;
        }
        CollisionCheck::Clear => {
            info!("{} rows checked, no collisions", data.len());
            if args.verbose {
                writeln!(out, "{}", banner("Collisions"))?;
                writeln!(out, "No collisions detected.")?;
            }
        }
        CollisionCheck::NotApplicable(missing) => {
            info!("collision check skipped, missing {}", missing.join(", "));
            if args.verbose {
                writeln!(out, "{}", banner("Collisions"))?;
                writeln!(
                    out,
                    "No collisions detected. Column(s) {} missing, nothing to check.",
                    missing.join(", ")
                )?;
            }
        }
    }
    Ok(check)
}
