//! Line scanner splitting a sample sheet into raw, unparsed sections.

use std::fmt::{Display, Formatter};

const BOM: char = '\u{feff}';

/// Header of a section along with where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHdr<'a> {
    fragment: &'a str,
    line: u32,
}

impl<'a> SectionHdr<'a> {
    pub fn fragment(&self) -> &'a str {
        self.fragment
    }
    pub fn location_line(&self) -> u32 {
        self.line
    }
}

impl<'a> Display for SectionHdr<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.fragment)
    }
}

/// A section name plus the trimmed, non-blank lines that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection<'a> {
    pub name: SectionHdr<'a>,
    pub lines: Vec<&'a str>,
}

/// Return the section name if `line` (already trimmed) is a section header.
///
/// A header starts with `[` and contains a `]`. The name is whatever precedes
/// the first comma, with any leading `[` and trailing `]` stripped, so padding
/// commas from spreadsheet exports (`[Header],,,`) are tolerated.
pub fn section_name(line: &str) -> Option<&str> {
    if !line.starts_with('[') || !line.contains(']') {
        return None;
    }
    let raw = line.split(',').next().unwrap_or(line);
    Some(raw.trim_matches(|c| c == '[' || c == ']'))
}

/// Lines of `input` ended by `\n`, `\r\n` or a lone `\r`.
fn lines(input: &str) -> impl Iterator<Item = &str> {
    input
        .split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

/// Split `input` into raw sections in a single forward pass.
///
/// Blank lines are dropped. Lines before the first header, and lines under a
/// header with an empty name, have no section to attach to and are discarded.
pub fn split_sections(input: &str) -> Vec<RawSection<'_>> {
    let input = input.strip_prefix(BOM).unwrap_or(input);

    let mut sections = Vec::new();
    let mut current: Option<RawSection<'_>> = None;

    for (i, line) in lines(input).enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match section_name(line) {
            Some(name) => {
                sections.extend(current.take());
                if !name.is_empty() {
                    current = Some(RawSection {
                        name: SectionHdr {
                            fragment: name,
                            line: u32::try_from(i + 1).unwrap_or(u32::MAX),
                        },
                        lines: Vec::new(),
                    });
                }
            }
            None => {
                if let Some(section) = current.as_mut() {
                    section.lines.push(line);
                }
            }
        }
    }
    sections.extend(current);
    sections
}
