use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use tracing::{debug, info};

use crate::civet::scan_dirname;
use crate::error::FormatError;
use crate::model::{Modality, NativeFormat, ScanContext, TracerSource};
use crate::settings::CivetSettings;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SubjectListKind {
    /// One keyname per line.
    Keynames,
    /// keyname,civet scan id
    Civet,
    /// keyname,scan date,ecat filename,civet scan id
    Pib,
    /// keyname,scan date,format;location,civet scan id
    Fdg,
}

impl SubjectListKind {
    pub fn field_count(self) -> usize {
        match self {
            Self::Keynames => 1,
            Self::Civet => 2,
            Self::Pib | Self::Fdg => 4,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParsedLine {
    Comment,
    Scan(ScanContext),
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

// Trailing empty fields do not count: `s001,20200101,` is a two-field row.
fn row_fields(row: &str) -> std::str::Split<'_, char> {
    row.trim_end_matches(',').split(',')
}

pub fn check_structure(path: &Path, expected_fields: usize) -> Result<(), FormatError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "csv")
        .unwrap_or(false);
    if !is_csv {
        return Err(FormatError::NotCsv {
            path: path.to_path_buf(),
        });
    }

    let contents = read_list(path)?;
    for (index, row) in contents.lines().enumerate() {
        let row = row.trim_end();
        if is_skippable(row) {
            continue;
        }

        let actual = row_fields(row).count();
        if actual != expected_fields {
            return Err(FormatError::FieldCount {
                path: path.to_path_buf(),
                line: index + 1,
                expected: expected_fields,
                actual,
            });
        }
    }

    Ok(())
}

fn read_list(path: &Path) -> Result<String, FormatError> {
    if !path.is_file() {
        return Err(FormatError::Unreadable {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|_| FormatError::Unreadable {
        path: path.to_path_buf(),
    })
}

pub struct SubjectListParser<'a> {
    kind: SubjectListKind,
    civet: &'a CivetSettings,
    keyname_pattern: Regex,
}

impl<'a> SubjectListParser<'a> {
    pub fn new(kind: SubjectListKind, civet: &'a CivetSettings) -> Result<Self> {
        Ok(Self {
            kind,
            civet,
            keyname_pattern: keyname_pattern()?,
        })
    }

    pub fn parse_line(&self, line: &str) -> Result<ParsedLine, FormatError> {
        let line = line.trim();
        if is_skippable(line) {
            return Ok(ParsedLine::Comment);
        }

        let fields: Vec<&str> = row_fields(line).map(str::trim).collect();
        let expected = self.kind.field_count();
        if fields.len() != expected {
            return Err(FormatError::LineFieldCount {
                expected,
                actual: fields.len(),
            });
        }

        let keyname = fields[0];
        if !self.keyname_pattern.is_match(keyname) {
            return Err(FormatError::InvalidKeyname(keyname.to_string()));
        }

        let (modality, scan_date, civet_scan_id, source) = match self.kind {
            SubjectListKind::Keynames => return Err(FormatError::NotAScanList),
            SubjectListKind::Civet => (Modality::Anatomical, fields[1], fields[1], TracerSource::None),
            SubjectListKind::Pib => (
                Modality::Pib,
                fields[1],
                fields[3],
                TracerSource::Pib {
                    ecat_filename: fields[2].to_string(),
                },
            ),
            SubjectListKind::Fdg => (
                Modality::Fdg,
                fields[1],
                fields[3],
                parse_native_source(fields[2])?,
            ),
        };

        Ok(ParsedLine::Scan(ScanContext {
            keyname: keyname.to_string(),
            modality,
            scan_date: scan_date.to_string(),
            civet_scan_id: civet_scan_id.to_string(),
            civet_scan_dirname: scan_dirname(keyname, civet_scan_id, self.civet.append_scan_id),
            source,
        }))
    }
}

fn keyname_pattern() -> Result<Regex> {
    Regex::new(r"^[^\s,|/]+$").context("failed to compile keyname pattern")
}

fn parse_native_source(field: &str) -> Result<TracerSource, FormatError> {
    let (format, location) = field
        .split_once(';')
        .filter(|(_, location)| !location.trim().is_empty())
        .ok_or_else(|| FormatError::InvalidSource(field.to_string()))?;

    Ok(TracerSource::Fdg {
        format: format.parse::<NativeFormat>()?,
        location: location.trim().to_string(),
    })
}

pub fn load_scans(
    path: &Path,
    kind: SubjectListKind,
    civet: &CivetSettings,
) -> Result<Vec<ScanContext>> {
    info!(path = %path.display(), kind = ?kind, "checking subject list");
    check_structure(path, kind.field_count())?;

    let parser = SubjectListParser::new(kind, civet)?;
    let contents = read_list(path)?;
    let mut scans = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let parsed = parser
            .parse_line(line)
            .map_err(|source| FormatError::AtLine {
                path: path.to_path_buf(),
                line: index + 1,
                source: Box::new(source),
            })?;
        if let ParsedLine::Scan(scan) = parsed {
            debug!(keyname = %scan.keyname, scan_date = %scan.scan_date, "loaded scan");
            scans.push(scan);
        }
    }

    info!(path = %path.display(), scans = scans.len(), "loaded subject list");
    Ok(scans)
}

pub fn load_keynames(path: &Path) -> Result<Vec<String>> {
    check_structure(path, SubjectListKind::Keynames.field_count())?;

    let pattern = keyname_pattern()?;
    let contents = read_list(path)?;
    let mut keynames = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if is_skippable(line) {
            continue;
        }
        let line = line.trim_end_matches(',');
        if !pattern.is_match(line) {
            return Err(FormatError::AtLine {
                path: path.to_path_buf(),
                line: index + 1,
                source: Box::new(FormatError::InvalidKeyname(line.to_string())),
            }
            .into());
        }
        keynames.push(line.to_string());
    }

    Ok(keynames)
}

pub fn select_by_keyname(scans: Vec<ScanContext>, keynames: &[String]) -> Vec<ScanContext> {
    if keynames.is_empty() {
        return scans;
    }
    scans
        .into_iter()
        .filter(|scan| keynames.iter().any(|keyname| keyname == &scan.keyname))
        .collect()
}
