use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not specified: pass --settings-file or set LORIS_SETTINGS_FILE")]
    Unspecified,

    #[error("settings file is not readable: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("settings file {} line {line}: expected KEY=VALUE", path.display())]
    MalformedLine { path: PathBuf, line: usize },

    #[error("settings file {} does not declare a valid NBR_SETTINGS", path.display())]
    MissingCount { path: PathBuf },

    #[error(
        "settings file {} does not have the correct number of settings (expected {expected}, read {actual})",
        path.display()
    )]
    CountMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("required setting is missing: {0}")]
    MissingSetting(String),

    #[error("aggregated settings file {} is not a JSON object of strings", path.display())]
    InvalidAggregate { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("subject list {} needs to be in .csv format with a .csv extension", path.display())]
    NotCsv { path: PathBuf },

    #[error("subject list {} is not a readable file", path.display())]
    Unreadable { path: PathBuf },

    #[error(
        "subject list {} line {line} contains {actual} fields, expected {expected}",
        path.display()
    )]
    FieldCount {
        path: PathBuf,
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line contains {actual} fields, expected {expected}")]
    LineFieldCount { expected: usize, actual: usize },

    #[error("keyname lists carry no scan fields")]
    NotAScanList,

    #[error("invalid keyname {0:?}")]
    InvalidKeyname(String),

    #[error("invalid native source {0:?}: expected <ecat|dicom|minc>;<location>")]
    InvalidSource(String),

    #[error("subject list {} line {line}: {source}", path.display())]
    AtLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<FormatError>,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TargetKind {
    File,
    Directory,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// A resolution that was asked to verify existence and found nothing.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("required {kind} does not exist: {}", path.display())]
pub struct PathNotFound {
    pub kind: TargetKind,
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("cannot build {stage}: upstream input missing")]
    MissingInput {
        stage: &'static str,
        #[source]
        source: PathNotFound,
    },

    #[error("stage {stage} does not apply to {modality} scans")]
    WrongModality {
        stage: &'static str,
        modality: &'static str,
    },

    #[error("stage {stage} requires a {expected} source, scan has none")]
    MissingSource {
        stage: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ExternalCommandError {
    #[error("failed to launch `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },

    #[error("cannot append command output to {}", path.display())]
    OutputLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
