use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Anatomical,
    Pib,
    Fdg,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anatomical => "anatomical",
            Self::Pib => "pib",
            Self::Fdg => "fdg",
        }
    }

    /// Label used in run-log keys.
    pub fn log_label(self) -> &'static str {
        match self {
            Self::Anatomical => "ANATOMICAL",
            Self::Pib => "PiB",
            Self::Fdg => "FDG",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeFormat {
    Ecat,
    Dicom,
    Minc,
}

impl NativeFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ecat => "ecat",
            Self::Dicom => "dicom",
            Self::Minc => "minc",
        }
    }
}

impl FromStr for NativeFormat {
    type Err = FormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ecat" => Ok(Self::Ecat),
            "dicom" => Ok(Self::Dicom),
            "minc" => Ok(Self::Minc),
            _ => Err(FormatError::InvalidSource(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TracerSource {
    None,
    Pib {
        ecat_filename: String,
    },
    Fdg {
        format: NativeFormat,
        location: String,
    },
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScanContext {
    pub keyname: String,
    pub modality: Modality,
    pub scan_date: String,
    pub civet_scan_id: String,
    pub civet_scan_dirname: String,
    pub source: TracerSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub job: String,
    pub keyname: String,
    pub scan_date: Option<String>,
    pub command: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineRunManifest {
    pub manifest_version: u32,
    pub modality: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub settings_path: String,
    pub settings_sha256: Option<String>,
    pub subject_list: String,
    pub fake: bool,
    pub stages: Vec<StageOutcome>,
    pub failure_reason: Option<String>,
}
