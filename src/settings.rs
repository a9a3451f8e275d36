use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::ConfigError;
use crate::util::{sha256_bytes, write_json_pretty};

pub const NBR_SETTINGS_KEY: &str = "NBR_SETTINGS";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    sha256: Option<String>,
    entries: BTreeMap<String, String>,
}

impl SettingsStore {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read(path).map_err(|_| ConfigError::NotFound {
            path: path.to_path_buf(),
        })?;
        let text = String::from_utf8_lossy(&raw);

        let mut entries = BTreeMap::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .map(|(key, value)| (key.trim(), value.trim()))
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| ConfigError::MalformedLine {
                    path: path.to_path_buf(),
                    line: index + 1,
                })?;

            let value = value.trim_matches('"');
            debug!(key, value, "setting");
            entries.insert(key.to_string(), value.to_string());
        }

        let expected = entries
            .get(NBR_SETTINGS_KEY)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .ok_or_else(|| ConfigError::MissingCount {
                path: path.to_path_buf(),
            })?;

        if expected != entries.len() {
            return Err(ConfigError::CountMismatch {
                path: path.to_path_buf(),
                expected,
                actual: entries.len(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            sha256: Some(sha256_bytes(&raw)),
            entries,
        })
    }

    /// Loads the JSON aggregate written by [`SettingsStore::save_aggregated`].
    pub fn load_aggregated(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read(path).map_err(|_| ConfigError::NotFound {
            path: path.to_path_buf(),
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_slice(&raw).map_err(|_| ConfigError::InvalidAggregate {
                path: path.to_path_buf(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            sha256: Some(sha256_bytes(&raw)),
            entries,
        })
    }

    pub fn save_aggregated(&self, path: &Path) -> Result<()> {
        write_json_pretty(path, &self.entries)
            .with_context(|| format!("failed to write aggregated settings: {}", path.display()))
    }

    #[cfg(test)]
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            path: PathBuf::new(),
            sha256: None,
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Result<&str, ConfigError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingSetting(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

pub fn resolve_settings_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    explicit
        .map(Path::to_path_buf)
        .ok_or(ConfigError::Unspecified)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivetSettings {
    pub root_dir: PathBuf,
    pub prefix: String,
    pub version: String,
    pub append_scan_id: bool,
}

impl CivetSettings {
    pub fn from_store(store: &SettingsStore) -> Result<Self, ConfigError> {
        Ok(Self {
            root_dir: PathBuf::from(store.get("CIVET_ROOT_DIR")?),
            prefix: store.get("CIVET_PREFIX")?.to_string(),
            version: store.get("CIVET_VERSION")?.to_string(),
            append_scan_id: store.get("CIVET_SCANID_APPEND_SCANDATE_TO_KEYNAME")? == "ON",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileSettings {
    pub prefix: String,
    pub run_identifier: String,
    pub extension: String,
}

impl LogFileSettings {
    pub fn filename(&self) -> String {
        format!("{}_run-{}{}", self.prefix, self.run_identifier, self.extension)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub loris_root_dir: PathBuf,
    pub civet: CivetSettings,
    pub aal_labels_version: String,
    pub vbm_gm_zscore_suffix: String,
    pub vbm_wm_zscore_suffix: String,
    pub adni_surfaces_dir: PathBuf,
    pub adni_lh_gm_surface: String,
    pub adni_rh_gm_surface: String,
    pub elderly_model_dir: PathBuf,
    pub elderly_model_csf_pmap: String,
    pub pib_ecat_dir: PathBuf,
    pub fdg_native_dir: PathBuf,
    pub log_file: LogFileSettings,
}

impl PipelineSettings {
    pub fn from_store(store: &SettingsStore) -> Result<Self, ConfigError> {
        let text = |key: &str| store.get(key).map(str::to_string);
        let path = |key: &str| store.get(key).map(PathBuf::from);

        Ok(Self {
            loris_root_dir: path("LORIS_ROOT_DIR")?,
            civet: CivetSettings::from_store(store)?,
            aal_labels_version: text("AAL_LABELS_VERSION")?,
            vbm_gm_zscore_suffix: text("VBM_GM_ZSCORE_VOLUME_SUFFIX")?,
            vbm_wm_zscore_suffix: text("VBM_WM_ZSCORE_VOLUME_SUFFIX")?,
            adni_surfaces_dir: path("ADNI_SURFACES_DIR")?,
            adni_lh_gm_surface: text("ADNI_LH_GM_SURFACE")?,
            adni_rh_gm_surface: text("ADNI_RH_GM_SURFACE")?,
            elderly_model_dir: path("ELDERLY_MODEL_DIR")?,
            elderly_model_csf_pmap: text("ELDERLY_MODEL_PMAP_MEAN_CSF_VOLUME")?,
            pib_ecat_dir: path("PIB_ECAT_DIR")?,
            fdg_native_dir: path("FDG_NATIVE_DIR")?,
            log_file: LogFileSettings {
                prefix: text("LORIS_LOGFILE_PREFIX")?,
                run_identifier: text("LORIS_RUN_IDENTIFIER")?,
                extension: text("LORIS_LOGFILE_EXTENSION")?,
            },
        })
    }
}
