pub mod civet;
pub mod run;
pub mod settings;
pub mod status;
pub mod subjects;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::GlobalArgs;
use crate::settings::{PipelineSettings, SettingsStore, resolve_settings_path};

/// Loads the settings file named on the command line and validates every typed view.
pub(crate) fn load_settings(global: &GlobalArgs) -> Result<(SettingsStore, PipelineSettings)> {
    let path = resolve_settings_path(global.settings_file.as_deref())?;
    // A previously exported aggregate loads in place of the KEY=VALUE file.
    let loaded = if path.extension().is_some_and(|ext| ext == "json") {
        SettingsStore::load_aggregated(&path)
    } else {
        SettingsStore::load(&path)
    };
    let store =
        loaded.with_context(|| format!("failed to load settings from {}", path.display()))?;
    let settings = PipelineSettings::from_store(&store)
        .with_context(|| format!("incomplete settings in {}", path.display()))?;

    info!(
        path = %path.display(),
        entries = store.len(),
        sha256 = %store.sha256().unwrap_or_default(),
        "settings loaded"
    );
    Ok((store, settings))
}
