use anyhow::Result;
use tracing::{debug, info, warn};

use crate::civet::check_version;
use crate::cli::{GlobalArgs, SettingsArgs};
use crate::commands::load_settings;

pub fn run(global: &GlobalArgs, args: SettingsArgs) -> Result<()> {
    let (store, settings) = load_settings(global)?;

    for (key, value) in store.iter() {
        debug!(key, value, "setting");
    }
    info!(
        loris_root = %settings.loris_root_dir.display(),
        civet_root = %settings.civet.root_dir.display(),
        civet_version = %settings.civet.version,
        append_scan_id = settings.civet.append_scan_id,
        log_file = %settings.log_file.filename(),
        "settings validated"
    );
    if let Some(advisory) = check_version(&settings.civet.version) {
        warn!(civet_version = %settings.civet.version, "{advisory}");
    }

    if let Some(path) = args.export {
        store.save_aggregated(&path)?;
        info!(path = %path.display(), "wrote aggregated settings");
    }

    Ok(())
}
