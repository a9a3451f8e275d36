use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

pub const RUNNING: &str = "running";
pub const FINISHED: &str = "finished";
pub const FAILED: &str = "failed";

/// Sentinel job name for a stage run. Scan-level runs carry the scan date as
/// `<job>-<scan_date>` so each scan of a subject is tracked on its own.
pub fn job_key(job: &str, scan_date: Option<&str>) -> String {
    match scan_date {
        Some(date) => format!("{job}-{date}"),
        None => job.to_string(),
    }
}

fn ensure_status_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        bail!("status directory does not exist: {}", dir.display());
    }
    Ok(())
}

/// All `<job>.<status>` sentinels for `job`, sorted by file name.
fn sentinels(dir: &Path, job: &str) -> Result<Vec<(String, String)>> {
    ensure_status_dir(dir)?;

    let prefix = format!("{job}.");
    let mut found = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(status) = name.strip_prefix(&prefix) {
            // `<job>.<status>` only; a longer job name sharing the prefix is not ours.
            if !status.is_empty() && !status.contains('.') {
                found.push((name.clone(), status.to_string()));
            }
        }
    }
    found.sort();
    Ok(found)
}

pub fn get_job_status(dir: &Path, job: &str) -> Result<Option<String>> {
    Ok(sentinels(dir, job)?
        .into_iter()
        .next()
        .map(|(_, status)| status))
}

pub fn set_job_status(dir: &Path, job: &str, status: &str) -> Result<()> {
    for (name, previous) in sentinels(dir, job)? {
        let path = dir.join(&name);
        debug!(job, previous = %previous, "removing previous status");
        fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    }

    let path = dir.join(format!("{job}.{status}"));
    fs::write(&path, b"").with_context(|| format!("failed to write {}", path.display()))?;
    debug!(job, status, "job status set");
    Ok(())
}

/// Every job with a sentinel in `dir`, as `(job, status)` pairs sorted by job.
pub fn list_job_statuses(dir: &Path) -> Result<Vec<(String, String)>> {
    ensure_status_dir(dir)?;

    let mut statuses = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some((job, status)) = name.rsplit_once('.') {
            statuses.push((job.to_string(), status.to_string()));
        }
    }
    statuses.sort();
    Ok(statuses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_status_replaces_the_previous_sentinel() {
        let dir = tempfile::tempdir().unwrap();

        set_job_status(dir.path(), "beagle_labels_fit_AAL", RUNNING).unwrap();
        set_job_status(dir.path(), "beagle_labels_fit_AAL", FINISHED).unwrap();

        assert!(!dir.path().join("beagle_labels_fit_AAL.running").exists());
        assert!(dir.path().join("beagle_labels_fit_AAL.finished").exists());
        assert_eq!(
            get_job_status(dir.path(), "beagle_labels_fit_AAL").unwrap(),
            Some(FINISHED.to_string())
        );
    }

    #[test]
    fn unknown_job_has_no_status() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(get_job_status(dir.path(), "beagle_pib_preprocess").unwrap(), None);
    }

    #[test]
    fn jobs_sharing_a_prefix_are_kept_apart() {
        let dir = tempfile::tempdir().unwrap();

        set_job_status(dir.path(), "beagle_pib_preprocess_verification", FAILED).unwrap();
        set_job_status(dir.path(), "beagle_pib_preprocess", FINISHED).unwrap();

        assert_eq!(
            get_job_status(dir.path(), "beagle_pib_preprocess_verification").unwrap(),
            Some(FAILED.to_string())
        );
        assert_eq!(
            list_job_statuses(dir.path()).unwrap(),
            vec![
                ("beagle_pib_preprocess".to_string(), FINISHED.to_string()),
                (
                    "beagle_pib_preprocess_verification".to_string(),
                    FAILED.to_string()
                ),
            ]
        );
    }

    #[test]
    fn scans_of_one_job_are_tracked_separately() {
        let dir = tempfile::tempdir().unwrap();
        let first = job_key("beagle_pib_preprocess", Some("20200301"));
        let second = job_key("beagle_pib_preprocess", Some("20210301"));

        set_job_status(dir.path(), &first, FINISHED).unwrap();

        assert_eq!(first, "beagle_pib_preprocess-20200301");
        assert!(dir.path().join("beagle_pib_preprocess-20200301.finished").exists());
        assert_eq!(get_job_status(dir.path(), &second).unwrap(), None);
        assert_eq!(get_job_status(dir.path(), "beagle_pib_preprocess").unwrap(), None);
        assert_eq!(job_key("beagle_run_initialization", None), "beagle_run_initialization");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("status");

        assert!(get_job_status(&missing, "beagle_run_initialization").is_err());
        assert!(set_job_status(&missing, "beagle_run_initialization", RUNNING).is_err());
    }
}
