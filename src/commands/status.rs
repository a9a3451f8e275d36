use anyhow::Result;
use tracing::{info, warn};

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::load_settings;
use crate::loris::SubjectTree;
use crate::status::{get_job_status, job_key, list_job_statuses};

pub fn run(global: &GlobalArgs, args: StatusArgs) -> Result<()> {
    let (_, settings) = load_settings(global)?;
    let status_dir = SubjectTree::new(&settings, &args.keyname).status_dir();

    info!(keyname = %args.keyname, path = %status_dir.display(), "status requested");

    if let Some(job) = &args.job {
        let job = job_key(job, args.scan_date.as_deref());
        match get_job_status(&status_dir, &job)? {
            Some(status) => println!("{job}\t{status}"),
            None => warn!(job = %job, "no status recorded"),
        }
        return Ok(());
    }

    let statuses = list_job_statuses(&status_dir)?;
    if statuses.is_empty() {
        warn!(path = %status_dir.display(), "no job statuses recorded");
    }
    for (job, status) in &statuses {
        println!("{job}\t{status}");
    }
    info!(jobs = statuses.len(), "status completed");
    Ok(())
}
