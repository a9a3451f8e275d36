use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};

use crate::cli::{GlobalArgs, RunArgs, RunTarget};
use crate::commands::load_settings;
use crate::loris::SubjectTree;
use crate::model::{PipelineRunManifest, ScanContext, StageOutcome};
use crate::run_log::{LogScope, NULL_FIELD, RunLog};
use crate::runner::{RunnerOptions, run_command};
use crate::settings::PipelineSettings;
use crate::stages::{self, RunOptions, Stage, Target};
use crate::status::{FAILED, FINISHED, RUNNING, get_job_status, job_key, set_job_status};
use crate::subjects::{load_keynames, load_scans, select_by_keyname};
use crate::util::{ensure_directory, now_utc_string, write_json_pretty};

const MANIFEST_VERSION: u32 = 1;

pub fn run(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    let started_at = now_utc_string();
    let (store, settings) = load_settings(global)?;

    let options = RunOptions {
        verbose: global.verbose,
        debug: global.debug,
        settings_file: store.path().to_path_buf(),
        check_inputs: args.check_inputs,
    };
    let runner = RunnerOptions {
        fake: args.fake,
        output_log: args.output_log.clone(),
    };

    info!(
        run_target = args.target.as_str(),
        subject_list = %args.subject_list.display(),
        fake = args.fake,
        force = args.force,
        "pipeline run started"
    );

    let mut driver = Driver::new(&settings, options, runner, args.force);
    let result = match args.target {
        RunTarget::Init | RunTarget::Report => {
            let stage = if args.target == RunTarget::Init {
                Stage::RunInitialization
            } else {
                Stage::SummaryReport
            };
            load_keynames(&args.subject_list).and_then(|keynames| {
                let keynames: Vec<String> = keynames
                    .into_iter()
                    .filter(|keyname| args.keynames.is_empty() || args.keynames.contains(keyname))
                    .collect();
                driver.run_subjects(&keynames, stage)
            })
        }
        RunTarget::Anatomical | RunTarget::Pib | RunTarget::Fdg => {
            load_scans(&args.subject_list, args.target.list_kind(), &settings.civet).and_then(
                |scans| driver.run_scans(&select_by_keyname(scans, &args.keynames)),
            )
        }
    };

    let manifest = PipelineRunManifest {
        manifest_version: MANIFEST_VERSION,
        modality: args.target.as_str().to_string(),
        status: if result.is_ok() { "completed" } else { "failed" }.to_string(),
        started_at,
        updated_at: now_utc_string(),
        settings_path: store.path().display().to_string(),
        settings_sha256: store.sha256().map(ToOwned::to_owned),
        subject_list: args.subject_list.display().to_string(),
        fake: args.fake,
        stages: driver.into_outcomes(),
        failure_reason: result.as_ref().err().map(|err| format!("{err:#}")),
    };

    if let Some(path) = &args.manifest_path {
        write_json_pretty(path, &manifest)?;
        info!(path = %path.display(), "wrote run manifest");
    }

    result?;
    info!(stages = manifest.stages.len(), "pipeline run completed");
    Ok(())
}

/// Runs stages one at a time and halts on the first failure.
pub(crate) struct Driver<'a> {
    settings: &'a PipelineSettings,
    options: RunOptions,
    runner: RunnerOptions,
    force: bool,
    outcomes: Vec<StageOutcome>,
}

impl<'a> Driver<'a> {
    pub(crate) fn new(
        settings: &'a PipelineSettings,
        options: RunOptions,
        runner: RunnerOptions,
        force: bool,
    ) -> Self {
        Self {
            settings,
            options,
            runner,
            force,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn into_outcomes(self) -> Vec<StageOutcome> {
        self.outcomes
    }

    pub(crate) fn run_subjects(&mut self, keynames: &[String], stage: Stage) -> Result<()> {
        for keyname in keynames {
            self.run_stage(stage, Target::Subject(keyname))?;
        }
        Ok(())
    }

    pub(crate) fn run_scans(&mut self, scans: &[ScanContext]) -> Result<()> {
        for scan in scans {
            info!(
                keyname = %scan.keyname,
                modality = %scan.modality,
                scan_date = %scan.scan_date,
                "processing scan"
            );
            for stage in Stage::sequence(scan.modality) {
                self.run_stage(*stage, Target::Scan(scan))?;
            }
        }
        Ok(())
    }

    fn record(&mut self, stage: Stage, target: Target<'_>, command: String, status: &str) {
        let scan_date = match target {
            Target::Subject(_) => None,
            Target::Scan(scan) => Some(scan.scan_date.clone()),
        };
        self.outcomes.push(StageOutcome {
            job: stage.job_name().to_string(),
            keyname: target.keyname().to_string(),
            scan_date,
            command,
            status: status.to_string(),
        });
    }

    fn run_stage(&mut self, stage: Stage, target: Target<'_>) -> Result<()> {
        let keyname = target.keyname();
        let job = stage.job_name();

        if self.runner.fake {
            let spec = stages::build(stage, target, &self.options, self.settings)
                .with_context(|| format!("failed to build {job} for {keyname}"))?;
            run_command(&spec, &self.runner)?;
            self.record(stage, target, spec.render(), "faked");
            return Ok(());
        }

        let tree = SubjectTree::new(self.settings, keyname);
        let status_dir = tree.status_dir();
        ensure_directory(&status_dir)?;

        let (modality, scan_date) = match target {
            Target::Subject(_) => (NULL_FIELD, NULL_FIELD),
            Target::Scan(scan) => (scan.modality.log_label(), scan.scan_date.as_str()),
        };
        let status_job = match target {
            Target::Subject(_) => job_key(job, None),
            Target::Scan(scan) => job_key(job, Some(scan.scan_date.as_str())),
        };

        if !self.force && get_job_status(&status_dir, &status_job)?.as_deref() == Some(FINISHED) {
            info!(job = %status_job, keyname, "already finished, skipping");
            self.record(stage, target, String::new(), "skipped");
            return Ok(());
        }

        let scope = LogScope {
            progname: job,
            keyname,
            modality,
            scan_date,
        };
        let log_path = tree.log_file();

        let result = set_job_status(&status_dir, &status_job, RUNNING).and_then(|()| {
            // The init program erases the run log, so its start entry goes in afterwards.
            let erases_log = stage == Stage::RunInitialization;
            logged_run(&log_path, &scope, erases_log, || {
                let spec = stages::build(stage, target, &self.options, self.settings)?;
                run_command(&spec, &self.runner)?;
                Ok(spec.render())
            })
        });
        let result = result.and_then(|command| {
            set_job_status(&status_dir, &status_job, FINISHED)?;
            Ok(command)
        });

        match result {
            Ok(command) => {
                self.record(stage, target, command, FINISHED);
                Ok(())
            }
            Err(err) => {
                error!(job = %status_job, keyname, error = %err, "stage failed");
                if let Err(status_err) = set_job_status(&status_dir, &status_job, FAILED) {
                    warn!(job = %status_job, error = %status_err, "could not record failed status");
                }
                if let Err(log_err) = record_failure(&log_path, &scope, &err) {
                    warn!(job, error = %log_err, "could not record failure in run log");
                }
                self.record(stage, target, String::new(), FAILED);
                Err(err.context(format!("{job} failed for {keyname}")))
            }
        }
    }
}

/// Wraps one stage run in start and stop entries. The log is reopened around
/// the run so entries written by the stage program itself are kept.
fn logged_run<F>(log_path: &Path, scope: &LogScope<'_>, erases_log: bool, run: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    let started = Local::now();
    if !erases_log {
        let mut log = RunLog::open(log_path, false)?;
        log.log_start(scope, started);
        log.save()?;
    }

    let command = run()?;

    let mut log = RunLog::open(log_path, false)?;
    if erases_log {
        log.log_start(scope, started);
    }
    log.log_stop(scope, Local::now());
    log.save()?;
    Ok(command)
}

fn record_failure(log_path: &Path, scope: &LogScope<'_>, err: &anyhow::Error) -> Result<()> {
    let mut log = RunLog::open(log_path, false)?;
    log.log_message(scope, "failure", &format!("{err:#}"));
    log.save()
}
