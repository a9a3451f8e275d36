use std::fmt;
use std::path::{Path, PathBuf};

use crate::civet::{CivetScan, FileLookup, Resolved, SurfaceLookup};
use crate::error::BuildError;
use crate::model::{Modality, ScanContext};
use crate::settings::PipelineSettings;

mod anatomical;
mod subject;
mod tracer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub verbose: bool,
    pub debug: bool,
    pub settings_file: PathBuf,
    /// Verify Civet inputs exist before handing them to a stage.
    pub check_inputs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn render(&self) -> String {
        let mut tokens = Vec::with_capacity(self.args.len() + 1);
        tokens.push(self.program.as_str());
        tokens.extend(self.args.iter().map(String::as_str));
        tokens.join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub(crate) struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    pub(crate) fn new(program: &str, options: &RunOptions) -> Self {
        let mut args = Vec::new();
        if options.verbose {
            args.push("-v".to_string());
        }
        if options.debug {
            args.push("-d".to_string());
        }
        Self {
            program: program.to_string(),
            args,
        }
    }

    pub(crate) fn flag(mut self, name: &str, value: &str) -> Self {
        self.args.push(name.to_string());
        self.args.push(value.to_string());
        self
    }

    pub(crate) fn path_flag(self, name: &str, path: &Path) -> Self {
        self.flag(name, &path.display().to_string())
    }

    pub(crate) fn switch(mut self, name: &str) -> Self {
        self.args.push(name.to_string());
        self
    }

    /// `--name=<path>` as a single token.
    pub(crate) fn assign(mut self, name: &str, path: &Path) -> Self {
        self.args.push(format!("{name}={}", path.display()));
        self
    }

    pub(crate) fn positional(mut self, path: &Path) -> Self {
        self.args.push(path.display().to_string());
        self
    }

    pub(crate) fn settings_file(self, options: &RunOptions) -> Self {
        self.path_flag("--settingsFile", &options.settings_file)
    }

    pub(crate) fn build(self) -> CommandSpec {
        CommandSpec {
            program: self.program,
            args: self.args,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Stage {
    RunInitialization,
    SummaryReport,
    AnatomicalInitialization,
    LabelsFitAal,
    MasksGenerateFromLabels,
    VbmComputeIndividVbm,
    VbmQuantification,
    VbmVolumetricVisualization,
    ThicknessComputeZscores,
    ThicknessExtractSurfaceLabels,
    ThicknessComputeRoiStatistics,
    ThicknessSurfaceVisualization,
    PibInitialization,
    PibConvertEcat2mnc,
    PibPreprocess,
    PibGenerateMasks,
    PibPreprocessVerification,
    PibComputeRatios,
    PibComputeSuvr,
    PibVolumetricVisualization,
    PibSurfaceVisualization,
    FdgInitialization,
    FdgConvertNative2mnc,
    FdgPreprocess,
    FdgPreprocessVerification,
    FdgComputeRatios,
    FdgComputeSuvr,
    FdgVolumetricVisualization,
    FdgSurfaceVisualization,
}

const ANATOMICAL_STAGES: [Stage; 10] = [
    Stage::AnatomicalInitialization,
    Stage::LabelsFitAal,
    Stage::MasksGenerateFromLabels,
    Stage::VbmComputeIndividVbm,
    Stage::VbmQuantification,
    Stage::VbmVolumetricVisualization,
    Stage::ThicknessComputeZscores,
    Stage::ThicknessExtractSurfaceLabels,
    Stage::ThicknessComputeRoiStatistics,
    Stage::ThicknessSurfaceVisualization,
];

const PIB_STAGES: [Stage; 9] = [
    Stage::PibInitialization,
    Stage::PibConvertEcat2mnc,
    Stage::PibPreprocess,
    Stage::PibGenerateMasks,
    Stage::PibPreprocessVerification,
    Stage::PibComputeRatios,
    Stage::PibComputeSuvr,
    Stage::PibVolumetricVisualization,
    Stage::PibSurfaceVisualization,
];

const FDG_STAGES: [Stage; 8] = [
    Stage::FdgInitialization,
    Stage::FdgConvertNative2mnc,
    Stage::FdgPreprocess,
    Stage::FdgPreprocessVerification,
    Stage::FdgComputeRatios,
    Stage::FdgComputeSuvr,
    Stage::FdgVolumetricVisualization,
    Stage::FdgSurfaceVisualization,
];

impl Stage {
    pub fn program(self) -> &'static str {
        match self {
            Self::RunInitialization => "beagle_run_initialization",
            Self::SummaryReport => "beagle_make_summary_report",
            Self::AnatomicalInitialization => "beagle_anatomical_initialization",
            Self::LabelsFitAal => "beagle_labels_fit_AAL",
            Self::MasksGenerateFromLabels => "beagle_masks_generate_from_labels",
            Self::VbmComputeIndividVbm => "beagle_vbm_compute_individ_VBM.Rscript",
            Self::VbmQuantification => "beagle_vbm_quantification.Rscript",
            Self::VbmVolumetricVisualization => "beagle_vbm_volumetric_visualization",
            Self::ThicknessComputeZscores => "beagle_thickness_compute_zscores",
            Self::ThicknessExtractSurfaceLabels => "beagle_thickness_extract_surface_labels",
            Self::ThicknessComputeRoiStatistics => {
                "beagle_thickness_compute_roi_statistics.Rscript"
            }
            Self::ThicknessSurfaceVisualization => "beagle_thickness_surface_visualization",
            Self::PibInitialization => "beagle_pib_initialization",
            Self::PibConvertEcat2mnc => "beagle_pib_convert_ecat2mnc",
            Self::PibPreprocess => "beagle_pib_preprocess",
            Self::PibGenerateMasks => "beagle_pib_generate_masks",
            Self::PibPreprocessVerification => "beagle_pib_preprocess_verification",
            Self::PibComputeRatios => "beagle_pib_compute_ratios.Rscript",
            Self::PibComputeSuvr => "beagle_pib_compute_SUVR.Rscript",
            Self::PibVolumetricVisualization => "beagle_pib_volumetric_visualization",
            Self::PibSurfaceVisualization => "beagle_pib_surface_visualization",
            Self::FdgInitialization => "beagle_fdg_initialization",
            Self::FdgConvertNative2mnc => "beagle_fdg_convert_native2mnc",
            Self::FdgPreprocess => "beagle_fdg_preprocess",
            Self::FdgPreprocessVerification => "beagle_fdg_preprocess_verification",
            Self::FdgComputeRatios => "beagle_fdg_compute_ratios.Rscript",
            Self::FdgComputeSuvr => "beagle_fdg_compute_SUVR.Rscript",
            Self::FdgVolumetricVisualization => "beagle_fdg_volumetric_visualization",
            Self::FdgSurfaceVisualization => "beagle_fdg_surface_visualization",
        }
    }

    /// Program name without the interpreter extension.
    pub fn job_name(self) -> &'static str {
        let program = self.program();
        program.strip_suffix(".Rscript").unwrap_or(program)
    }

    /// `None` for stages that run once per subject rather than per scan.
    pub fn modality(self) -> Option<Modality> {
        match self {
            Self::RunInitialization | Self::SummaryReport => None,
            Self::AnatomicalInitialization
            | Self::LabelsFitAal
            | Self::MasksGenerateFromLabels
            | Self::VbmComputeIndividVbm
            | Self::VbmQuantification
            | Self::VbmVolumetricVisualization
            | Self::ThicknessComputeZscores
            | Self::ThicknessExtractSurfaceLabels
            | Self::ThicknessComputeRoiStatistics
            | Self::ThicknessSurfaceVisualization => Some(Modality::Anatomical),
            Self::PibInitialization
            | Self::PibConvertEcat2mnc
            | Self::PibPreprocess
            | Self::PibGenerateMasks
            | Self::PibPreprocessVerification
            | Self::PibComputeRatios
            | Self::PibComputeSuvr
            | Self::PibVolumetricVisualization
            | Self::PibSurfaceVisualization => Some(Modality::Pib),
            Self::FdgInitialization
            | Self::FdgConvertNative2mnc
            | Self::FdgPreprocess
            | Self::FdgPreprocessVerification
            | Self::FdgComputeRatios
            | Self::FdgComputeSuvr
            | Self::FdgVolumetricVisualization
            | Self::FdgSurfaceVisualization => Some(Modality::Fdg),
        }
    }

    pub fn sequence(modality: Modality) -> &'static [Stage] {
        match modality {
            Modality::Anatomical => &ANATOMICAL_STAGES,
            Modality::Pib => &PIB_STAGES,
            Modality::Fdg => &FDG_STAGES,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.job_name())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Subject(&'a str),
    Scan(&'a ScanContext),
}

impl Target<'_> {
    pub fn keyname(&self) -> &str {
        match self {
            Self::Subject(keyname) => keyname,
            Self::Scan(scan) => &scan.keyname,
        }
    }
}

pub(crate) struct BuildContext<'a> {
    pub(crate) stage: Stage,
    pub(crate) options: &'a RunOptions,
    pub(crate) settings: &'a PipelineSettings,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn command(&self) -> CommandBuilder {
        CommandBuilder::new(self.stage.program(), self.options)
    }

    pub(crate) fn civet<'s>(&'s self, scan: &'s ScanContext) -> CivetScan<'s> {
        CivetScan::from_context(&self.settings.civet, scan)
    }

    pub(crate) fn file_lookup(&self) -> FileLookup {
        if self.options.check_inputs {
            FileLookup::checked()
        } else {
            FileLookup::unchecked()
        }
    }

    pub(crate) fn resampled_lookup(&self) -> SurfaceLookup {
        SurfaceLookup {
            file: self.file_lookup(),
            resampled: true,
        }
    }

    /// Turns a missing Civet input into a build failure for this stage.
    pub(crate) fn require<T>(&self, resolved: Resolved<T>) -> Result<T, BuildError> {
        resolved.map_err(|source| BuildError::MissingInput {
            stage: self.stage.program(),
            source,
        })
    }
}

pub fn build(
    stage: Stage,
    target: Target<'_>,
    options: &RunOptions,
    settings: &PipelineSettings,
) -> Result<CommandSpec, BuildError> {
    let ctx = BuildContext {
        stage,
        options,
        settings,
    };

    match (stage.modality(), target) {
        (None, Target::Subject(keyname)) => Ok(subject::build(&ctx, keyname)),
        (Some(modality), Target::Scan(scan)) if modality == scan.modality => match modality {
            Modality::Anatomical => anatomical::build(&ctx, scan),
            Modality::Pib | Modality::Fdg => tracer::build(&ctx, scan),
        },
        (_, Target::Subject(_)) => Err(BuildError::WrongModality {
            stage: stage.program(),
            modality: "subject-level",
        }),
        (_, Target::Scan(scan)) => Err(BuildError::WrongModality {
            stage: stage.program(),
            modality: scan.modality.as_str(),
        }),
    }
}
