use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::subjects::SubjectListKind;

#[derive(Parser, Debug)]
#[command(
    name = "beagle",
    version,
    about = "Beagle PiB/FDG/anatomical pipeline driver over Civet outputs"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Pass `-v` through to every stage program.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Debug logging here and `-d` for every stage program.
    #[arg(short, long, global = true, default_value_t = false)]
    pub debug: bool,

    #[arg(long, global = true, env = "LORIS_SETTINGS_FILE")]
    pub settings_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Settings(SettingsArgs),
    Subjects(SubjectsArgs),
    Civet(CivetArgs),
    Run(RunArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Write the validated settings as one JSON object.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SubjectsArgs {
    pub path: PathBuf,

    #[arg(long, value_enum)]
    pub kind: SubjectListKind,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CivetArtifact {
    ScanDir,
    Classify,
    GrayMatterPve,
    WhiteMatterPve,
    CsfPve,
    StxT1,
    CerebrumMask,
    SkullMask,
    SkullMaskNative,
    NativeT1,
    NativeT1Nuc,
    GrayMatterSurfaces,
    WhiteMatterSurfaces,
    MidSurfaces,
    CorticalThickness,
    MeanCurvature,
    LinearTransform,
    NonlinearTransform,
    ClassifyDir,
    FinalDir,
    LogsDir,
    MaskDir,
    NativeDir,
    SurfacesDir,
    ThicknessDir,
    TransformsDir,
    TransformsLinearDir,
    TransformsNonlinearDir,
    VbmDir,
    VerifyDir,
}

#[derive(Args, Debug, Clone)]
pub struct CivetArgs {
    #[arg(long)]
    pub keyname: String,

    #[arg(long)]
    pub scan_id: String,

    #[arg(long, value_enum)]
    pub artifact: CivetArtifact,

    #[arg(long, default_value_t = false)]
    pub check_existence: bool,

    #[arg(long, default_value_t = false)]
    pub resampled: bool,

    #[arg(long, default_value_t = false)]
    pub inverted: bool,

    /// Print bare file names instead of full paths (files only).
    #[arg(long, default_value_t = false)]
    pub filename_only: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum RunTarget {
    Init,
    Anatomical,
    Pib,
    Fdg,
    Report,
}

impl RunTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Anatomical => "anatomical",
            Self::Pib => "pib",
            Self::Fdg => "fdg",
            Self::Report => "report",
        }
    }

    pub fn list_kind(self) -> SubjectListKind {
        match self {
            Self::Init | Self::Report => SubjectListKind::Keynames,
            Self::Anatomical => SubjectListKind::Civet,
            Self::Pib => SubjectListKind::Pib,
            Self::Fdg => SubjectListKind::Fdg,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_enum)]
    pub target: RunTarget,

    #[arg(long)]
    pub subject_list: PathBuf,

    /// Restrict the run to these keynames.
    #[arg(long = "keyname")]
    pub keynames: Vec<String>,

    #[arg(long, default_value_t = false)]
    pub fake: bool,

    /// Rerun stages already marked finished.
    #[arg(long, default_value_t = false)]
    pub force: bool,

    #[arg(long, default_value_t = false)]
    pub check_inputs: bool,

    /// Append stage program output to this file.
    #[arg(long)]
    pub output_log: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long)]
    pub keyname: String,

    #[arg(long)]
    pub job: Option<String>,

    /// Scan date of a per-scan job.
    #[arg(long, requires = "job")]
    pub scan_date: Option<String>,
}
