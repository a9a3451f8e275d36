use std::path::PathBuf;

use crate::settings::PipelineSettings;

pub const STATUS_DIRNAME: &str = "status";
pub const GRAY_MATTER_MASK_VOLUME: &str = "wholeBrain_gray_matter_mask.mnc";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputTree {
    Aal,
    Vbm,
    Thickness,
    Masks,
    Pib,
    Fdg,
}

impl OutputTree {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Aal => "AAL",
            Self::Vbm => "VBM",
            Self::Thickness => "THICKNESS",
            Self::Masks => "MASKS",
            Self::Pib => "PiB",
            Self::Fdg => "FDG",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SubjectTree<'a> {
    settings: &'a PipelineSettings,
    keyname: &'a str,
}

impl<'a> SubjectTree<'a> {
    pub fn new(settings: &'a PipelineSettings, keyname: &'a str) -> Self {
        Self { settings, keyname }
    }

    pub fn root(&self) -> PathBuf {
        self.settings.loris_root_dir.join(self.keyname)
    }

    /// `<root>/<keyname>/<TREE>-<date>`
    pub fn dated(&self, tree: OutputTree, date: &str) -> PathBuf {
        self.root().join(format!("{}-{}", tree.prefix(), date))
    }

    /// Input volume written by a tracer's native conversion stage.
    pub fn tracer_native_volume(&self, tree: OutputTree, date: &str) -> PathBuf {
        self.dated(tree, date)
            .join("native")
            .join(format!("{}.mnc", self.keyname))
    }

    /// File named `<keyname><suffix>` inside a dated subtree.
    pub fn keyed_file(&self, tree: OutputTree, date: &str, suffix: &str) -> PathBuf {
        self.dated(tree, date)
            .join(format!("{}{}", self.keyname, suffix))
    }

    pub fn aal_labels_volume(&self, date: &str) -> PathBuf {
        let suffix = format!("_t1_final_{}Labels.mnc", self.settings.aal_labels_version);
        self.keyed_file(OutputTree::Aal, date, &suffix)
    }

    pub fn aal_gm_masked_labels_volume(&self, date: &str) -> PathBuf {
        let suffix = format!(
            "_t1_final_{}Labels_gmMask.mnc",
            self.settings.aal_labels_version
        );
        self.keyed_file(OutputTree::Aal, date, &suffix)
    }

    pub fn gray_matter_mask(&self, date: &str) -> PathBuf {
        self.dated(OutputTree::Masks, date)
            .join(GRAY_MATTER_MASK_VOLUME)
    }

    pub fn status_dir(&self) -> PathBuf {
        self.root().join(STATUS_DIRNAME)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root().join(self.settings.log_file.filename())
    }
}
