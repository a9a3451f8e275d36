use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::error::{PathNotFound, TargetKind};
use crate::model::ScanContext;
use crate::settings::CivetSettings;

/// Civet releases whose output layout has been checked against these accessors.
pub const TESTED_VERSIONS: [&str; 3] = ["1.1.7", "1.1.9", "1.1.11"];

/// Last release that wrote `_classify.mnc` instead of `_pve_classify.mnc`.
const LEGACY_CLASSIFY_VERSION: &str = "1.1.9";

const SURFACE_VERTICES: &str = "81920";

pub type Resolved<T = PathBuf> = Result<T, PathNotFound>;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Existence {
    Check,
    Skip,
}

impl Existence {
    pub fn from_flag(check: bool) -> Self {
        if check { Self::Check } else { Self::Skip }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FileLookup {
    pub fullpath: bool,
    pub existence: Existence,
}

impl FileLookup {
    pub fn checked() -> Self {
        Self {
            fullpath: true,
            existence: Existence::Check,
        }
    }

    pub fn unchecked() -> Self {
        Self {
            fullpath: true,
            existence: Existence::Skip,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SurfaceLookup {
    pub file: FileLookup,
    pub resampled: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TransformLookup {
    pub file: FileLookup,
    pub inverted: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Hemispheres {
    pub left: PathBuf,
    pub right: PathBuf,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NonlinearTransform {
    pub xfm: PathBuf,
    pub grid: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CivetSubdir {
    Classify,
    Final,
    Logs,
    Mask,
    Native,
    Surfaces,
    Thickness,
    Transforms,
    TransformsLinear,
    TransformsNonlinear,
    Vbm,
    Verify,
}

impl CivetSubdir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::Final => "final",
            Self::Logs => "logs",
            Self::Mask => "mask",
            Self::Native => "native",
            Self::Surfaces => "surfaces",
            Self::Thickness => "thickness",
            Self::Transforms => "transforms",
            Self::TransformsLinear => "transforms/linear",
            Self::TransformsNonlinear => "transforms/nonlinear",
            Self::Vbm => "VBM",
            Self::Verify => "verify",
        }
    }

    fn join_onto(self, base: &Path) -> PathBuf {
        self.as_str()
            .split('/')
            .fold(base.to_path_buf(), |path, part| path.join(part))
    }
}

/// Civet names a scan directory after the keyname, optionally suffixed with the scan id.
pub fn scan_dirname(keyname: &str, scan_id: &str, append_scan_id: bool) -> String {
    if append_scan_id {
        format!("{keyname}-{scan_id}")
    } else {
        keyname.to_string()
    }
}

pub fn check_version(version: &str) -> Option<String> {
    if TESTED_VERSIONS.contains(&version) {
        return None;
    }
    Some(format!(
        "accessors have not been tested with Civet version {version}; use at your own risk"
    ))
}

pub fn classify_suffix(version: &str) -> &'static str {
    if version == LEGACY_CLASSIFY_VERSION {
        "_classify.mnc"
    } else {
        "_pve_classify.mnc"
    }
}

pub fn root_dir(settings: &CivetSettings, existence: Existence) -> Resolved {
    verify(settings.root_dir.clone(), TargetKind::Directory, existence)
}

fn verify(path: PathBuf, kind: TargetKind, existence: Existence) -> Resolved {
    if existence == Existence::Check {
        let exists = path.exists();
        debug!(path = %path.display(), exists, "checked civet {kind}");
        if !exists {
            error!(path = %path.display(), "required civet {kind} does not exist");
            return Err(PathNotFound { kind, path });
        }
    }
    Ok(path)
}

fn advise_version(version: &str) {
    if let Some(advisory) = check_version(version) {
        warn!(civet_version = version, "{advisory}");
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CivetScan<'a> {
    settings: &'a CivetSettings,
    keyname: &'a str,
    scan_id: &'a str,
}

impl<'a> CivetScan<'a> {
    pub fn new(settings: &'a CivetSettings, keyname: &'a str, scan_id: &'a str) -> Self {
        Self {
            settings,
            keyname,
            scan_id,
        }
    }

    pub fn from_context(settings: &'a CivetSettings, scan: &'a ScanContext) -> Self {
        Self::new(settings, &scan.keyname, &scan.civet_scan_id)
    }

    pub fn dirname(&self) -> String {
        scan_dirname(self.keyname, self.scan_id, self.settings.append_scan_id)
    }

    pub fn scan_dir(&self, existence: Existence) -> Resolved {
        let path = self.settings.root_dir.join(self.dirname());
        verify(path, TargetKind::Directory, existence)
    }

    pub fn file(&self, subdir: CivetSubdir, suffix: &str, lookup: FileLookup) -> Resolved {
        advise_version(&self.settings.version);

        let dirname = self.dirname();
        let filename = format!("{}_{}{}", self.settings.prefix, dirname, suffix);
        let fullpath = subdir
            .join_onto(&self.settings.root_dir.join(&dirname))
            .join(&filename);

        let fullpath = verify(fullpath, TargetKind::File, lookup.existence)?;
        Ok(if lookup.fullpath {
            fullpath
        } else {
            PathBuf::from(filename)
        })
    }

    pub fn dir(&self, subdir: CivetSubdir, existence: Existence) -> Resolved {
        advise_version(&self.settings.version);

        let path = subdir.join_onto(&self.settings.root_dir.join(self.dirname()));
        verify(path, TargetKind::Directory, existence)
    }

    fn hemispheres(
        &self,
        subdir: CivetSubdir,
        stem: &str,
        tail: impl Fn(&str) -> String,
        lookup: SurfaceLookup,
    ) -> Resolved<Hemispheres> {
        let rsl = if lookup.resampled { "_rsl" } else { "" };
        let left = self.file(subdir, &format!("{stem}{rsl}{}", tail("left")), lookup.file)?;
        let right = self.file(subdir, &format!("{stem}{rsl}{}", tail("right")), lookup.file)?;
        Ok(Hemispheres { left, right })
    }

    pub fn classify(&self, lookup: FileLookup) -> Resolved {
        let suffix = classify_suffix(&self.settings.version);
        self.file(CivetSubdir::Classify, suffix, lookup)
    }

    pub fn gray_matter_pve(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Classify, "_pve_gm.mnc", lookup)
    }

    pub fn white_matter_pve(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Classify, "_pve_wm.mnc", lookup)
    }

    pub fn csf_pve(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Classify, "_pve_csf.mnc", lookup)
    }

    pub fn stx_t1(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Final, "_t1_final.mnc", lookup)
    }

    /// Excludes the cerebellum.
    pub fn cerebrum_mask(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Mask, "_brain_mask.mnc", lookup)
    }

    /// Includes the cerebellum.
    pub fn skull_mask(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Mask, "_skull_mask.mnc", lookup)
    }

    pub fn skull_mask_native(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Mask, "_skull_mask_native.mnc", lookup)
    }

    pub fn native_t1(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Native, "_t1.mnc", lookup)
    }

    pub fn native_t1_nuc(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::Native, "_t1_nuc.mnc", lookup)
    }

    pub fn gray_matter_surfaces(&self, lookup: SurfaceLookup) -> Resolved<Hemispheres> {
        self.hemispheres(
            CivetSubdir::Surfaces,
            "_gray_surface",
            |side| format!("_{side}_{SURFACE_VERTICES}.obj"),
            lookup,
        )
    }

    pub fn white_matter_surfaces(&self, lookup: SurfaceLookup) -> Resolved<Hemispheres> {
        self.hemispheres(
            CivetSubdir::Surfaces,
            "_white_surface",
            |side| format!("_{side}_calibrated_{SURFACE_VERTICES}.obj"),
            lookup,
        )
    }

    pub fn mid_surfaces(&self, lookup: SurfaceLookup) -> Resolved<Hemispheres> {
        self.hemispheres(
            CivetSubdir::Surfaces,
            "_mid_surface",
            |side| format!("_{side}_{SURFACE_VERTICES}.obj"),
            lookup,
        )
    }

    pub fn cortical_thickness(&self, lookup: SurfaceLookup) -> Resolved<Hemispheres> {
        self.hemispheres(
            CivetSubdir::Thickness,
            "_native_rms",
            |side| format!("_tlink_20mm_{side}.txt"),
            lookup,
        )
    }

    /// Civet releases after 1.1.9 stopped writing these vectors.
    pub fn mean_curvature(&self, lookup: SurfaceLookup) -> Resolved<Hemispheres> {
        self.hemispheres(
            CivetSubdir::Thickness,
            "_native_mc",
            |side| format!("_20mm_{side}.txt"),
            lookup,
        )
    }

    pub fn linear_transform(&self, lookup: FileLookup) -> Resolved {
        self.file(CivetSubdir::TransformsLinear, "_t1_tal.xfm", lookup)
    }

    pub fn nonlinear_transform(&self, lookup: TransformLookup) -> Resolved<NonlinearTransform> {
        let (xfm_suffix, grid_suffix) = if lookup.inverted {
            ("_nlfit_invert.xfm", "_nlfit_invert_grid_0.mnc")
        } else {
            ("_nlfit_It.xfm", "_nlfit_It_grid_0.mnc")
        };

        let xfm = self.file(CivetSubdir::TransformsNonlinear, xfm_suffix, lookup.file)?;
        let grid = self.file(CivetSubdir::TransformsNonlinear, grid_suffix, lookup.file)?;
        Ok(NonlinearTransform { xfm, grid })
    }

    pub fn classify_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Classify, existence)
    }

    pub fn final_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Final, existence)
    }

    pub fn logs_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Logs, existence)
    }

    pub fn mask_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Mask, existence)
    }

    pub fn native_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Native, existence)
    }

    pub fn surfaces_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Surfaces, existence)
    }

    pub fn thickness_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Thickness, existence)
    }

    pub fn transforms_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Transforms, existence)
    }

    pub fn transforms_linear_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::TransformsLinear, existence)
    }

    pub fn transforms_nonlinear_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::TransformsNonlinear, existence)
    }

    pub fn vbm_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Vbm, existence)
    }

    pub fn verify_dir(&self, existence: Existence) -> Resolved {
        self.dir(CivetSubdir::Verify, existence)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn settings(root: &Path, version: &str, append_scan_id: bool) -> CivetSettings {
        CivetSettings {
            root_dir: root.to_path_buf(),
            prefix: "sub".to_string(),
            version: version.to_string(),
            append_scan_id,
        }
    }

    fn surfaces(resampled: bool) -> SurfaceLookup {
        SurfaceLookup {
            file: FileLookup::unchecked(),
            resampled,
        }
    }

    #[test]
    fn scan_dirname_follows_append_switch() {
        assert_eq!(scan_dirname("s001", "20200101", true), "s001-20200101");
        assert_eq!(scan_dirname("s001", "20200101", false), "s001");
    }

    #[test]
    fn generic_file_joins_root_dirname_subdir_and_prefixed_name() {
        let civet = settings(Path::new("/data/civet"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "s001", "20200101");

        let path = scan
            .file(CivetSubdir::Final, "_t1_final.mnc", FileLookup::unchecked())
            .expect("unchecked lookups always resolve");
        assert_eq!(
            path,
            PathBuf::from("/data/civet/s001/final/sub_s001_t1_final.mnc")
        );
    }

    #[test]
    fn appended_scan_id_changes_both_directory_and_filename() {
        let civet = settings(Path::new("/data/civet"), "1.1.11", true);
        let scan = CivetScan::new(&civet, "s001", "20200101");

        let path = scan.linear_transform(FileLookup::unchecked()).unwrap();
        assert_eq!(
            path,
            PathBuf::from(
                "/data/civet/s001-20200101/transforms/linear/sub_s001-20200101_t1_tal.xfm"
            )
        );
    }

    #[test]
    fn classify_volume_uses_pve_infix_after_rename() {
        let civet = settings(Path::new("/data/civet"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "s001", "20200101");

        let path = scan.classify(FileLookup::unchecked()).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/data/civet/s001/classify/sub_s001_pve_classify.mnc")
        );
    }

    #[test]
    fn classify_volume_drops_pve_infix_for_legacy_version() {
        let civet = settings(Path::new("/data/civet"), "1.1.9", false);
        let scan = CivetScan::new(&civet, "s001", "20200101");

        let path = scan.classify(FileLookup::unchecked()).unwrap();
        let name = path.to_string_lossy();
        assert!(name.ends_with("_classify.mnc"));
        assert!(!name.contains("_pve"));
    }

    #[test]
    fn classify_suffix_branches_on_exact_version() {
        assert_eq!(classify_suffix("1.1.9"), "_classify.mnc");
        assert_eq!(classify_suffix("1.1.7"), "_pve_classify.mnc");
        assert_eq!(classify_suffix("1.1.11"), "_pve_classify.mnc");
    }

    #[test]
    fn check_version_only_advises_untested_versions() {
        assert!(check_version("1.1.11").is_none());
        assert!(check_version("2.1.0").unwrap().contains("2.1.0"));
    }

    #[test]
    fn resampled_thickness_pair_carries_rsl_infix() {
        let civet = settings(Path::new("/data/civet"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "s001", "20200101");

        let pair = scan.cortical_thickness(surfaces(true)).unwrap();
        let left = pair.left.to_string_lossy().into_owned();
        let right = pair.right.to_string_lossy().into_owned();
        assert!(left.contains("_rsl_"));
        assert!(right.contains("_rsl_"));
        assert!(left.ends_with("_tlink_20mm_left.txt"));
        assert!(right.ends_with("_tlink_20mm_right.txt"));
    }

    #[test]
    fn surface_pairs_use_their_own_tails() {
        let civet = settings(Path::new("/c"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "k", "s");

        let white = scan.white_matter_surfaces(surfaces(false)).unwrap();
        assert_eq!(
            white.left,
            PathBuf::from("/c/k/surfaces/sub_k_white_surface_left_calibrated_81920.obj")
        );

        let gray = scan.gray_matter_surfaces(surfaces(true)).unwrap();
        assert_eq!(
            gray.right,
            PathBuf::from("/c/k/surfaces/sub_k_gray_surface_rsl_right_81920.obj")
        );

        let curvature = scan.mean_curvature(surfaces(false)).unwrap();
        assert_eq!(
            curvature.left,
            PathBuf::from("/c/k/thickness/sub_k_native_mc_20mm_left.txt")
        );
    }

    #[test]
    fn nonlinear_transform_switches_on_inverted() {
        let civet = settings(Path::new("/c"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "k", "s");

        let forward = scan
            .nonlinear_transform(TransformLookup {
                file: FileLookup::unchecked(),
                inverted: false,
            })
            .unwrap();
        assert!(forward.xfm.ends_with("sub_k_nlfit_It.xfm"));
        assert!(forward.grid.ends_with("sub_k_nlfit_It_grid_0.mnc"));

        let inverted = scan
            .nonlinear_transform(TransformLookup {
                file: FileLookup::unchecked(),
                inverted: true,
            })
            .unwrap();
        assert!(inverted.xfm.ends_with("sub_k_nlfit_invert.xfm"));
        assert!(inverted.grid.ends_with("sub_k_nlfit_invert_grid_0.mnc"));
    }

    #[test]
    fn filename_only_lookup_returns_bare_name() {
        let civet = settings(Path::new("/c"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "k", "s");

        let name = scan
            .stx_t1(FileLookup {
                fullpath: false,
                existence: Existence::Skip,
            })
            .unwrap();
        assert_eq!(name, PathBuf::from("sub_k_t1_final.mnc"));
    }

    #[test]
    fn checked_lookup_reports_missing_and_finds_present_files() {
        let root = tempfile::tempdir().expect("tempdir");
        let civet = settings(root.path(), "1.1.11", false);
        let scan = CivetScan::new(&civet, "s001", "20200101");

        let missing = scan.gray_matter_pve(FileLookup::checked());
        let err = missing.expect_err("file has not been created yet");
        assert_eq!(err.kind, TargetKind::File);
        assert!(err.path.ends_with("classify/sub_s001_pve_gm.mnc"));

        let classify_dir = root.path().join("s001").join("classify");
        fs::create_dir_all(&classify_dir).unwrap();
        fs::write(classify_dir.join("sub_s001_pve_gm.mnc"), b"").unwrap();

        let found = scan.gray_matter_pve(FileLookup::checked()).unwrap();
        assert_eq!(found, classify_dir.join("sub_s001_pve_gm.mnc"));
    }

    #[test]
    fn checked_pair_fails_when_one_hemisphere_is_missing() {
        let root = tempfile::tempdir().expect("tempdir");
        let civet = settings(root.path(), "1.1.11", false);
        let scan = CivetScan::new(&civet, "k", "s");

        let surfaces_dir = root.path().join("k").join("surfaces");
        fs::create_dir_all(&surfaces_dir).unwrap();
        fs::write(surfaces_dir.join("sub_k_mid_surface_left_81920.obj"), b"").unwrap();

        let err = scan
            .mid_surfaces(SurfaceLookup {
                file: FileLookup::checked(),
                resampled: false,
            })
            .expect_err("right hemisphere is absent");
        assert!(err.path.ends_with("sub_k_mid_surface_right_81920.obj"));
    }

    #[test]
    fn directory_accessors_share_the_naming_rule() {
        let root = tempfile::tempdir().expect("tempdir");
        let civet = settings(root.path(), "1.1.11", true);
        let scan = CivetScan::new(&civet, "k", "s");

        assert_eq!(
            scan.transforms_nonlinear_dir(Existence::Skip).unwrap(),
            root.path().join("k-s").join("transforms").join("nonlinear")
        );
        assert_eq!(
            scan.vbm_dir(Existence::Skip).unwrap(),
            root.path().join("k-s").join("VBM")
        );

        let err = scan.verify_dir(Existence::Check).unwrap_err();
        assert_eq!(err.kind, TargetKind::Directory);

        fs::create_dir_all(root.path().join("k-s").join("verify")).unwrap();
        assert!(scan.verify_dir(Existence::Check).is_ok());
        assert!(scan.scan_dir(Existence::Check).is_ok());
        assert!(root_dir(&civet, Existence::Check).is_ok());
    }

    #[test]
    fn every_volume_accessor_resolves_its_full_path() {
        let civet = settings(Path::new("/c"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "k", "s");
        let lookup = FileLookup::unchecked();

        let cases = [
            (scan.classify(lookup), "classify/sub_k_pve_classify.mnc"),
            (scan.gray_matter_pve(lookup), "classify/sub_k_pve_gm.mnc"),
            (scan.white_matter_pve(lookup), "classify/sub_k_pve_wm.mnc"),
            (scan.csf_pve(lookup), "classify/sub_k_pve_csf.mnc"),
            (scan.stx_t1(lookup), "final/sub_k_t1_final.mnc"),
            (scan.cerebrum_mask(lookup), "mask/sub_k_brain_mask.mnc"),
            (scan.skull_mask(lookup), "mask/sub_k_skull_mask.mnc"),
            (scan.skull_mask_native(lookup), "mask/sub_k_skull_mask_native.mnc"),
            (scan.native_t1(lookup), "native/sub_k_t1.mnc"),
            (scan.native_t1_nuc(lookup), "native/sub_k_t1_nuc.mnc"),
            (scan.linear_transform(lookup), "transforms/linear/sub_k_t1_tal.xfm"),
        ];

        for (resolved, expected) in cases {
            assert_eq!(resolved.unwrap(), Path::new("/c/k").join(expected));
        }
    }

    #[test]
    fn every_hemisphere_accessor_resolves_both_sides() {
        let civet = settings(Path::new("/c"), "1.1.11", false);
        let scan = CivetScan::new(&civet, "k", "s");

        let cases = [
            (
                scan.gray_matter_surfaces(surfaces(false)),
                "surfaces/sub_k_gray_surface_left_81920.obj",
                "surfaces/sub_k_gray_surface_right_81920.obj",
            ),
            (
                scan.white_matter_surfaces(surfaces(true)),
                "surfaces/sub_k_white_surface_rsl_left_calibrated_81920.obj",
                "surfaces/sub_k_white_surface_rsl_right_calibrated_81920.obj",
            ),
            (
                scan.mid_surfaces(surfaces(false)),
                "surfaces/sub_k_mid_surface_left_81920.obj",
                "surfaces/sub_k_mid_surface_right_81920.obj",
            ),
            (
                scan.mid_surfaces(surfaces(true)),
                "surfaces/sub_k_mid_surface_rsl_left_81920.obj",
                "surfaces/sub_k_mid_surface_rsl_right_81920.obj",
            ),
            (
                scan.cortical_thickness(surfaces(false)),
                "thickness/sub_k_native_rms_tlink_20mm_left.txt",
                "thickness/sub_k_native_rms_tlink_20mm_right.txt",
            ),
            (
                scan.mean_curvature(surfaces(true)),
                "thickness/sub_k_native_mc_rsl_20mm_left.txt",
                "thickness/sub_k_native_mc_rsl_20mm_right.txt",
            ),
        ];

        for (resolved, left, right) in cases {
            let pair = resolved.unwrap();
            assert_eq!(pair.left, Path::new("/c/k").join(left));
            assert_eq!(pair.right, Path::new("/c/k").join(right));
        }
    }

    #[test]
    fn every_directory_accessor_resolves_its_subdirectory() {
        let civet = settings(Path::new("/c"), "1.1.11", true);
        let scan = CivetScan::new(&civet, "k", "s");
        let skip = Existence::Skip;

        let cases = [
            (scan.classify_dir(skip), "classify"),
            (scan.final_dir(skip), "final"),
            (scan.logs_dir(skip), "logs"),
            (scan.mask_dir(skip), "mask"),
            (scan.native_dir(skip), "native"),
            (scan.surfaces_dir(skip), "surfaces"),
            (scan.thickness_dir(skip), "thickness"),
            (scan.transforms_dir(skip), "transforms"),
            (scan.transforms_linear_dir(skip), "transforms/linear"),
            (scan.transforms_nonlinear_dir(skip), "transforms/nonlinear"),
            (scan.vbm_dir(skip), "VBM"),
            (scan.verify_dir(skip), "verify"),
        ];

        for (resolved, expected) in cases {
            assert_eq!(resolved.unwrap(), Path::new("/c/k-s").join(expected));
        }
    }
}
