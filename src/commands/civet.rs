use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::civet::{
    self, CivetScan, Existence, FileLookup, Hemispheres, Resolved, SurfaceLookup, TransformLookup,
};
use crate::cli::{CivetArgs, CivetArtifact, GlobalArgs};
use crate::commands::load_settings;

pub fn run(global: &GlobalArgs, args: CivetArgs) -> Result<()> {
    let (_, settings) = load_settings(global)?;
    let existence = Existence::from_flag(args.check_existence);
    civet::root_dir(&settings.civet, existence)?;

    let scan = CivetScan::new(&settings.civet, &args.keyname, &args.scan_id);
    let paths = resolve(&scan, &args, existence)?;

    info!(
        keyname = %args.keyname,
        scan_id = %args.scan_id,
        artifact = ?args.artifact,
        count = paths.len(),
        "resolved civet artifact"
    );
    for path in paths {
        println!("{}", path.display());
    }
    Ok(())
}

fn pair(hemispheres: Hemispheres) -> Vec<PathBuf> {
    vec![hemispheres.left, hemispheres.right]
}

fn resolve(scan: &CivetScan<'_>, args: &CivetArgs, existence: Existence) -> Resolved<Vec<PathBuf>> {
    let file = FileLookup {
        fullpath: !args.filename_only,
        existence,
    };
    let surface = SurfaceLookup {
        file,
        resampled: args.resampled,
    };

    let paths = match args.artifact {
        CivetArtifact::ScanDir => vec![scan.scan_dir(existence)?],
        CivetArtifact::Classify => vec![scan.classify(file)?],
        CivetArtifact::GrayMatterPve => vec![scan.gray_matter_pve(file)?],
        CivetArtifact::WhiteMatterPve => vec![scan.white_matter_pve(file)?],
        CivetArtifact::CsfPve => vec![scan.csf_pve(file)?],
        CivetArtifact::StxT1 => vec![scan.stx_t1(file)?],
        CivetArtifact::CerebrumMask => vec![scan.cerebrum_mask(file)?],
        CivetArtifact::SkullMask => vec![scan.skull_mask(file)?],
        CivetArtifact::SkullMaskNative => vec![scan.skull_mask_native(file)?],
        CivetArtifact::NativeT1 => vec![scan.native_t1(file)?],
        CivetArtifact::NativeT1Nuc => vec![scan.native_t1_nuc(file)?],
        CivetArtifact::GrayMatterSurfaces => pair(scan.gray_matter_surfaces(surface)?),
        CivetArtifact::WhiteMatterSurfaces => pair(scan.white_matter_surfaces(surface)?),
        CivetArtifact::MidSurfaces => pair(scan.mid_surfaces(surface)?),
        CivetArtifact::CorticalThickness => pair(scan.cortical_thickness(surface)?),
        CivetArtifact::MeanCurvature => pair(scan.mean_curvature(surface)?),
        CivetArtifact::LinearTransform => vec![scan.linear_transform(file)?],
        CivetArtifact::NonlinearTransform => {
            let transform = scan.nonlinear_transform(TransformLookup {
                file,
                inverted: args.inverted,
            })?;
            vec![transform.xfm, transform.grid]
        }
        CivetArtifact::ClassifyDir => vec![scan.classify_dir(existence)?],
        CivetArtifact::FinalDir => vec![scan.final_dir(existence)?],
        CivetArtifact::LogsDir => vec![scan.logs_dir(existence)?],
        CivetArtifact::MaskDir => vec![scan.mask_dir(existence)?],
        CivetArtifact::NativeDir => vec![scan.native_dir(existence)?],
        CivetArtifact::SurfacesDir => vec![scan.surfaces_dir(existence)?],
        CivetArtifact::ThicknessDir => vec![scan.thickness_dir(existence)?],
        CivetArtifact::TransformsDir => vec![scan.transforms_dir(existence)?],
        CivetArtifact::TransformsLinearDir => vec![scan.transforms_linear_dir(existence)?],
        CivetArtifact::TransformsNonlinearDir => vec![scan.transforms_nonlinear_dir(existence)?],
        CivetArtifact::VbmDir => vec![scan.vbm_dir(existence)?],
        CivetArtifact::VerifyDir => vec![scan.verify_dir(existence)?],
    };
    Ok(paths)
}
