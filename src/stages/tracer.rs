use std::path::PathBuf;

use crate::error::BuildError;
use crate::loris::{OutputTree, SubjectTree};
use crate::model::{Modality, NativeFormat, ScanContext, TracerSource};

use super::{BuildContext, CommandBuilder, CommandSpec, Stage};

fn output_tree(modality: Modality) -> OutputTree {
    match modality {
        Modality::Fdg => OutputTree::Fdg,
        _ => OutputTree::Pib,
    }
}

/// `--keyname`, `--scanDate` and the Civet id under the given flag name.
fn scan_command(ctx: &BuildContext<'_>, scan: &ScanContext, civet_flag: &str) -> CommandBuilder {
    ctx.command()
        .flag("--keyname", &scan.keyname)
        .flag("--scanDate", &scan.scan_date)
        .flag(civet_flag, &scan.civet_scan_id)
        .settings_file(ctx.options)
}

pub(super) fn build(ctx: &BuildContext<'_>, scan: &ScanContext) -> Result<CommandSpec, BuildError> {
    let tree = SubjectTree::new(ctx.settings, &scan.keyname);

    let command = match ctx.stage {
        Stage::PibInitialization | Stage::FdgInitialization => {
            scan_command(ctx, scan, "--civetScanId")
        }
        Stage::PibConvertEcat2mnc => {
            let TracerSource::Pib { ecat_filename } = &scan.source else {
                return Err(BuildError::MissingSource {
                    stage: ctx.stage.program(),
                    expected: "ECAT",
                });
            };
            scan_command(ctx, scan, "--civetScanId")
                .positional(&ctx.settings.pib_ecat_dir.join(ecat_filename))
        }
        Stage::FdgConvertNative2mnc => native_conversion(ctx, scan)?,
        Stage::PibPreprocess | Stage::FdgPreprocess => {
            let native = tree.tracer_native_volume(output_tree(scan.modality), &scan.scan_date);
            ctx.command()
                .switch("--xfmToNativeMRI")
                .switch("--xfmToIcbmMRI")
                .flag("--keyname", &scan.keyname)
                .flag("--scanDate", &scan.scan_date)
                .flag("--civetScanId", &scan.civet_scan_id)
                .settings_file(ctx.options)
                .positional(&native)
        }
        Stage::PibGenerateMasks
        | Stage::PibPreprocessVerification
        | Stage::PibComputeRatios
        | Stage::PibComputeSuvr
        | Stage::FdgPreprocessVerification
        | Stage::FdgComputeRatios
        | Stage::FdgComputeSuvr => scan_command(ctx, scan, "--civetScanDate"),
        Stage::PibVolumetricVisualization | Stage::FdgVolumetricVisualization => {
            let underlay = ctx.require(ctx.civet(scan).stx_t1(ctx.file_lookup()))?;
            scan_command(ctx, scan, "--civetScanDate")
                .path_flag("--gmMaskVol", &tree.gray_matter_mask(&scan.civet_scan_id))
                .path_flag("--t1UnderlayVol", &underlay)
        }
        Stage::PibSurfaceVisualization | Stage::FdgSurfaceVisualization => {
            surface_visualization(ctx, scan)?
        }
        other => {
            return Err(BuildError::WrongModality {
                stage: other.program(),
                modality: scan.modality.as_str(),
            });
        }
    };

    Ok(command.build())
}

fn native_conversion(
    ctx: &BuildContext<'_>,
    scan: &ScanContext,
) -> Result<CommandBuilder, BuildError> {
    let TracerSource::Fdg { format, location } = &scan.source else {
        return Err(BuildError::MissingSource {
            stage: ctx.stage.program(),
            expected: "native FDG",
        });
    };

    // DICOM series sit under a per-scan directory; single files sit at the top.
    let native_dir = &ctx.settings.fdg_native_dir;
    let target: PathBuf = match format {
        NativeFormat::Ecat | NativeFormat::Minc => native_dir.join(location),
        NativeFormat::Dicom => native_dir.join(&scan.scan_date).join(location),
    };

    Ok(ctx
        .command()
        .flag("--keyname", &scan.keyname)
        .flag("--scanDate", &scan.scan_date)
        .settings_file(ctx.options)
        .switch(&format!("--{}", format.as_str()))
        .assign("--inputTarget", &target))
}

fn surface_visualization(
    ctx: &BuildContext<'_>,
    scan: &ScanContext,
) -> Result<CommandBuilder, BuildError> {
    let settings = ctx.settings;
    let gray = ctx.require(ctx.civet(scan).gray_matter_surfaces(ctx.resampled_lookup()))?;

    let mut command = scan_command(ctx, scan, "--civetScanDate");
    if scan.modality == Modality::Fdg {
        command = command.path_flag(
            "--csfPmapVolume",
            &settings.elderly_model_dir.join(&settings.elderly_model_csf_pmap),
        );
    }

    Ok(command
        .flag("--colorMap", "hot")
        .path_flag(
            "--avgLhSurface",
            &settings.adni_surfaces_dir.join(&settings.adni_lh_gm_surface),
        )
        .path_flag(
            "--avgRhSurface",
            &settings.adni_surfaces_dir.join(&settings.adni_rh_gm_surface),
        )
        .path_flag("--indivLhSurface", &gray.left)
        .path_flag("--indivRhSurface", &gray.right))
}
