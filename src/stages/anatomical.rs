use crate::error::BuildError;
use crate::loris::{OutputTree, SubjectTree};
use crate::model::ScanContext;

use super::{BuildContext, CommandBuilder, CommandSpec, Stage};

fn scan_command(ctx: &BuildContext<'_>, scan: &ScanContext) -> CommandBuilder {
    ctx.command()
        .flag("--keyname", &scan.keyname)
        .flag("--scanDate", &scan.scan_date)
}

pub(super) fn build(ctx: &BuildContext<'_>, scan: &ScanContext) -> Result<CommandSpec, BuildError> {
    let tree = SubjectTree::new(ctx.settings, &scan.keyname);
    let civet = ctx.civet(scan);
    let date = scan.scan_date.as_str();

    // Only the mask generator takes its settings file after the volumes.
    if ctx.stage == Stage::MasksGenerateFromLabels {
        let classify = ctx.require(civet.classify(ctx.file_lookup()))?;
        return Ok(scan_command(ctx, scan)
            .path_flag("--labelledAALvolume", &tree.aal_labels_volume(date))
            .path_flag("--classifyVolume", &classify)
            .settings_file(ctx.options)
            .build());
    }

    let command = scan_command(ctx, scan).settings_file(ctx.options);
    let command = match ctx.stage {
        Stage::AnatomicalInitialization | Stage::LabelsFitAal | Stage::VbmComputeIndividVbm => {
            command
        }
        Stage::VbmQuantification => {
            let settings = ctx.settings;
            command
                .positional(&zscore_volume(&tree, date, &settings.vbm_gm_zscore_suffix))
                .positional(&zscore_volume(&tree, date, &settings.vbm_wm_zscore_suffix))
        }
        Stage::VbmVolumetricVisualization => {
            let settings = ctx.settings;
            let underlay = ctx.require(civet.stx_t1(ctx.file_lookup()))?;
            command
                .path_flag("--t1UnderlayVol", &underlay)
                .positional(&zscore_volume(&tree, date, &settings.vbm_gm_zscore_suffix))
                .positional(&zscore_volume(&tree, date, &settings.vbm_wm_zscore_suffix))
        }
        Stage::ThicknessComputeZscores => {
            let thickness = ctx.require(civet.cortical_thickness(ctx.resampled_lookup()))?;
            command
                .path_flag("--lhThicknessVectorFile", &thickness.left)
                .path_flag("--rhThicknessVectorFile", &thickness.right)
        }
        Stage::ThicknessExtractSurfaceLabels => {
            let mid = ctx.require(civet.mid_surfaces(ctx.resampled_lookup()))?;
            command
                .path_flag("--surfaceLh", &mid.left)
                .path_flag("--surfaceRh", &mid.right)
                .path_flag("--aalLblVolume", &tree.aal_gm_masked_labels_volume(date))
        }
        Stage::ThicknessComputeRoiStatistics => command
            .path_flag(
                "--thicknessVectorFile",
                &tree.keyed_file(OutputTree::Thickness, date, "_thickness_lhrh.txt"),
            )
            .path_flag(
                "--zscoresVectorFile",
                &tree.keyed_file(OutputTree::Thickness, date, "_thickness_zscores.txt"),
            )
            .path_flag(
                "--surfaceLabelsVectorFile",
                &tree.keyed_file(
                    OutputTree::Thickness,
                    date,
                    "_extracted_aal_surface_labels.txt",
                ),
            ),
        Stage::ThicknessSurfaceVisualization => {
            let gray = ctx.require(civet.gray_matter_surfaces(ctx.resampled_lookup()))?;
            let settings = ctx.settings;
            command
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
                .path_flag("--indivRhSurface", &gray.right)
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

fn zscore_volume(tree: &SubjectTree<'_>, date: &str, suffix: &str) -> std::path::PathBuf {
    tree.keyed_file(OutputTree::Vbm, date, &format!("{suffix}.mnc"))
}
