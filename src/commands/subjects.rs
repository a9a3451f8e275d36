use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{GlobalArgs, SubjectsArgs};
use crate::commands::load_settings;
use crate::subjects::{SubjectListKind, load_keynames, load_scans};

pub fn run(global: &GlobalArgs, args: SubjectsArgs) -> Result<()> {
    if args.kind == SubjectListKind::Keynames {
        let keynames = load_keynames(&args.path)?;
        if args.json {
            let rendered =
                serde_json::to_string_pretty(&keynames).context("failed to render keynames")?;
            println!("{rendered}");
        } else {
            for keyname in &keynames {
                println!("{keyname}");
            }
        }
        info!(path = %args.path.display(), keynames = keynames.len(), "subject list ok");
        return Ok(());
    }

    let (_, settings) = load_settings(global)?;
    let scans = load_scans(&args.path, args.kind, &settings.civet)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&scans).context("failed to render scans")?;
        println!("{rendered}");
    } else {
        for scan in &scans {
            println!(
                "{}\t{}\t{}\t{}",
                scan.keyname, scan.modality, scan.scan_date, scan.civet_scan_dirname
            );
        }
    }
    info!(path = %args.path.display(), scans = scans.len(), "subject list ok");
    Ok(())
}
