use anyhow::Context;
use clap::Parser;
use log::info;

use orbmesh::export::export_project;
use orbmesh::import::{dump_obj_files, import_into};
use orbmesh::io::common::loader::SceneLoader;
use orbmesh::io::json::loader::JsonSceneFile;
use orbmesh::settings::{CliArgs, ExportArgs, ImportArgs, OperationMode};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let _flush = orbmesh::logging::init(args.verbose, args.log_file.as_deref()).context("Failed to open the log file")?;
    log::trace!("Starting with args: {:?}", args);

    match &args.operation_mode {
        OperationMode::Export(export) => run_export(export),
        OperationMode::Import(import) => run_import(import),
    }
}

fn run_export(args: &ExportArgs) -> anyhow::Result<()> {
    let settings = args.build_settings();
    let project = JsonSceneFile::new(&args.scene)
        .load_project()
        .with_context(|| format!("Failed to load {}", args.scene.display()))?;

    let report = export_project(&project, &settings).context("Export failed")?;
    for (path, groups) in &report.mesh_files {
        info!("Wrote {} ({} groups)", path.display(), groups);
    }
    if let Some(include) = &report.include_file {
        info!("Wrote {}", include.display());
    }
    Ok(())
}

fn run_import(args: &ImportArgs) -> anyhow::Result<()> {
    let settings = args.import_settings();
    let store = JsonSceneFile::new(&args.out);
    if args.append && !store.exists() {
        anyhow::bail!("Cannot append to {}, it does not exist", args.out.display());
    }

    let project = import_into(&store, args.append, &args.files, &settings).context("Import failed")?;
    info!("Wrote {} with {} scenes", args.out.display(), project.scenes.len());

    if let Some(obj_dir) = &args.obj_dir {
        dump_obj_files(&args.files, obj_dir).context("Obj dump failed")?;
    }
    Ok(())
}
