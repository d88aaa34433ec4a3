use std::path::{Path, PathBuf};

use log::info;

use crate::error::{MeshToolError, Stage};
use crate::import::msh_importer::MshImporter;
use crate::io::common::loader::{SceneLoader, SceneStore};
use crate::scene::types::{Project, SceneSnapshot};
use crate::settings::ImportSettings;

pub mod msh_importer;

/// Parses every file before the project is touched, so a broken file leaves the project as it was.
pub fn import_files(paths: &[PathBuf], settings: &ImportSettings) -> Result<Vec<SceneSnapshot>, MeshToolError> {
    let importer = MshImporter::new(settings);
    paths.iter().map(|path| importer.import_file(path)).collect()
}

/// Imports `paths` as new scenes of the stored project (or of a new, empty one) and stores it.
pub fn import_into<S: SceneLoader + SceneStore>(
    store: &S,
    append: bool,
    paths: &[PathBuf],
    settings: &ImportSettings,
) -> Result<Project, MeshToolError> {
    let scenes = import_files(paths, settings)?;

    let mut project = if append { store.load_project()? } else { Project::default() };
    let first_new = project.scenes.len();
    project.scenes.extend(scenes);
    // the last imported scene becomes the active one
    if project.scenes.len() > first_new {
        project.active_scene = project.scenes.len() - 1;
    }

    store.store_project(&project)?;
    info!("Project now has {} scenes", project.scenes.len());
    Ok(project)
}

/// Writes each mesh as Wavefront obj into `dir`, for eyeballing a file in any viewer.
pub fn dump_obj_files(paths: &[PathBuf], dir: &Path) -> Result<(), MeshToolError> {
    std::fs::create_dir_all(dir).map_err(|err| MeshToolError::io(Stage::ObjDump, dir, err))?;
    for path in paths {
        let mesh = MshImporter::read_mesh_file(path)?;
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let target = dir.join(format!("{}.obj", stem));

        let io_error = |err| MeshToolError::io(Stage::ObjDump, &target, err);
        let mut writer = std::io::BufWriter::new(std::fs::File::create(&target).map_err(io_error)?);
        mesh.dump_to_wavefront_obj(&mut writer)
            .map_err(|err| MeshToolError::from_parser(err, Stage::ObjDump, &target))?;
        std::io::Write::flush(&mut writer).map_err(io_error)?;
        info!("Dumped {} to {}", path.display(), target.display());
    }
    Ok(())
}
