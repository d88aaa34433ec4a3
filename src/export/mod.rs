use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;
use log::{debug, info};
use orbmesh_files::msh::types::MshFile;

use crate::common::coordinate_systems::AxisConvention;
use crate::error::{MeshToolError, Stage};
use crate::export::include_writer::{IncludeScene, IncludeWriter};
use crate::export::material_translator::MaterialTranslator;
use crate::export::mesh_writer::MeshFileWriter;
use crate::export::normalizer::GeometryNormalizer;
use crate::export::sorter::GroupSorter;
use crate::export::types::{MeshGroup, ObjectMetadata};
use crate::scene::types::{Project, SceneObject, SceneSnapshot};
use crate::settings::BuildSettings;

pub mod include_writer;
pub mod material_translator;
pub mod mesh_writer;
pub mod normalizer;
pub mod sorter;
pub mod types;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Every written mesh file with its group count.
    pub mesh_files: Vec<(PathBuf, usize)>,
    pub include_file: Option<PathBuf>,
}

/// A scene that went through normalizing, sorting and material resolution, but hasn't been written.
pub struct PreparedScene<'a> {
    pub scene: &'a SceneSnapshot,
    pub groups: Vec<(&'a SceneObject, MeshGroup)>,
    pub file: MshFile,
    pub metadata: Vec<ObjectMetadata>,
}

/// Exports every scene that wants a mesh file (or, with export-selected, the selected objects of
/// the active scene) and renders the include file for all of them. The first error aborts the run,
/// files that were already written stay.
pub fn export_project(project: &Project, settings: &BuildSettings) -> Result<ExportReport, MeshToolError> {
    settings.log_summary();
    let prepared = prepare_project(project, settings)?;

    std::fs::create_dir_all(&settings.mesh_dir)
        .map_err(|err| MeshToolError::io(Stage::MeshFile, &settings.mesh_dir, err))?;

    let mut mesh_files = Vec::with_capacity(prepared.len());
    for scene in &prepared {
        let path = MeshFileWriter::mesh_path(&settings.mesh_dir, scene.scene);
        info!("Start scene: {} : {}", scene.scene.name, path.display());
        MeshFileWriter::write_mesh_file(&path, &scene.file)?;
        mesh_files.push((path, scene.file.groups.len()));
    }

    let include_file = match &settings.include_path {
        Some(path) if !prepared.is_empty() => {
            write_include_file(path, settings, &prepared)?;
            Some(path.clone())
        }
        _ => None,
    };

    Ok(ExportReport {
        mesh_files,
        include_file,
    })
}

/// Everything [`export_project`] does short of touching the filesystem.
pub fn prepare_project<'a>(
    project: &'a Project,
    settings: &BuildSettings,
) -> Result<Vec<PreparedScene<'a>>, MeshToolError> {
    let selection = project
        .active_scene()
        .filter(|scene| settings.export_selected && scene.objects.iter().any(|o| o.flags.selected));

    match selection {
        Some(scene) => {
            info!("Exporting the selected objects of {}", scene.name);
            Ok(vec![prepare_scene(scene, settings, true)?])
        }
        None => {
            if settings.export_selected {
                info!("Nothing is selected, exporting all scenes");
            }
            project
                .scenes
                .iter()
                .filter(|scene| scene.create_mesh_file)
                .map(|scene| prepare_scene(scene, settings, false))
                .collect()
        }
    }
}

pub fn prepare_scene<'a>(
    scene: &'a SceneSnapshot,
    settings: &BuildSettings,
    only_selected: bool,
) -> Result<PreparedScene<'a>, MeshToolError> {
    let axes = AxisConvention::new(settings.swap_yz);
    let normalizer = GeometryNormalizer::new(axes);

    let mut groups = Vec::new();
    let mut metadata = Vec::with_capacity(scene.objects.len());
    for object in &scene.objects {
        let flags = object.flags;
        let hidden = settings.exclude_hidden_from_render && !flags.visible_in_render;
        let exported = flags.include_in_mesh && !hidden && (!only_selected || flags.selected);

        // quads and rects need the geometry even when the group itself isn't written
        let group = if object.is_mesh() && (exported || flags.output_as_quad || flags.include_rect) {
            let material = object.material.as_deref().and_then(|m| scene.material(m));
            Some(normalizer.normalize(object, material)?)
        } else {
            None
        };

        metadata.push(MeshFileWriter::object_metadata(object, group.as_ref(), axes)?);

        match group {
            Some(group) if exported => groups.push((object, group)),
            _ => debug!("{} is not written to the mesh", object.name),
        }
    }

    GroupSorter::sort(&mut groups, settings.sort_mode);

    let translator = MaterialTranslator::new(settings.parse_material_name);
    let file = MeshFileWriter::build_mesh_file(scene, &groups, &translator)?;

    Ok(PreparedScene {
        scene,
        groups,
        file,
        metadata,
    })
}

fn write_include_file(
    path: &std::path::Path,
    settings: &BuildSettings,
    scenes: &[PreparedScene],
) -> Result<(), MeshToolError> {
    info!("Writing include file {}", path.display());
    let io_error = |err| MeshToolError::io(Stage::IncludeFile, path, err);

    let file = File::create(path).map_err(io_error)?;
    let home_scene = scenes.first().map_or("", |s| s.scene.name.as_str());
    let mut writer = IncludeWriter::begin(BufWriter::new(file), settings, home_scene, Local::now()).map_err(io_error)?;

    for scene in scenes {
        writer
            .write_scene(&IncludeScene {
                scene: scene.scene,
                groups: &scene.groups,
                textures: &scene.file.textures,
                metadata: &scene.metadata,
            })
            .map_err(io_error)?;
    }

    writer.finish().map_err(io_error)?;
    Ok(())
}
