use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::trace;

use crate::error::{MeshToolError, Stage};
use crate::io::common::loader::{SceneLoader, SceneStore};
use crate::scene::types::Project;

/// A project stored as a JSON scene snapshot.
pub struct JsonSceneFile {
    path: PathBuf,
}

impl JsonSceneFile {
    pub fn new(path: &Path) -> Self {
        JsonSceneFile {
            path: path.to_path_buf(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn decode_error(&self, source: serde_json::Error) -> MeshToolError {
        if source.is_io() {
            return MeshToolError::io(Stage::SceneLoad, &self.path, source.into());
        }
        MeshToolError::Scene {
            path: self.path.clone(),
            source,
        }
    }
}

impl SceneLoader for JsonSceneFile {
    fn load_project(&self) -> Result<Project, MeshToolError> {
        let file = File::open(&self.path).map_err(|err| MeshToolError::io(Stage::SceneLoad, &self.path, err))?;
        let project: Project = serde_json::from_reader(BufReader::new(file)).map_err(|err| self.decode_error(err))?;
        trace!(
            "Loaded {} with {} scenes",
            self.path.display(),
            project.scenes.len()
        );
        Ok(project)
    }
}

impl SceneStore for JsonSceneFile {
    fn store_project(&self, project: &Project) -> Result<(), MeshToolError> {
        let io_error = |err| MeshToolError::io(Stage::SceneStore, &self.path, err);

        let mut writer = BufWriter::new(File::create(&self.path).map_err(io_error)?);
        serde_json::to_writer_pretty(&mut writer, project).map_err(|err| io_error(err.into()))?;
        writer.write_all(b"\n").map_err(io_error)?;
        writer.flush().map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::types::{Face, SceneObject, SceneSnapshot};
    use glam::Vec3;

    #[test]
    fn minimal_snapshot_gets_defaults() -> Result<(), anyhow::Error> {
        let json = r#"{
            "scenes": [{
                "name": "Panel",
                "objects": [{ "name": "Switch", "positions": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "faces": [{ "vertices": [0, 1, 2] }] }]
            }]
        }"#;
        let project: Project = serde_json::from_str(json)?;
        let scene = &project.scenes[0];
        assert!(scene.create_mesh_file);

        let switch = &scene.objects[0];
        assert_eq!(switch.sort_priority, 50);
        assert!(switch.flags.include_in_mesh);
        assert!(switch.flags.visible_in_render);
        assert_eq!(switch.transform.scale, Vec3::ONE);
        Ok(())
    }

    #[test]
    fn store_and_load() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let file = JsonSceneFile::new(&dir.path().join("project.json"));

        let mut scene = SceneSnapshot::new("Hull");
        scene.objects.push(SceneObject {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![Face::new(&[0, 1, 2])],
            ..SceneObject::new("Wing")
        });
        let project = Project {
            scenes: vec![scene],
            active_scene: 0,
        };

        file.store_project(&project)?;
        assert_eq!(file.load_project()?, project);
        Ok(())
    }

    #[test]
    fn garbage_is_a_scene_error() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"scenes\": 12 }")?;

        assert!(matches!(
            JsonSceneFile::new(&path).load_project(),
            Err(MeshToolError::Scene { .. })
        ));
        Ok(())
    }
}
