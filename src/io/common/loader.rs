use crate::error::MeshToolError;
use crate::scene::types::Project;

/// Read access to the host document. Loading must not have side effects on the host.
pub trait SceneLoader {
    fn load_project(&self) -> Result<Project, MeshToolError>;
}

pub trait SceneStore {
    /// Replaces the stored project as a whole.
    fn store_project(&self, project: &Project) -> Result<(), MeshToolError>;
}
