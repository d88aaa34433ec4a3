use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use orbmesh_files::ParserError;
use thiserror::Error;

/// The step of an export or import that touched the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SceneLoad,
    SceneStore,
    MeshFile,
    IncludeFile,
    MeshRead,
    ObjDump,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::SceneLoad => "loading the scene",
            Stage::SceneStore => "storing the scene",
            Stage::MeshFile => "writing the mesh file",
            Stage::IncludeFile => "writing the include file",
            Stage::MeshRead => "reading the mesh file",
            Stage::ObjDump => "dumping the obj file",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum MeshToolError {
    #[error("Object {object} cannot be triangulated: {reason}")]
    UnsupportedTopology { object: String, reason: String },
    #[error("Material {material} has an invalid value: {detail}")]
    InvalidMaterialValue { material: String, detail: String },
    #[error("Object {object} should be exported as quad, but has {corners} distinct corners instead of 4")]
    QuadShapeMismatch { object: String, corners: usize },
    #[error("Malformed mesh file {path}, line {line}: {reason}")]
    MalformedMeshFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Failed {stage}: {path}")]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Scene file {path} could not be decoded")]
    Scene {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl MeshToolError {
    pub fn io(stage: Stage, path: &Path, source: std::io::Error) -> Self {
        MeshToolError::Io {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Attaches the file (and the stage, for plain io failures) to an error of the format crate.
    pub fn from_parser(err: ParserError, stage: Stage, path: &Path) -> Self {
        match err {
            ParserError::MalformedMeshFile { line, reason } => MeshToolError::MalformedMeshFile {
                path: path.to_path_buf(),
                line,
                reason,
            },
            ParserError::InvalidMaterialValue { line, value } => MeshToolError::InvalidMaterialValue {
                material: path.display().to_string(),
                detail: format!("{:?} in line {}", value, line),
            },
            ParserError::IOError(source) => MeshToolError::io(stage, path, source),
        }
    }
}
