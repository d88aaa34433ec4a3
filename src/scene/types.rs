use std::path::PathBuf;

use glam::{Affine3A, Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// The document the exporter reads and the importer appends to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub scenes: Vec<SceneSnapshot>,
    /// Index into `scenes`, used by export-selected.
    #[serde(default)]
    pub active_scene: usize,
}

impl Project {
    pub fn active_scene(&self) -> Option<&SceneSnapshot> {
        self.scenes.get(self.active_scene)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub name: String,
    /// Namespace of the scene inside the include file, defaults to the scene name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default = "default_true")]
    pub create_mesh_file: bool,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub materials: Vec<SceneMaterial>,
}

impl SceneSnapshot {
    pub fn new(name: &str) -> Self {
        SceneSnapshot {
            name: name.to_string(),
            namespace: None,
            create_mesh_file: true,
            objects: vec![],
            materials: vec![],
        }
    }

    pub fn material(&self, name: &str) -> Option<&SceneMaterial> {
        self.materials.iter().find(|m| m.name == name)
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn include_namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    /// Object local space.
    #[serde(default)]
    pub positions: Vec<Vec3>,
    #[serde(default)]
    pub faces: Vec<Face>,
    #[serde(default)]
    pub shading: ShadingMode,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "default_sort_priority")]
    pub sort_priority: i32,
    /// Passed through to the group's FLAG statement.
    #[serde(default)]
    pub mesh_flag: u32,
    #[serde(default)]
    pub flags: ObjectFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

pub const DEFAULT_SORT_PRIORITY: i32 = 50;

fn default_sort_priority() -> i32 {
    DEFAULT_SORT_PRIORITY
}

fn default_true() -> bool {
    true
}

impl SceneObject {
    pub fn new(name: &str) -> Self {
        SceneObject {
            name: name.to_string(),
            positions: vec![],
            faces: vec![],
            shading: ShadingMode::default(),
            transform: Transform::default(),
            sort_priority: DEFAULT_SORT_PRIORITY,
            mesh_flag: 0,
            flags: ObjectFlags::default(),
            material: None,
        }
    }

    /// Objects without faces are empties: they never become a group, but their location can still
    /// end up in the include file.
    pub fn is_mesh(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Name as used in group labels and C++ identifiers.
    pub fn export_name(&self) -> String {
        self.name.replace(' ', "_")
    }

    /// Restartable, lazy view over the faces, resolving their corners against the position table.
    pub fn faces(&self) -> impl Iterator<Item = FaceRecord<'_>> + Clone + '_ {
        self.faces.iter().enumerate().map(|(index, face)| FaceRecord {
            index,
            face,
            positions: &self.positions,
        })
    }

    pub fn world_positions(&self) -> Vec<Vec3> {
        let world = self.transform.to_affine();
        self.positions
            .iter()
            .map(|&p| world.transform_point3(p))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Face {
    /// Indices into [`SceneObject::positions`], in winding order.
    pub vertices: Vec<u32>,
    /// Split normals, one per corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<Vec3>>,
    /// One per corner, with v pointing up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvs: Option<Vec<Vec2>>,
}

impl Face {
    pub fn new(vertices: &[u32]) -> Self {
        Face {
            vertices: vertices.to_vec(),
            normals: None,
            uvs: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FaceRecord<'a> {
    pub index: usize,
    face: &'a Face,
    positions: &'a [Vec3],
}

impl<'a> FaceRecord<'a> {
    pub fn corner_count(&self) -> usize {
        self.face.vertices.len()
    }

    pub fn vertex_index(&self, corner: usize) -> u32 {
        self.face.vertices[corner]
    }

    /// `None` when the corner references a position that doesn't exist.
    pub fn position(&self, corner: usize) -> Option<Vec3> {
        self.positions.get(self.vertex_index(corner) as usize).copied()
    }

    /// Split normals only count if every corner has one.
    pub fn split_normal(&self, corner: usize) -> Option<Vec3> {
        self.face
            .normals
            .as_ref()
            .filter(|normals| normals.len() == self.corner_count())
            .map(|normals| normals[corner])
    }

    pub fn uv(&self, corner: usize) -> Option<Vec2> {
        self.face.uvs.as_ref().and_then(|uvs| uvs.get(corner).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShadingMode {
    #[default]
    Smooth,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub location: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            location: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectFlags {
    pub include_in_mesh: bool,
    pub include_position: bool,
    pub include_vertex_array: bool,
    pub output_as_quad: bool,
    pub include_width_height: bool,
    pub include_rect: bool,
    pub visible_in_render: bool,
    pub selected: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        ObjectFlags {
            include_in_mesh: true,
            include_position: false,
            include_vertex_array: false,
            output_as_quad: false,
            include_width_height: false,
            include_rect: false,
            visible_in_render: true,
            selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneMaterial {
    pub name: String,
    pub diffuse: Vec4,
    pub ambient: Vec4,
    pub specular: Vec4,
    pub emissive: Vec4,
    pub specular_power: f32,
    /// Texture file reference, e.g. `Textures/Vessel/hull.dds`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    pub dynamic_texture: bool,
    /// Where an imported texture was found on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_file: Option<PathBuf>,
}

impl Default for SceneMaterial {
    fn default() -> Self {
        SceneMaterial {
            name: String::new(),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            ambient: Vec4::ONE,
            specular: Vec4::ONE,
            emissive: Vec4::ZERO,
            specular_power: 10.0,
            texture: None,
            dynamic_texture: false,
            texture_file: None,
        }
    }
}

impl SceneMaterial {
    pub fn new(name: &str) -> Self {
        SceneMaterial {
            name: name.to_string(),
            ..SceneMaterial::default()
        }
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}
