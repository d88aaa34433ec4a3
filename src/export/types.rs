use glam::{Vec2, Vec3};

use crate::scene::types::ObjectFlags;

/// A vertex in the mesh file's coordinate convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Already flipped to the file's v-down convention.
    pub uv: Option<Vec2>,
}

/// One scene object, triangulated and transformed, ready to become a GROUPS entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGroup {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[u32; 3]>,
    pub material: Option<String>,
    pub mesh_flag: u32,
    pub flags: ObjectFlags,
}

impl MeshGroup {
    /// Distinct corner positions in first-encounter order.
    pub fn distinct_positions(&self) -> Vec<Vec3> {
        let mut distinct: Vec<Vec3> = Vec::with_capacity(4);
        for vertex in &self.vertices {
            if !distinct.contains(&vertex.position) {
                distinct.push(vertex.position);
            }
        }
        distinct
    }
}

/// Screen rectangle over the file's X/Y plane, for panel definitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn bounding(points: &[Vec3]) -> Rect {
        let min = points.iter().copied().fold(Vec3::INFINITY, Vec3::min);
        let max = points.iter().copied().fold(Vec3::NEG_INFINITY, Vec3::max);
        Rect {
            left: min.x,
            top: min.y,
            right: max.x,
            bottom: max.y,
        }
    }
}

/// What the include file says about one object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMetadata {
    pub name: String,
    /// Location in the mesh file's convention.
    pub location: Option<Vec3>,
    pub quad: Option<[Vec3; 4]>,
    pub size: Option<Vec2>,
    pub rect: Option<Rect>,
}
