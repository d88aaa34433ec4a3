use glam::{Mat3, Vec2, Vec3};
use log::{debug, trace, warn};

use crate::common::coordinate_systems::AxisConvention;
use crate::error::MeshToolError;
use crate::export::types::{MeshGroup, Vertex};
use crate::scene::types::{FaceRecord, SceneMaterial, SceneObject, ShadingMode};

/// Turns polygonal scene objects into triangle groups in the mesh file's coordinate convention.
pub struct GeometryNormalizer {
    axes: AxisConvention,
}

impl GeometryNormalizer {
    pub fn new(axes: AxisConvention) -> Self {
        GeometryNormalizer { axes }
    }

    /// Every polygon corner becomes one vertex, shared by the fan triangles of that polygon only.
    /// Polygons are fanned from their first corner, which is only correct for convex polygons.
    pub fn normalize(
        &self,
        object: &SceneObject,
        material: Option<&SceneMaterial>,
    ) -> Result<MeshGroup, MeshToolError> {
        let face_normals = object
            .faces()
            .map(|face| GeometryNormalizer::face_normal(object, &face))
            .collect::<Result<Vec<_>, _>>()?;

        let smooth_normals = match object.shading {
            ShadingMode::Smooth => Some(GeometryNormalizer::smooth_normals(object, &face_normals)),
            ShadingMode::Flat => None,
        };

        let world = object.transform.to_affine();
        let normal_matrix = GeometryNormalizer::normal_matrix(object);
        let emit_uvs = material.is_some_and(SceneMaterial::is_textured);

        let corner_count: usize = object.faces.iter().map(|f| f.vertices.len()).sum();
        let mut vertices = Vec::<Vertex>::with_capacity(corner_count);
        let mut triangles = Vec::<[u32; 3]>::with_capacity(corner_count);

        for face in object.faces() {
            let base = vertices.len() as u32;
            for corner in 0..face.corner_count() {
                let vertex_index = face.vertex_index(corner) as usize;
                // validated by face_normal
                let position = object.positions[vertex_index];

                let normal = match (face.split_normal(corner), &smooth_normals) {
                    (Some(split), _) => split,
                    (None, Some(smooth)) => smooth[vertex_index],
                    (None, None) => face_normals[face.index],
                };
                let normal = (normal_matrix * normal).normalize_or_zero();

                // the file's v axis points down
                let uv = emit_uvs.then(|| {
                    let uv = face.uv(corner).unwrap_or(Vec2::ZERO);
                    Vec2::new(uv.x, 1.0 - uv.y)
                });

                vertices.push(Vertex {
                    position: self.axes.scene_to_mesh(world.transform_point3(position)),
                    normal: self.axes.scene_to_mesh(normal),
                    uv,
                });
            }

            for k in 1..face.corner_count() as u32 - 1 {
                triangles.push(self.axes.scene_to_mesh_winding([base, base + k, base + k + 1]));
            }
        }

        debug!(
            "Normalized mesh: {}, Vertices: {}, Triangles: {}",
            object.name,
            vertices.len(),
            triangles.len()
        );

        Ok(MeshGroup {
            name: object.export_name(),
            vertices,
            triangles,
            material: object.material.clone(),
            mesh_flag: object.mesh_flag,
            flags: object.flags,
        })
    }

    /// Newell's method, so non-planar polygons still get a sensible average.
    fn face_normal(object: &SceneObject, face: &FaceRecord) -> Result<Vec3, MeshToolError> {
        let unsupported = |reason: String| MeshToolError::UnsupportedTopology {
            object: object.name.clone(),
            reason,
        };

        if face.corner_count() < 3 {
            return Err(unsupported(format!(
                "face {} has only {} corners",
                face.index,
                face.corner_count()
            )));
        }

        let mut corners = Vec::with_capacity(face.corner_count());
        for corner in 0..face.corner_count() {
            match face.position(corner) {
                Some(position) => corners.push(position),
                None => {
                    return Err(unsupported(format!(
                        "face {} references vertex {}, but there are only {} vertices",
                        face.index,
                        face.vertex_index(corner),
                        object.positions.len()
                    )));
                }
            }
        }

        let distinct = corners
            .iter()
            .enumerate()
            .filter(|(idx, p)| !corners[..*idx].contains(*p))
            .count();
        if distinct < 3 {
            return Err(unsupported(format!(
                "face {} has only {} distinct corners",
                face.index, distinct
            )));
        }

        let mut normal = Vec3::ZERO;
        for (idx, current) in corners.iter().enumerate() {
            let next = corners[(idx + 1) % corners.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }

        if normal.length_squared() == 0.0 {
            warn!(
                "Face {} of {} has no area, its normal will be zero",
                face.index, object.name
            );
        }
        Ok(normal.normalize_or_zero())
    }

    /// Per position, the renormalized sum of the normals of every face using it.
    fn smooth_normals(object: &SceneObject, face_normals: &[Vec3]) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; object.positions.len()];
        for face in object.faces() {
            for corner in 0..face.corner_count() {
                normals[face.vertex_index(corner) as usize] += face_normals[face.index];
            }
        }
        normals.iter().map(|n| n.normalize_or_zero()).collect()
    }

    fn normal_matrix(object: &SceneObject) -> Mat3 {
        let linear = Mat3::from(object.transform.to_affine().matrix3);
        if linear.determinant() == 0.0 {
            trace!("{} has a degenerate scale, normals are not corrected", object.name);
            return linear;
        }
        linear.inverse().transpose()
    }
}
