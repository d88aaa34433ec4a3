use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};
use log::{debug, trace, warn};
use orbmesh_files::common::types::{C2Vector, C3Vector};
use orbmesh_files::msh::types::{MshFile, MshGroup, MshMaterial, MshTexture, MshVertex};
use orbmesh_files::msh::writer::MshWriter;

use crate::common::coordinate_systems::AxisConvention;
use crate::error::{MeshToolError, Stage};
use crate::export::material_translator::MaterialTranslator;
use crate::export::types::{MeshGroup, ObjectMetadata, Rect, Vertex};
use crate::scene::types::{SceneObject, SceneSnapshot};

pub struct MeshFileWriter {}

impl MeshFileWriter {
    pub fn mesh_path(mesh_dir: &Path, scene: &SceneSnapshot) -> PathBuf {
        mesh_dir.join(format!("{}.msh", scene.name))
    }

    /// Resolves material and texture references to 1-based table indices. Only materials used by
    /// the given groups are written, in scene order; textures in the order the groups first use them.
    pub fn build_mesh_file(
        scene: &SceneSnapshot,
        groups: &[(&SceneObject, MeshGroup)],
        translator: &MaterialTranslator,
    ) -> Result<MshFile, MeshToolError> {
        let referenced = |name: &str| groups.iter().any(|(_, g)| g.material.as_deref() == Some(name));

        let mut materials = Vec::<MshMaterial>::new();
        let mut textures = Vec::<MshTexture>::new();
        // scene material name -> (material index, texture index)
        let mut indices = HashMap::<&str, (usize, usize)>::new();
        let mut material_textures = HashMap::<&str, MshTexture>::new();

        for scene_material in scene.materials.iter().filter(|m| referenced(&m.name)) {
            let translated = translator.translate(scene_material)?;
            let material_index = match materials.iter().position(|m| m.name == translated.material.name) {
                Some(idx) => idx + 1,
                None => {
                    materials.push(translated.material);
                    materials.len()
                }
            };
            indices.insert(&scene_material.name, (material_index, 0));
            if let Some(texture) = translated.texture {
                material_textures.insert(&scene_material.name, texture);
            }
        }

        let mut msh_groups = Vec::with_capacity(groups.len());
        for (object, group) in groups {
            let (material_index, texture_index) = match group.material.as_deref() {
                None => (0, 0),
                Some(name) => match indices.get_mut(name) {
                    None => {
                        warn!("{} uses the unknown material {}, it is written without one", object.name, name);
                        (0, 0)
                    }
                    Some((material_index, texture_index)) => {
                        if *texture_index == 0 {
                            if let Some(texture) = material_textures.get(name) {
                                *texture_index = match textures.iter().position(|t| t.name == texture.name) {
                                    Some(idx) => idx + 1,
                                    None => {
                                        textures.push(texture.clone());
                                        textures.len()
                                    }
                                };
                            }
                        }
                        (*material_index, *texture_index)
                    }
                },
            };

            msh_groups.push(MshGroup {
                label: Some(group.name.clone()),
                material_index,
                texture_index,
                flag: group.mesh_flag,
                tex_wrap: None,
                nonormal: false,
                vertices: group.vertices.iter().map(to_msh_vertex).collect(),
                triangles: group.triangles.clone(),
            });
        }

        debug!(
            "Scene {}: {} groups, {} materials, {} textures",
            scene.name,
            msh_groups.len(),
            materials.len(),
            textures.len()
        );

        Ok(MshFile {
            groups: msh_groups,
            materials,
            textures,
        })
    }

    pub fn write_mesh_file(path: &Path, file: &MshFile) -> Result<(), MeshToolError> {
        trace!("Writing {}", path.display());
        let io_error = |err| MeshToolError::io(Stage::MeshFile, path, err);

        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        MshWriter::write_file(&mut writer, file).map_err(|err| MeshToolError::from_parser(err, Stage::MeshFile, path))?;
        writer.flush().map_err(io_error)
    }

    /// The include file entries of one object. `group` is the object's normalized geometry, if it
    /// has any. Quad and rect output need exactly four distinct corners.
    pub fn object_metadata(
        object: &SceneObject,
        group: Option<&MeshGroup>,
        axes: AxisConvention,
    ) -> Result<ObjectMetadata, MeshToolError> {
        let flags = object.flags;
        let corners = if flags.output_as_quad || flags.include_rect {
            let distinct = group.map(MeshGroup::distinct_positions).unwrap_or_default();
            let corners: [Vec3; 4] = distinct.as_slice().try_into().map_err(|_| MeshToolError::QuadShapeMismatch {
                object: object.name.clone(),
                corners: distinct.len(),
            })?;
            Some(corners)
        } else {
            None
        };

        let size = (flags.include_width_height && object.is_mesh()).then(|| {
            let min = object.positions.iter().copied().fold(Vec3::INFINITY, Vec3::min);
            let max = object.positions.iter().copied().fold(Vec3::NEG_INFINITY, Vec3::max);
            let extent = (max - min) * object.transform.scale.abs();
            Vec2::new(extent.x, extent.y)
        });

        Ok(ObjectMetadata {
            name: object.export_name(),
            location: flags
                .include_position
                .then(|| axes.scene_to_mesh(object.transform.location)),
            quad: corners.filter(|_| flags.output_as_quad),
            size,
            rect: corners.filter(|_| flags.include_rect).map(|c| Rect::bounding(&c)),
        })
    }
}

fn to_msh_vertex(vertex: &Vertex) -> MshVertex {
    MshVertex {
        position: C3Vector::new(vertex.position.x, vertex.position.y, vertex.position.z),
        normal: Some(C3Vector::new(vertex.normal.x, vertex.normal.y, vertex.normal.z)),
        uv: vertex.uv.map(|uv| C2Vector::new(uv.x, uv.y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::normalizer::GeometryNormalizer;
    use crate::scene::types::{Face, SceneMaterial};

    fn triangle(name: &str, material: Option<&str>) -> SceneObject {
        SceneObject {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![Face::new(&[0, 1, 2])],
            material: material.map(str::to_string),
            ..SceneObject::new(name)
        }
    }

    #[test]
    fn tables_only_hold_what_is_used() -> Result<(), anyhow::Error> {
        let mut scene = SceneSnapshot::new("Cockpit");
        scene.materials = vec![
            SceneMaterial::new("unused"),
            SceneMaterial {
                texture: Some("Textures/Cockpit/mfd.dds".to_string()),
                dynamic_texture: true,
                ..SceneMaterial::new("screen")
            },
            SceneMaterial::new("frame"),
        ];
        scene.objects = vec![
            triangle("Frame", Some("frame")),
            triangle("Left MFD", Some("screen")),
            triangle("Right MFD", Some("screen")),
            triangle("Bare", None),
        ];

        let normalizer = GeometryNormalizer::new(AxisConvention::new(true));
        let groups = scene
            .objects
            .iter()
            .map(|o| Ok((o, normalizer.normalize(o, o.material.as_deref().and_then(|m| scene.material(m)))?)))
            .collect::<Result<Vec<_>, MeshToolError>>()?;

        let file = MeshFileWriter::build_mesh_file(&scene, &groups, &MaterialTranslator::new(false))?;
        assert_eq!(
            file.materials.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            vec!["screen", "frame"]
        );
        assert_eq!(file.textures, vec![MshTexture {
            name: "Cockpit\\mfd.dds".to_string(),
            dynamic: true,
        }]);

        let refs = file.groups.iter().map(|g| (g.material_index, g.texture_index)).collect::<Vec<_>>();
        assert_eq!(refs, vec![(2, 0), (1, 1), (1, 1), (0, 0)]);
        assert_eq!(file.groups[1].label.as_deref(), Some("Left_MFD"));
        assert!(file.groups[1].vertices.iter().all(|v| v.uv.is_some()));
        Ok(())
    }

    #[test]
    fn quad_needs_four_corners() -> Result<(), anyhow::Error> {
        let axes = AxisConvention::new(true);
        let mut object = triangle("Switch", None);
        object.flags.output_as_quad = true;

        let group = GeometryNormalizer::new(axes).normalize(&object, None)?;
        assert!(matches!(
            MeshFileWriter::object_metadata(&object, Some(&group), axes),
            Err(MeshToolError::QuadShapeMismatch { corners: 3, .. })
        ));
        Ok(())
    }

    #[test]
    fn rect_and_size() -> Result<(), anyhow::Error> {
        let axes = AxisConvention::new(false);
        let mut object = SceneObject {
            positions: vec![
                Vec3::new(10.0, 20.0, 0.0),
                Vec3::new(60.0, 20.0, 0.0),
                Vec3::new(60.0, 40.0, 0.0),
                Vec3::new(10.0, 40.0, 0.0),
            ],
            faces: vec![Face::new(&[0, 1, 2, 3])],
            ..SceneObject::new("Gauge")
        };
        object.transform.scale = Vec3::new(2.0, -1.0, 1.0);
        object.flags.include_rect = true;
        object.flags.include_width_height = true;

        let group = GeometryNormalizer::new(axes).normalize(&object, None)?;
        let metadata = MeshFileWriter::object_metadata(&object, Some(&group), axes)?;
        assert_eq!(metadata.rect, Some(Rect {
            left: 20.0,
            top: -40.0,
            right: 120.0,
            bottom: -20.0,
        }));
        assert_eq!(metadata.size, Some(Vec2::new(100.0, 20.0)));
        assert_eq!(metadata.quad, None);
        assert_eq!(metadata.location, None);
        Ok(())
    }
}
