use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3, Vec4};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use orbmesh_files::common::types::CColor;
use orbmesh_files::msh::reader::MshReader;
use orbmesh_files::msh::types::{MshFile, MshGroup, MshMaterial};

use crate::common::coordinate_systems::AxisConvention;
use crate::error::{MeshToolError, Stage};
use crate::scene::types::{Face, SceneMaterial, SceneObject, SceneSnapshot, ShadingMode, Transform};
use crate::settings::ImportSettings;

/// Name of the material groups without a MATERIAL use.
pub const DEFAULT_MATERIAL_NAME: &str = "default";

/// Builds scenes from parsed mesh files.
pub struct MshImporter<'s> {
    settings: &'s ImportSettings,
    axes: AxisConvention,
}

impl<'s> MshImporter<'s> {
    pub fn new(settings: &'s ImportSettings) -> Self {
        MshImporter {
            settings,
            axes: AxisConvention::new(settings.swap_yz),
        }
    }

    pub fn read_mesh_file(path: &Path) -> Result<MshFile, MeshToolError> {
        info!("Reading mesh file: {}", path.display());
        let file = File::open(path).map_err(|err| MeshToolError::io(Stage::MeshRead, path, err))?;
        MshReader::parse_file(BufReader::new(file)).map_err(|err| MeshToolError::from_parser(err, Stage::MeshRead, path))
    }

    /// The scene is named after the file.
    pub fn import_file(&self, path: &Path) -> Result<SceneSnapshot, MeshToolError> {
        let mesh = MshImporter::read_mesh_file(path)?;
        let scene_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Imported".to_string());

        let texture_root = if self.settings.resolve_textures {
            find_installation_root(path)
        } else {
            None
        };
        if self.settings.resolve_textures && texture_root.is_none() {
            debug!("{} is not below a Meshes directory, textures are not resolved", path.display());
        }

        Ok(self.build_scene(&scene_name, &mesh, texture_root.as_deref()))
    }

    pub fn build_scene(&self, scene_name: &str, mesh: &MshFile, texture_root: Option<&Path>) -> SceneSnapshot {
        let (materials, material_names) = self.build_materials(scene_name, mesh, texture_root);

        let mut scene = SceneSnapshot::new(scene_name);
        info!("Start building {} groups in scene: {}", mesh.groups.len(), scene_name);
        for (idx, group) in mesh.groups.iter().enumerate() {
            let base_name = group.label.clone().unwrap_or_else(|| format!("Group_{}", idx));
            let name = unique_name(&base_name, |candidate| scene.object(candidate).is_some());

            let mut object = self.build_object(&name, group);
            object.material = material_names.get(&(group.material_index, group.texture_index)).cloned();
            scene.objects.push(object);
        }
        scene.materials = materials;
        scene
    }

    /// One material per distinct (material, texture) combination, in the order the groups use them.
    fn build_materials(
        &self,
        scene_name: &str,
        mesh: &MshFile,
        texture_root: Option<&Path>,
    ) -> (Vec<SceneMaterial>, HashMap<(usize, usize), String>) {
        let combinations = mesh
            .groups
            .iter()
            .map(|g| (g.material_index, g.texture_index))
            .unique()
            .collect_vec();
        debug!("{} material + texture combinations found", combinations.len());

        let default_material = MshMaterial::new(DEFAULT_MATERIAL_NAME);
        let mut materials = Vec::with_capacity(combinations.len());
        let mut names = HashMap::with_capacity(combinations.len());

        for (counter, &(material_index, texture_index)) in combinations.iter().enumerate() {
            let source = mesh.material(material_index).unwrap_or(&default_material);
            let texture = mesh.texture(texture_index);

            let name = if self.settings.numeric_material_names {
                format!("{}_{:03}", source.name, counter + 1)
            } else {
                match texture {
                    Some(texture) => format!("{}_{}_{}", source.name, texture_stem(&texture.name), scene_name),
                    None => format!("{}_{}", source.name, scene_name),
                }
            };
            let name = unique_name(&name, |candidate| materials.iter().any(|m: &SceneMaterial| m.name == candidate));

            let texture_file = match (texture, texture_root) {
                (Some(texture), Some(root)) => {
                    let resolved = resolve_texture_path(root, &texture.name);
                    if resolved.is_none() {
                        warn!("Texture file not found: {}", texture.name);
                    }
                    resolved
                }
                _ => None,
            };

            trace!("Created material: ({}, {}) -> {}", material_index, texture_index, name);
            materials.push(SceneMaterial {
                name: name.clone(),
                diffuse: to_vec4(source.diffuse),
                ambient: to_vec4(source.ambient),
                specular: to_vec4(source.specular),
                emissive: to_vec4(source.emissive),
                specular_power: source.specular_power,
                texture: texture.map(|t| t.name.clone()),
                dynamic_texture: texture.is_some_and(|t| t.dynamic),
                texture_file,
            });
            names.insert((material_index, texture_index), name);
        }

        (materials, names)
    }

    fn build_object(&self, name: &str, group: &MshGroup) -> SceneObject {
        let textured = group.texture_index != 0;
        let has_normals = !group.vertices.is_empty() && group.vertices.iter().all(|v| v.normal.is_some());
        let has_uvs = textured && !group.vertices.is_empty() && group.vertices.iter().all(|v| v.uv.is_some());

        let mut positions = group
            .vertices
            .iter()
            .map(|v| self.axes.mesh_to_scene(Vec3::new(v.position.x, v.position.y, v.position.z)))
            .collect_vec();
        let normals = group
            .vertices
            .iter()
            .map(|v| {
                let n = v.normal.unwrap_or_default();
                self.axes.mesh_to_scene(Vec3::new(n.x, n.y, n.z))
            })
            .collect_vec();
        let uvs = group
            .vertices
            .iter()
            .map(|v| {
                let uv = v.uv.unwrap_or_default();
                Vec2::new(uv.x, 1.0 - uv.y)
            })
            .collect_vec();

        let faces = group
            .triangles
            .iter()
            .map(|&triangle| {
                let corners = self.axes.mesh_to_scene_winding(triangle);
                Face {
                    vertices: corners.to_vec(),
                    normals: has_normals.then(|| corners.iter().map(|&i| normals[i as usize]).collect()),
                    uvs: has_uvs.then(|| corners.iter().map(|&i| uvs[i as usize]).collect()),
                }
            })
            .collect_vec();

        let mut transform = Transform::default();
        if self.settings.origin_to_geometry && !positions.is_empty() {
            let center = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
            positions.iter_mut().for_each(|p| *p -= center);
            transform.location = center;
        }

        debug!(
            "Group {}: verts: {}, tris: {}, normals: {}, uvs: {}",
            name,
            positions.len(),
            faces.len(),
            has_normals,
            has_uvs
        );

        SceneObject {
            positions,
            faces,
            shading: ShadingMode::Smooth,
            transform,
            mesh_flag: group.flag,
            ..SceneObject::new(name)
        }
    }
}

/// The directory containing `Meshes`, i.e. the simulator installation the mesh belongs to.
pub fn find_installation_root(mesh_path: &Path) -> Option<PathBuf> {
    mesh_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.file_name().is_some_and(|name| name.eq_ignore_ascii_case("meshes")))
        .and_then(Path::parent)
        .map(Path::to_path_buf)
}

/// `Textures2` overrides `Textures`.
pub fn resolve_texture_path(root: &Path, texture_name: &str) -> Option<PathBuf> {
    let relative = texture_name.split(['\\', '/']).filter(|part| !part.is_empty()).collect::<PathBuf>();
    ["Textures2", "Textures"]
        .iter()
        .map(|dir| root.join(dir).join(&relative))
        .inspect(|candidate| trace!("Looking for texture {}", candidate.display()))
        .find(|candidate| candidate.is_file())
}

/// `Panel\front.dds` becomes `Panel_front`.
fn texture_stem(texture_name: &str) -> String {
    let stem = texture_name.split('.').next().unwrap_or_default();
    stem.replace(['\\', '/'], "_")
}

fn unique_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(name) {
        return name.to_string();
    }
    (1..)
        .map(|counter| format!("{}.{:03}", name, counter))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

fn to_vec4(color: CColor) -> Vec4 {
    Vec4::from_array(color.to_array())
}
