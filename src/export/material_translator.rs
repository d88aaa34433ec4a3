use std::path::{Component, Path};

use glam::Vec4;
use itertools::Itertools;
use orbmesh_files::common::types::CColor;
use orbmesh_files::msh::types::{MshMaterial, MshTexture};
use orbmesh_files::ParserError;
use orbmesh_files::msh::writer::MshWriter;

use crate::error::MeshToolError;
use crate::scene::types::SceneMaterial;

/// Texture directories of a simulator installation, anything below them is the texture's name.
const TEXTURE_DIRS: [&str; 2] = ["Textures", "Textures2"];

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedMaterial {
    pub material: MshMaterial,
    pub texture: Option<MshTexture>,
}

pub struct MaterialTranslator {
    parse_material_name: bool,
}

impl MaterialTranslator {
    pub fn new(parse_material_name: bool) -> Self {
        MaterialTranslator { parse_material_name }
    }

    pub fn translate(&self, scene_material: &SceneMaterial) -> Result<TranslatedMaterial, MeshToolError> {
        let colors = [
            ("diffuse", scene_material.diffuse),
            ("ambient", scene_material.ambient),
            ("specular", scene_material.specular),
            ("emissive", scene_material.emissive),
        ];
        for (field, color) in colors {
            if let Some(value) = color.to_array().into_iter().find(|c| !(0.0..=1.0).contains(c)) {
                return Err(MeshToolError::InvalidMaterialValue {
                    material: scene_material.name.clone(),
                    detail: format!("{} component {} is outside of 0..1", field, value),
                });
            }
        }

        if !scene_material.specular_power.is_finite() || scene_material.specular_power < 0.0 {
            return Err(MeshToolError::InvalidMaterialValue {
                material: scene_material.name.clone(),
                detail: format!("specular power {} is negative or not finite", scene_material.specular_power),
            });
        }

        Ok(TranslatedMaterial {
            material: MshMaterial {
                name: self.material_name(&scene_material.name),
                diffuse: to_color(scene_material.diffuse),
                ambient: to_color(scene_material.ambient),
                specular: to_color(scene_material.specular),
                specular_power: scene_material.specular_power,
                emissive: to_color(scene_material.emissive),
            },
            texture: scene_material.texture.as_deref().map(|reference| MshTexture {
                name: MaterialTranslator::texture_name(reference),
                dynamic: scene_material.dynamic_texture,
            }),
        })
    }

    /// `hull_metal.001` becomes `hull` when names are parsed, so material variants collapse.
    pub fn material_name(&self, name: &str) -> String {
        let name = name.replace(' ', "_");
        if self.parse_material_name {
            if let Some((prefix, _)) = name.split_once('_') {
                return prefix.to_string();
            }
        }
        name
    }

    /// The path below the texture directory with backslashes, or just the file name.
    pub fn texture_name(reference: &str) -> String {
        let normalized = reference.replace('\\', "/");
        let components = Path::new(&normalized)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect_vec();

        match components.iter().rposition(|c| TEXTURE_DIRS.iter().any(|dir| c.eq_ignore_ascii_case(dir))) {
            Some(idx) if idx + 1 < components.len() => components[idx + 1..].join("\\"),
            _ => components.last().cloned().unwrap_or_default(),
        }
    }

    /// The material's MATERIAL record (and texture line) as it appears in a mesh file.
    pub fn render_record(&self, scene_material: &SceneMaterial) -> Result<String, MeshToolError> {
        let translated = self.translate(scene_material)?;
        let unwritable = |err: ParserError| MeshToolError::InvalidMaterialValue {
            material: scene_material.name.clone(),
            detail: err.to_string(),
        };

        let mut buf = Vec::new();
        MshWriter::write_material(&mut buf, &translated.material).map_err(unwritable)?;
        if let Some(texture) = &translated.texture {
            MshWriter::write_texture(&mut buf, texture).map_err(unwritable)?;
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn to_color(color: Vec4) -> CColor {
    color.to_array().into()
}
