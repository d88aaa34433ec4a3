use std::path::PathBuf;

use log::{debug, info};

use crate::export::sorter::SortMode;

/// Everything an export run needs to know, the former add-on properties.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    pub mesh_dir: PathBuf,
    /// `None` disables the include file.
    pub include_path: Option<PathBuf>,
    pub outer_namespace: String,
    /// Patterns for include identifiers, `{}` is replaced by the object name.
    pub name_pattern_id: String,
    pub name_pattern_location: String,
    pub name_pattern_verts: String,
    pub swap_yz: bool,
    pub sort_mode: SortMode,
    pub export_selected: bool,
    pub exclude_hidden_from_render: bool,
    pub parse_material_name: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            mesh_dir: PathBuf::from("."),
            include_path: None,
            outer_namespace: "bl".to_string(),
            name_pattern_id: "{}Id".to_string(),
            name_pattern_location: "{}Location".to_string(),
            name_pattern_verts: "{}Verts".to_string(),
            swap_yz: true,
            sort_mode: SortMode::default(),
            export_selected: false,
            exclude_hidden_from_render: false,
            parse_material_name: false,
        }
    }
}

impl BuildSettings {
    pub fn log_summary(&self) {
        info!("Mesh directory: {}", self.mesh_dir.display());
        match &self.include_path {
            Some(path) => info!("Include file: {}", path.display()),
            None => info!("Include file: disabled"),
        }
        debug!("Outer namespace: {}", self.outer_namespace);
        debug!(
            "Name patterns: id {}, location {}, verts {}",
            self.name_pattern_id, self.name_pattern_location, self.name_pattern_verts
        );
        debug!(
            "Swap Y/Z: {}, sort mode: {:?}, export selected: {}, exclude hidden: {}, parse material names: {}",
            self.swap_yz,
            self.sort_mode,
            self.export_selected,
            self.exclude_hidden_from_render,
            self.parse_material_name
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub swap_yz: bool,
    /// Name materials `<material>_<NNN>` instead of after their texture and scene.
    pub numeric_material_names: bool,
    /// Move each object's origin to the mean of its vertices.
    pub origin_to_geometry: bool,
    /// Look for the referenced textures next to the `Meshes` directory.
    pub resolve_textures: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        ImportSettings {
            swap_yz: true,
            numeric_material_names: false,
            origin_to_geometry: true,
            resolve_textures: true,
        }
    }
}
