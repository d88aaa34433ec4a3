use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::sorter::SortMode;

mod options;

pub use options::{BuildSettings, ImportSettings};

#[derive(Parser, Debug)]
#[command(name = "orbmesh")]
#[command(version = concat!(env!("VERGEN_GIT_BRANCH"), "/", env!("VERGEN_GIT_SHA"), " ", env!("VERGEN_BUILD_DATE")))]
#[command(about = "Converts scene snapshots to Orbiter meshes and back")]
pub struct CliArgs {
    #[arg(long, short, global = true, env = "ORBMESH_VERBOSE")]
    pub verbose: bool,

    /// Write the log to this file instead of stderr.
    #[arg(long, global = true, env = "ORBMESH_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub operation_mode: OperationMode,
}

#[derive(Subcommand, Debug)]
pub enum OperationMode {
    /// Write the scenes of a project as .msh files (and a C++ include file).
    Export(ExportArgs),
    /// Read .msh files into a project.
    Import(ImportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// The project (scene snapshot) to export.
    #[arg(long, env = "ORBMESH_SCENE")]
    pub scene: PathBuf,

    #[arg(long, env = "ORBMESH_MESH_DIR", default_value = ".")]
    pub mesh_dir: PathBuf,

    #[arg(long, env = "ORBMESH_INCLUDE", conflicts_with = "no_include")]
    pub include: Option<PathBuf>,

    #[arg(long)]
    pub no_include: bool,

    #[arg(long, default_value = "bl")]
    pub outer_namespace: String,

    #[arg(long, default_value = "{}Id")]
    pub id_pattern: String,

    #[arg(long, default_value = "{}Location")]
    pub location_pattern: String,

    #[arg(long, default_value = "{}Verts")]
    pub verts_pattern: String,

    /// Keep the scene's Z-up axes instead of converting to Y-up.
    #[arg(long)]
    pub no_swap_yz: bool,

    #[arg(long, value_enum, default_value_t = SortModeArg::Priority)]
    pub sort_mode: SortModeArg,

    /// Only export the selected objects of the active scene.
    #[arg(long)]
    pub selected: bool,

    /// Leave objects that are hidden from render out of the mesh.
    #[arg(long)]
    pub exclude_hidden: bool,

    /// Use the material name up to the first underscore.
    #[arg(long)]
    pub parse_material_name: bool,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// The project to write.
    #[arg(long, env = "ORBMESH_OUT")]
    pub out: PathBuf,

    /// Add the imported scenes to an existing project.
    #[arg(long)]
    pub append: bool,

    #[arg(long)]
    pub no_swap_yz: bool,

    #[arg(long)]
    pub numeric_material_names: bool,

    /// Keep the file's origin instead of moving it to the center of each group.
    #[arg(long)]
    pub keep_origin: bool,

    /// Also dump every imported mesh as Wavefront obj into this directory.
    #[arg(long)]
    pub obj_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortModeArg {
    Priority,
    NameAsc,
    NameDesc,
}

impl From<SortModeArg> for SortMode {
    fn from(value: SortModeArg) -> Self {
        match value {
            SortModeArg::Priority => SortMode::PriorityValue,
            SortModeArg::NameAsc => SortMode::NameAscending,
            SortModeArg::NameDesc => SortMode::NameDescending,
        }
    }
}

impl ExportArgs {
    pub fn build_settings(&self) -> BuildSettings {
        let include_path = match (&self.include, self.no_include) {
            (_, true) => None,
            (Some(path), false) => Some(path.clone()),
            (None, false) => None,
        };

        BuildSettings {
            mesh_dir: self.mesh_dir.clone(),
            include_path,
            outer_namespace: self.outer_namespace.clone(),
            name_pattern_id: self.id_pattern.clone(),
            name_pattern_location: self.location_pattern.clone(),
            name_pattern_verts: self.verts_pattern.clone(),
            swap_yz: !self.no_swap_yz,
            sort_mode: self.sort_mode.into(),
            export_selected: self.selected,
            exclude_hidden_from_render: self.exclude_hidden,
            parse_material_name: self.parse_material_name,
        }
    }
}

impl ImportArgs {
    pub fn import_settings(&self) -> ImportSettings {
        ImportSettings {
            swap_yz: !self.no_swap_yz,
            numeric_material_names: self.numeric_material_names,
            origin_to_geometry: !self.keep_origin,
            resolve_textures: true,
        }
    }
}
