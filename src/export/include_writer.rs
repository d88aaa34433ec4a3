use std::io::Write;

use chrono::{DateTime, Local};
use glam::Vec3;
use orbmesh_files::msh::types::MshTexture;

use crate::export::types::{MeshGroup, ObjectMetadata, Vertex};
use crate::scene::types::{SceneObject, SceneSnapshot};
use crate::settings::BuildSettings;

/// One exported scene, as far as the include file is concerned.
pub struct IncludeScene<'a> {
    pub scene: &'a SceneSnapshot,
    /// In GROUPS order, the position is the group id.
    pub groups: &'a [(&'a SceneObject, MeshGroup)],
    pub textures: &'a [MshTexture],
    pub metadata: &'a [ObjectMetadata],
}

/// Renders the C++ header accompanying the mesh files: vertex arrays, texture and group ids,
/// locations, quad corners and panel rectangles.
pub struct IncludeWriter<'s, W: Write> {
    w: W,
    settings: &'s BuildSettings,
}

impl<'s, W: Write> IncludeWriter<'s, W> {
    /// Writes the header and opens the include guard (named after `home_scene`) and the outer namespace.
    pub fn begin(
        mut w: W,
        settings: &'s BuildSettings,
        home_scene: &str,
        generated_at: DateTime<Local>,
    ) -> std::io::Result<Self> {
        writeln!(w, "// Auto generated code file.  orbmesh: {}", crate::TOOL_VERSION)?;
        writeln!(w, "// Date: {}", generated_at.format("%a %b %e %H:%M:%S %Y"))?;
        writeln!(w)?;
        writeln!(w, "#include \"orbitersdk.h\"")?;
        writeln!(w)?;

        let guard = clean_identifier(home_scene).to_ascii_uppercase();
        writeln!(w, "#ifndef __{}_H", guard)?;
        writeln!(w, "#define __{}_H", guard)?;
        writeln!(w)?;
        writeln!(w, "namespace {}", settings.outer_namespace)?;
        writeln!(w, "{{")?;

        Ok(IncludeWriter { w, settings })
    }

    pub fn write_scene(&mut self, include: &IncludeScene) -> std::io::Result<()> {
        let w = &mut self.w;
        writeln!(w, "// Scene {}", include.scene.name)?;
        writeln!(w)?;
        writeln!(w, "  namespace {}", clean_identifier(include.scene.include_namespace()))?;
        writeln!(w, "  {{")?;

        for (object, group) in include.groups {
            if !object.flags.include_vertex_array {
                continue;
            }

            let name = expand_pattern(&self.settings.name_pattern_verts, &group.name);
            writeln!(w, "    const NTVERTEX {}[{}] = {{", name, group.vertices.len())?;
            let lines = group.vertices.iter().map(ntvertex).collect::<Vec<_>>();
            writeln!(w, "{}", lines.join(",\n"))?;
            writeln!(w, "    }};")?;
        }

        for (idx, texture) in include.textures.iter().enumerate() {
            writeln!(w, "    const DWORD TXIDX_{} = {};", clean_identifier(&texture.name), idx + 1)?;
        }

        let mesh_name = clean_identifier(&include.scene.name);
        writeln!(w, "    #define {}_MESH_NAME \"{}\"", mesh_name, include.scene.name)?;
        writeln!(w)?;

        for (idx, (_, group)) in include.groups.iter().enumerate() {
            let name = expand_pattern(&self.settings.name_pattern_id, &group.name);
            writeln!(w, "    const UINT {} = {};", name, idx)?;
        }

        for metadata in include.metadata {
            if let Some(location) = metadata.location {
                let name = expand_pattern(&self.settings.name_pattern_location, &metadata.name);
                writeln!(w, "    const VECTOR3 {} = {};", name, vector3(location))?;
            }

            if let Some(quad) = &metadata.quad {
                for (idx, corner) in quad.iter().enumerate() {
                    writeln!(w, "    const VECTOR3 {}_QUAD_{} = {};", metadata.name, idx, vector3(*corner))?;
                }
            }

            if let Some(size) = metadata.size {
                writeln!(w, "    const double {}_Width = {:.4};", metadata.name, size.x)?;
                writeln!(w, "    const double {}_Height = {:.4};", metadata.name, size.y)?;
            }

            if let Some(rect) = metadata.rect {
                writeln!(
                    w,
                    "    const RECT {}_RC = {{{}, {}, {}, {}}};",
                    metadata.name,
                    rect.left.round() as i32,
                    rect.top.round() as i32,
                    rect.right.round() as i32,
                    rect.bottom.round() as i32
                )?;
            }
        }

        writeln!(w, "  }}")?;
        writeln!(w)?;
        Ok(())
    }

    /// Closes the outer namespace and the include guard.
    pub fn finish(mut self) -> std::io::Result<W> {
        writeln!(self.w, "}}")?;
        writeln!(self.w, "#endif")?;
        self.w.flush()?;
        Ok(self.w)
    }
}

fn expand_pattern(pattern: &str, name: &str) -> String {
    pattern.replace("{}", name)
}

/// Anything that isn't valid in a C++ identifier becomes `_`.
pub fn clean_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn vector3(v: Vec3) -> String {
    format!("{{{:.4}, {:.4}, {:.4}}}", v.x, v.y, v.z)
}

fn ntvertex(vertex: &Vertex) -> String {
    let uv = vertex.uv.unwrap_or_default();
    format!(
        "    {{{:.4}f, {:.4}f, {:.4}f, {:.4}f, {:.4}f, {:.4}f, {:.4}f, {:.4}f}}",
        vertex.position.x,
        vertex.position.y,
        vertex.position.z,
        vertex.normal.x,
        vertex.normal.y,
        vertex.normal.z,
        uv.x,
        uv.y
    )
}
