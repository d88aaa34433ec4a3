use std::io::Write;

use crate::ParserError;
use crate::common::types::{C3Vector, CColor};
use crate::msh::types::{MSH_MAGIC, MshFile, MshGroup, MshMaterial, MshTexture, MshVertex};

/// Serializes [`MshFile`]s. Positions, normals and uvs are written with four decimals, material
/// values with three, which is what the simulator's own tooling emits.
pub struct MshWriter {}

impl MshWriter {
    pub fn write_file<W: Write>(w: &mut W, file: &MshFile) -> Result<(), ParserError> {
        writeln!(w, "{}", MSH_MAGIC)?;
        writeln!(w, "GROUPS {}", file.groups.len())?;
        for group in &file.groups {
            MshWriter::write_group(w, group)?;
        }

        writeln!(w, "MATERIALS {}", file.materials.len())?;
        for material in &file.materials {
            writeln!(w, "{}", material.name)?;
        }
        for material in &file.materials {
            MshWriter::write_material(w, material)?;
        }

        writeln!(w, "TEXTURES {}", file.textures.len())?;
        for texture in &file.textures {
            MshWriter::write_texture(w, texture)?;
        }

        Ok(())
    }

    pub fn write_group<W: Write>(w: &mut W, group: &MshGroup) -> Result<(), ParserError> {
        if let Some(label) = &group.label {
            writeln!(w, "LABEL {}", label)?;
        }
        writeln!(w, "MATERIAL {}", group.material_index)?;
        writeln!(w, "TEXTURE {}", group.texture_index)?;
        if let Some(wrap) = &group.tex_wrap {
            writeln!(w, "TEXWRAP {}", wrap)?;
        }
        if group.nonormal {
            writeln!(w, "NONORMAL")?;
        }
        writeln!(w, "FLAG {}", group.flag)?;
        writeln!(w, "GEOM {} {}", group.vertices.len(), group.triangles.len())?;

        for vertex in &group.vertices {
            writeln!(w, "{}", MshWriter::vertex_line(vertex, group.nonormal))?;
        }
        for [a, b, c] in &group.triangles {
            writeln!(w, "{} {} {}", a, b, c)?;
        }

        Ok(())
    }

    pub fn vertex_line(vertex: &MshVertex, nonormal: bool) -> String {
        let mut line = format_vector(&vertex.position);
        if !nonormal {
            // a normal-less vertex inside a group with normals would change the token count
            let normal = vertex.normal.unwrap_or_default();
            line.push(' ');
            line.push_str(&format_vector(&normal));
        }
        if let Some(uv) = &vertex.uv {
            line.push_str(&format!(" {:.4} {:.4}", uv.x, uv.y));
        }
        line
    }

    pub fn write_material<W: Write>(w: &mut W, material: &MshMaterial) -> Result<(), ParserError> {
        writeln!(w, "MATERIAL {}", material.name)?;
        writeln!(w, "{}", format_color(&material.diffuse))?;
        writeln!(w, "{}", format_color(&material.ambient))?;
        writeln!(
            w,
            "{} {:.3}",
            format_color(&material.specular),
            material.specular_power
        )?;
        writeln!(w, "{}", format_color(&material.emissive))?;
        Ok(())
    }

    pub fn write_texture<W: Write>(w: &mut W, texture: &MshTexture) -> Result<(), ParserError> {
        if texture.dynamic {
            writeln!(w, "{} D", texture.name)?;
        } else {
            writeln!(w, "{}", texture.name)?;
        }
        Ok(())
    }
}

fn format_vector(v: &C3Vector) -> String {
    format!("{:.4} {:.4} {:.4}", v.x, v.y, v.z)
}

fn format_color(c: &CColor) -> String {
    format!("{:.3} {:.3} {:.3} {:.3}", c.r, c.g, c.b, c.a)
}
