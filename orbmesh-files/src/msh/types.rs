use crate::ParserError;
use crate::common::types::{C2Vector, C3Vector, CColor};
use std::io::Write;

pub const MSH_MAGIC: &str = "MSHX1";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MshFile {
    pub groups: Vec<MshGroup>,
    pub materials: Vec<MshMaterial>,
    pub textures: Vec<MshTexture>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MshGroup {
    pub label: Option<String>,
    /// 1-based index into [`MshFile::materials`], 0 means no material.
    pub material_index: usize,
    /// 1-based index into [`MshFile::textures`], 0 means untextured.
    pub texture_index: usize,
    pub flag: u32,
    pub tex_wrap: Option<String>,
    /// Vertex lines carry no normals.
    pub nonormal: bool,
    pub vertices: Vec<MshVertex>,
    pub triangles: Vec<[u32; 3]>,
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MshVertex {
    pub position: C3Vector,
    pub normal: Option<C3Vector>,
    pub uv: Option<C2Vector>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MshMaterial {
    pub name: String,
    pub diffuse: CColor,
    pub ambient: CColor,
    pub specular: CColor,
    pub specular_power: f32,
    pub emissive: CColor,
}

impl MshMaterial {
    pub fn new(name: &str) -> Self {
        MshMaterial {
            name: name.to_string(),
            diffuse: CColor::default(),
            ambient: CColor::default(),
            specular: CColor::default(),
            specular_power: 0.0,
            emissive: CColor::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MshTexture {
    /// Path relative to the simulator's texture directories, e.g. `Vessel\hull.dds`.
    pub name: String,
    pub dynamic: bool,
}

impl MshFile {
    /// 1-based material lookup as used by [`MshGroup::material_index`].
    pub fn material(&self, index: usize) -> Option<&MshMaterial> {
        index.checked_sub(1).and_then(|idx| self.materials.get(idx))
    }

    /// 1-based texture lookup as used by [`MshGroup::texture_index`].
    pub fn texture(&self, index: usize) -> Option<&MshTexture> {
        index.checked_sub(1).and_then(|idx| self.textures.get(idx))
    }

    pub fn dump_to_wavefront_obj<W: Write>(&self, w: &mut W) -> Result<(), ParserError> {
        // obj indices are global and 1-based
        let mut base = 1usize;
        for (idx, group) in self.groups.iter().enumerate() {
            match &group.label {
                Some(label) => writeln!(w, "o {}", label)?,
                None => writeln!(w, "o Group_{}", idx)?,
            }

            for v in &group.vertices {
                writeln!(w, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
                let normal = v.normal.unwrap_or_default();
                writeln!(w, "vn {} {} {}", normal.x, normal.y, normal.z)?;
                let uv = v.uv.unwrap_or_default();
                writeln!(w, "vt {} {}", uv.x, uv.y)?;
            }

            for tri in &group.triangles {
                // same index for vert, texcoord and normal
                let [a, b, c] = tri.map(|i| i as usize + base);
                writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
            }

            base += group.vertices.len();
        }

        Ok(())
    }
}
