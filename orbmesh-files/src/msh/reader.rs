use std::io::BufRead;

use log::{trace, warn};

use crate::ParserError;
use crate::common::reader::{LineReader, Parseable, Statement, parse_flag, parse_material_f32, parse_usize};
use crate::common::types::{C2Vector, C3Vector, CColor};
use crate::msh::types::{MSH_MAGIC, MshFile, MshGroup, MshMaterial, MshTexture, MshVertex};

/// Where a group referenced its material and texture, so dangling indices can be reported precisely
/// once the material and texture tables have been read.
#[derive(Clone, Copy)]
struct GroupReferences {
    material_line: usize,
    texture_line: usize,
}

pub struct MshReader {}

impl MshReader {
    pub fn parse_file<R: BufRead>(rdr: R) -> Result<MshFile, ParserError> {
        let mut lines = LineReader::new(rdr);
        let group_count = MshReader::read_header(&mut lines)?;

        // counts come straight from the file, a bogus one has to run into the end of the file instead
        // of into the allocator
        let mut groups = Vec::new();
        let mut references = Vec::new();
        for _ in 0..group_count {
            // material and texture are sticky: a group that doesn't state them inherits from its predecessor
            let previous = groups.last().zip(references.last().copied());
            let (group, refs) = MshReader::read_group(&mut lines, previous)?;
            groups.push(group);
            references.push(refs);
        }

        let materials = MshReader::read_materials(&mut lines)?;
        let textures = MshReader::read_textures(&mut lines)?;

        for (group, refs) in groups.iter().zip(&references) {
            if group.material_index > materials.len() {
                return Err(ParserError::malformed(
                    refs.material_line,
                    format!(
                        "material index {} out of range, the file has {} materials",
                        group.material_index,
                        materials.len()
                    ),
                ));
            }

            if group.texture_index > textures.len() {
                return Err(ParserError::malformed(
                    refs.texture_line,
                    format!(
                        "texture index {} out of range, the file has {} textures",
                        group.texture_index,
                        textures.len()
                    ),
                ));
            }
        }

        trace!(
            "Parsed mesh: {} groups, {} materials, {} textures",
            groups.len(),
            materials.len(),
            textures.len()
        );

        Ok(MshFile {
            groups,
            materials,
            textures,
        })
    }

    fn read_header<R: BufRead>(lines: &mut LineReader<R>) -> Result<usize, ParserError> {
        let magic = lines.expect_statement(MSH_MAGIC)?;
        if !magic.text.to_ascii_uppercase().contains(MSH_MAGIC) {
            return Err(ParserError::malformed(magic.line, "file is missing the MSHX1 header"));
        }

        loop {
            let statement = lines.expect_statement("GROUPS")?;
            if statement.keyword() == "GROUPS" {
                let tokens = statement.tokens();
                if tokens.len() < 2 {
                    return Err(ParserError::malformed(statement.line, "GROUPS is missing the group count"));
                }
                return parse_usize(tokens[1], statement.line);
            }

            warn!("Ignoring statement before GROUPS in line {}: {}", statement.line, statement.text);
        }
    }

    fn read_group<R: BufRead>(
        lines: &mut LineReader<R>,
        previous: Option<(&MshGroup, GroupReferences)>,
    ) -> Result<(MshGroup, GroupReferences), ParserError> {
        let mut group = MshGroup {
            material_index: previous.map_or(0, |(g, _)| g.material_index),
            texture_index: previous.map_or(0, |(g, _)| g.texture_index),
            ..MshGroup::default()
        };
        let mut refs = previous.map_or(
            GroupReferences {
                material_line: lines.line() + 1,
                texture_line: lines.line() + 1,
            },
            |(_, refs)| refs,
        );

        let (vertex_count, triangle_count) = loop {
            let statement = lines.expect_statement("GEOM")?;
            let tokens = statement.tokens();
            match statement.keyword().as_str() {
                "LABEL" => {
                    let label = statement.rest().split_whitespace().collect::<Vec<_>>().join("_");
                    group.label = (!label.is_empty()).then_some(label);
                }
                "MATERIAL" => {
                    group.material_index = MshReader::statement_argument(&statement, &tokens, parse_usize)?;
                    refs.material_line = statement.line;
                }
                "TEXTURE" => {
                    group.texture_index = MshReader::statement_argument(&statement, &tokens, parse_usize)?;
                    refs.texture_line = statement.line;
                }
                "TEXWRAP" => {
                    let wrap = MshReader::statement_argument(&statement, &tokens, |t, _| Ok(t.to_string()))?;
                    group.tex_wrap = Some(wrap);
                }
                "NONORMAL" => group.nonormal = true,
                "FLAG" => {
                    group.flag = MshReader::statement_argument(&statement, &tokens, parse_flag)?;
                }
                "GEOM" => {
                    if tokens.len() < 3 {
                        return Err(ParserError::malformed(
                            statement.line,
                            "GEOM needs a vertex and a triangle count",
                        ));
                    }
                    break (
                        parse_usize(tokens[1], statement.line)?,
                        parse_usize(tokens[2], statement.line)?,
                    );
                }
                _ => warn!("Unknown group statement in line {}: {}", statement.line, statement.text),
            }
        };

        for _ in 0..vertex_count {
            let statement = lines.expect_statement("a vertex")?;
            group.vertices.push(MshReader::read_vertex(&statement)?);
        }

        for _ in 0..triangle_count {
            let statement = lines.expect_statement("a triangle")?;
            group
                .triangles
                .push(MshReader::read_triangle(&statement, vertex_count)?);
        }

        Ok((group, refs))
    }

    fn statement_argument<T>(
        statement: &Statement,
        tokens: &[&str],
        parse: impl Fn(&str, usize) -> Result<T, ParserError>,
    ) -> Result<T, ParserError> {
        match tokens.get(1) {
            Some(token) => parse(token, statement.line),
            None => Err(ParserError::malformed(
                statement.line,
                format!("{} statement without a value", statement.keyword()),
            )),
        }
    }

    /// `x y z`, `x y z u v` (NONORMAL), `x y z nx ny nz` or `x y z nx ny nz u v`.
    fn read_vertex(statement: &Statement) -> Result<MshVertex, ParserError> {
        let tokens = statement.tokens();
        let line = statement.line;
        let (normal, uv) = match tokens.len() {
            3 => (None, None),
            5 => (None, Some(C2Vector::parse(&tokens[3..5], line)?)),
            6 => (Some(C3Vector::parse(&tokens[3..6], line)?), None),
            8 => (
                Some(C3Vector::parse(&tokens[3..6], line)?),
                Some(C2Vector::parse(&tokens[6..8], line)?),
            ),
            n => {
                return Err(ParserError::malformed(
                    line,
                    format!("a vertex has 3, 5, 6 or 8 values, found {}", n),
                ));
            }
        };

        Ok(MshVertex {
            position: C3Vector::parse(&tokens[0..3], line)?,
            normal,
            uv,
        })
    }

    fn read_triangle(statement: &Statement, vertex_count: usize) -> Result<[u32; 3], ParserError> {
        let tokens = statement.tokens();
        if tokens.len() != 3 {
            return Err(ParserError::malformed(
                statement.line,
                format!("a triangle has 3 indices, found {}", tokens.len()),
            ));
        }

        let mut triangle = [0u32; 3];
        for (slot, token) in triangle.iter_mut().zip(tokens) {
            let index = parse_usize(token, statement.line)?;
            if index >= vertex_count {
                return Err(ParserError::malformed(
                    statement.line,
                    format!("vertex index {} out of range, the group has {} vertices", index, vertex_count),
                ));
            }
            *slot = index as u32;
        }

        Ok(triangle)
    }

    fn read_materials<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<MshMaterial>, ParserError> {
        let Some(statement) = lines.next_statement()? else {
            warn!("Mesh has no MATERIALS block");
            return Ok(Vec::new());
        };

        let tokens = statement.tokens();
        if statement.keyword() != "MATERIALS" || tokens.len() < 2 {
            return Err(ParserError::malformed(statement.line, "MATERIALS block missing or malformed"));
        }
        let count = parse_usize(tokens[1], statement.line)?;

        let mut materials = Vec::new();
        for _ in 0..count {
            let name = lines.expect_statement("a material name")?;
            materials.push(MshMaterial::new(&name.text));
        }

        for material in materials.iter_mut() {
            let header = lines.expect_statement("a MATERIAL header")?;
            if header.keyword() != "MATERIAL" {
                return Err(ParserError::malformed(
                    header.line,
                    format!("expected the MATERIAL header of {}", material.name),
                ));
            }

            material.diffuse = lines.expect_statement("the diffuse color")?.parse::<CColor>()?;
            material.ambient = lines.expect_statement("the ambient color")?.parse::<CColor>()?;

            let specular = lines.expect_statement("the specular color")?;
            let tokens = specular.tokens();
            match tokens.len() {
                4 => material.specular = specular.parse::<CColor>()?,
                5 => {
                    material.specular = CColor::parse(&tokens[0..4], specular.line)?;
                    material.specular_power = parse_material_f32(tokens[4], specular.line)?;
                }
                n => {
                    return Err(ParserError::malformed(
                        specular.line,
                        format!("specular needs 4 or 5 values, found {}", n),
                    ));
                }
            }

            material.emissive = lines.expect_statement("the emissive color")?.parse::<CColor>()?;
        }

        Ok(materials)
    }

    fn read_textures<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<MshTexture>, ParserError> {
        let Some(statement) = lines.next_statement()? else {
            return Ok(Vec::new());
        };

        let tokens = statement.tokens();
        if statement.keyword() != "TEXTURES" || tokens.len() < 2 {
            return Err(ParserError::malformed(statement.line, "TEXTURES block missing or malformed"));
        }
        let count = parse_usize(tokens[1], statement.line)?;

        let mut textures = Vec::new();
        for _ in 0..count {
            let texture = lines.expect_statement("a texture name")?;
            let (name, dynamic) = match texture.text.strip_suffix(" D") {
                Some(name) => (name.trim_end(), true),
                None => (texture.text.as_str(), false),
            };

            textures.push(MshTexture {
                name: name.to_string(),
                dynamic,
            });
        }

        Ok(textures)
    }
}
