use std::fs::File;
use std::io::BufReader;

use crate::ParserError;
use crate::common::types::{C2Vector, C3Vector, CColor};
use crate::msh::reader::MshReader;
use crate::msh::types::MshFile;
use crate::msh::writer::MshWriter;

fn load_panel() -> Result<MshFile, anyhow::Error> {
    let test_data = std::env::current_dir()?.join("test-data");
    let file = BufReader::new(File::open(test_data.join("CockpitPanel.msh"))?);
    Ok(MshReader::parse_file(file)?)
}

fn malformed_line(input: &str) -> Option<usize> {
    match MshReader::parse_file(input.as_bytes()) {
        Err(ParserError::MalformedMeshFile { line, .. }) => Some(line),
        _ => None,
    }
}

#[test]
fn parse_panel_groups() -> Result<(), anyhow::Error> {
    let mesh = load_panel()?;
    assert_eq!(mesh.groups.len(), 3);

    let panel = &mesh.groups[0];
    assert_eq!(panel.label.as_deref(), Some("Panel_Front"));
    assert_eq!(panel.flag, 2);
    assert_eq!(panel.vertices.len(), 4);
    assert_eq!(panel.triangles, vec![[0, 2, 1], [0, 3, 2]]);
    assert_eq!(panel.vertices[1].position, C3Vector::new(1.0, 0.0, 0.5));
    assert_eq!(panel.vertices[1].normal, Some(C3Vector::new(0.0, 0.0, -1.0)));
    assert_eq!(panel.vertices[1].uv, Some(C2Vector::new(1.0, 1.0)));

    // lower case keywords, and material/texture carried over from the panel
    let switch = &mesh.groups[1];
    assert_eq!(switch.label.as_deref(), Some("Switch"));
    assert_eq!(switch.material_index, 1);
    assert_eq!(switch.texture_index, 1);
    assert_eq!(switch.vertices[2].uv, None);

    let marker = &mesh.groups[2];
    assert!(marker.nonormal);
    assert_eq!(marker.flag, 4);
    assert_eq!(marker.material_index, 2);
    assert_eq!(marker.texture_index, 0);
    assert_eq!(marker.vertices[0].normal, None);
    assert_eq!(marker.vertices[0].uv, Some(C2Vector::new(0.5, 0.5)));
    Ok(())
}

#[test]
fn parse_panel_materials_and_textures() -> Result<(), anyhow::Error> {
    let mesh = load_panel()?;
    assert_eq!(mesh.materials.len(), 2);

    let grey = mesh.material(1).expect("material 1");
    assert_eq!(grey.name, "panel_grey");
    assert_eq!(grey.diffuse, CColor::new(0.5, 0.5, 0.5, 1.0));
    assert_eq!(grey.specular_power, 20.0);

    // the comment after the name must not leak into it, and a missing power means 0
    let lamp = mesh.material(2).expect("material 2");
    assert_eq!(lamp.name, "lamp");
    assert_eq!(lamp.specular_power, 0.0);
    assert_eq!(lamp.emissive, CColor::new(1.0, 0.7, 0.1, 1.0));
    assert!(mesh.material(0).is_none());

    assert_eq!(mesh.textures.len(), 1);
    let texture = mesh.texture(1).expect("texture 1");
    assert_eq!(texture.name, "Panel\\front.dds");
    assert!(texture.dynamic);
    Ok(())
}

#[test]
fn written_panel_reads_back_identically() -> Result<(), anyhow::Error> {
    let mesh = load_panel()?;
    let mut buf = Vec::new();
    MshWriter::write_file(&mut buf, &mesh)?;

    let text = String::from_utf8(buf)?;
    assert!(text.starts_with("MSHX1\nGROUPS 3\nLABEL Panel_Front\n"));
    assert!(text.contains("0.100 0.100 0.100 1.000 20.000\n"));
    assert!(text.ends_with("TEXTURES 1\nPanel\\front.dds D\n"));

    let reread = MshReader::parse_file(text.as_bytes())?;
    assert_eq!(reread, mesh);
    Ok(())
}

#[test]
fn obj_dump_uses_global_indices() -> Result<(), anyhow::Error> {
    let mesh = load_panel()?;
    let mut buf = Vec::new();
    mesh.dump_to_wavefront_obj(&mut buf)?;

    let text = String::from_utf8(buf)?;
    assert_eq!(text.lines().filter(|l| l.starts_with("o ")).count(), 3);
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 10);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 4);
    // first triangle of the second group, offset by the 4 panel vertices
    assert!(text.contains("f 5/5/5 6/6/6 7/7/7\n"));
    Ok(())
}

#[test]
fn missing_header() {
    assert_eq!(malformed_line("GROUPS 0\nMATERIALS 0\nTEXTURES 0\n"), Some(1));
}

#[test]
fn triangle_index_out_of_range() {
    let input = "MSHX1\nGROUPS 1\nGEOM 3 1\n0 0 0\n1 0 0\n0 1 0\n0 1 3\n";
    assert_eq!(malformed_line(input), Some(7));
}

#[test]
fn material_index_out_of_range() {
    let input = "MSHX1\nGROUPS 1\nMATERIAL 2\nGEOM 0 0\nMATERIALS 0\nTEXTURES 0\n";
    assert_eq!(malformed_line(input), Some(3));
}

#[test]
fn bad_vertex_token_count() {
    let input = "MSHX1\nGROUPS 1\nGEOM 1 0\n0 0 0 1\n";
    assert_eq!(malformed_line(input), Some(4));
}

#[test]
fn malformed_number() {
    let input = "MSHX1\nGROUPS 1\nGEOM 1 0\n0 zero 0\n";
    assert_eq!(malformed_line(input), Some(4));
}

#[test]
fn premature_end_of_file() {
    let input = "MSHX1\nGROUPS 1\nGEOM 2 0\n0 0 0\n";
    assert_eq!(malformed_line(input), Some(5));
}

#[test]
fn invalid_material_value() {
    let input = "MSHX1\nGROUPS 0\nMATERIALS 1\nhull\nMATERIAL hull\n0.5 0.5 abc 1\n";
    match MshReader::parse_file(input.as_bytes()) {
        Err(ParserError::InvalidMaterialValue { line, value }) => {
            assert_eq!(line, 6);
            assert_eq!(value, "abc");
        }
        other => panic!("expected InvalidMaterialValue, got {:?}", other),
    }
}

#[test]
fn trailing_blocks_are_optional() -> Result<(), anyhow::Error> {
    let mesh = MshReader::parse_file("MSHX1\nGROUPS 1\nGEOM 0 0\n".as_bytes())?;
    assert_eq!(mesh.groups.len(), 1);
    assert!(mesh.materials.is_empty());
    assert!(mesh.textures.is_empty());
    Ok(())
}

#[test]
fn oversized_group_count() {
    assert_eq!(malformed_line("MSHX1\nGROUPS 100000000000000000\n"), Some(3));
}

#[test]
fn oversized_vertex_count() {
    assert_eq!(malformed_line("MSHX1\nGROUPS 1\nGEOM 100000000000000000 0\n"), Some(4));
}

#[test]
fn oversized_triangle_count() {
    let input = "MSHX1\nGROUPS 1\nGEOM 3 100000000000000000\n0 0 0\n1 0 0\n0 1 0\n";
    assert_eq!(malformed_line(input), Some(7));
}

#[test]
fn oversized_material_count() {
    assert_eq!(malformed_line("MSHX1\nGROUPS 0\nMATERIALS 100000000000000000\n"), Some(4));
}

#[test]
fn oversized_texture_count() {
    assert_eq!(malformed_line("MSHX1\nGROUPS 0\nMATERIALS 0\nTEXTURES 100000000000000000\n"), Some(5));
}
