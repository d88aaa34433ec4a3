use std::path::PathBuf;

use approx::assert_relative_eq;
use glam::{Quat, Vec2, Vec3};
use orbmesh::error::MeshToolError;
use orbmesh::export::export_project;
use orbmesh::import::import_into;
use orbmesh::import::msh_importer::MshImporter;
use orbmesh::io::common::loader::SceneLoader;
use orbmesh::io::json::loader::JsonSceneFile;
use orbmesh::scene::types::{Face, SceneMaterial, Project, SceneObject, SceneSnapshot, ShadingMode, Transform};
use orbmesh::settings::{BuildSettings, ImportSettings};
use orbmesh_files::msh::reader::MshReader;

/// A small wedge: a quad floor, a quad ramp and two triangular sides.
fn wedge() -> SceneObject {
    let mut ramp = Face::new(&[1, 2, 5, 4]);
    ramp.normals = Some(vec![Vec3::new(0.7071, 0.0, 0.7071); 4]);

    let mut floor = Face::new(&[0, 3, 2, 1]);
    floor.uvs = Some(vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)]);

    SceneObject {
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 2.0),
        ],
        faces: vec![floor, ramp, Face::new(&[0, 1, 4]), Face::new(&[3, 5, 2])],
        shading: ShadingMode::Flat,
        transform: Transform {
            location: Vec3::new(3.0, -1.0, 0.5),
            rotation: Quat::from_rotation_z(0.5),
            scale: Vec3::ONE,
        },
        material: Some("ramp".to_string()),
        ..SceneObject::new("Wedge")
    }
}

fn textured_project() -> Project {
    let mut scene = SceneSnapshot::new("Hangar");
    scene.objects = vec![wedge()];
    scene.materials = vec![SceneMaterial {
        texture: Some("Textures/Hangar/ramp.dds".to_string()),
        ..SceneMaterial::new("ramp")
    }];
    Project {
        scenes: vec![scene],
        active_scene: 0,
    }
}

#[test_log::test]
fn export_then_import_restores_world_geometry() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let build = BuildSettings {
        mesh_dir: dir.path().join("Meshes"),
        ..BuildSettings::default()
    };
    let project = textured_project();
    export_project(&project, &build)?;

    let import = ImportSettings::default();
    let scene = MshImporter::new(&import).import_file(&dir.path().join("Meshes").join("Hangar.msh"))?;
    assert_eq!(scene.name, "Hangar");
    assert_eq!(scene.objects.len(), 1);

    let source = &project.scenes[0].objects[0];
    let imported = &scene.objects[0];
    assert_eq!(imported.name, "Wedge");

    // every polygon corner became one vertex, in face order
    let world = source.transform.to_affine();
    let expected_positions = source
        .faces
        .iter()
        .flat_map(|f| f.vertices.iter().map(|&i| world.transform_point3(source.positions[i as usize])))
        .collect::<Vec<_>>();
    let imported_positions = imported.world_positions();
    assert_eq!(imported_positions.len(), expected_positions.len());
    for (actual, expected) in imported_positions.iter().zip(&expected_positions) {
        assert_relative_eq!(*actual, *expected, epsilon = 1e-3);
    }

    // the fans come back with their original winding
    let triangles = imported.faces.iter().map(|f| f.vertices.clone()).collect::<Vec<_>>();
    assert_eq!(triangles[0], vec![0, 1, 2]);
    assert_eq!(triangles[1], vec![0, 2, 3]);
    assert_eq!(triangles.len(), 2 + 2 + 1 + 1);

    // split normals of the ramp, rotated into world space
    let ramp_normal = source.transform.rotation * Vec3::new(0.7071, 0.0, 0.7071).normalize();
    let ramp_face = &imported.faces[2];
    for normal in ramp_face.normals.as_ref().expect("imported normals") {
        assert_relative_eq!(*normal, ramp_normal, epsilon = 1e-3);
    }

    // uvs are flipped on the way out and back in
    let floor_uvs = imported.faces[0].uvs.as_ref().expect("imported uvs");
    assert_relative_eq!(floor_uvs[1], Vec2::new(0.0, 1.0), epsilon = 1e-4);
    assert_relative_eq!(floor_uvs[2], Vec2::new(1.0, 1.0), epsilon = 1e-4);

    let material = scene.material(imported.material.as_deref().expect("material")).expect("material exists");
    assert_eq!(material.name, "ramp_Hangar_ramp_Hangar");
    assert_eq!(material.texture.as_deref(), Some("Hangar\\ramp.dds"));
    assert_relative_eq!(material.specular_power, 10.0);
    Ok(())
}

#[test]
fn without_swap_geometry_is_verbatim() -> Result<(), anyhow::Error> {
    let text = "MSHX1\nGROUPS 1\nGEOM 3 1\n0 0 0\n1 0 0\n0 2 3\n0 1 2\nMATERIALS 0\nTEXTURES 0\n";
    let mesh = MshReader::parse_file(text.as_bytes())?;

    let settings = ImportSettings {
        swap_yz: false,
        origin_to_geometry: false,
        ..ImportSettings::default()
    };
    let scene = MshImporter::new(&settings).build_scene("Plain", &mesh, None);
    let object = &scene.objects[0];
    assert_eq!(object.name, "Group_0");
    assert_eq!(object.positions[2], Vec3::new(0.0, 2.0, 3.0));
    assert_eq!(object.faces[0].vertices, vec![0, 1, 2]);
    assert_eq!(object.transform, Transform::default());
    assert_eq!(object.faces[0].normals, None);
    Ok(())
}

#[test]
fn origin_moves_to_the_vertex_mean() -> Result<(), anyhow::Error> {
    let text = "MSHX1\nGROUPS 1\nGEOM 4 2\n0 0 0\n2 0 0\n2 4 0\n0 4 0\n0 1 2\n0 2 3\n";
    let mesh = MshReader::parse_file(text.as_bytes())?;
    let settings = ImportSettings::default();
    let scene = MshImporter::new(&settings).build_scene("Centered", &mesh, None);

    let object = &scene.objects[0];
    // file Y is scene Z
    assert_eq!(object.transform.location, Vec3::new(1.0, 0.0, 2.0));
    assert_eq!(object.positions[0], Vec3::new(-1.0, 0.0, -2.0));
    assert_eq!(object.faces[0].vertices, vec![0, 2, 1]);
    Ok(())
}

#[test]
fn one_material_per_material_texture_pair() -> Result<(), anyhow::Error> {
    let group = |label: &str, material: usize, texture: usize| {
        format!("LABEL {}\nMATERIAL {}\nTEXTURE {}\nGEOM 3 1\n0 0 0 0 1 0 0 0\n1 0 0 0 1 0 1 0\n0 0 1 0 1 0 0 1\n0 1 2\n", label, material, texture)
    };
    let text = format!(
        "MSHX1\nGROUPS 5\n{}{}{}{}{}MATERIALS 2\nwhite\nglass\nMATERIAL white\n1 1 1 1\n1 1 1 1\n0 0 0 1\n0 0 0 1\nMATERIAL glass\n0.5 0.5 0.5 0.2\n1 1 1 1\n1 1 1 1 50\n0 0 0 1\nTEXTURES 1\nHangar\\door.dds\n",
        group("DoorLeft", 1, 1),
        group("Window", 2, 0),
        group("DoorRight", 1, 1),
        group("Skylight", 2, 0),
        group("DoorTop", 1, 1),
    );
    let mesh = MshReader::parse_file(text.as_bytes())?;

    let settings = ImportSettings::default();
    let scene = MshImporter::new(&settings).build_scene("Hangar", &mesh, None);
    assert_eq!(scene.materials.len(), 2);
    assert_eq!(scene.materials[0].name, "white_Hangar_door_Hangar");
    assert_eq!(scene.materials[0].texture.as_deref(), Some("Hangar\\door.dds"));
    assert_eq!(scene.materials[1].name, "glass_Hangar");
    assert_eq!(scene.materials[1].specular_power, 50.0);

    let used = scene.objects.iter().map(|o| o.material.clone().unwrap_or_default()).collect::<Vec<_>>();
    assert_eq!(used, vec![
        "white_Hangar_door_Hangar",
        "glass_Hangar",
        "white_Hangar_door_Hangar",
        "glass_Hangar",
        "white_Hangar_door_Hangar"
    ]);

    // textured groups carry uvs, flipped back to v-up
    let door = scene.object("DoorLeft").expect("door");
    assert_eq!(door.faces[0].uvs.as_ref().map(|uvs| uvs[0]), Some(Vec2::new(0.0, 1.0)));
    assert_eq!(scene.object("Window").expect("window").faces[0].uvs, None);

    let numeric = ImportSettings {
        numeric_material_names: true,
        ..ImportSettings::default()
    };
    let scene = MshImporter::new(&numeric).build_scene("Hangar", &mesh, None);
    let names = scene.materials.iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["white_001", "glass_002"]);
    Ok(())
}

#[test]
fn groups_without_material_use_the_default() -> Result<(), anyhow::Error> {
    let text = "MSHX1\nGROUPS 2\nLABEL Hull\nGEOM 0 0\nLABEL Hull\nGEOM 0 0\nMATERIALS 0\nTEXTURES 0\n";
    let mesh = MshReader::parse_file(text.as_bytes())?;
    let settings = ImportSettings::default();
    let scene = MshImporter::new(&settings).build_scene("Bare", &mesh, None);

    assert_eq!(scene.materials.len(), 1);
    assert_eq!(scene.materials[0].name, "default_Bare");
    // labels may repeat in a file, object names may not
    assert_eq!(scene.objects[0].name, "Hull");
    assert_eq!(scene.objects[1].name, "Hull.001");
    Ok(())
}

#[test]
fn broken_file_leaves_the_project_alone() -> Result<(), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("good.msh");
    let bad = dir.path().join("bad.msh");
    std::fs::write(&good, "MSHX1\nGROUPS 1\nGEOM 3 1\n0 0 0\n1 0 0\n0 1 0\n0 1 2\nMATERIALS 0\nTEXTURES 0\n")?;
    std::fs::write(&bad, "MSHX1\nGROUPS 1\nGEOM 3 1\n0 0 0\n1 0 0\n0 1 0\n0 1 9\n")?;

    let store = JsonSceneFile::new(&dir.path().join("project.json"));
    let settings = ImportSettings::default();
    let paths: Vec<PathBuf> = vec![good.clone(), bad.clone()];

    let result = import_into(&store, false, &paths, &settings);
    match result {
        Err(MeshToolError::MalformedMeshFile { path, line, .. }) => {
            assert_eq!(path, bad);
            assert_eq!(line, 7);
        }
        other => panic!("expected a malformed mesh file, got {:?}", other),
    }
    assert!(!store.exists());

    import_into(&store, false, &[good.clone()], &settings)?;
    let project = import_into(&store, true, &[good], &settings)?;
    assert_eq!(project.scenes.len(), 2);
    assert_eq!(store.load_project()?, project);
    assert_eq!(project.active_scene, 1);
    Ok(())
}
