#![forbid(unsafe_code)]

mod catalog;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use glscene_assets::{load_obj, parse_obj};
    use glscene_core::{EngineError, SceneKind, ViewerConfig};

    // ---- Golden fixtures (JSON contracts) ----
    const VIEWER_VALID_JSON: &str = include_str!("../fixtures/viewer_valid.json");
    const VIEWER_BAD_SCENE_JSON: &str = include_str!("../fixtures/viewer_bad_scene.json");
    const VIEWER_ZERO_WIDTH_JSON: &str = include_str!("../fixtures/viewer_zero_width.json");
    const VIEWER_UNKNOWN_FIELD_JSON: &str = include_str!("../fixtures/viewer_unknown_field.json");

    // ---- Golden fixtures (model import) ----
    const CUBE_OBJ: &str = include_str!("../fixtures/cube.obj");
    const CUBE_MTL: &str = include_str!("../fixtures/cube.mtl");
    const BAD_INDEX_OBJ: &str = include_str!("../fixtures/bad_index.obj");

    fn temp_dir(name: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let p = std::env::temp_dir().join(format!("glscene_contract_tests_{name}_{ts}"));
        fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn write_temp_fixture(name: &str, contents: &str) -> PathBuf {
        let dir = temp_dir(name);
        let p = dir.join(format!("{name}.json"));
        fs::write(&p, contents).expect("write fixture");
        p
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn golden_viewer_valid_json_loads() {
        let path = write_temp_fixture("viewer_valid", VIEWER_VALID_JSON);

        let cfg = ViewerConfig::from_json_path(&path).expect("viewer_valid.json should load");
        assert_eq!(cfg.scene, SceneKind::Cubemap);
        assert_eq!((cfg.window.width, cfg.window.height), (1024, 768));
        assert!(!cfg.window.vsync);
        assert_eq!(cfg.assets.as_deref(), Some(Path::new("assets")));
        assert_eq!(cfg.camera.position, [0.0, 1.0, 5.0]);

        let cam = cfg.camera.build();
        assert!(cam.front.y < 0.0, "negative pitch should look down");

        cleanup(&path);
    }

    #[test]
    fn golden_viewer_bad_scene_is_rejected() {
        let path = write_temp_fixture("viewer_bad_scene", VIEWER_BAD_SCENE_JSON);

        let err = ViewerConfig::from_json_path(&path)
            .expect_err("viewer_bad_scene.json must fail (unknown scene)");
        assert!(matches!(err, EngineError::Json { .. }), "got: {err}");
        assert!(err.to_string().contains("unknown scene"), "got: {err}");

        cleanup(&path);
    }

    #[test]
    fn golden_viewer_zero_width_is_rejected() {
        let path = write_temp_fixture("viewer_zero_width", VIEWER_ZERO_WIDTH_JSON);

        let err = ViewerConfig::from_json_path(&path)
            .expect_err("viewer_zero_width.json must fail validation");
        assert!(matches!(err, EngineError::InvalidConfig { .. }), "got: {err}");
        assert!(err.to_string().contains("non-zero"), "got: {err}");

        cleanup(&path);
    }

    #[test]
    fn golden_viewer_unknown_field_is_rejected() {
        let path = write_temp_fixture("viewer_unknown_field", VIEWER_UNKNOWN_FIELD_JSON);

        let err = ViewerConfig::from_json_path(&path)
            .expect_err("viewer_unknown_field.json must fail (unknown field)");
        assert!(err.to_string().contains("fullscreen"), "got: {err}");

        cleanup(&path);
    }

    #[test]
    fn golden_cube_obj_imports_with_materials() {
        let dir = temp_dir("cube_obj");
        let obj = dir.join("cube.obj");
        fs::write(&obj, CUBE_OBJ).expect("write obj");
        fs::write(dir.join("cube.mtl"), CUBE_MTL).expect("write mtl");

        let model = load_obj(&obj).expect("cube.obj should import");
        assert_eq!(model.directory, dir);
        assert_eq!(model.meshes.len(), 1);

        let mesh = &model.meshes[0];
        assert_eq!(mesh.name, "cube");
        // 6 quads -> 12 triangles; each face has its own normal so no corners are shared
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.vertices.len(), 24);
        assert!(mesh.indices.iter().all(|i| (*i as usize) < mesh.vertices.len()));

        assert_eq!(mesh.material.name, "crate");
        assert_eq!(mesh.material.shininess, 64.0);
        assert_eq!(
            mesh.material.diffuse_map.as_deref(),
            Some(Path::new("crate_diffuse.png"))
        );
        assert_eq!(
            mesh.material.specular_map.as_deref(),
            Some(Path::new("crate_specular.png"))
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn golden_cube_obj_without_mtl_still_loads() {
        let dir = temp_dir("cube_no_mtl");
        let obj = dir.join("cube.obj");
        fs::write(&obj, CUBE_OBJ).expect("write obj");

        let model = load_obj(&obj).expect("missing MTL is not fatal");
        let mesh = &model.meshes[0];
        assert_eq!(mesh.material.name, "crate");
        assert!(mesh.material.diffuse_map.is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn golden_bad_index_obj_reports_line() {
        let err = parse_obj(BAD_INDEX_OBJ, Path::new("bad_index.obj"), |_| None)
            .expect_err("bad_index.obj must fail");
        assert_eq!(
            err.to_string(),
            "model error at bad_index.obj:5: position index 4 out of range (have 3)"
        );
    }

    #[test]
    fn missing_model_file_is_io_error() {
        let err = load_obj("/no/such/model.obj").expect_err("missing model must fail");
        assert!(matches!(err, EngineError::Io { .. }), "got: {err}");
    }
}
