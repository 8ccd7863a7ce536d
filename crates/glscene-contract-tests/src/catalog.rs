//! Catalog contracts: the scene list, its key bindings and names are user-facing (CLI `--list`,
//! number keys, config files) and must stay stable.

#[cfg(test)]
mod tests {
    use glscene_core::SceneKind;
    use glscene_scenes::{build_scene, scene_catalog};

    const EXPECTED: [(usize, &str); 9] = [
        (1, "triangle"),
        (2, "light"),
        (3, "model"),
        (4, "stencil"),
        (5, "blending"),
        (6, "framebuffer"),
        (7, "mirror"),
        (8, "cubemap"),
        (9, "test"),
    ];

    #[test]
    fn catalog_keys_and_names_are_stable() {
        let rows: Vec<(usize, &str)> = scene_catalog().iter().map(|(k, n, _)| (*k, *n)).collect();
        assert_eq!(rows, EXPECTED.to_vec());
    }

    #[test]
    fn every_catalog_name_parses_back_to_its_key() {
        for (key, name, description) in scene_catalog() {
            let kind: SceneKind = name.parse().expect("catalog name should parse");
            assert_eq!(SceneKind::from_index(key - 1), Some(kind));
            assert!(!description.is_empty());
            assert_eq!(build_scene(kind).kind(), kind);
        }
    }

    #[test]
    fn keys_past_the_catalog_select_nothing() {
        assert_eq!(SceneKind::from_index(EXPECTED.len()), None);
    }
}
