use glam::Vec3;

/// Orders `positions` farthest-first from `eye`, the draw order alpha blending needs.
///
/// Positions at the same distance are all kept and stay in their input order.
pub fn sort_back_to_front(eye: Vec3, positions: &[Vec3]) -> Vec<Vec3> {
    let mut keyed: Vec<(f32, Vec3)> = positions
        .iter()
        .map(|p| (eye.distance_squared(*p), *p))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn farthest_comes_first() {
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let windows = [
            Vec3::new(-1.5, 0.0, -0.48),
            Vec3::new(1.5, 0.0, 0.51),
            Vec3::new(0.0, 0.0, 0.7),
            Vec3::new(-0.3, 0.0, -2.3),
            Vec3::new(0.5, 0.0, -0.6),
        ];
        let sorted = sort_back_to_front(eye, &windows);
        assert_eq!(sorted.len(), windows.len());
        assert_eq!(sorted[0], Vec3::new(-0.3, 0.0, -2.3));
        assert_eq!(sorted[4], Vec3::new(0.0, 0.0, 0.7));
        for pair in sorted.windows(2) {
            assert!(eye.distance(pair[0]) >= eye.distance(pair[1]));
        }
    }

    #[test]
    fn equal_distances_are_not_collapsed() {
        let eye = Vec3::ZERO;
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(-1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, 2.0);
        let sorted = sort_back_to_front(eye, &[a, b, c]);
        assert_eq!(sorted, vec![c, a, b]);
    }

    #[test]
    fn empty_input_is_fine() {
        assert!(sort_back_to_front(Vec3::ONE, &[]).is_empty());
    }
}
