#[cfg(test)]
mod octree_tests {
    use crate::octree::types::{Cell, CellContent};
    use crate::octree::Octree;
    use crate::scene::triangle::Triangle;
    use crate::spatial::math::vector::V3c;
    use crate::spatial::TOLERANCE;

    fn wall(
        a: [f64; 3],
        b: [f64; 3],
        c: [f64; 3],
        emissivity: f64,
    ) -> Triangle {
        Triangle::new(
            [a.into(), b.into(), c.into()],
            V3c::unit(0.7),
            V3c::unit(emissivity),
        )
    }

    /// A closed box spanning [0,2]³ with two emitting patches under the
    /// ceiling, normals facing the interior.
    fn cornell_box() -> Vec<Triangle> {
        vec![
            // floor, facing up
            wall([0., 0., 0.], [2., 0., 2.], [2., 0., 0.], 0.),
            wall([0., 0., 0.], [0., 0., 2.], [2., 0., 2.], 0.),
            // ceiling, facing down
            wall([0., 2., 0.], [2., 2., 0.], [2., 2., 2.], 0.),
            wall([0., 2., 0.], [2., 2., 2.], [0., 2., 2.], 0.),
            // back wall at z=2, facing -z
            wall([0., 0., 2.], [0., 2., 2.], [2., 2., 2.], 0.),
            wall([0., 0., 2.], [2., 2., 2.], [2., 0., 2.], 0.),
            // left wall at x=0, facing +x
            wall([0., 0., 0.], [0., 2., 0.], [0., 2., 2.], 0.),
            wall([0., 0., 0.], [0., 2., 2.], [0., 0., 2.], 0.),
            // right wall at x=2, facing -x
            wall([2., 0., 0.], [2., 2., 2.], [2., 2., 0.], 0.),
            wall([2., 0., 0.], [2., 0., 2.], [2., 2., 2.], 0.),
            // light patches just below the ceiling, facing down
            wall([0.5, 1.98, 0.5], [1.5, 1.98, 0.5], [1.5, 1.98, 1.5], 100.),
            wall([0.5, 1.98, 0.5], [1.5, 1.98, 1.5], [0.5, 1.98, 1.5], 100.),
        ]
    }

    fn assert_items_overlap_cell(cell: &Cell, triangles: &[Triangle]) {
        let cell_bound = cell.bound.as_aabb().expanded(TOLERANCE);
        match &cell.content {
            CellContent::Items(items) => {
                for &item in items {
                    assert!(triangles[item as usize].bound().overlaps(&cell_bound));
                }
            }
            CellContent::Subcells(subcells) => {
                for subcell in subcells.iter().flatten() {
                    assert_items_overlap_cell(subcell, triangles);
                }
            }
        }
    }

    #[test]
    fn test_build_subdivides_and_contains_items() {
        let triangles = cornell_box();
        let tree = Octree::new(V3c::new(1., 1., -2.), &triangles);

        assert!(tree.depth() >= 2);
        assert_items_overlap_cell(&tree.root, &triangles);
        // the root envelopes the eye position even outside the geometry
        assert!(tree
            .root
            .bound
            .contains_point(&V3c::new(1., 1., -2.), TOLERANCE));
    }

    #[test]
    fn test_small_scenes_stay_leaves() {
        let triangles = cornell_box()[..4].to_vec();
        let tree = Octree::new(V3c::unit(1.), &triangles);
        assert!(tree.depth() == 1);
    }

    #[test]
    fn test_query_matches_linear_scan() {
        let triangles = cornell_box();
        let tree = Octree::new(V3c::new(1., 1., 1.), &triangles);
        let origin = V3c::new(1., 1., 1.);

        let directions = [
            V3c::new(0., -1., 0.),
            V3c::new(0., 1., 0.),
            V3c::new(1., 0., 0.),
            V3c::new(-1., 0., 0.),
            V3c::new(0., 0., 1.),
            V3c::new(0.3, -0.5, 0.2).normalized(),
            V3c::new(-0.7, 0.1, 0.7).normalized(),
        ];
        for direction in directions {
            let (id, hit) = tree
                .intersection(&triangles, origin, direction, None)
                .unwrap();

            // reference: nearest over a linear scan of all triangles
            let mut nearest = f64::INFINITY;
            let mut nearest_id = u32::MAX;
            for (index, triangle) in triangles.iter().enumerate() {
                if let Some(distance) = triangle.intersection(origin, direction) {
                    if distance < nearest {
                        nearest = distance;
                        nearest_id = index as u32;
                    }
                }
            }
            assert!(id == nearest_id);
            assert!(((hit - origin).length() - nearest).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hit_point_lies_on_ray_and_in_triangle_bound() {
        let triangles = cornell_box();
        let tree = Octree::new(V3c::new(1., 1., 1.), &triangles);
        let origin = V3c::new(1., 1.5, 0.5);
        let direction = V3c::new(0.2, -0.8, 0.4).normalized();

        let (id, hit) = tree
            .intersection(&triangles, origin, direction, None)
            .unwrap();
        let along = direction * (hit - origin).dot(&direction);
        assert!(((hit - origin) - along).length() < TOLERANCE);
        assert!(triangles[id as usize].bound().contains_point(&hit));
    }

    #[test]
    fn test_last_hit_is_never_reported() {
        let triangles = cornell_box();
        let tree = Octree::new(V3c::new(1., 1., 1.), &triangles);

        // from a point on the floor, straight along the floor plane
        let origin = V3c::new(1., 0., 1.);
        for last_hit in [0u32, 1u32] {
            if let Some((id, _)) =
                tree.intersection(&triangles, origin, V3c::new(1., 0., 0.), Some(last_hit))
            {
                assert!(id != last_hit);
            }
        }
    }

    #[test]
    fn test_degenerate_overlap_curtails_subdivision() {
        // nine identical scene-spanning triangles would subdivide forever
        // without the inheritance counter
        let triangles: Vec<Triangle> = (0..9)
            .map(|_| {
                Triangle::new(
                    [
                        V3c::new(0., 0., 0.),
                        V3c::new(4., 0., 4.),
                        V3c::new(4., 4., 0.),
                    ],
                    V3c::unit(0.5),
                    V3c::unit(0.),
                )
            })
            .collect();
        let tree = Octree::new(V3c::unit(1.), &triangles);

        // construction terminates well within the level limit and the tree
        // still answers queries
        assert!(tree.depth() <= 44);
        let (id, hit) = tree
            .intersection(
                &triangles,
                V3c::new(2., 3., 1.),
                V3c::new(0., -1., 0.),
                None,
            )
            .unwrap();
        assert!(id < 9);
        assert!((hit - V3c::new(2., 1., 1.)).length() < 1e-9);
    }
}
