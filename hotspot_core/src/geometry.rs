// Polygon math: vertex-mean centroid, percent normalization, and hit-testing.
// The centroid is the plain mean of the vertices, not the area-weighted one.

use crate::registry::HotspotRegistry;
use crate::types::*;

/// Arithmetic mean of all vertices. `None` for an empty polygon.
pub fn centroid_of(polygon: &[PixelPoint]) -> Option<PixelPoint> {
    if polygon.is_empty() {
        return None;
    }

    let n = polygon.len() as f64;
    let (sum_x, sum_y) = polygon
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

    Some(PixelPoint::new(sum_x / n, sum_y / n))
}

/// Map a pixel point into percent of the diagram.
pub fn normalize(point: PixelPoint, diagram: DiagramSpace) -> AnchorPosition {
    AnchorPosition::new(
        100.0 * point.x / diagram.width,
        100.0 * point.y / diagram.height,
    )
}

/// Inverse of [`normalize`]: percent of the rendered image back to source pixels.
pub fn to_pixel(anchor: AnchorPosition, diagram: DiagramSpace) -> PixelPoint {
    PixelPoint::new(
        anchor.x_percent * diagram.width / 100.0,
        anchor.y_percent * diagram.height / 100.0,
    )
}

/// Popup anchor for a region: its centroid in percent space.
pub fn anchor_for(region: &RegionDefinition, diagram: DiagramSpace) -> Option<AnchorPosition> {
    centroid_of(&region.polygon).map(|c| normalize(c, diagram))
}

/// Even-odd ray-casting test. Points exactly on an edge may fall either way.
pub fn contains_point(polygon: &[PixelPoint], point: PixelPoint) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let vi = polygon[i];
        let vj = polygon[j];

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Region under a pixel point. Later regions render on top, so the last hit wins.
pub fn region_at(registry: &HotspotRegistry, point: PixelPoint) -> Option<&RegionId> {
    registry
        .regions()
        .iter()
        .rev()
        .find(|r| contains_point(&r.polygon, point))
        .map(|r| &r.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_square(size: f64) -> Vec<PixelPoint> {
        vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(size, 0.0),
            PixelPoint::new(size, size),
            PixelPoint::new(0.0, size),
        ]
    }

    #[test]
    fn square_anchor_in_larger_diagram() {
        let diagram = DiagramSpace::new(200.0, 200.0).unwrap();
        let centroid = centroid_of(&unit_square(100.0)).unwrap();
        assert_eq!(centroid, PixelPoint::new(50.0, 50.0));

        let anchor = normalize(centroid, diagram);
        assert_eq!(anchor, AnchorPosition::new(25.0, 25.0));
    }

    #[test]
    fn centroid_is_vertex_mean_not_area_centroid() {
        // Extra vertices crowded on the right edge pull the mean to the right,
        // while the area centroid of this square would stay at x = 5.
        let polygon = vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(10.0, 0.0),
            PixelPoint::new(10.0, 2.5),
            PixelPoint::new(10.0, 5.0),
            PixelPoint::new(10.0, 7.5),
            PixelPoint::new(10.0, 10.0),
            PixelPoint::new(0.0, 10.0),
        ];
        let c = centroid_of(&polygon).unwrap();
        assert!((c.x - 50.0 / 7.0).abs() < 1e-9);
        assert!((c.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_polygon_has_no_centroid() {
        assert!(centroid_of(&[]).is_none());
    }

    #[test]
    fn normalize_is_not_clamped() {
        let diagram = DiagramSpace::new(100.0, 50.0).unwrap();
        let anchor = normalize(PixelPoint::new(150.0, 25.0), diagram);
        assert_eq!(anchor, AnchorPosition::new(150.0, 50.0));
    }

    #[test]
    fn to_pixel_inverts_normalize() {
        let diagram = DiagramSpace::new(640.0, 480.0).unwrap();
        let p = to_pixel(AnchorPosition::new(50.0, 25.0), diagram);
        assert_eq!(p, PixelPoint::new(320.0, 120.0));
    }

    #[test]
    fn hit_test_concave_polygon() {
        // U shape: the notch at the top middle is outside.
        let u = vec![
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(10.0, 0.0),
            PixelPoint::new(10.0, 30.0),
            PixelPoint::new(20.0, 30.0),
            PixelPoint::new(20.0, 0.0),
            PixelPoint::new(30.0, 0.0),
            PixelPoint::new(30.0, 40.0),
            PixelPoint::new(0.0, 40.0),
        ];
        assert!(contains_point(&u, PixelPoint::new(5.0, 5.0)));
        assert!(contains_point(&u, PixelPoint::new(15.0, 35.0)));
        assert!(!contains_point(&u, PixelPoint::new(15.0, 10.0)));
        assert!(!contains_point(&u, PixelPoint::new(50.0, 10.0)));
    }

    #[test]
    fn region_at_prefers_topmost() {
        let diagram = DiagramSpace::new(100.0, 100.0).unwrap();
        let registry = HotspotRegistry::new(
            "overlap",
            diagram,
            vec![
                RegionDefinition::new("under", "Under", unit_square(50.0)),
                RegionDefinition::new("over", "Over", unit_square(20.0)),
            ],
        )
        .unwrap();

        assert_eq!(
            region_at(&registry, PixelPoint::new(10.0, 10.0)).map(|id| id.as_str()),
            Some("over")
        );
        assert_eq!(
            region_at(&registry, PixelPoint::new(40.0, 40.0)).map(|id| id.as_str()),
            Some("under")
        );
        assert!(region_at(&registry, PixelPoint::new(90.0, 90.0)).is_none());
    }

    fn polygon_strategy() -> impl Strategy<Value = Vec<PixelPoint>> {
        prop::collection::vec(
            (0.0f64..10_000.0, 0.0f64..10_000.0).prop_map(PixelPoint::from),
            3..24,
        )
    }

    proptest! {
        /// Only the set of vertices matters, not their order.
        #[test]
        fn centroid_ignores_winding(polygon in polygon_strategy()) {
            let forward = centroid_of(&polygon).unwrap();
            let mut reversed = polygon.clone();
            reversed.reverse();
            let backward = centroid_of(&reversed).unwrap();

            prop_assert!((forward.x - backward.x).abs() < 1e-6);
            prop_assert!((forward.y - backward.y).abs() < 1e-6);
        }

        #[test]
        fn far_corner_normalizes_to_one_hundred(
            width in 0.001f64..1e6,
            height in 0.001f64..1e6,
        ) {
            let diagram = DiagramSpace::new(width, height).unwrap();
            let anchor = normalize(PixelPoint::new(width, height), diagram);
            prop_assert!((anchor.x_percent - 100.0).abs() < 1e-9);
            prop_assert!((anchor.y_percent - 100.0).abs() < 1e-9);
        }

        #[test]
        fn centroid_stays_inside_bounding_box(polygon in polygon_strategy()) {
            let c = centroid_of(&polygon).unwrap();
            let min_x = polygon.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
            let max_x = polygon.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(c.x >= min_x - 1e-6 && c.x <= max_x + 1e-6);
        }
    }
}
