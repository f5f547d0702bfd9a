//! Object outlines as line, rectangle and ellipse primitives.

use crate::error::UnsupportedShapeKind;
use crate::map::ObjectShape;
use macroquad::prelude::{vec2, Vec2};

/// Uncolored outline primitive in map pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Segment between two points.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
    },
    /// Rectangle outline between two corners.
    RectOutline {
        /// Top-left corner.
        min: Vec2,
        /// Bottom-right corner.
        max: Vec2,
    },
    /// Ellipse outline.
    EllipseOutline {
        /// Ellipse center.
        center: Vec2,
        /// Half extents along x and y.
        radii: Vec2,
    },
}

/// Turns an object shape placed at `origin` into outline primitives.
///
/// Polygons close back to their first point only when they have more than two
/// points; a two point polygon is a single open segment.
pub fn rasterize(shape: &ObjectShape, origin: Vec2) -> Result<Vec<Primitive>, UnsupportedShapeKind> {
    match shape {
        ObjectShape::Rectangle { width, height } => Ok(vec![Primitive::RectOutline {
            min: origin,
            max: origin + vec2(*width, *height),
        }]),
        ObjectShape::Ellipse { width, height } => {
            let radii = vec2(width / 2.0, height / 2.0);
            Ok(vec![Primitive::EllipseOutline {
                center: origin + radii,
                radii,
            }])
        }
        ObjectShape::Polyline(points) => Ok(polyline(points, origin)),
        ObjectShape::Polygon(points) => {
            let mut out = polyline(points, origin);
            if points.len() > 2 {
                out.push(Primitive::Line {
                    from: origin + points[points.len() - 1],
                    to: origin + points[0],
                });
            }
            Ok(out)
        }
        ObjectShape::Point => Err(UnsupportedShapeKind("point")),
        ObjectShape::Tile { .. } => Err(UnsupportedShapeKind("tile")),
        ObjectShape::Text { .. } => Err(UnsupportedShapeKind("text")),
    }
}

fn polyline(points: &[Vec2], origin: Vec2) -> Vec<Primitive> {
    points
        .windows(2)
        .map(|w| Primitive::Line {
            from: origin + w[0],
            to: origin + w[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Vec2> {
        (0..n).map(|i| vec2(i as f32 * 10.0, (i % 2) as f32 * 5.0)).collect()
    }

    fn lines(prims: &[Primitive]) -> Vec<(Vec2, Vec2)> {
        prims
            .iter()
            .map(|p| match p {
                Primitive::Line { from, to } => (*from, *to),
                other => panic!("expected a line, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn rect_spans_origin_to_origin_plus_size() {
        let prims = rasterize(
            &ObjectShape::Rectangle {
                width: 20.0,
                height: 10.0,
            },
            vec2(10.0, 10.0),
        )
        .unwrap();
        assert_eq!(
            prims,
            vec![Primitive::RectOutline {
                min: vec2(10.0, 10.0),
                max: vec2(30.0, 20.0)
            }]
        );
    }

    #[test]
    fn ellipse_is_centered_in_its_bounding_box() {
        let prims = rasterize(
            &ObjectShape::Ellipse {
                width: 40.0,
                height: 20.0,
            },
            vec2(100.0, 50.0),
        )
        .unwrap();
        assert_eq!(
            prims,
            vec![Primitive::EllipseOutline {
                center: vec2(120.0, 60.0),
                radii: vec2(20.0, 10.0)
            }]
        );
    }

    #[test]
    fn polyline_never_closes() {
        for n in 0..6 {
            let prims = rasterize(&ObjectShape::Polyline(points(n)), Vec2::ZERO).unwrap();
            assert_eq!(prims.len(), n.saturating_sub(1), "polyline with {n} points");
        }
    }

    #[test]
    fn polygon_closes_only_from_three_points() {
        for n in 0..=2 {
            let prims = rasterize(&ObjectShape::Polygon(points(n)), Vec2::ZERO).unwrap();
            assert_eq!(prims.len(), n.saturating_sub(1), "polygon with {n} points");
        }
        for n in 3..7 {
            let pts = points(n);
            let prims = rasterize(&ObjectShape::Polygon(pts.clone()), Vec2::ZERO).unwrap();
            assert_eq!(prims.len(), n, "polygon with {n} points");
            assert_eq!(
                *lines(&prims).last().unwrap(),
                (pts[n - 1], pts[0]),
                "closing segment runs last to first"
            );
        }
    }

    #[test]
    fn points_are_offset_by_origin() {
        let shape = ObjectShape::Polygon(vec![vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(4.0, 3.0)]);
        let segs = lines(&rasterize(&shape, vec2(100.0, 200.0)).unwrap());
        assert_eq!(
            segs,
            vec![
                (vec2(100.0, 200.0), vec2(104.0, 200.0)),
                (vec2(104.0, 200.0), vec2(104.0, 203.0)),
                (vec2(104.0, 203.0), vec2(100.0, 200.0)),
            ]
        );
    }

    #[test]
    fn shapes_without_outline_are_unsupported() {
        assert!(rasterize(&ObjectShape::Point, Vec2::ZERO).is_err());
        assert!(rasterize(&ObjectShape::Tile { gid: 3 }, Vec2::ZERO).is_err());
        assert!(rasterize(
            &ObjectShape::Text {
                text: "hi".into()
            },
            Vec2::ZERO
        )
        .is_err());
    }
}
