use geo::{Coord, CoordsIter, LineString, MultiPolygon};

use crate::projection::Projection;

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes), in projected
/// screen coordinates. Rings with unprojectable positions are skipped.
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>, projection: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), projection, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, projection, &mut out);
        }
    }

    out
}

/// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
fn ring_to_path(ring: &LineString<f64>, projection: &Projection, out: &mut String) {
    let Some(coords) = ring.coords_iter()
        .map(|coord| projection.project(&coord))
        .collect::<Option<Vec<Coord<f64>>>>()
    else { return };

    // The closing position is implied by 'Z'.
    let open = match coords.split_last() {
        Some((last, rest)) if rest.first() == Some(last) => rest,
        _ => &coords[..],
    };
    let Some((first, rest)) = open.split_first() else { return };

    out.push_str(&format!("M{:.3},{:.3}", first.x, first.y));
    for c in rest {
        out.push_str(&format!("L{:.3},{:.3}", c.x, c.y));
    }
    out.push('Z');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::square;
    use geo::{polygon, Rect};

    fn projection() -> Projection {
        Projection::fit_size(Rect::new((0.0, 0.0), (1.0, 1.0)), 100.0, 100.0, 0.0).unwrap()
    }

    #[test]
    fn square_becomes_one_closed_subpath() {
        let d = multipolygon_to_path(&square(0.0, 0.0, 1.0), &projection());
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('M').count(), 1);
        assert_eq!(d.matches('L').count(), 3);
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn holes_are_separate_subpaths() {
        let p = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)],
            interiors: [[(x: 0.25, y: 0.25), (x: 0.75, y: 0.25), (x: 0.75, y: 0.75), (x: 0.25, y: 0.75)]],
        );
        let d = multipolygon_to_path(&MultiPolygon(vec![p]), &projection());
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }
}
