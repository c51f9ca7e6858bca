use crate::algorithms::placement::SelectedPaths;
use crate::model::{PlacedSegment, Polygon};

/// Path data for every drawn segment followed by every polygon outline.
pub fn to_svg_paths_impl(paths: &SelectedPaths, polygons: &[Polygon]) -> Vec<String> {
    let mut out = Vec::with_capacity(paths.len() + polygons.len());
    for seg in paths.iter() {
        match seg {
            PlacedSegment::Straight { p1, p2, .. } => {
                out.push(format!("M {} {} L {} {}", p1.x, p1.y, p2.x, p2.y))
            }
            PlacedSegment::Curved { p1, cp, p2, .. } => out.push(format!(
                "M {} {} Q {} {}, {} {}",
                p1.x, p1.y, cp.x, cp.y, p2.x, p2.y
            )),
        }
    }
    for poly in polygons {
        let mut verts = poly.vertices.iter();
        let first = match verts.next() {
            Some(v) => v,
            None => continue,
        };
        let mut d = format!("M {} {}", first.x, first.y);
        for v in verts {
            d.push_str(&format!(" L {} {}", v.x, v.y));
        }
        d.push_str(" Z");
        out.push(d);
    }
    out
}
