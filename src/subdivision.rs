use crate::{error::SubdivisionError, Edge, Site};

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use spade::{handles::VoronoiVertex, DelaunayTriangulation, Point2, Triangulation};

/// Axis-aligned bounding rectangle for the subdivision.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Rect {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Rect {
    pub fn from_size(width: f64, height: f64) -> Self {
        Rect {
            min: [0.0, 0.0],
            max: [width, height],
        }
    }

    fn diagonal(&self) -> f64 {
        let dx = self.max[0] - self.min[0];
        let dy = self.max[1] - self.min[1];

        (dx * dx + dy * dy).sqrt()
    }

    /// Liang-Barsky clipping. Returns `None` if no part of the segment is inside.
    pub fn clip_segment(&self, a: [f64; 2], b: [f64; 2]) -> Option<([f64; 2], [f64; 2])> {
        let d = [b[0] - a[0], b[1] - a[1]];
        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for axis in 0..2 {
            for &(p, q) in &[
                (-d[axis], a[axis] - self.min[axis]),
                (d[axis], self.max[axis] - a[axis]),
            ] {
                if p == 0.0 {
                    if q < 0.0 {
                        return None;
                    }
                    continue;
                }
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
                if t0 > t1 {
                    return None;
                }
            }
        }

        Some((
            [a[0] + t0 * d[0], a[1] + t0 * d[1]],
            [a[0] + t1 * d[0], a[1] + t1 * d[1]],
        ))
    }
}

/// Computes the boundaries of a planar subdivision around a set of sites.
pub trait SubdivisionAdapter {
    /// Edges must lie inside `bbox`. Each edge names the indices of the two sites it separates.
    fn compute_subdivision(
        &self,
        xs: &[f64],
        ys: &[f64],
        bbox: Rect,
    ) -> Result<Vec<Edge>, SubdivisionError>;
}

/// Voronoi diagram taken as the dual of a Delaunay triangulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoronoiSubdivision;

impl SubdivisionAdapter for VoronoiSubdivision {
    fn compute_subdivision(
        &self,
        xs: &[f64],
        ys: &[f64],
        bbox: Rect,
    ) -> Result<Vec<Edge>, SubdivisionError> {
        if xs.len() != ys.len() {
            return Err(SubdivisionError::MismatchedCoordinates {
                xs: xs.len(),
                ys: ys.len(),
            });
        }

        let mut triangulation: DelaunayTriangulation<Point2<f64>> = DelaunayTriangulation::new();
        // Coincident sites collapse into one vertex, which keeps the first site's index.
        let mut site_of_vertex = FnvHashMap::default();
        for (index, (&x, &y)) in xs.iter().zip(ys.iter()).enumerate() {
            let handle = triangulation.insert(Point2::new(x, y)).map_err(|e| {
                SubdivisionError::RejectedSite {
                    index,
                    x: x as f32,
                    y: y as f32,
                    reason: format!("{:?}", e),
                }
            })?;
            site_of_vertex.entry(handle.index()).or_insert(index);
        }

        let ray_length = bbox.diagonal() * 2.0;
        let mut edges = Vec::new();
        for voronoi_edge in triangulation.undirected_voronoi_edges() {
            let segment = match voronoi_edge.vertices() {
                [VoronoiVertex::Inner(from), VoronoiVertex::Inner(to)] => {
                    let (a, b) = (from.circumcenter(), to.circumcenter());
                    Some(([a.x, a.y], [b.x, b.y]))
                }
                [VoronoiVertex::Inner(from), VoronoiVertex::Outer(edge)]
                | [VoronoiVertex::Outer(edge), VoronoiVertex::Inner(from)] => {
                    let a = from.circumcenter();
                    let dir = edge.direction_vector();
                    let len = (dir.x * dir.x + dir.y * dir.y).sqrt();
                    if len > 0.0 {
                        let scale = ray_length / len;
                        Some(([a.x, a.y], [a.x + dir.x * scale, a.y + dir.y * scale]))
                    } else {
                        None
                    }
                }
                // Only happens when every site is collinear.
                [VoronoiVertex::Outer(_), VoronoiVertex::Outer(_)] => None,
            };

            let (start, end) = match segment.and_then(|(a, b)| bbox.clip_segment(a, b)) {
                Some(clipped) => clipped,
                None => continue,
            };

            let [v1, v2] = voronoi_edge.as_delaunay_edge().vertices();
            let (s1, s2) = match (
                site_of_vertex.get(&v1.fix().index()),
                site_of_vertex.get(&v2.fix().index()),
            ) {
                (Some(s1), Some(s2)) => (*s1, *s2),
                _ => continue,
            };

            edges.push(Edge {
                start: [start[0] as f32, start[1] as f32],
                end: [end[0] as f32, end[1] as f32],
                sites: (s1.min(s2), s1.max(s2)),
            });
        }
        log::debug!(
            "Subdivided {} sites into {} edges",
            xs.len(),
            edges.len()
        );

        Ok(edges)
    }
}

/// Splits `sites` into coordinate arrays and runs `adapter` over the `[0, width] x [0, height]`
/// box.
pub fn subdivide(
    adapter: &impl SubdivisionAdapter,
    sites: &[Site],
    width: f32,
    height: f32,
) -> Result<Vec<Edge>, SubdivisionError> {
    let xs: Vec<f64> = sites.iter().map(|s| s.x as f64).collect();
    let ys: Vec<f64> = sites.iter().map(|s| s.y as f64).collect();

    adapter.compute_subdivision(&xs, &ys, Rect::from_size(width as f64, height as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::sample_sites;

    #[test]
    fn clip_keeps_inside_segments() {
        let r = Rect::from_size(10.0, 10.0);

        assert_eq!(
            r.clip_segment([1.0, 1.0], [9.0, 2.0]),
            Some(([1.0, 1.0], [9.0, 2.0]))
        );
    }

    #[test]
    fn clip_trims_crossing_segments() {
        let r = Rect::from_size(10.0, 10.0);

        assert_eq!(
            r.clip_segment([-5.0, 5.0], [15.0, 5.0]),
            Some(([0.0, 5.0], [10.0, 5.0]))
        );
        assert_eq!(r.clip_segment([-5.0, -5.0], [-1.0, 20.0]), None);
    }

    #[test]
    fn four_sites_share_a_cross() {
        let xs = [2.5, 7.5, 2.5, 7.5];
        let ys = [2.5, 2.5, 7.5, 7.5];
        let edges = VoronoiSubdivision
            .compute_subdivision(&xs, &ys, Rect::from_size(10.0, 10.0))
            .unwrap();

        let mut pairs: Vec<_> = edges.iter().map(|e| e.sites).collect();
        pairs.sort();
        pairs.dedup();
        // Left/right and top/bottom neighbors share a border. Diagonal pairs only touch at the
        // center point, if at all.
        for pair in [(0, 1), (0, 2), (1, 3), (2, 3)].iter() {
            assert!(pairs.contains(pair), "missing {:?} in {:?}", pair, pairs);
        }
    }

    #[test]
    fn edges_lie_inside_the_box_and_are_deterministic() {
        let sites = sample_sites(256.0, 256.0, 80, 0.7, 5);
        let a = subdivide(&VoronoiSubdivision, &sites, 256.0, 256.0).unwrap();
        let b = subdivide(&VoronoiSubdivision, &sites, 256.0, 256.0).unwrap();

        assert!(!a.is_empty());
        assert_eq!(a, b);
        let eps = 1e-3;
        for e in a.iter() {
            for p in [e.start, e.end].iter() {
                assert!(p[0] >= -eps && p[0] <= 256.0 + eps, "{:?}", e);
                assert!(p[1] >= -eps && p[1] <= 256.0 + eps, "{:?}", e);
            }
            assert!(e.sites.0 < e.sites.1);
            assert!(e.sites.1 < sites.len());
        }
    }

    #[test]
    fn coincident_sites_do_not_fail() {
        let xs = [10.0, 10.0, 30.0, 20.0];
        let ys = [10.0, 10.0, 10.0, 30.0];

        assert!(VoronoiSubdivision
            .compute_subdivision(&xs, &ys, Rect::from_size(40.0, 40.0))
            .is_ok());
    }

    #[test]
    fn non_finite_sites_are_rejected() {
        let xs = [1.0, f64::NAN];
        let ys = [1.0, 2.0];

        assert!(matches!(
            VoronoiSubdivision.compute_subdivision(&xs, &ys, Rect::from_size(4.0, 4.0)),
            Err(SubdivisionError::RejectedSite { index: 1, .. })
        ));
    }

    #[test]
    fn mismatched_coordinates_are_rejected() {
        assert!(VoronoiSubdivision
            .compute_subdivision(&[1.0], &[], Rect::from_size(4.0, 4.0))
            .is_err());
    }
}
