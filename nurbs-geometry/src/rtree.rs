//! A static, bulk-loaded axis-aligned bounding-box index (2D or 3D via the
//! `D` const parameter), grouped bottom-up in Hilbert order of leaf
//! centers. Grounded on the "Flatbush" packed Hilbert R-tree algorithm.

use crate::errors::{Error, Result};
use crate::hilbert;

const HILBERT_ORDER: u32 = 16;

fn overlaps<const D: usize>(a_min: &[f64; D], a_max: &[f64; D], b_min: &[f64; D], b_max: &[f64; D]) -> bool {
    (0..D).all(|d| a_min[d] <= b_max[d] && a_max[d] >= b_min[d])
}

/// A static R-tree over `D`-dimensional axis-aligned boxes. Items are
/// added via [`add`](Self::add) and the tree is built once by
/// [`finish`](Self::finish); queries are only valid afterwards.
pub struct RTree<const D: usize> {
    node_size: usize,
    boxes_min: Vec<[f64; D]>,
    boxes_max: Vec<[f64; D]>,
    indices: Vec<usize>,
    nb_items: usize,
    level_bounds: Vec<usize>,
    pos: usize,
    finished: bool,
}

impl<const D: usize> RTree<D> {
    /// Allocates storage for `nb_items` leaves plus their parent levels,
    /// with a fixed fan-out of 16 children per node.
    pub fn new(nb_items: usize) -> Result<Self> {
        if nb_items == 0 {
            return Err(Error::InvalidArgument("nb_items must be at least 1".to_string()));
        }
        let node_size = 16usize;
        let mut n = nb_items;
        let mut num_nodes = n;
        let mut level_bounds = vec![n];
        loop {
            n = n.div_ceil(node_size);
            num_nodes += n;
            level_bounds.push(num_nodes);
            if n == 1 {
                break;
            }
        }
        Ok(RTree {
            node_size,
            boxes_min: vec![[0.0; D]; num_nodes],
            boxes_max: vec![[0.0; D]; num_nodes],
            indices: vec![0; num_nodes],
            nb_items,
            level_bounds,
            pos: 0,
            finished: false,
        })
    }

    /// Appends one leaf box, in insertion order. Returns its leaf index.
    pub fn add(&mut self, min: [f64; D], max: [f64; D]) -> Result<usize> {
        if self.finished {
            return Err(Error::InvalidArgument("cannot add after finish".to_string()));
        }
        if self.pos >= self.nb_items {
            return Err(Error::InvalidArgument(format!(
                "more than the declared {} leaves were added",
                self.nb_items
            )));
        }
        let index = self.pos;
        self.boxes_min[index] = min;
        self.boxes_max[index] = max;
        self.indices[index] = index;
        self.pos += 1;
        Ok(index)
    }

    /// Sorts leaves by the Hilbert index of their center and builds the
    /// parent levels bottom-up.
    pub fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Err(Error::InvalidArgument("already finished".to_string()));
        }
        if self.pos != self.nb_items {
            return Err(Error::InvalidArgument(format!(
                "{} of {} declared leaves were added",
                self.pos, self.nb_items
            )));
        }

        let mut global_min = [f64::INFINITY; D];
        let mut global_max = [f64::NEG_INFINITY; D];
        for i in 0..self.nb_items {
            for d in 0..D {
                global_min[d] = global_min[d].min(self.boxes_min[i][d]);
                global_max[d] = global_max[d].max(self.boxes_max[i][d]);
            }
        }

        let hilbert_max = (1u64 << HILBERT_ORDER) - 1;
        let hilbert_values: Vec<u128> = (0..self.nb_items)
            .map(|i| {
                let mut coords = [0u64; D];
                for d in 0..D {
                    let extent = (global_max[d] - global_min[d]).max(f64::MIN_POSITIVE);
                    let center = 0.5 * (self.boxes_min[i][d] + self.boxes_max[i][d]);
                    let scaled = hilbert_max as f64 * (center - global_min[d]) / extent;
                    coords[d] = (scaled.floor().max(0.0) as u64).min(hilbert_max);
                }
                hilbert::index_at(HILBERT_ORDER, &coords)
            })
            .collect();

        let mut order: Vec<usize> = (0..self.nb_items).collect();
        order.sort_by_key(|&i| hilbert_values[i]);
        let sorted_min: Vec<_> = order.iter().map(|&i| self.boxes_min[i]).collect();
        let sorted_max: Vec<_> = order.iter().map(|&i| self.boxes_max[i]).collect();
        let sorted_idx: Vec<_> = order.iter().map(|&i| self.indices[i]).collect();
        self.boxes_min[..self.nb_items].copy_from_slice(&sorted_min);
        self.boxes_max[..self.nb_items].copy_from_slice(&sorted_max);
        self.indices[..self.nb_items].copy_from_slice(&sorted_idx);

        let mut read_pos = 0usize;
        for &end in &self.level_bounds[..self.level_bounds.len() - 1] {
            let mut write_pos = end;
            while read_pos < end {
                let children_start = read_pos;
                let mut node_min = [f64::INFINITY; D];
                let mut node_max = [f64::NEG_INFINITY; D];
                let mut consumed = 0;
                while consumed < self.node_size && read_pos < end {
                    for d in 0..D {
                        node_min[d] = node_min[d].min(self.boxes_min[read_pos][d]);
                        node_max[d] = node_max[d].max(self.boxes_max[read_pos][d]);
                    }
                    read_pos += 1;
                    consumed += 1;
                }
                self.boxes_min[write_pos] = node_min;
                self.boxes_max[write_pos] = node_max;
                self.indices[write_pos] = children_start;
                write_pos += 1;
            }
        }

        self.finished = true;
        Ok(())
    }

    /// Total number of boxes stored (leaves plus internal nodes).
    pub fn len(&self) -> usize { self.boxes_min.len() }

    /// `true` iff no leaves were declared (never constructible: `new`
    /// rejects `nb_items == 0`).
    pub fn is_empty(&self) -> bool { self.boxes_min.is_empty() }

    fn root(&self) -> usize { self.boxes_min.len() - 1 }

    fn children_end(&self, children_start: usize) -> usize {
        let level_end = self
            .level_bounds
            .iter()
            .find(|&&b| b > children_start)
            .copied()
            .unwrap_or(self.boxes_min.len());
        (children_start + self.node_size).min(level_end)
    }

    /// Item indices (original insertion order) whose boxes overlap
    /// `[min, max]` and satisfy `filter`, in traversal order.
    pub fn search(&self, min: [f64; D], max: [f64; D], filter: impl Fn(usize) -> bool) -> Vec<usize> {
        let mut results = Vec::new();
        if !self.finished {
            return results;
        }
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if !overlaps(&min, &max, &self.boxes_min[node], &self.boxes_max[node]) {
                continue;
            }
            if node < self.nb_items {
                let item = self.indices[node];
                if filter(item) {
                    results.push(item);
                }
                continue;
            }
            let start = self.indices[node];
            let end = self.children_end(start);
            for child in start..end {
                stack.push(child);
            }
        }
        results
    }

    /// Item indices whose boxes are hit by the ray `origin + t*direction`,
    /// `t >= 0`, and satisfy `filter`. `direction` need not be normalized.
    pub fn search_ray_intersection(
        &self,
        origin: [f64; D],
        direction: [f64; D],
        filter: impl Fn(usize) -> bool,
    ) -> Vec<usize> {
        let mut results = Vec::new();
        if !self.finished {
            return results;
        }
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if !ray_hits_box(&origin, &direction, &self.boxes_min[node], &self.boxes_max[node]) {
                continue;
            }
            if node < self.nb_items {
                let item = self.indices[node];
                if filter(item) {
                    results.push(item);
                }
                continue;
            }
            let start = self.indices[node];
            let end = self.children_end(start);
            for child in start..end {
                stack.push(child);
            }
        }
        results
    }
}

fn ray_hits_box<const D: usize>(
    origin: &[f64; D],
    direction: &[f64; D],
    box_min: &[f64; D],
    box_max: &[f64; D],
) -> bool {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;
    for d in 0..D {
        if direction[d].abs() < f64::EPSILON {
            if origin[d] < box_min[d] || origin[d] > box_max[d] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / direction[d];
        let mut t0 = (box_min[d] - origin[d]) * inv;
        let mut t1 = (box_max[d] - origin[d]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    t_max >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_tree() -> (RTree<2>, Vec<[f64; 2]>) {
        // a 5x5 grid of unit boxes centered at integer coordinates 0..4.
        let mut tree = RTree::<2>::new(25).unwrap();
        let mut centers = Vec::with_capacity(25);
        for row in 0..5 {
            for col in 0..5 {
                let (x, y) = (col as f64, row as f64);
                tree.add([x - 0.4, y - 0.4], [x + 0.4, y + 0.4]).unwrap();
                centers.push([x, y]);
            }
        }
        tree.finish().unwrap();
        (tree, centers)
    }

    #[test]
    fn root_covers_every_leaf() {
        let (tree, _) = grid_tree();
        let root = tree.root();
        for i in 0..25 {
            assert!(overlaps(&tree.boxes_min[root], &tree.boxes_max[root], &tree.boxes_min[i], &tree.boxes_max[i]));
        }
    }

    #[test]
    fn indices_last_is_nb_items_as_start_offset_when_single_root_group() {
        // with 25 leaves and node_size 16, level_bounds = [25, 27, 28];
        // the single root's "start offset" equals 25 (first parent index).
        let (tree, _) = grid_tree();
        let root = tree.root();
        assert_eq!(tree.indices[root], 25);
    }

    #[test]
    fn search_finds_exactly_overlapping_boxes() {
        let (tree, centers) = grid_tree();
        let hits = tree.search([1.5, 1.5], [2.5, 2.5], |_| true);
        let expected: Vec<usize> = centers
            .iter()
            .enumerate()
            .filter(|&(_, c)| c[0] >= 1.5 - 0.4 && c[0] <= 2.5 + 0.4 && c[1] >= 1.5 - 0.4 && c[1] <= 2.5 + 0.4)
            .map(|(i, _)| i)
            .collect();
        let mut got = hits.clone();
        got.sort();
        let mut want = expected;
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn filter_excludes_rejected_items() {
        let (tree, _) = grid_tree();
        let hits = tree.search([0.0, 0.0], [4.0, 4.0], |i| i == 12);
        assert_eq!(hits, vec![12]);
    }

    #[test]
    fn ray_along_axis_hits_aligned_column() {
        let (tree, _) = grid_tree();
        let hits = tree.search_ray_intersection([2.0, -10.0], [0.0, 1.0], |_| true);
        let mut got = hits;
        got.sort();
        assert_eq!(got, vec![2, 7, 12, 17, 22]);
    }

    #[test]
    fn ray_pointing_away_hits_nothing() {
        let (tree, _) = grid_tree();
        let hits = tree.search_ray_intersection([2.0, -10.0], [0.0, -1.0], |_| true);
        assert!(hits.is_empty());
    }

    #[test]
    fn search_matches_reference_hundred_box_dataset() {
        #[rustfmt::skip]
        let data: [[(f64, f64); 2]; 100] = [
            [( 8.0, 62.0), (11.0, 66.0)], [(57.0, 17.0), (57.0, 19.0)],
            [(76.0, 26.0), (79.0, 29.0)], [(36.0, 56.0), (38.0, 56.0)],
            [(92.0, 77.0), (96.0, 80.0)], [(87.0, 70.0), (90.0, 74.0)],
            [(43.0, 41.0), (47.0, 43.0)], [( 0.0, 58.0), ( 2.0, 62.0)],
            [(76.0, 86.0), (80.0, 89.0)], [(27.0, 13.0), (27.0, 15.0)],
            [(71.0, 63.0), (75.0, 67.0)], [(25.0,  2.0), (27.0,  2.0)],
            [(87.0,  6.0), (88.0,  6.0)], [(22.0, 90.0), (23.0, 93.0)],
            [(22.0, 89.0), (22.0, 93.0)], [(57.0, 11.0), (61.0, 13.0)],
            [(61.0, 55.0), (63.0, 56.0)], [(17.0, 85.0), (21.0, 87.0)],
            [(33.0, 43.0), (37.0, 43.0)], [( 6.0,  1.0), ( 7.0,  3.0)],
            [(80.0, 87.0), (80.0, 87.0)], [(23.0, 50.0), (26.0, 52.0)],
            [(58.0, 89.0), (58.0, 89.0)], [(12.0, 30.0), (15.0, 34.0)],
            [(32.0, 58.0), (36.0, 61.0)], [(41.0, 84.0), (44.0, 87.0)],
            [(44.0, 18.0), (44.0, 19.0)], [(13.0, 63.0), (15.0, 67.0)],
            [(52.0, 70.0), (54.0, 74.0)], [(57.0, 59.0), (58.0, 59.0)],
            [(17.0, 90.0), (20.0, 92.0)], [(48.0, 53.0), (52.0, 56.0)],
            [(92.0, 68.0), (92.0, 72.0)], [(26.0, 52.0), (30.0, 52.0)],
            [(56.0, 23.0), (57.0, 26.0)], [(88.0, 48.0), (88.0, 48.0)],
            [(66.0, 13.0), (67.0, 15.0)], [( 7.0, 82.0), ( 8.0, 86.0)],
            [(46.0, 68.0), (50.0, 68.0)], [(37.0, 33.0), (38.0, 36.0)],
            [( 6.0, 15.0), ( 8.0, 18.0)], [(85.0, 36.0), (89.0, 38.0)],
            [(82.0, 45.0), (84.0, 48.0)], [(12.0,  2.0), (16.0,  3.0)],
            [(26.0, 15.0), (26.0, 16.0)], [(55.0, 23.0), (59.0, 26.0)],
            [(76.0, 37.0), (79.0, 39.0)], [(86.0, 74.0), (90.0, 77.0)],
            [(16.0, 75.0), (18.0, 78.0)], [(44.0, 18.0), (45.0, 21.0)],
            [(52.0, 67.0), (54.0, 71.0)], [(59.0, 78.0), (62.0, 78.0)],
            [(24.0,  5.0), (24.0,  8.0)], [(64.0, 80.0), (64.0, 83.0)],
            [(66.0, 55.0), (70.0, 55.0)], [( 0.0, 17.0), ( 2.0, 19.0)],
            [(15.0, 71.0), (18.0, 74.0)], [(87.0, 57.0), (87.0, 59.0)],
            [( 6.0, 34.0), ( 7.0, 37.0)], [(34.0, 30.0), (37.0, 32.0)],
            [(51.0, 19.0), (53.0, 19.0)], [(72.0, 51.0), (73.0, 55.0)],
            [(29.0, 45.0), (30.0, 45.0)], [(94.0, 94.0), (96.0, 95.0)],
            [( 7.0, 22.0), (11.0, 24.0)], [(86.0, 45.0), (87.0, 48.0)],
            [(33.0, 62.0), (34.0, 65.0)], [(18.0, 10.0), (21.0, 14.0)],
            [(64.0, 66.0), (67.0, 67.0)], [(64.0, 25.0), (65.0, 28.0)],
            [(27.0,  4.0), (31.0,  6.0)], [(84.0,  4.0), (85.0,  5.0)],
            [(48.0, 80.0), (50.0, 81.0)], [( 1.0, 61.0), ( 3.0, 61.0)],
            [(71.0, 89.0), (74.0, 92.0)], [(40.0, 42.0), (43.0, 43.0)],
            [(27.0, 64.0), (28.0, 66.0)], [(46.0, 26.0), (50.0, 26.0)],
            [(53.0, 83.0), (57.0, 87.0)], [(14.0, 75.0), (15.0, 79.0)],
            [(31.0, 45.0), (34.0, 45.0)], [(89.0, 84.0), (92.0, 88.0)],
            [(84.0, 51.0), (85.0, 53.0)], [(67.0, 87.0), (67.0, 89.0)],
            [(39.0, 26.0), (43.0, 27.0)], [(47.0, 61.0), (47.0, 63.0)],
            [(23.0, 49.0), (25.0, 53.0)], [(12.0,  3.0), (14.0,  5.0)],
            [(16.0, 50.0), (19.0, 53.0)], [(63.0, 80.0), (64.0, 84.0)],
            [(22.0, 63.0), (22.0, 64.0)], [(26.0, 66.0), (29.0, 66.0)],
            [( 2.0, 15.0), ( 3.0, 15.0)], [(74.0, 77.0), (77.0, 79.0)],
            [(64.0, 11.0), (68.0, 11.0)], [(38.0,  4.0), (39.0,  8.0)],
            [(83.0, 73.0), (87.0, 77.0)], [(85.0, 52.0), (89.0, 56.0)],
            [(74.0, 60.0), (76.0, 63.0)], [(62.0, 66.0), (65.0, 67.0)],
        ];

        let mut tree = RTree::<2>::new(data.len()).unwrap();
        for &[(x0, y0), (x1, y1)] in &data {
            tree.add([x0, y0], [x1, y1]).unwrap();
        }
        tree.finish().unwrap();

        let mut hits = tree.search([40.0, 40.0], [60.0, 60.0], |_| true);
        hits.sort();
        assert_eq!(hits, vec![6, 29, 31, 75]);
    }
}
