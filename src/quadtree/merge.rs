//! Optional merge pass over the leaves of a split-phase quad-tree.
//!
//! Two leaves are joined when they share an edge and their leaf means differ
//! by at most `threshold`. Joining is transitive (union-find), and decisions
//! use the split-phase means only, so the result does not depend on scan
//! order. Each merged group is painted with its pixel-weighted mean.
use super::tree::QuadTree;
use crate::image::GrayImageU8;

/// Output of the merge pass.
#[derive(Clone, Debug)]
pub struct MergedSegmentation {
    pub image: GrayImageU8,
    /// Number of connected groups after merging.
    pub region_count: usize,
}

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

pub fn merge_leaves(tree: &QuadTree, threshold: f32) -> MergedSegmentation {
    let (w, h) = (tree.width(), tree.height());
    let leaves: Vec<_> = tree.leaves().map(|(_, leaf)| leaf.stats).collect();
    let labels = tree.leaf_labels();
    let mut sets = DisjointSet::new(leaves.len());
    let close = |a: usize, b: usize| (leaves[a].mean - leaves[b].mean).abs() <= threshold as f64;

    for y in 0..h {
        for x in 0..w {
            let here = labels[y * w + x];
            if x + 1 < w {
                let right = labels[y * w + x + 1];
                if right != here && close(here, right) {
                    sets.union(here, right);
                }
            }
            if y + 1 < h {
                let below = labels[(y + 1) * w + x];
                if below != here && close(here, below) {
                    sets.union(here, below);
                }
            }
        }
    }

    let mut sums = vec![0u64; leaves.len()];
    let mut counts = vec![0usize; leaves.len()];
    for (i, stats) in leaves.iter().enumerate() {
        let root = sets.find(i);
        sums[root] += stats.sum;
        counts[root] += stats.count;
    }
    let region_count = counts.iter().filter(|&&c| c > 0).count();
    let values: Vec<u8> = (0..leaves.len())
        .map(|i| {
            let root = sets.find(i);
            (sums[root] as f64 / counts[root] as f64)
                .round()
                .clamp(0.0, 255.0) as u8
        })
        .collect();

    let image = GrayImageU8::from_fn(w, h, |x, y| values[labels[y * w + x]]);
    log::debug!(
        "merge pass (threshold {threshold}): {} leaves -> {region_count} regions",
        leaves.len()
    );
    MergedSegmentation {
        image,
        region_count,
    }
}
