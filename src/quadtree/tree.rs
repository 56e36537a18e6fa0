use super::region::{Region, RegionStats};
use super::QuadTreeParams;
use crate::image::{GrayImageU8, ImageU8, ImageViewMut};
use crate::{Error, Result};

/// Index into `QuadTree::nodes`.
pub type NodeId = usize;

#[derive(Clone, Debug)]
pub struct QuadNode {
    pub region: Region,
    pub stats: RegionStats,
    pub depth: usize,
    pub parent: Option<NodeId>,
    /// `None` for leaves; otherwise TL, TR, BL, BR.
    pub children: Option<[NodeId; 4]>,
}

impl QuadNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena-backed quad-tree produced by the split phase.
///
/// Node 0 is the root and covers the whole image. Children are pushed
/// depth-first, so a parent always precedes its descendants.
#[derive(Clone, Debug)]
pub struct QuadTree {
    width: usize,
    height: usize,
    nodes: Vec<QuadNode>,
}

impl QuadTree {
    /// Recursively split `image` until every region is uniform or minimal.
    pub fn build(image: &GrayImageU8, params: &QuadTreeParams) -> Result<Self> {
        params.validate()?;
        if image.is_empty() {
            return Err(Error::invalid(format!(
                "cannot segment a {}x{} image",
                image.width(),
                image.height()
            )));
        }
        let mut tree = Self {
            width: image.width(),
            height: image.height(),
            nodes: Vec::new(),
        };
        let view = image.as_view();
        tree.split(&view, Region::full(image.width(), image.height()), 0, None, params);
        log::debug!(
            "quadtree {}x{}: {} nodes, {} leaves, depth {}",
            tree.width,
            tree.height,
            tree.nodes.len(),
            tree.leaf_count(),
            tree.max_depth()
        );
        Ok(tree)
    }

    fn split(
        &mut self,
        view: &ImageU8<'_>,
        region: Region,
        depth: usize,
        parent: Option<NodeId>,
        params: &QuadTreeParams,
    ) -> NodeId {
        let stats = RegionStats::of(view, &region);
        let id = self.nodes.len();
        self.nodes.push(QuadNode {
            region,
            stats,
            depth,
            parent,
            children: None,
        });
        if is_leaf(&region, &stats, params) {
            return id;
        }
        let [tl, tr, bl, br] = region.quadrants();
        let children = [
            self.split(view, tl, depth + 1, Some(id), params),
            self.split(view, tr, depth + 1, Some(id), params),
            self.split(view, bl, depth + 1, Some(id), params),
            self.split(view, br, depth + 1, Some(id), params),
        ];
        self.nodes[id].children = Some(children);
        id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn root(&self) -> &QuadNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &QuadNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    /// Leaves in depth-first (TL, TR, BL, BR) order.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &QuadNode)> + '_ {
        self.nodes.iter().enumerate().filter(|(_, n)| n.is_leaf())
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Deepest recursion level reached (root is depth 0).
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Per-pixel ordinal of the covering leaf, in `leaves()` order.
    pub fn leaf_labels(&self) -> Vec<usize> {
        let mut labels = vec![usize::MAX; self.width * self.height];
        for (ordinal, (_, leaf)) in self.leaves().enumerate() {
            let r = &leaf.region;
            for y in r.row_start..r.row_end {
                labels[y * self.width + r.col_start..y * self.width + r.col_end].fill(ordinal);
            }
        }
        labels
    }

    /// How many leaves cover each pixel. A valid decomposition is all ones.
    pub fn coverage(&self) -> Vec<u32> {
        let mut cover = vec![0u32; self.width * self.height];
        for (_, leaf) in self.leaves() {
            let r = &leaf.region;
            for y in r.row_start..r.row_end {
                for c in &mut cover[y * self.width + r.col_start..y * self.width + r.col_end] {
                    *c += 1;
                }
            }
        }
        cover
    }

    /// Paint every leaf with its rounded mean.
    pub fn render(&self) -> GrayImageU8 {
        let mut out = GrayImageU8::new(self.width, self.height);
        for (_, leaf) in self.leaves() {
            fill_region(&mut out, &leaf.region, leaf.stats.fill_value());
        }
        out
    }
}

/// Leaf when uniform, when no taller than the minimum size, or when either
/// axis is a single pixel (such a region is never subdivided).
fn is_leaf(region: &Region, stats: &RegionStats, params: &QuadTreeParams) -> bool {
    stats.std < params.uniformity_threshold as f64
        || region.height() <= params.min_region_size
        || region.height() == 1
        || region.width() == 1
}

pub(crate) fn fill_region(out: &mut GrayImageU8, region: &Region, value: u8) {
    for y in region.row_start..region.row_end {
        out.row_mut(y)[region.col_start..region.col_end].fill(value);
    }
}
