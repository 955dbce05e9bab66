//! Isolation forest over row-major feature vectors.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rp_math::{anomaly_score, average_path_length, height_limit};

#[derive(Debug, Clone)]
enum Node {
    Internal {
        feature: usize,
        split: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    External {
        size: usize,
    },
}

/// One isolation tree.
#[derive(Debug, Clone)]
pub struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    /// Grow a tree on `indices` into `points`, stopping at `max_depth`.
    fn grow(points: &[Vec<f64>], indices: &[usize], max_depth: usize, rng: &mut StdRng) -> Self {
        IsolationTree {
            root: grow_node(points, indices, 0, max_depth, rng),
        }
    }

    /// Path length of `point`, with the `c(size)` extension at truncated leaves.
    pub fn path_length(&self, point: &[f64]) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                Node::External { size } => return depth as f64 + average_path_length(*size),
                Node::Internal {
                    feature,
                    split,
                    left,
                    right,
                } => {
                    node = if point[*feature] < *split { left } else { right };
                    depth += 1;
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::External { .. } => 0,
                Node::Internal { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }
}

fn grow_node(
    points: &[Vec<f64>],
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if depth >= max_depth || indices.len() <= 1 {
        return Node::External {
            size: indices.len(),
        };
    }

    // Only features with spread can separate the node.
    let dims = points[indices[0]].len();
    let candidates: Vec<(usize, f64, f64)> = (0..dims)
        .filter_map(|f| {
            let (lo, hi) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, &i| {
                (acc.0.min(points[i][f]), acc.1.max(points[i][f]))
            });
            (hi > lo).then_some((f, lo, hi))
        })
        .collect();

    if candidates.is_empty() {
        return Node::External {
            size: indices.len(),
        };
    }

    let (feature, lo, hi) = candidates[rng.random_range(0..candidates.len())];
    let split = split_between(lo, hi, rng.random::<f64>());
    let (left, right): (Vec<usize>, Vec<usize>) =
        indices.iter().copied().partition(|&i| points[i][feature] < split);

    Node::Internal {
        feature,
        split,
        left: Box::new(grow_node(points, &left, depth + 1, max_depth, rng)),
        right: Box::new(grow_node(points, &right, depth + 1, max_depth, rng)),
    }
}

/// Point at fraction `t` of `[lo, hi]`, taken as a convex combination so a
/// spread wider than `f64::MAX` cannot overflow. Always finite and in range
/// for finite `lo < hi`.
fn split_between(lo: f64, hi: f64, t: f64) -> f64 {
    (lo * (1.0 - t) + hi * t).max(lo).min(hi)
}

/// Ensemble of isolation trees fitted on one point set.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    sample_size: usize,
}

impl IsolationForest {
    /// Fit `n_trees` trees, each on a sub-sample of `min(max_samples, n)` points
    /// drawn without replacement.
    ///
    /// `points` must be non-empty and every point must have the same length.
    pub fn fit(points: &[Vec<f64>], n_trees: usize, max_samples: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample_size = max_samples.min(points.len());
        let max_depth = height_limit(sample_size);

        let trees = (0..n_trees)
            .map(|_| {
                let indices =
                    rand::seq::index::sample(&mut rng, points.len(), sample_size).into_vec();
                IsolationTree::grow(points, &indices, max_depth, &mut rng)
            })
            .collect();

        IsolationForest { trees, sample_size }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn trees(&self) -> &[IsolationTree] {
        &self.trees
    }

    /// Mean path length across trees.
    pub fn mean_path_length(&self, point: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let total: f64 = self.trees.iter().map(|t| t.path_length(point)).sum();
        total / self.trees.len() as f64
    }

    /// Anomaly score in (0, 1]; higher is more anomalous.
    pub fn score(&self, point: &[f64]) -> f64 {
        anomaly_score(self.mean_path_length(point), self.sample_size)
    }

    pub fn score_all(&self, points: &[Vec<f64>]) -> Vec<f64> {
        points.iter().map(|p| self.score(p)).collect()
    }
}
