//! Seeded k-means over dense rows, with a multi-restart driver.
//!
//! Initialization is k-means++ with deterministic farthest-point selection:
//! the first centroid comes from the seed, each further centroid is the point
//! with the largest squared distance to its nearest chosen centroid. Restarts
//! perturb only the seed, and the lowest-inertia fit wins, so results are
//! bit-for-bit reproducible for a fixed input order and seed.

use rayon::prelude::*;
use tracing::debug;

/// A fitted clustering: one label per input row, centroid per cluster, and
/// the within-cluster sum of squared distances.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f32>>,
    pub inertia: f32,
}

pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    tol: f32,
    seed: u64,
}

fn dist_sq(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl KMeans {
    pub fn new(n_clusters: usize, seed: u64) -> Self {
        Self {
            n_clusters,
            max_iter: 300,
            tol: 1e-4,
            seed,
        }
    }

    fn init_centroids(&self, x: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let n_samples = x.len();
        let first = (self.seed as usize) % n_samples;
        let mut centroids = vec![x[first].clone()];

        while centroids.len() < self.n_clusters {
            let mut max_dist = 0.0f32;
            let mut max_idx = 0usize;
            for (i, point) in x.iter().enumerate() {
                let nearest = centroids
                    .iter()
                    .map(|c| dist_sq(point, c))
                    .fold(f32::INFINITY, f32::min);
                if nearest > max_dist {
                    max_dist = nearest;
                    max_idx = i;
                }
            }
            centroids.push(x[max_idx].clone());
        }
        centroids
    }

    fn assign(&self, x: &[Vec<f32>], centroids: &[Vec<f32>]) -> Vec<usize> {
        x.iter()
            .map(|point| {
                let mut min_dist = f32::INFINITY;
                let mut min_cluster = 0;
                for (k, c) in centroids.iter().enumerate() {
                    let d = dist_sq(point, c);
                    if d < min_dist {
                        min_dist = d;
                        min_cluster = k;
                    }
                }
                min_cluster
            })
            .collect()
    }

    fn update(&self, x: &[Vec<f32>], labels: &[usize], old: &[Vec<f32>]) -> Vec<Vec<f32>> {
        let n_features = x[0].len();
        let mut sums = vec![vec![0.0f32; n_features]; self.n_clusters];
        let mut counts = vec![0usize; self.n_clusters];

        for (point, &label) in x.iter().zip(labels) {
            counts[label] += 1;
            for (s, v) in sums[label].iter_mut().zip(point) {
                *s += v;
            }
        }

        for k in 0..self.n_clusters {
            if counts[k] > 0 {
                for s in sums[k].iter_mut() {
                    *s /= counts[k] as f32;
                }
            } else {
                // Empty cluster keeps its previous centroid
                sums[k] = old[k].clone();
            }
        }
        sums
    }

    fn converged(&self, old: &[Vec<f32>], new: &[Vec<f32>]) -> bool {
        old.iter()
            .zip(new)
            .all(|(a, b)| dist_sq(a, b) <= self.tol * self.tol)
    }

    fn inertia(x: &[Vec<f32>], labels: &[usize], centroids: &[Vec<f32>]) -> f32 {
        x.iter()
            .zip(labels)
            .map(|(point, &label)| dist_sq(point, &centroids[label]))
            .sum()
    }

    /// Lloyd's algorithm from one seeded initialization.
    pub fn fit(&self, x: &[Vec<f32>]) -> KMeansFit {
        let mut centroids = self.init_centroids(x);
        let mut labels = self.assign(x, &centroids);

        for _ in 0..self.max_iter {
            let new_centroids = self.update(x, &labels, &centroids);
            let done = self.converged(&centroids, &new_centroids);
            centroids = new_centroids;
            labels = self.assign(x, &centroids);
            if done {
                break;
            }
        }

        let inertia = Self::inertia(x, &labels, &centroids);
        KMeansFit {
            labels,
            centroids,
            inertia,
        }
    }
}

/// Run `n_init` seeded restarts and keep the lowest-inertia fit. Restarts run
/// on the rayon pool; selection breaks inertia ties by restart index, so the
/// outcome does not depend on execution order.
pub fn fit_best(x: &[Vec<f32>], n_clusters: usize, seed: u64, n_init: usize) -> KMeansFit {
    let fits: Vec<(usize, KMeansFit)> = (0..n_init)
        .into_par_iter()
        .map(|i| {
            let km = KMeans::new(n_clusters, seed.wrapping_add(i as u64));
            (i, km.fit(x))
        })
        .collect();

    let (best_idx, best) = fits
        .into_iter()
        .min_by(|(ia, a), (ib, b)| {
            a.inertia
                .partial_cmp(&b.inertia)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ia.cmp(ib))
        })
        .expect("n_init must be at least 1");

    debug!(
        "KMeans fit selected - restart={}, inertia={:.4}, clusters={}",
        best_idx, best.inertia, n_clusters
    );
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 1.0],
            vec![1.1, 0.9],
            vec![0.9, 1.1],
            vec![8.0, 8.0],
            vec![8.1, 7.9],
            vec![7.9, 8.1],
        ]
    }

    #[test]
    fn separable_blobs_cluster_together() {
        let x = two_blobs();
        let fit = fit_best(&x, 2, 42, 10);
        assert_eq!(fit.labels.len(), 6);
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[1], fit.labels[2]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_eq!(fit.labels[4], fit.labels[5]);
        assert_ne!(fit.labels[0], fit.labels[3]);
    }

    #[test]
    fn labels_stay_in_range() {
        let x = two_blobs();
        let fit = fit_best(&x, 4, 42, 10);
        assert!(fit.labels.iter().all(|&l| l < 4));
        assert_eq!(fit.centroids.len(), 4);
    }

    #[test]
    fn same_seed_same_result() {
        let x = two_blobs();
        let a = fit_best(&x, 2, 7, 10);
        let b = fit_best(&x, 2, 7, 10);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn inertia_is_low_for_tight_blobs() {
        let x = two_blobs();
        let fit = fit_best(&x, 2, 42, 10);
        assert!(fit.inertia < 0.5, "inertia = {}", fit.inertia);
    }

    #[test]
    fn more_points_than_clusters_with_duplicates() {
        // 5 points, 4 clusters, only 2 distinct locations
        let x = vec![
            vec![0.0, 0.0],
            vec![0.0, 0.0],
            vec![5.0, 5.0],
            vec![5.0, 5.0],
            vec![5.0, 5.0],
        ];
        let fit = fit_best(&x, 4, 42, 10);
        assert_eq!(fit.labels.len(), 5);
        assert!(fit.labels.iter().all(|&l| l < 4));
        // identical points share a label
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_eq!(fit.labels[2], fit.labels[3]);
        assert_eq!(fit.labels[3], fit.labels[4]);
        assert_ne!(fit.labels[0], fit.labels[2]);
    }
}
