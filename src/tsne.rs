//! Seeded 2D t-SNE for the cover scatter plot.
//!
//! Pairwise Gaussian affinities with a perplexity-matched binary search per
//! point, symmetrized joint probabilities, Student-t low-dimensional
//! affinities, and KL-gradient descent with momentum. The embedding is
//! initialized from a seeded LCG so a fixed corpus and seed reproduce the
//! same coordinates exactly.

const N_COMPONENTS: usize = 2;

pub struct Tsne {
    perplexity: f32,
    learning_rate: f32,
    n_iter: usize,
    seed: u64,
}

impl Tsne {
    pub fn new(perplexity: f32, seed: u64) -> Self {
        Self {
            perplexity,
            learning_rate: 200.0,
            n_iter: 500,
            seed,
        }
    }

    fn pairwise_distances(x: &[Vec<f32>]) -> Vec<f32> {
        let n = x.len();
        let mut distances = vec![0.0f32; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d: f32 = x[i]
                    .iter()
                    .zip(&x[j])
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                distances[i * n + j] = d;
                distances[j * n + i] = d;
            }
        }
        distances
    }

    /// P(j|i) via binary search for the bandwidth that hits the target
    /// perplexity.
    fn conditional_probabilities(&self, distances: &[f32], n: usize) -> Vec<f32> {
        let mut p = vec![0.0f32; n * n];
        let target_entropy = self.perplexity.ln();

        for i in 0..n {
            let mut beta_min = f32::NEG_INFINITY;
            let mut beta_max = f32::INFINITY;
            let mut beta = 1.0f32;

            for _ in 0..50 {
                let mut sum_p = 0.0;
                for j in 0..n {
                    if i == j {
                        p[i * n + j] = 0.0;
                        continue;
                    }
                    let p_ji = (-beta * distances[i * n + j]).exp();
                    p[i * n + j] = p_ji;
                    sum_p += p_ji;
                }

                let mut entropy = 0.0;
                if sum_p > 0.0 {
                    for j in 0..n {
                        if i != j {
                            let normalized = p[i * n + j] / sum_p;
                            p[i * n + j] = normalized;
                            if normalized > 1e-12 {
                                entropy -= normalized * normalized.ln();
                            }
                        }
                    }
                }

                let diff = entropy - target_entropy;
                if diff.abs() < 1e-5 {
                    break;
                }
                if diff > 0.0 {
                    beta_min = beta;
                    beta = if beta_max.is_infinite() {
                        beta * 2.0
                    } else {
                        (beta + beta_max) / 2.0
                    };
                } else {
                    beta_max = beta;
                    beta = if beta_min.is_infinite() {
                        beta / 2.0
                    } else {
                        (beta + beta_min) / 2.0
                    };
                }
            }
        }
        p
    }

    fn joint_probabilities(conditional: &[f32], n: usize) -> Vec<f32> {
        let normalizer = 2.0 * n as f32;
        let mut joint = vec![0.0f32; n * n];
        for i in 0..n {
            for j in 0..n {
                let v = (conditional[i * n + j] + conditional[j * n + i]) / normalizer;
                joint[i * n + j] = v.max(1e-12);
            }
        }
        joint
    }

    fn low_dim_affinities(y: &[f32], n: usize) -> Vec<f32> {
        let mut q = vec![0.0f32; n * n];
        let mut sum_q = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut d = 0.0;
                for k in 0..N_COMPONENTS {
                    let diff = y[i * N_COMPONENTS + k] - y[j * N_COMPONENTS + k];
                    d += diff * diff;
                }
                let q_ij = 1.0 / (1.0 + d);
                q[i * n + j] = q_ij;
                sum_q += q_ij;
            }
        }
        if sum_q > 0.0 {
            for v in &mut q {
                *v = (*v / sum_q).max(1e-12);
            }
        }
        q
    }

    fn gradient(y: &[f32], p: &[f32], q: &[f32], n: usize) -> Vec<f32> {
        let mut grad = vec![0.0f32; n * N_COMPONENTS];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut d = 0.0;
                for k in 0..N_COMPONENTS {
                    let diff = y[i * N_COMPONENTS + k] - y[j * N_COMPONENTS + k];
                    d += diff * diff;
                }
                let factor = 4.0 * (p[i * n + j] - q[i * n + j]) / (1.0 + d);
                for k in 0..N_COMPONENTS {
                    let diff = y[i * N_COMPONENTS + k] - y[j * N_COMPONENTS + k];
                    grad[i * N_COMPONENTS + k] += factor * diff;
                }
            }
        }
        grad
    }

    /// Embed each input row as an (x, y) pair, in input order.
    pub fn fit_transform(&self, x: &[Vec<f32>]) -> Vec<(f32, f32)> {
        let n = x.len();
        if n == 0 {
            return Vec::new();
        }

        let distances = Self::pairwise_distances(x);
        let conditional = self.conditional_probabilities(&distances, n);
        let p = Self::joint_probabilities(&conditional, n);

        // Seeded LCG initialization, small spread
        let mut rng_state = self.seed;
        let mut rand = || -> f32 {
            rng_state = rng_state.wrapping_mul(1664525).wrapping_add(1013904223);
            ((rng_state >> 16) as f32 / 65536.0) - 0.5
        };
        let mut y: Vec<f32> = (0..n * N_COMPONENTS).map(|_| rand() * 1e-4).collect();

        let mut velocity = vec![0.0f32; n * N_COMPONENTS];
        let momentum = 0.5;
        let final_momentum = 0.8;
        let momentum_switch_iter = 250;

        for iter in 0..self.n_iter {
            let q = Self::low_dim_affinities(&y, n);
            let grad = Self::gradient(&y, &p, &q, n);

            let current_momentum = if iter < momentum_switch_iter {
                momentum
            } else {
                final_momentum
            };

            for i in 0..(n * N_COMPONENTS) {
                velocity[i] = current_momentum * velocity[i] - self.learning_rate * grad[i];
                y[i] += velocity[i];
            }
        }

        (0..n)
            .map(|i| (y[i * N_COMPONENTS], y[i * N_COMPONENTS + 1]))
            .collect()
    }
}
