//! Derivative-free optimizers for the variational parameters.

use super::QuantumError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Objective evaluated by an [`Optimizer`]; errors abort the optimization.
pub type Objective<'a> = dyn FnMut(&[f64]) -> Result<f64, QuantumError> + 'a;

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub x: Vec<f64>,
    pub fun: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

pub trait Optimizer {
    fn name(&self) -> &'static str;

    /// Minimize `objective` from `x0`, performing at most `max_iterations` iterations.
    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        x0: &[f64],
        max_iterations: usize,
    ) -> Result<OptimizationResult, QuantumError>;
}

/// Downhill simplex with the standard reflection/expansion/contraction/shrink steps.
#[derive(Debug, Clone)]
pub struct NelderMead {
    pub xatol: f64,
    pub fatol: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            xatol: 1e-4,
            fatol: 1e-4,
        }
    }
}

impl Optimizer for NelderMead {
    fn name(&self) -> &'static str {
        "nelder_mead"
    }

    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        x0: &[f64],
        max_iterations: usize,
    ) -> Result<OptimizationResult, QuantumError> {
        const RHO: f64 = 1.0;
        const CHI: f64 = 2.0;
        const PSI: f64 = 0.5;
        const SIGMA: f64 = 0.5;

        let n = x0.len();
        let mut evaluations = 0;
        let mut eval = |x: &[f64], evaluations: &mut usize| -> Result<f64, QuantumError> {
            *evaluations += 1;
            objective(x)
        };

        if n == 0 {
            let fun = eval(x0, &mut evaluations)?;
            return Ok(OptimizationResult {
                x: Vec::new(),
                fun,
                iterations: 0,
                evaluations,
            });
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(x0.to_vec());
        for k in 0..n {
            let mut vertex = x0.to_vec();
            vertex[k] = if vertex[k] != 0.0 {
                1.05 * vertex[k]
            } else {
                0.00025
            };
            simplex.push(vertex);
        }
        let mut values = Vec::with_capacity(n + 1);
        for vertex in &simplex {
            values.push(eval(vertex, &mut evaluations)?);
        }

        let mut iterations = 0;
        while iterations < max_iterations {
            sort_simplex(&mut simplex, &mut values);

            let x_spread = simplex[1..]
                .iter()
                .flat_map(|v| v.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
                .fold(0.0, f64::max);
            let f_spread = values[1..]
                .iter()
                .map(|f| (f - values[0]).abs())
                .fold(0.0, f64::max);
            if x_spread <= self.xatol && f_spread <= self.fatol {
                break;
            }
            iterations += 1;

            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
                .collect();
            let worst = simplex[n].clone();
            let along = |t: f64| -> Vec<f64> {
                centroid
                    .iter()
                    .zip(&worst)
                    .map(|(c, w)| c + t * (c - w))
                    .collect()
            };

            let reflected = along(RHO);
            let f_r = eval(&reflected, &mut evaluations)?;

            let mut shrink = false;
            if f_r < values[0] {
                let expanded = along(RHO * CHI);
                let f_e = eval(&expanded, &mut evaluations)?;
                if f_e < f_r {
                    simplex[n] = expanded;
                    values[n] = f_e;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_r;
                }
            } else if f_r < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_r;
            } else if f_r < values[n] {
                let contracted = along(PSI * RHO);
                let f_c = eval(&contracted, &mut evaluations)?;
                if f_c <= f_r {
                    simplex[n] = contracted;
                    values[n] = f_c;
                } else {
                    shrink = true;
                }
            } else {
                let contracted = along(-PSI);
                let f_cc = eval(&contracted, &mut evaluations)?;
                if f_cc < values[n] {
                    simplex[n] = contracted;
                    values[n] = f_cc;
                } else {
                    shrink = true;
                }
            }

            if shrink {
                let best = simplex[0].clone();
                for k in 1..=n {
                    for (x, b) in simplex[k].iter_mut().zip(&best) {
                        *x = b + SIGMA * (*x - b);
                    }
                    values[k] = eval(&simplex[k], &mut evaluations)?;
                }
            }
        }

        sort_simplex(&mut simplex, &mut values);
        Ok(OptimizationResult {
            x: simplex.swap_remove(0),
            fun: values[0],
            iterations,
            evaluations,
        })
    }
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

/// Simultaneous perturbation stochastic approximation.
#[derive(Debug, Clone)]
pub struct Spsa {
    pub learning_rate: f64,
    pub perturbation: f64,
    rng: StdRng,
}

impl Spsa {
    pub fn new(seed: u64) -> Self {
        Self {
            learning_rate: 0.2,
            perturbation: 0.1,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Optimizer for Spsa {
    fn name(&self) -> &'static str {
        "spsa"
    }

    fn minimize(
        &mut self,
        objective: &mut Objective<'_>,
        x0: &[f64],
        max_iterations: usize,
    ) -> Result<OptimizationResult, QuantumError> {
        const ALPHA: f64 = 0.602;
        const GAMMA: f64 = 0.101;
        // Stability constant, a tenth of the budget.
        let stability = max_iterations as f64 / 10.0;

        let mut x = x0.to_vec();
        let mut best_x = x.clone();
        let mut best_f = objective(&x)?;
        let mut evaluations = 1;

        for k in 0..max_iterations {
            let a_k = self.learning_rate / (k as f64 + 1.0 + stability).powf(ALPHA);
            let c_k = self.perturbation / (k as f64 + 1.0).powf(GAMMA);
            let delta: Vec<f64> = (0..x.len())
                .map(|_| if self.rng.gen_range(0..2) == 0 { -1.0 } else { 1.0 })
                .collect();

            let plus: Vec<f64> = x.iter().zip(&delta).map(|(v, d)| v + c_k * d).collect();
            let minus: Vec<f64> = x.iter().zip(&delta).map(|(v, d)| v - c_k * d).collect();
            let f_plus = objective(&plus)?;
            let f_minus = objective(&minus)?;
            evaluations += 2;

            let slope = (f_plus - f_minus) / (2.0 * c_k);
            for (v, d) in x.iter_mut().zip(&delta) {
                *v -= a_k * slope / d;
            }

            for (candidate, f) in [(&plus, f_plus), (&minus, f_minus)] {
                if f < best_f {
                    best_f = f;
                    best_x = candidate.clone();
                }
            }
        }

        let f_last = objective(&x)?;
        evaluations += 1;
        if f_last < best_f {
            best_f = f_last;
            best_x = x;
        }

        Ok(OptimizationResult {
            x: best_x,
            fun: best_f,
            iterations: max_iterations,
            evaluations,
        })
    }
}
