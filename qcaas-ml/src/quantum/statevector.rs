//! Dense statevector simulation.
//!
//! Basis index bit `q` holds qubit `q` (little-endian).

use super::{MAX_QUBITS, QuantumError};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The all-zero state `|0...0>`.
    pub fn zero(num_qubits: usize) -> Result<Self, QuantumError> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(QuantumError::RegisterSize {
                qubits: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            num_qubits,
            amplitudes,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    fn check(&self, qubit: usize) -> Result<usize, QuantumError> {
        if qubit < self.num_qubits {
            Ok(1 << qubit)
        } else {
            Err(QuantumError::QubitIndex {
                qubit,
                num_qubits: self.num_qubits,
            })
        }
    }

    /// Apply a real 2x2 matrix `[[m00, m01], [m10, m11]]` to `qubit`.
    fn apply_real(&mut self, qubit: usize, m: [[f64; 2]; 2]) -> Result<(), QuantumError> {
        let mask = self.check(qubit)?;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let (a, b) = (self.amplitudes[i], self.amplitudes[j]);
                self.amplitudes[i] = a * m[0][0] + b * m[0][1];
                self.amplitudes[j] = a * m[1][0] + b * m[1][1];
            }
        }
        Ok(())
    }

    pub fn h(&mut self, qubit: usize) -> Result<(), QuantumError> {
        self.apply_real(
            qubit,
            [[FRAC_1_SQRT_2, FRAC_1_SQRT_2], [FRAC_1_SQRT_2, -FRAC_1_SQRT_2]],
        )
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> Result<(), QuantumError> {
        let (s, c) = (theta / 2.0).sin_cos();
        self.apply_real(qubit, [[c, -s], [s, c]])
    }

    /// Phase gate `diag(1, e^{i lambda})`.
    pub fn p(&mut self, qubit: usize, lambda: f64) -> Result<(), QuantumError> {
        let mask = self.check(qubit)?;
        let phase = Complex64::from_polar(1.0, lambda);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
        Ok(())
    }

    pub fn cx(&mut self, control: usize, target: usize) -> Result<(), QuantumError> {
        let c = self.check(control)?;
        let t = self.check(target)?;
        if c == t {
            return Err(QuantumError::Execution(format!(
                "CX control and target are both qubit {control}"
            )));
        }
        for i in 0..self.amplitudes.len() {
            if i & c != 0 && i & t == 0 {
                self.amplitudes.swap(i, i | t);
            }
        }
        Ok(())
    }

    /// Born-rule probability of each basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }
}
