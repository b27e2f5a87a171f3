//! Gate lists and the two parameterized circuit families used by the classifier.

use super::{MAX_QUBITS, QuantumError, Statevector};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    H(usize),
    P(usize, f64),
    Ry(usize, f64),
    Cx(usize, usize),
}

/// An ordered gate list over a fixed register.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    pub fn push(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Apply every gate to `state`, which must have the same register size.
    pub fn apply(&self, state: &mut Statevector) -> Result<(), QuantumError> {
        if state.num_qubits() != self.num_qubits {
            return Err(QuantumError::RegisterSize {
                qubits: state.num_qubits(),
                max: self.num_qubits,
            });
        }
        for gate in &self.gates {
            match *gate {
                Gate::H(q) => state.h(q)?,
                Gate::P(q, lambda) => state.p(q, lambda)?,
                Gate::Ry(q, theta) => state.ry(q, theta)?,
                Gate::Cx(c, t) => state.cx(c, t)?,
            }
        }
        Ok(())
    }

    /// Run on a fresh `|0...0>` register.
    pub fn run(&self) -> Result<Statevector, QuantumError> {
        let mut state = Statevector::zero(self.num_qubits)?;
        self.apply(&mut state)?;
        Ok(state)
    }
}

fn check_register(num_qubits: usize) -> Result<(), QuantumError> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(QuantumError::RegisterSize {
            qubits: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

/// Second-order Pauli-Z evolution feature map with linear entanglement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZzFeatureMap {
    num_qubits: usize,
    reps: usize,
}

impl ZzFeatureMap {
    pub fn new(num_qubits: usize, reps: usize) -> Result<Self, QuantumError> {
        check_register(num_qubits)?;
        Ok(Self { num_qubits, reps })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Encode one sample; `x` needs one value per qubit.
    pub fn circuit(&self, x: &[f64]) -> Result<Circuit, QuantumError> {
        if x.len() != self.num_qubits {
            return Err(QuantumError::FeatureDimension {
                expected: self.num_qubits,
                got: x.len(),
            });
        }
        let mut circuit = Circuit::new(self.num_qubits);
        for _ in 0..self.reps {
            for (q, &xq) in x.iter().enumerate() {
                circuit.push(Gate::H(q));
                circuit.push(Gate::P(q, 2.0 * xq));
            }
            for q in 0..self.num_qubits.saturating_sub(1) {
                let phi = (PI - x[q]) * (PI - x[q + 1]);
                circuit.push(Gate::Cx(q, q + 1));
                circuit.push(Gate::P(q + 1, 2.0 * phi));
                circuit.push(Gate::Cx(q, q + 1));
            }
        }
        Ok(circuit)
    }
}

/// Hardware-efficient RY ansatz with linear CX entanglement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealAmplitudes {
    num_qubits: usize,
    reps: usize,
}

impl RealAmplitudes {
    pub fn new(num_qubits: usize, reps: usize) -> Result<Self, QuantumError> {
        check_register(num_qubits)?;
        Ok(Self { num_qubits, reps })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_parameters(&self) -> usize {
        self.num_qubits * (self.reps + 1)
    }

    pub fn circuit(&self, theta: &[f64]) -> Result<Circuit, QuantumError> {
        if theta.len() != self.num_parameters() {
            return Err(QuantumError::ParameterCount {
                expected: self.num_parameters(),
                got: theta.len(),
            });
        }
        let mut circuit = Circuit::new(self.num_qubits);
        let mut params = theta.iter().copied();
        for layer in 0..=self.reps {
            if layer > 0 {
                for q in 0..self.num_qubits.saturating_sub(1) {
                    circuit.push(Gate::Cx(q, q + 1));
                }
            }
            for q in 0..self.num_qubits {
                let angle = params.next().unwrap_or_default();
                circuit.push(Gate::Ry(q, angle));
            }
        }
        Ok(circuit)
    }
}
