//! Variational circuit generators.

pub mod ansatz;

pub use ansatz::{
    ALPHA, AnsatzParameters, BETA, RESULT_KEY, num_parameters, variational_ansatz, weight_symbol,
};
