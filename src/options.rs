use cvfem_traits::SolutionOptions;
use serde::{Deserialize, Serialize};

/// Order of accuracy of the backward-difference time integrator.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAccuracy {
    FirstOrder,
    #[default]
    SecondOrder,
}

/// Solver options consumed by kernels and time integration.
///
/// All entries are optional when deserializing; missing entries take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Name of the nodal coordinate field.
    pub coordinates_name: String,
    pub time_accuracy: TimeAccuracy,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            coordinates_name: String::from("coordinates"),
            time_accuracy: TimeAccuracy::default(),
        }
    }
}

impl SolutionOptions for SolverOptions {
    fn coordinates_name(&self) -> &str {
        &self.coordinates_name
    }
}
