use crate::Real;
use cvfem_traits::{ScratchViews, TimeIntegrator};
use nalgebra::{DMatrixViewMut, DVectorViewMut};

mod momentum_mass;

pub use momentum_mass::*;

/// An element-level contribution to a discretized equation.
///
/// Kernels are configured once, bound to the coefficients of every time step with
/// [`setup`](Kernel::setup) and then executed for every element. Execution only reads the kernel,
/// so a configured kernel may be shared by concurrent element evaluations.
pub trait Kernel<T: Real>: Send + Sync {
    /// Captures the time-integration coefficients of the current time step.
    fn setup(&mut self, time_integrator: &dyn TimeIntegrator<T>);

    /// Adds the element's contribution to the element Jacobian `lhs` and residual `rhs`.
    ///
    /// The buffers are owned by the caller and are never reset, since several kernels
    /// contribute to the same element system.
    fn execute(&self, lhs: DMatrixViewMut<T>, rhs: DVectorViewMut<T>, scratch: &dyn ScratchViews<T>);
}
