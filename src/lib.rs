//! Control-volume finite element kernels for the unsteady momentum equation.
//!
//! The central piece is [`MomentumMassElemKernel`](kernel::MomentumMassElemKernel), which
//! evaluates the time-derivative (mass) term of the momentum equation together with a projected
//! pressure gradient for a single element. It talks to the surrounding solver exclusively
//! through the collaborator traits in [`traits`]. The remaining modules provide in-memory
//! implementations of these collaborators, sub-control-volume master elements and an element
//! loop, which together are enough to drive the kernel on a small mesh.

pub mod assembly;
pub mod fields;
pub mod kernel;
pub mod master_element;
pub mod options;
pub mod requests;
pub mod scratch;
pub mod time_integrator;

pub mod traits {
    pub use cvfem_traits::*;
}

pub use cvfem_traits::Real;

pub extern crate nalgebra;
