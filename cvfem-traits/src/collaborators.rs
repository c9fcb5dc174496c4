//! Interfaces to the collaborators a kernel relies on.
//!
//! Kernels only ever talk to the surrounding solver through these traits: fields are resolved
//! through a [`FieldRegistry`] at construction time, data requirements are declared to a
//! [`DataDependencySink`], gathered element data is read through [`ScratchViews`] and the
//! time-integration coefficients come from a [`TimeIntegrator`].
use crate::fields::{EntityRank, FieldHandle, FieldId, FieldState};
use crate::topology::{MasterElementCall, Topology};
use crate::Real;
use nalgebra::DMatrixView;

/// Read-only access to the fields registered on a mesh.
pub trait FieldRegistry {
    /// Looks up a field by rank and name.
    fn get_field(&self, rank: EntityRank, name: &str) -> Option<FieldHandle>;

    /// The number of time states the field stores (between 1 and 3).
    fn number_of_states(&self, field: FieldHandle) -> usize;

    /// Returns the identifier of the given time state of a field.
    ///
    /// Panics if the field does not store the requested state.
    fn field_of_state(&self, field: FieldHandle, state: FieldState) -> FieldId;

    fn field_name(&self, field: FieldHandle) -> &str;
}

/// Solver-wide options consulted by kernels during construction.
pub trait SolutionOptions {
    /// The name of the nodal field holding mesh coordinates.
    fn coordinates_name(&self) -> &str;
}

/// Receives the per-element data requirements of kernels.
pub trait DataDependencySink {
    /// Requests that `field` is gathered to element nodes with `num_components` values per node.
    fn add_gathered_nodal_field(&mut self, field: FieldId, num_components: usize);

    /// Registers the volume master element that geometric calls are evaluated with.
    fn add_cvfem_volume_me(&mut self, topology: Topology);

    /// Requests a geometric computation from the master element.
    fn add_master_element_call(&mut self, call: MasterElementCall);
}

/// Read-only view of the data gathered for a single element.
pub trait ScratchViews<T: Real> {
    /// Gathered values of a single-component field, one entry per element node.
    fn scalar_view(&self, field: FieldId) -> &[T];

    /// Gathered values of a multi-component field as a `(nodes x components)` matrix.
    fn vector_view(&self, field: FieldId) -> DMatrixView<'_, T>;

    /// Sub-control-volume measures, one entry per volume integration point.
    fn scv_volume(&self) -> &[T];
}

/// Source of the time step size and the time-integration blending coefficients.
///
/// `gamma1`, `gamma2` and `gamma3` weight the n+1, n and n-1 time levels respectively.
pub trait TimeIntegrator<T> {
    fn time_step(&self) -> T;

    fn gamma1(&self) -> T;

    fn gamma2(&self) -> T;

    fn gamma3(&self) -> T;
}
