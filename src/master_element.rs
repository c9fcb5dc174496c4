//! Sub-control-volume master elements.
//!
//! A master element describes a reference element that is partitioned into one sub-control
//! volume per node. Each sub-control volume carries a single volume integration point, and the
//! node that owns the sub-control volume is the "nearest node" of that integration point.
use crate::Real;
use cvfem_traits::Topology;
use eyre::eyre;
use nalgebra::{DMatrix, DMatrixView, DMatrixViewMut, Scalar};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

mod hexahedron;
mod quadrilateral;
mod tetrahedron;
mod triangle;

pub use hexahedron::*;
pub use quadrilateral::*;
pub use tetrahedron::*;
pub use triangle::*;

/// Compile-time description of an element shape and its sub-control-volume partition.
///
/// Integration point locations are given in reference coordinates, stored contiguously with
/// `DIM` entries per integration point.
pub trait ScvTopology: 'static + Send + Sync {
    const TOPOLOGY: Topology;
    const NUM_NODES: usize;
    const DIM: usize;
    const NUM_SCV_IP: usize;

    /// Maps each volume integration point to the node owning its sub-control volume.
    fn ip_node_map() -> &'static [usize];

    /// Reference coordinates of the sub-control-volume integration points.
    fn scv_integration_locations() -> &'static [f64];

    /// Reference coordinates used for the shifted (lumped) shape functions.
    fn shifted_scv_integration_locations() -> &'static [f64];

    /// The measure of each sub-control volume in the reference element.
    fn reference_scv_volume() -> f64;

    /// Evaluates every basis function at the reference coordinates `xi`.
    fn populate_basis<T: Real>(basis_values: &mut [T], xi: &[T]);

    /// Populates the `(DIM x NUM_NODES)` matrix of reference gradients at `xi`.
    fn populate_basis_gradients<T: Real>(gradients: DMatrixViewMut<T>, xi: &[T]);
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub(crate) fn phi_linear_1d<T: Real>(alpha: T, xi: T) -> T {
    (1.0 + alpha * xi) / 2.0
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub(crate) fn phi_linear_1d_grad<T: Real>(alpha: T) -> T {
    alpha / 2.0
}

pub(crate) fn real<T: Real>(value: f64) -> T {
    T::from_f64(value).expect("Value must fit in T")
}

/// The interpolation used to evaluate nodal quantities at volume integration points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeFunctionKind {
    /// Standard shape functions evaluated at the sub-control-volume integration points.
    Consistent,
    /// Shape functions evaluated at the shifted (nodal) locations, which diagonalizes the
    /// resulting mass contribution.
    Lumped,
}

/// Interpolation weights for every (integration point, node) pair of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFunctionTable<T: Scalar> {
    kind: ShapeFunctionKind,
    weights: DMatrix<T>,
}

impl<T: Real> ShapeFunctionTable<T> {
    pub fn new<Topo: ScvTopology>(kind: ShapeFunctionKind) -> Self {
        let locations = match kind {
            ShapeFunctionKind::Consistent => Topo::scv_integration_locations(),
            ShapeFunctionKind::Lumped => Topo::shifted_scv_integration_locations(),
        };
        assert_eq!(locations.len(), Topo::DIM * Topo::NUM_SCV_IP);

        let mut weights = DMatrix::zeros(Topo::NUM_SCV_IP, Topo::NUM_NODES);
        let mut xi = vec![T::zero(); Topo::DIM];
        let mut phi = vec![T::zero(); Topo::NUM_NODES];
        for (ip, location) in locations.chunks_exact(Topo::DIM).enumerate() {
            for (xi_d, &x) in xi.iter_mut().zip(location) {
                *xi_d = real(x);
            }
            Topo::populate_basis(&mut phi, &xi);
            for (node, &phi_node) in phi.iter().enumerate() {
                weights[(ip, node)] = phi_node;
            }
        }

        Self { kind, weights }
    }

    pub fn kind(&self) -> ShapeFunctionKind {
        self.kind
    }

    pub fn num_integration_points(&self) -> usize {
        self.weights.nrows()
    }

    pub fn num_nodes(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weight(&self, ip: usize, node: usize) -> T {
        self.weights[(ip, node)]
    }

    /// The `(integration points x nodes)` weight matrix.
    pub fn weights(&self) -> &DMatrix<T> {
        &self.weights
    }
}

/// Computes the measure of every sub-control volume of an element.
///
/// `coordinates` holds the nodal coordinates as a `(NUM_NODES x DIM)` matrix. Each sub-control
/// volume is integrated with a one-point rule at its integration point, which is exact for
/// elements with an affine reference map.
///
/// Returns an error if any sub-control volume has a non-positive measure, which indicates an
/// inverted or degenerate element.
///
/// # Panics
///
/// Panics if the coordinate matrix or the output slice do not match the topology.
pub fn compute_scv_volumes<T, Topo>(coordinates: DMatrixView<T>, scv_volume: &mut [T]) -> eyre::Result<()>
where
    T: Real,
    Topo: ScvTopology,
{
    let dim = Topo::DIM;
    assert_eq!(coordinates.nrows(), Topo::NUM_NODES, "Coordinates must have one row per element node");
    assert_eq!(coordinates.ncols(), dim, "Coordinates must have one column per spatial dimension");
    assert_eq!(scv_volume.len(), Topo::NUM_SCV_IP, "Output must have one entry per integration point");

    let reference_volume: T = real(Topo::reference_scv_volume());
    let mut xi = vec![T::zero(); dim];
    let mut gradients = DMatrix::zeros(dim, Topo::NUM_NODES);

    let locations = Topo::scv_integration_locations().chunks_exact(dim);
    for (ip, (location, volume)) in locations.zip(scv_volume.iter_mut()).enumerate() {
        for (xi_d, &x) in xi.iter_mut().zip(location) {
            *xi_d = real(x);
        }
        Topo::populate_basis_gradients(DMatrixViewMut::from(&mut gradients), &xi);

        // J_ij = sum_I x_I,i dN_I/dxi_j
        let jacobian = coordinates.transpose() * gradients.transpose();
        let j_det = jacobian.determinant();
        if j_det <= T::zero() {
            return Err(eyre!(
                "non-positive sub-control volume at integration point {} (det J = {})",
                ip,
                j_det
            ));
        }
        *volume = j_det * reference_volume;
    }

    Ok(())
}
