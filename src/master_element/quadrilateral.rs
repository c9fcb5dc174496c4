use crate::master_element::{phi_linear_1d, phi_linear_1d_grad, real, ScvTopology};
use crate::Real;
use cvfem_traits::Topology;
use nalgebra::DMatrixViewMut;

/// Bilinear quadrilateral with one sub-control volume per node.
///
/// The reference element is the square $[-1, 1]^2$ with counter-clockwise node ordering.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Quad4;

#[rustfmt::skip]
const NODE_SIGNS: [[f64; 2]; 4] = [
    [-1.0, -1.0],
    [ 1.0, -1.0],
    [ 1.0,  1.0],
    [-1.0,  1.0],
];

const IP_NODE_MAP: [usize; 4] = [0, 1, 2, 3];

#[rustfmt::skip]
const SCV_LOCATIONS: [f64; 8] = [
    -0.5, -0.5,
     0.5, -0.5,
     0.5,  0.5,
    -0.5,  0.5,
];

#[rustfmt::skip]
const SHIFTED_SCV_LOCATIONS: [f64; 8] = [
    -1.0, -1.0,
     1.0, -1.0,
     1.0,  1.0,
    -1.0,  1.0,
];

impl ScvTopology for Quad4 {
    const TOPOLOGY: Topology = Topology::Quadrilateral4;
    const NUM_NODES: usize = 4;
    const DIM: usize = 2;
    const NUM_SCV_IP: usize = 4;

    fn ip_node_map() -> &'static [usize] {
        &IP_NODE_MAP
    }

    fn scv_integration_locations() -> &'static [f64] {
        &SCV_LOCATIONS
    }

    fn shifted_scv_integration_locations() -> &'static [f64] {
        &SHIFTED_SCV_LOCATIONS
    }

    fn reference_scv_volume() -> f64 {
        1.0
    }

    fn populate_basis<T: Real>(basis_values: &mut [T], xi: &[T]) {
        assert_eq!(basis_values.len(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        for (phi, signs) in basis_values.iter_mut().zip(&NODE_SIGNS) {
            *phi = phi_linear_1d(real(signs[0]), xi[0]) * phi_linear_1d(real(signs[1]), xi[1]);
        }
    }

    fn populate_basis_gradients<T: Real>(mut gradients: DMatrixViewMut<T>, xi: &[T]) {
        assert_eq!(gradients.nrows(), Self::DIM);
        assert_eq!(gradients.ncols(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        for (node, signs) in NODE_SIGNS.iter().enumerate() {
            let (a, b): (T, T) = (real(signs[0]), real(signs[1]));
            gradients[(0, node)] = phi_linear_1d_grad(a) * phi_linear_1d(b, xi[1]);
            gradients[(1, node)] = phi_linear_1d(a, xi[0]) * phi_linear_1d_grad(b);
        }
    }
}
