use crate::master_element::{phi_linear_1d, phi_linear_1d_grad, real, ScvTopology};
use crate::Real;
use cvfem_traits::Topology;
use nalgebra::DMatrixViewMut;

/// Trilinear hexahedron with one sub-control volume per node.
///
/// The reference element is the cube $[-1, 1]^3$. Nodes are ordered counter-clockwise on the
/// bottom face ($\xi_3 = -1$), followed by the top face.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Hex8;

#[rustfmt::skip]
const NODE_SIGNS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
];

const IP_NODE_MAP: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

#[rustfmt::skip]
const SCV_LOCATIONS: [f64; 24] = [
    -0.5, -0.5, -0.5,
     0.5, -0.5, -0.5,
     0.5,  0.5, -0.5,
    -0.5,  0.5, -0.5,
    -0.5, -0.5,  0.5,
     0.5, -0.5,  0.5,
     0.5,  0.5,  0.5,
    -0.5,  0.5,  0.5,
];

#[rustfmt::skip]
const SHIFTED_SCV_LOCATIONS: [f64; 24] = [
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
];

impl ScvTopology for Hex8 {
    const TOPOLOGY: Topology = Topology::Hexahedron8;
    const NUM_NODES: usize = 8;
    const DIM: usize = 3;
    const NUM_SCV_IP: usize = 8;

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
        // The reference cube has volume 8
        1.0
    }

    fn populate_basis<T: Real>(basis_values: &mut [T], xi: &[T]) {
        assert_eq!(basis_values.len(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        for (phi, signs) in basis_values.iter_mut().zip(&NODE_SIGNS) {
            *phi = phi_linear_1d(real(signs[0]), xi[0])
                * phi_linear_1d(real(signs[1]), xi[1])
                * phi_linear_1d(real(signs[2]), xi[2]);
        }
    }

    fn populate_basis_gradients<T: Real>(mut gradients: DMatrixViewMut<T>, xi: &[T]) {
        assert_eq!(gradients.nrows(), Self::DIM);
        assert_eq!(gradients.ncols(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        for (node, signs) in NODE_SIGNS.iter().enumerate() {
            let (a, b, c): (T, T, T) = (real(signs[0]), real(signs[1]), real(signs[2]));
            gradients[(0, node)] = phi_linear_1d_grad(a) * phi_linear_1d(b, xi[1]) * phi_linear_1d(c, xi[2]);
            gradients[(1, node)] = phi_linear_1d(a, xi[0]) * phi_linear_1d_grad(b) * phi_linear_1d(c, xi[2]);
            gradients[(2, node)] = phi_linear_1d(a, xi[0]) * phi_linear_1d(b, xi[1]) * phi_linear_1d_grad(c);
        }
    }
}
