use crate::master_element::ScvTopology;
use crate::Real;
use cvfem_traits::Topology;
use nalgebra::DMatrixViewMut;

/// Linear tetrahedron with one sub-control volume per node.
///
/// The reference element has vertices at the origin and at the three unit coordinate points.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tet4;

const IP_NODE_MAP: [usize; 4] = [0, 1, 2, 3];

const SEVENTEEN_96THS: f64 = 17.0 / 96.0;
const FORTYFIVE_96THS: f64 = 45.0 / 96.0;

#[rustfmt::skip]
const SCV_LOCATIONS: [f64; 12] = [
    SEVENTEEN_96THS, SEVENTEEN_96THS, SEVENTEEN_96THS,
    FORTYFIVE_96THS, SEVENTEEN_96THS, SEVENTEEN_96THS,
    SEVENTEEN_96THS, FORTYFIVE_96THS, SEVENTEEN_96THS,
    SEVENTEEN_96THS, SEVENTEEN_96THS, FORTYFIVE_96THS,
];

#[rustfmt::skip]
const SHIFTED_SCV_LOCATIONS: [f64; 12] = [
    0.0, 0.0, 0.0,
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

impl ScvTopology for Tet4 {
    const TOPOLOGY: Topology = Topology::Tetrahedron4;
    const NUM_NODES: usize = 4;
    const DIM: usize = 3;
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
        // A quarter of the reference tetrahedron's volume
        1.0 / 24.0
    }

    fn populate_basis<T: Real>(basis_values: &mut [T], xi: &[T]) {
        assert_eq!(basis_values.len(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        basis_values[0] = T::one() - xi[0] - xi[1] - xi[2];
        basis_values[1] = xi[0];
        basis_values[2] = xi[1];
        basis_values[3] = xi[2];
    }

    fn populate_basis_gradients<T: Real>(mut gradients: DMatrixViewMut<T>, xi: &[T]) {
        assert_eq!(gradients.nrows(), Self::DIM);
        assert_eq!(gradients.ncols(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        gradients.fill(T::zero());
        for d in 0..Self::DIM {
            gradients[(d, 0)] = -T::one();
            gradients[(d, d + 1)] = T::one();
        }
    }
}
