use crate::master_element::ScvTopology;
use crate::Real;
use cvfem_traits::Topology;
use nalgebra::DMatrixViewMut;

/// Linear triangle with one sub-control volume per node.
///
/// The reference element has vertices $(0, 0)$, $(1, 0)$ and $(0, 1)$. Each sub-control volume
/// is the quadrilateral spanned by a vertex, the midpoints of its two edges and the centroid.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tri3;

const IP_NODE_MAP: [usize; 3] = [0, 1, 2];

const FIVE_24THS: f64 = 5.0 / 24.0;
const SEVEN_12THS: f64 = 7.0 / 12.0;

#[rustfmt::skip]
const SCV_LOCATIONS: [f64; 6] = [
    FIVE_24THS,  FIVE_24THS,
    SEVEN_12THS, FIVE_24THS,
    FIVE_24THS,  SEVEN_12THS,
];

#[rustfmt::skip]
const SHIFTED_SCV_LOCATIONS: [f64; 6] = [
    0.0, 0.0,
    1.0, 0.0,
    0.0, 1.0,
];

impl ScvTopology for Tri3 {
    const TOPOLOGY: Topology = Topology::Triangle3;
    const NUM_NODES: usize = 3;
    const DIM: usize = 2;
    const NUM_SCV_IP: usize = 3;

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
        // A third of the reference triangle's area
        1.0 / 6.0
    }

    fn populate_basis<T: Real>(basis_values: &mut [T], xi: &[T]) {
        assert_eq!(basis_values.len(), Self::NUM_NODES);
        assert_eq!(xi.len(), Self::DIM);
        basis_values[0] = T::one() - xi[0] - xi[1];
        basis_values[1] = xi[0];
        basis_values[2] = xi[1];
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
