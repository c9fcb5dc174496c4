use cvfem_momentum::assembly::ElementBlock;
use cvfem_momentum::fields::MeshFields;
use cvfem_momentum::master_element::Hex8;
use cvfem_momentum::traits::{EntityRank, FieldId, FieldState};
use nalgebra::DMatrix;


/// Fields of a mesh of `nx` unit hexahedra in a row along the x axis.
///
/// Nodes are numbered lexicographically with x varying fastest.
fn hexahedron_row(nx: usize, velocity_states: usize, density_states: usize) -> (MeshFields<f64>, ElementBlock<Hex8>) {
    let node_index = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + 2 * k);
    let num_nodes = 4 * (nx + 1);

    let mut fields = MeshFields::new(num_nodes, nx);
    let coordinates = fields
        .declare_field(EntityRank::Node, "coordinates", 3, 1)
        .unwrap();
    fields
        .declare_field(EntityRank::Node, "velocity", 3, velocity_states)
        .unwrap();
    fields
        .declare_field(EntityRank::Node, "density", 1, density_states)
        .unwrap();
    fields
        .declare_field(EntityRank::Node, "dpdx", 3, 1)
        .unwrap();

    let mut x = DMatrix::zeros(num_nodes, 3);
    for (k, j, i) in itertools::iproduct!(0..2, 0..2, 0..=nx) {
        let node = node_index(i, j, k);
        x[(node, 0)] = i as f64;
        x[(node, 1)] = j as f64;
        x[(node, 2)] = k as f64;
    }
    *fields.field_data_mut(FieldId::new(coordinates, FieldState::NONE)) = x;

    let connectivity = (0..nx)
        .flat_map(|e| {
            [
                node_index(e, 0, 0),
                node_index(e + 1, 0, 0),
                node_index(e + 1, 1, 0),
                node_index(e, 1, 0),
                node_index(e, 0, 1),
                node_index(e + 1, 0, 1),
                node_index(e + 1, 1, 1),
                node_index(e, 1, 1),
            ]
        })
        .collect();

    (fields, ElementBlock::from_connectivity(connectivity))
}
