use crate::unit_hexahedron_coordinates;
use cvfem_momentum::master_element::{
    compute_scv_volumes, Hex8, Quad4, ScvTopology, ShapeFunctionKind, ShapeFunctionTable, Tet4, Tri3,
};
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, DMatrixView, Matrix3};

fn assert_rows_sum_to_one<Topo: ScvTopology>() {
    for kind in [ShapeFunctionKind::Consistent, ShapeFunctionKind::Lumped] {
        let table = ShapeFunctionTable::<f64>::new::<Topo>(kind);
        assert_eq!(table.kind(), kind);
        assert_eq!(table.num_integration_points(), Topo::NUM_SCV_IP);
        assert_eq!(table.num_nodes(), Topo::NUM_NODES);
        for ip in 0..Topo::NUM_SCV_IP {
            let row_sum = table.weights().row(ip).sum();
            assert_scalar_eq!(row_sum, 1.0, comp = abs, tol = 1e-14);
        }
    }
}

fn assert_lumped_table_is_identity<Topo: ScvTopology>() {
    let table = ShapeFunctionTable::<f64>::new::<Topo>(ShapeFunctionKind::Lumped);
    let identity = DMatrix::<f64>::identity(Topo::NUM_SCV_IP, Topo::NUM_NODES);
    assert_matrix_eq!(table.weights(), &identity, comp = abs, tol = 1e-14);
}

fn assert_owning_node_has_largest_weight<Topo: ScvTopology>() {
    let table = ShapeFunctionTable::<f64>::new::<Topo>(ShapeFunctionKind::Consistent);
    for (ip, &owner) in Topo::ip_node_map().iter().enumerate() {
        let owner_weight = table.weight(ip, owner);
        for node in (0..Topo::NUM_NODES).filter(|&node| node != owner) {
            assert!(owner_weight > table.weight(ip, node));
        }
    }
}

#[test]
fn shape_function_rows_sum_to_one() {
    assert_rows_sum_to_one::<Tri3>();
    assert_rows_sum_to_one::<Quad4>();
    assert_rows_sum_to_one::<Tet4>();
    assert_rows_sum_to_one::<Hex8>();
}

#[test]
fn lumped_shape_functions_sample_the_owning_node() {
    assert_lumped_table_is_identity::<Tri3>();
    assert_lumped_table_is_identity::<Quad4>();
    assert_lumped_table_is_identity::<Tet4>();
    assert_lumped_table_is_identity::<Hex8>();
}

#[test]
fn consistent_shape_functions_favor_the_owning_node() {
    assert_owning_node_has_largest_weight::<Tri3>();
    assert_owning_node_has_largest_weight::<Quad4>();
    assert_owning_node_has_largest_weight::<Tet4>();
    assert_owning_node_has_largest_weight::<Hex8>();
}

#[test]
fn ip_node_maps_cover_every_node_once() {
    fn check<Topo: ScvTopology>() {
        let mut map = Topo::ip_node_map().to_vec();
        assert_eq!(map.len(), Topo::NUM_SCV_IP);
        map.sort_unstable();
        assert_eq!(map, (0..Topo::NUM_NODES).collect::<Vec<_>>());
    }
    check::<Tri3>();
    check::<Quad4>();
    check::<Tet4>();
    check::<Hex8>();
}

#[test]
fn hex8_consistent_weights_are_trilinear_products() {
    let table = ShapeFunctionTable::<f64>::new::<Hex8>(ShapeFunctionKind::Consistent);
    // First integration point sits at (-1/2, -1/2, -1/2), so each factor is either 3/4 or 1/4
    let expected = [27.0, 9.0, 3.0, 9.0, 9.0, 3.0, 1.0, 3.0].map(|w| w / 64.0);
    for (node, &weight) in expected.iter().enumerate() {
        assert_scalar_eq!(table.weight(0, node), weight, comp = abs, tol = 1e-15);
    }
    // The last integration point sits at (-1/2, 1/2, 1/2)
    let expected = [3.0, 1.0, 3.0, 9.0, 9.0, 3.0, 9.0, 27.0].map(|w| w / 64.0);
    for (node, &weight) in expected.iter().enumerate() {
        assert_scalar_eq!(table.weight(7, node), weight, comp = abs, tol = 1e-15);
    }
}

#[test]
fn simplex_consistent_weights() {
    let tri = ShapeFunctionTable::<f64>::new::<Tri3>(ShapeFunctionKind::Consistent);
    for ip in 0..3 {
        for node in 0..3 {
            let expected = if ip == node { 14.0 / 24.0 } else { 5.0 / 24.0 };
            assert_scalar_eq!(tri.weight(ip, node), expected, comp = abs, tol = 1e-15);
        }
    }

    let tet = ShapeFunctionTable::<f64>::new::<Tet4>(ShapeFunctionKind::Consistent);
    for ip in 0..4 {
        for node in 0..4 {
            let expected = if ip == node { 45.0 / 96.0 } else { 17.0 / 96.0 };
            assert_scalar_eq!(tet.weight(ip, node), expected, comp = abs, tol = 1e-15);
        }
    }
}

#[test]
fn scv_volumes_of_unit_hexahedron() {
    let coords = unit_hexahedron_coordinates();
    let mut scv_volume = vec![0.0; 8];
    compute_scv_volumes::<f64, Hex8>(DMatrixView::from(&coords), &mut scv_volume).unwrap();
    for volume in scv_volume {
        assert_scalar_eq!(volume, 0.125, comp = abs, tol = 1e-15);
    }
}

#[test]
fn scv_volumes_of_box_sum_to_box_volume() {
    // The box [1, 3] x [0, 1] x [0, 0.5]
    let coords = unit_hexahedron_coordinates();
    let coords = DMatrix::from_fn(8, 3, |i, j| match j {
        0 => 1.0 + 2.0 * coords[(i, j)],
        1 => coords[(i, j)],
        _ => 0.5 * coords[(i, j)],
    });
    let mut scv_volume = vec![0.0; 8];
    compute_scv_volumes::<f64, Hex8>(DMatrixView::from(&coords), &mut scv_volume).unwrap();
    for &volume in &scv_volume {
        assert_scalar_eq!(volume, 0.125, comp = abs, tol = 1e-14);
    }
    assert_scalar_eq!(scv_volume.iter().sum::<f64>(), 1.0, comp = abs, tol = 1e-14);
}

#[test]
#[rustfmt::skip]
fn scv_volumes_of_affine_tetrahedron() {
    let coords = DMatrix::from_row_slice(4, 3, &[
        1.0, 0.0, 0.0,
        3.0, 0.5, 0.0,
        1.5, 2.0, 0.5,
        1.0, 0.5, 3.0,
    ]);
    let edges = Matrix3::from_fn(|i, j| coords[(j + 1, i)] - coords[(0, i)]);
    let element_volume = edges.determinant() / 6.0;
    assert!(element_volume > 0.0);

    let mut scv_volume = vec![0.0; 4];
    compute_scv_volumes::<f64, Tet4>(DMatrixView::from(&coords), &mut scv_volume).unwrap();
    for &volume in &scv_volume {
        assert_scalar_eq!(volume, element_volume / 4.0, comp = abs, tol = 1e-14);
    }
}

#[test]
#[rustfmt::skip]
fn scv_areas_of_planar_elements() {
    let triangle = DMatrix::from_row_slice(3, 2, &[
        0.0, 0.0,
        2.0, 0.0,
        0.0, 3.0,
    ]);
    let mut scv_area = vec![0.0; 3];
    compute_scv_volumes::<f64, Tri3>(DMatrixView::from(&triangle), &mut scv_area).unwrap();
    for area in scv_area {
        assert_scalar_eq!(area, 1.0, comp = abs, tol = 1e-14);
    }

    let rectangle = DMatrix::from_row_slice(4, 2, &[
        0.0, 0.0,
        2.0, 0.0,
        2.0, 1.0,
        0.0, 1.0,
    ]);
    let mut scv_area = vec![0.0; 4];
    compute_scv_volumes::<f64, Quad4>(DMatrixView::from(&rectangle), &mut scv_area).unwrap();
    for area in scv_area {
        assert_scalar_eq!(area, 0.5, comp = abs, tol = 1e-14);
    }
}

#[test]
fn inverted_element_is_an_error() {
    // Swapping the bottom and top faces turns the element inside out
    let coords = unit_hexahedron_coordinates();
    let inverted = DMatrix::from_fn(8, 3, |i, j| coords[((i + 4) % 8, j)]);
    let mut scv_volume = vec![0.0; 8];
    let result = compute_scv_volumes::<f64, Hex8>(DMatrixView::from(&inverted), &mut scv_volume);
    assert!(result.is_err());
}

#[test]
#[should_panic]
fn scv_volumes_require_one_entry_per_integration_point() {
    let coords = unit_hexahedron_coordinates();
    let mut scv_volume = vec![0.0; 7];
    let _ = compute_scv_volumes::<f64, Hex8>(DMatrixView::from(&coords), &mut scv_volume);
}
