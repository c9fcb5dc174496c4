//! Element-local buffers holding gathered field data.
use crate::fields::MeshFields;
use crate::master_element::{compute_scv_volumes, ScvTopology};
use crate::requests::ElementDataRequests;
use crate::Real;
use cvfem_traits::{FieldId, MasterElementCall, ScratchViews};
use eyre::WrapErr;
use nalgebra::{DMatrix, DMatrixView, Scalar};

/// Per-element storage for gathered nodal values and sub-control volumes.
///
/// The scratch is meant to be reused across elements: populating it for a new element overwrites
/// the previous contents without reallocating storage of the same size.
#[derive(Debug)]
pub struct ElementScratch<T: Scalar> {
    element_nodes: Vec<usize>,
    nodal_values: Vec<(FieldId, DMatrix<T>)>,
    scv_volume: Vec<T>,
}

impl<T: Real> Default for ElementScratch<T> {
    fn default() -> Self {
        Self {
            element_nodes: Vec::new(),
            nodal_values: Vec::new(),
            scv_volume: Vec::new(),
        }
    }
}

impl<T: Real> ElementScratch<T> {
    /// Global indices of the nodes of the element the scratch was last populated for.
    pub fn element_nodes(&self) -> &[usize] {
        &self.element_nodes
    }

    /// Replaces the gathered values of a field with a `(nodes x components)` matrix.
    pub fn set_nodal_values(&mut self, field: FieldId, values: DMatrix<T>) {
        match self.position(field) {
            Some(idx) => self.nodal_values[idx].1 = values,
            None => self.nodal_values.push((field, values)),
        }
    }

    /// Returns the buffer for a field, resized to `(num_nodes x num_components)`.
    pub fn nodal_values_mut(&mut self, field: FieldId, num_nodes: usize, num_components: usize) -> &mut DMatrix<T> {
        let idx = match self.position(field) {
            Some(idx) => idx,
            None => {
                self.nodal_values.push((field, DMatrix::zeros(0, 0)));
                self.nodal_values.len() - 1
            }
        };
        let values = &mut self.nodal_values[idx].1;
        values.resize_mut(num_nodes, num_components, T::zero());
        values
    }

    pub fn set_scv_volume(&mut self, scv_volume: &[T]) {
        self.scv_volume.clear();
        self.scv_volume.extend_from_slice(scv_volume);
    }

    /// Gathers the requested data of a single element.
    ///
    /// Every requested field is copied from the global field storage to the element nodes.
    /// If the requests include [`MasterElementCall::ScvVolume`], the sub-control volumes are
    /// computed from the coordinate field, which is gathered even if it was not requested.
    ///
    /// # Panics
    ///
    /// Panics if the number of element nodes does not match the topology, if the requests were
    /// made for a different topology or if a requested component count does not match the field.
    pub fn populate<Topo: ScvTopology>(
        &mut self,
        fields: &MeshFields<T>,
        requests: &ElementDataRequests,
        coordinates: FieldId,
        element_nodes: &[usize],
    ) -> eyre::Result<()> {
        let num_nodes = Topo::NUM_NODES;
        assert_eq!(element_nodes.len(), num_nodes, "Element node count does not match topology");
        if let Some(topology) = requests.volume_topology() {
            assert_eq!(topology, Topo::TOPOLOGY, "Requests were made for a different topology");
        }

        self.element_nodes.clear();
        self.element_nodes.extend_from_slice(element_nodes);

        for request in requests.fields() {
            let global = fields.field_data(request.field);
            assert_eq!(
                global.ncols(),
                request.num_components,
                "Field {:?} was requested with the wrong number of components",
                request.field
            );
            let local = self.nodal_values_mut(request.field, num_nodes, request.num_components);
            gather_nodal_values(global, local, element_nodes);
        }

        if requests.has_master_element_call(MasterElementCall::ScvVolume) {
            if requests.num_components(coordinates).is_none() {
                let global = fields.field_data(coordinates);
                let local = self.nodal_values_mut(coordinates, num_nodes, Topo::DIM);
                gather_nodal_values(global, local, element_nodes);
            }

            self.scv_volume.resize(Topo::NUM_SCV_IP, T::zero());
            let idx = self
                .position(coordinates)
                .expect("Coordinates were gathered above");
            let coords = DMatrixView::from(&self.nodal_values[idx].1);
            compute_scv_volumes::<T, Topo>(coords, &mut self.scv_volume)
                .wrap_err_with(|| format!("invalid geometry for element with nodes {:?}", element_nodes))?;
        }

        Ok(())
    }

    fn position(&self, field: FieldId) -> Option<usize> {
        self.nodal_values.iter().position(|(id, _)| *id == field)
    }

    fn lookup(&self, field: FieldId) -> &DMatrix<T> {
        match self.position(field) {
            Some(idx) => &self.nodal_values[idx].1,
            None => panic!("Field {:?} has not been gathered into the element scratch", field),
        }
    }
}

/// Copies the rows of `global` belonging to `element_nodes` into `local`.
fn gather_nodal_values<T: Real>(global: &DMatrix<T>, local: &mut DMatrix<T>, element_nodes: &[usize]) {
    assert_eq!(local.nrows(), element_nodes.len());
    assert_eq!(local.ncols(), global.ncols());
    for (local_node, &global_node) in element_nodes.iter().enumerate() {
        local.row_mut(local_node).copy_from(&global.row(global_node));
    }
}

impl<T: Real> ScratchViews<T> for ElementScratch<T> {
    fn scalar_view(&self, field: FieldId) -> &[T] {
        let values = self.lookup(field);
        assert_eq!(values.ncols(), 1, "Field {:?} is not a single-component field", field);
        values.as_slice()
    }

    fn vector_view(&self, field: FieldId) -> DMatrixView<'_, T> {
        DMatrixView::from(self.lookup(field))
    }

    fn scv_volume(&self) -> &[T] {
        &self.scv_volume
    }
}
