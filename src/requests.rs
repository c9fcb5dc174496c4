use cvfem_traits::{DataDependencySink, FieldId, MasterElementCall, Topology};

/// A nodal field that must be gathered to element-local storage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldRequest {
    pub field: FieldId,
    pub num_components: usize,
}

/// The element data required by a set of kernels.
///
/// Requests are recorded in the order they are first made. Requesting the same field more than
/// once is allowed and only recorded once, which in particular collapses aliased time states.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementDataRequests {
    fields: Vec<FieldRequest>,
    volume_topology: Option<Topology>,
    master_element_calls: Vec<MasterElementCall>,
}

impl ElementDataRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[FieldRequest] {
        &self.fields
    }

    pub fn volume_topology(&self) -> Option<Topology> {
        self.volume_topology
    }

    pub fn master_element_calls(&self) -> &[MasterElementCall] {
        &self.master_element_calls
    }

    pub fn has_master_element_call(&self, call: MasterElementCall) -> bool {
        self.master_element_calls.contains(&call)
    }

    pub fn num_components(&self, field: FieldId) -> Option<usize> {
        self.fields
            .iter()
            .find(|request| request.field == field)
            .map(|request| request.num_components)
    }
}

impl DataDependencySink for ElementDataRequests {
    fn add_gathered_nodal_field(&mut self, field: FieldId, num_components: usize) {
        match self.num_components(field) {
            Some(existing) => assert_eq!(
                existing, num_components,
                "Field {:?} was requested with {} components, but previously with {}",
                field, num_components, existing
            ),
            None => self.fields.push(FieldRequest { field, num_components }),
        }
    }

    fn add_cvfem_volume_me(&mut self, topology: Topology) {
        if let Some(existing) = self.volume_topology {
            assert_eq!(
                existing, topology,
                "Conflicting volume master elements requested for the same element block"
            );
        }
        self.volume_topology = Some(topology);
    }

    fn add_master_element_call(&mut self, call: MasterElementCall) {
        if !self.has_master_element_call(call) {
            self.master_element_calls.push(call);
        }
    }
}
