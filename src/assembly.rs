//! Element loops that evaluate kernels into element-local systems.
//!
//! Assembly of the element systems into a global system is left to the sink passed to the loop.
use crate::fields::MeshFields;
use crate::kernel::Kernel;
use crate::master_element::ScvTopology;
use crate::requests::ElementDataRequests;
use crate::scratch::ElementScratch;
use crate::Real;
use cvfem_traits::FieldId;
use davenport::{define_thread_local_workspace, with_thread_local_workspace};
use eyre::WrapErr;
use nalgebra::{DMatrix, DMatrixView, DMatrixViewMut, DVector, DVectorView, DVectorViewMut, Scalar};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::marker::PhantomData;

/// A block of elements sharing a single topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBlock<Topo> {
    // NUM_NODES consecutive entries per element
    connectivity: Vec<usize>,
    topology: PhantomData<Topo>,
}

impl<Topo: ScvTopology> ElementBlock<Topo> {
    /// Creates a block from flat connectivity with `Topo::NUM_NODES` node indices per element.
    ///
    /// # Panics
    ///
    /// Panics if the length of the connectivity is not a multiple of the node count.
    pub fn from_connectivity(connectivity: Vec<usize>) -> Self {
        assert_eq!(
            connectivity.len() % Topo::NUM_NODES,
            0,
            "Connectivity length must be a multiple of the element node count"
        );
        Self {
            connectivity,
            topology: PhantomData,
        }
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.len() / Topo::NUM_NODES
    }

    pub fn element_nodes(&self, element_index: usize) -> &[usize] {
        let n = Topo::NUM_NODES;
        &self.connectivity[n * element_index..n * (element_index + 1)]
    }

    pub fn connectivity(&self) -> &[usize] {
        &self.connectivity
    }
}

#[derive(Debug)]
struct ElementSystemWorkspace<T: Scalar> {
    scratch: ElementScratch<T>,
    lhs: DMatrix<T>,
    rhs: DVector<T>,
}

impl<T: Real> Default for ElementSystemWorkspace<T> {
    fn default() -> Self {
        Self {
            scratch: ElementScratch::default(),
            lhs: DMatrix::zeros(0, 0),
            rhs: DVector::zeros(0),
        }
    }
}

define_thread_local_workspace!(WORKSPACE);

/// Evaluates a sequence of kernels for every element of a block.
///
/// For each element, the requested data is gathered into a scratch, the element Jacobian and
/// residual are zeroed and every kernel adds its contribution in the order the kernels were
/// added. The resulting element system is then passed to a caller-provided sink.
///
/// All kernels must have been set up for the current time step before the loop runs.
pub struct ElementLoop<'a, T: Real, Topo> {
    block: &'a ElementBlock<Topo>,
    fields: &'a MeshFields<T>,
    requests: &'a ElementDataRequests,
    coordinates: FieldId,
    kernels: Vec<&'a dyn Kernel<T>>,
}

impl<'a, T, Topo> ElementLoop<'a, T, Topo>
where
    T: Real,
    Topo: ScvTopology,
{
    pub fn new(
        block: &'a ElementBlock<Topo>,
        fields: &'a MeshFields<T>,
        requests: &'a ElementDataRequests,
        coordinates: FieldId,
    ) -> Self {
        Self {
            block,
            fields,
            requests,
            coordinates,
            kernels: Vec::new(),
        }
    }

    pub fn with_kernel(mut self, kernel: &'a dyn Kernel<T>) -> Self {
        self.kernels.push(kernel);
        self
    }

    pub fn num_kernels(&self) -> usize {
        self.kernels.len()
    }

    /// Visits the element systems of all elements in order.
    ///
    /// The sink receives the element index, the global element nodes, the element Jacobian and
    /// the element residual.
    pub fn for_each_element_system<F>(&self, mut sink: F) -> eyre::Result<()>
    where
        F: FnMut(usize, &[usize], DMatrixView<T>, DVectorView<T>) -> eyre::Result<()>,
    {
        let mut ws = ElementSystemWorkspace::default();
        for element_index in 0..self.block.num_elements() {
            self.evaluate_element(element_index, &mut ws)?;
            sink(
                element_index,
                self.block.element_nodes(element_index),
                DMatrixView::from(&ws.lhs),
                DVectorView::from(&ws.rhs),
            )?;
        }
        Ok(())
    }

    /// Visits the element systems of all elements in parallel.
    ///
    /// Every worker thread owns its own scratch and output buffers, so the sink is the only
    /// place where results of different elements may meet. The order in which elements are
    /// visited is unspecified, but the system passed for each element is identical to the one
    /// produced by [`for_each_element_system`](Self::for_each_element_system).
    pub fn par_for_each_element_system<F>(&self, sink: F) -> eyre::Result<()>
    where
        F: Fn(usize, &[usize], DMatrixView<T>, DVectorView<T>) -> eyre::Result<()> + Sync,
    {
        (0..self.block.num_elements())
            .into_par_iter()
            .map(|element_index| {
                with_thread_local_workspace(&WORKSPACE, |ws: &mut ElementSystemWorkspace<T>| {
                    self.evaluate_element(element_index, ws)?;
                    sink(
                        element_index,
                        self.block.element_nodes(element_index),
                        DMatrixView::from(&ws.lhs),
                        DVectorView::from(&ws.rhs),
                    )
                })
            })
            .collect::<eyre::Result<()>>()
    }

    fn evaluate_element(&self, element_index: usize, ws: &mut ElementSystemWorkspace<T>) -> eyre::Result<()> {
        let element_nodes = self.block.element_nodes(element_index);
        ws.scratch
            .populate::<Topo>(self.fields, self.requests, self.coordinates, element_nodes)
            .wrap_err_with(|| format!("failed to gather data for element {}", element_index))?;

        let ndof = Topo::NUM_NODES * Topo::DIM;
        ws.lhs.resize_mut(ndof, ndof, T::zero());
        ws.lhs.fill(T::zero());
        ws.rhs.resize_vertically_mut(ndof, T::zero());
        ws.rhs.fill(T::zero());

        for kernel in &self.kernels {
            kernel.execute(
                DMatrixViewMut::from(&mut ws.lhs),
                DVectorViewMut::from(&mut ws.rhs),
                &ws.scratch,
            );
        }
        Ok(())
    }
}
