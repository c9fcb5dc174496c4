use crate::fields::{resolve_coordinates, resolve_field, TimeLeveledField};
use crate::kernel::Kernel;
use crate::master_element::{ScvTopology, ShapeFunctionKind, ShapeFunctionTable};
use crate::time_integrator::TimeStepCoefficients;
use crate::Real;
use cvfem_traits::{
    DataDependencySink, EntityRank, FieldId, FieldRegistry, MasterElementCall, ScratchViews, SolutionOptions,
    TimeIntegrator,
};
use eyre::WrapErr;
use itertools::izip;
use log::debug;
use nalgebra::{DMatrixViewMut, DVectorViewMut, Scalar, Vector3};
use std::marker::PhantomData;

pub const VELOCITY_FIELD_NAME: &str = "velocity";
pub const DENSITY_FIELD_NAME: &str = "density";
pub const PRESSURE_GRADIENT_FIELD_NAME: &str = "dpdx";

/// Unsteady mass term of the momentum equation, including the projected pressure gradient.
///
/// For every sub-control volume with integration point $ip$, owning node $I$ and measure $V_{ip}$,
/// the kernel subtracts
///
/// $$
/// \frac{V_{ip}}{\Delta t} \left( \gamma_1 \rho^{n+1} u^{n+1}_j + \gamma_2 \rho^n u^n_j
///     + \gamma_3 \rho^{n-1} u^{n-1}_j \right) + G_j p \\, V_{ip}
/// $$
///
/// from the residual entry $(I, j)$, where all quantities are interpolated to the integration
/// point. The Jacobian receives $N_K(ip) \gamma_1 \rho^{n+1} V_{ip} / \Delta t$ in the
/// $(I, j) \times (K, j)$ entries only, so different velocity components are never coupled.
///
/// With a lumped mass, the interpolation uses the shifted shape functions, which sample each
/// quantity at the owning node and make the Jacobian diagonal.
#[derive(Debug, Clone)]
pub struct MomentumMassElemKernel<T: Scalar, Topo> {
    velocity: TimeLeveledField,
    density: TimeLeveledField,
    pressure_gradient: FieldId,
    coordinates: FieldId,
    shape_functions: ShapeFunctionTable<T>,
    coefficients: Option<TimeStepCoefficients<T>>,
    topology: PhantomData<Topo>,
}

impl<T, Topo> MomentumMassElemKernel<T, Topo>
where
    T: Real,
    Topo: ScvTopology,
{
    /// Resolves the required fields, selects the shape functions and registers the data the
    /// kernel needs for every element.
    ///
    /// Returns an error if the velocity, density, pressure gradient or coordinate field cannot be
    /// resolved.
    pub fn new(
        registry: &(impl ?Sized + FieldRegistry),
        options: &(impl ?Sized + SolutionOptions),
        data_requests: &mut (impl ?Sized + DataDependencySink),
        lumped_mass: bool,
    ) -> eyre::Result<Self> {
        assert!(Topo::DIM <= 3, "Only up to three spatial dimensions are supported");

        let velocity = TimeLeveledField::resolve(registry, EntityRank::Node, VELOCITY_FIELD_NAME)
            .wrap_err("failed to resolve velocity for the momentum mass kernel")?;
        let density = TimeLeveledField::resolve(registry, EntityRank::Node, DENSITY_FIELD_NAME)
            .wrap_err("failed to resolve density for the momentum mass kernel")?;
        let pressure_gradient = resolve_field(registry, EntityRank::Node, PRESSURE_GRADIENT_FIELD_NAME)
            .wrap_err("failed to resolve the pressure gradient for the momentum mass kernel")?;
        let coordinates = resolve_coordinates(registry, options)
            .wrap_err("failed to resolve coordinates for the momentum mass kernel")?;

        let kind = if lumped_mass {
            ShapeFunctionKind::Lumped
        } else {
            ShapeFunctionKind::Consistent
        };
        let shape_functions = ShapeFunctionTable::new::<Topo>(kind);

        debug!(
            "Momentum mass kernel on {:?}: velocity has {} states{}, density has {} states{}, {:?} shape functions",
            Topo::TOPOLOGY,
            registry.number_of_states(velocity.n.field),
            if velocity.is_nm1_aliased() { " (n-1 aliased to n)" } else { "" },
            registry.number_of_states(density.n.field),
            if density.is_nm1_aliased() { " (n-1 aliased to n)" } else { "" },
            kind
        );

        let dim = Topo::DIM;
        data_requests.add_cvfem_volume_me(Topo::TOPOLOGY);
        data_requests.add_gathered_nodal_field(coordinates, dim);
        data_requests.add_gathered_nodal_field(density.nm1, 1);
        data_requests.add_gathered_nodal_field(density.n, 1);
        data_requests.add_gathered_nodal_field(density.np1, 1);
        data_requests.add_gathered_nodal_field(velocity.nm1, dim);
        data_requests.add_gathered_nodal_field(velocity.n, dim);
        data_requests.add_gathered_nodal_field(velocity.np1, dim);
        data_requests.add_gathered_nodal_field(pressure_gradient, dim);
        data_requests.add_master_element_call(MasterElementCall::ScvVolume);

        Ok(Self {
            velocity,
            density,
            pressure_gradient,
            coordinates,
            shape_functions,
            coefficients: None,
            topology: PhantomData,
        })
    }

    pub fn velocity(&self) -> &TimeLeveledField {
        &self.velocity
    }

    pub fn density(&self) -> &TimeLeveledField {
        &self.density
    }

    pub fn pressure_gradient(&self) -> FieldId {
        self.pressure_gradient
    }

    pub fn coordinates(&self) -> FieldId {
        self.coordinates
    }

    pub fn shape_functions(&self) -> &ShapeFunctionTable<T> {
        &self.shape_functions
    }

    pub fn lumped_mass(&self) -> bool {
        self.shape_functions.kind() == ShapeFunctionKind::Lumped
    }

    /// The coefficients bound by the last call to [`setup`](Kernel::setup), if any.
    pub fn time_step_coefficients(&self) -> Option<&TimeStepCoefficients<T>> {
        self.coefficients.as_ref()
    }
}

impl<T, Topo> Kernel<T> for MomentumMassElemKernel<T, Topo>
where
    T: Real,
    Topo: ScvTopology,
{
    fn setup(&mut self, time_integrator: &dyn TimeIntegrator<T>) {
        let coefficients = TimeStepCoefficients::from_integrator(time_integrator);
        debug!(
            "Momentum mass kernel bound to dt = {}, gamma = ({}, {}, {})",
            coefficients.dt, coefficients.gamma1, coefficients.gamma2, coefficients.gamma3
        );
        self.coefficients = Some(coefficients);
    }

    #[allow(non_snake_case)]
    fn execute(&self, mut lhs: DMatrixViewMut<T>, mut rhs: DVectorViewMut<T>, scratch: &dyn ScratchViews<T>) {
        let TimeStepCoefficients {
            dt,
            gamma1,
            gamma2,
            gamma3,
        } = match self.coefficients {
            Some(coefficients) => coefficients,
            None => panic!("Momentum mass kernel executed before setup() bound a time step"),
        };

        let n = Topo::NUM_NODES;
        let dim = Topo::DIM;
        assert_eq!(lhs.nrows(), n * dim, "Element Jacobian dimension mismatch");
        assert_eq!(lhs.ncols(), n * dim, "Element Jacobian dimension mismatch");
        assert_eq!(rhs.len(), n * dim, "Element residual dimension mismatch");

        let density_nm1 = scratch.scalar_view(self.density.nm1);
        let density_n = scratch.scalar_view(self.density.n);
        let density_np1 = scratch.scalar_view(self.density.np1);
        let velocity_nm1 = scratch.vector_view(self.velocity.nm1);
        let velocity_n = scratch.vector_view(self.velocity.n);
        let velocity_np1 = scratch.vector_view(self.velocity.np1);
        let Gpdx = scratch.vector_view(self.pressure_gradient);
        let scv_volume = scratch.scv_volume();

        for density in [density_nm1, density_n, density_np1] {
            assert_eq!(density.len(), n, "Density scratch size mismatch");
        }
        for vector in [&velocity_nm1, &velocity_n, &velocity_np1, &Gpdx] {
            assert_eq!(vector.shape(), (n, dim), "Vector field scratch size mismatch");
        }
        assert_eq!(scv_volume.len(), Topo::NUM_SCV_IP, "Sub-control volume scratch size mismatch");

        let w = self.shape_functions.weights();

        for (ip, (&nearest_node, &scV)) in izip!(Topo::ip_node_map(), scv_volume).enumerate() {
            let mut rho_nm1 = T::zero();
            let mut rho_n = T::zero();
            let mut rho_np1 = T::zero();
            let mut u_nm1 = Vector3::<T>::zeros();
            let mut u_n = Vector3::<T>::zeros();
            let mut u_np1 = Vector3::<T>::zeros();
            let mut Gjp = Vector3::<T>::zeros();

            for ic in 0..n {
                let r = w[(ip, ic)];

                rho_nm1 += r * density_nm1[ic];
                rho_n += r * density_n[ic];
                rho_np1 += r * density_np1[ic];
                for j in 0..dim {
                    u_nm1[j] += r * velocity_nm1[(ic, j)];
                    u_n[j] += r * velocity_n[(ic, j)];
                    u_np1[j] += r * velocity_np1[(ic, j)];
                    Gjp[j] += r * Gpdx[(ic, j)];
                }
            }

            let nn_ndim = nearest_node * dim;
            for j in 0..dim {
                rhs[nn_ndim + j] += -(gamma1 * rho_np1 * u_np1[j] + gamma2 * rho_n * u_n[j] + gamma3 * rho_nm1 * u_nm1[j])
                    * scV
                    / dt
                    - Gjp[j] * scV;
            }

            for ic in 0..n {
                let ic_ndim = ic * dim;
                let lhsfac = w[(ip, ic)] * gamma1 * rho_np1 * scV / dt;
                for j in 0..dim {
                    lhs[(nn_ndim + j, ic_ndim + j)] += lhsfac;
                }
            }
        }
    }
}
