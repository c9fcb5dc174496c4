//! Time-integration coefficients for multi-level backward-difference schemes.
use crate::options::TimeAccuracy;
use crate::Real;
use cvfem_traits::TimeIntegrator;
use eyre::eyre;
use log::debug;
use numeric_literals::replace_float_literals;

/// The step size and blending coefficients of a single time step.
///
/// `gamma1`, `gamma2` and `gamma3` weight the n+1, n and n-1 levels respectively.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimeStepCoefficients<T> {
    pub dt: T,
    pub gamma1: T,
    pub gamma2: T,
    pub gamma3: T,
}

impl<T: Real> TimeStepCoefficients<T> {
    pub fn new(dt: T, gamma1: T, gamma2: T, gamma3: T) -> Self {
        Self {
            dt,
            gamma1,
            gamma2,
            gamma3,
        }
    }

    /// Captures the current coefficients of a time integrator.
    pub fn from_integrator(integrator: &(impl ?Sized + TimeIntegrator<T>)) -> Self {
        Self {
            dt: integrator.time_step(),
            gamma1: integrator.gamma1(),
            gamma2: integrator.gamma2(),
            gamma3: integrator.gamma3(),
        }
    }
}

impl<T: Real> TimeIntegrator<T> for TimeStepCoefficients<T> {
    fn time_step(&self) -> T {
        self.dt
    }

    fn gamma1(&self) -> T {
        self.gamma1
    }

    fn gamma2(&self) -> T {
        self.gamma2
    }

    fn gamma3(&self) -> T {
        self.gamma3
    }
}

/// Backward-difference time integrator with variable step sizes.
///
/// The first step is always first-order accurate, since no n-1 history exists yet. Subsequent
/// steps use BDF2 when second-order accuracy is requested.
#[derive(Debug, Clone)]
pub struct BdfTimeIntegrator<T> {
    accuracy: TimeAccuracy,
    time_step_n: T,
    time_step_nm1: T,
    current_time: T,
    step_count: usize,
    coefficients: TimeStepCoefficients<T>,
}

impl<T: Real> BdfTimeIntegrator<T> {
    pub fn new(accuracy: TimeAccuracy) -> Self {
        Self {
            accuracy,
            time_step_n: T::zero(),
            time_step_nm1: T::zero(),
            current_time: T::zero(),
            step_count: 0,
            coefficients: TimeStepCoefficients::new(T::zero(), T::one(), -T::one(), T::zero()),
        }
    }

    pub fn accuracy(&self) -> TimeAccuracy {
        self.accuracy
    }

    /// The number of steps started so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The time at the end of the current step.
    pub fn current_time(&self) -> T {
        self.current_time
    }

    pub fn coefficients(&self) -> &TimeStepCoefficients<T> {
        &self.coefficients
    }

    /// Starts a new time step of size `dt` and recomputes the blending coefficients.
    pub fn advance(&mut self, dt: T) -> eyre::Result<()> {
        if !(dt > T::zero()) {
            return Err(eyre!("time step must be positive, got {}", dt));
        }

        self.time_step_nm1 = self.time_step_n;
        self.time_step_n = dt;
        self.current_time += dt;
        self.step_count += 1;

        let (gamma1, gamma2, gamma3) = self.compute_gamma();
        self.coefficients = TimeStepCoefficients::new(dt, gamma1, gamma2, gamma3);
        debug!(
            "Time step {}: t = {}, dt = {}, gamma = ({}, {}, {})",
            self.step_count, self.current_time, dt, gamma1, gamma2, gamma3
        );
        Ok(())
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn compute_gamma(&self) -> (T, T, T) {
        if self.step_count == 1 || self.accuracy == TimeAccuracy::FirstOrder {
            if self.accuracy == TimeAccuracy::SecondOrder {
                debug!("Using first-order backward differences for the start-up step");
            }
            (1.0, -1.0, 0.0)
        } else {
            let tau = self.time_step_n / self.time_step_nm1;
            let gamma1 = (1.0 + 2.0 * tau) / (1.0 + tau);
            let gamma2 = -(1.0 + tau);
            let gamma3 = tau * tau / (1.0 + tau);
            (gamma1, gamma2, gamma3)
        }
    }
}

impl<T: Real> TimeIntegrator<T> for BdfTimeIntegrator<T> {
    fn time_step(&self) -> T {
        self.coefficients.dt
    }

    fn gamma1(&self) -> T {
        self.coefficients.gamma1
    }

    fn gamma2(&self) -> T {
        self.coefficients.gamma2
    }

    fn gamma3(&self) -> T {
        self.coefficients.gamma3
    }
}
