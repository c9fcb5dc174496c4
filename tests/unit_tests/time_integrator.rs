use cvfem_momentum::options::TimeAccuracy;
use cvfem_momentum::time_integrator::{BdfTimeIntegrator, TimeStepCoefficients};
use cvfem_momentum::traits::TimeIntegrator;
use matrixcompare::assert_scalar_eq;

fn assert_gammas(integrator: &dyn TimeIntegrator<f64>, expected: [f64; 3]) {
    assert_scalar_eq!(integrator.gamma1(), expected[0], comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrator.gamma2(), expected[1], comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrator.gamma3(), expected[2], comp = abs, tol = 1e-14);
}

#[test]
fn first_order_integrator_uses_backward_euler() {
    let mut integrator = BdfTimeIntegrator::<f64>::new(TimeAccuracy::FirstOrder);
    for dt in [0.1, 0.2, 0.05] {
        integrator.advance(dt).unwrap();
        assert_eq!(integrator.time_step(), dt);
        assert_gammas(&integrator, [1.0, -1.0, 0.0]);
    }
    assert_eq!(integrator.step_count(), 3);
    assert_scalar_eq!(integrator.current_time(), 0.35, comp = abs, tol = 1e-14);
}

#[test]
fn second_order_integrator_starts_with_first_order_step() {
    let mut integrator = BdfTimeIntegrator::<f64>::new(TimeAccuracy::SecondOrder);
    integrator.advance(0.1).unwrap();
    assert_gammas(&integrator, [1.0, -1.0, 0.0]);

    integrator.advance(0.1).unwrap();
    assert_gammas(&integrator, [1.5, -2.0, 0.5]);
    assert_eq!(integrator.step_count(), 2);
    assert_eq!(integrator.accuracy(), TimeAccuracy::SecondOrder);
}

#[test]
fn variable_step_bdf2_coefficients() {
    let mut integrator = BdfTimeIntegrator::<f64>::new(TimeAccuracy::SecondOrder);
    integrator.advance(0.1).unwrap();
    integrator.advance(0.2).unwrap();

    // tau = dt_n / dt_nm1 = 2
    let tau = 2.0;
    assert_gammas(
        &integrator,
        [(1.0 + 2.0 * tau) / (1.0 + tau), -(1.0 + tau), tau * tau / (1.0 + tau)],
    );
    assert_eq!(integrator.time_step(), 0.2);
}

#[test]
fn coefficients_are_consistent_for_constant_fields() {
    // A time-constant field must produce a zero time derivative
    let mut integrator = BdfTimeIntegrator::<f64>::new(TimeAccuracy::SecondOrder);
    for dt in [0.1, 0.3, 0.15, 0.15] {
        integrator.advance(dt).unwrap();
        let sum = integrator.gamma1() + integrator.gamma2() + integrator.gamma3();
        assert_scalar_eq!(sum, 0.0, comp = abs, tol = 1e-14);
    }
}

#[test]
fn non_positive_time_steps_are_rejected() {
    let mut integrator = BdfTimeIntegrator::<f64>::new(TimeAccuracy::SecondOrder);
    assert!(integrator.advance(0.0).is_err());
    assert!(integrator.advance(-0.1).is_err());
    assert!(integrator.advance(f64::NAN).is_err());
    assert_eq!(integrator.step_count(), 0);

    integrator.advance(0.1).unwrap();
    assert!(integrator.advance(0.0).is_err());
    assert_eq!(integrator.step_count(), 1);
    assert_eq!(integrator.time_step(), 0.1);
}

#[test]
fn captured_coefficients_match_integrator() {
    let mut integrator = BdfTimeIntegrator::<f64>::new(TimeAccuracy::SecondOrder);
    integrator.advance(0.25).unwrap();
    integrator.advance(0.5).unwrap();

    let captured = TimeStepCoefficients::from_integrator(&integrator);
    assert_eq!(&captured, integrator.coefficients());
    assert_eq!(captured.time_step(), 0.5);
    assert_eq!(captured.gamma1(), integrator.gamma1());
    assert_eq!(captured.gamma2(), integrator.gamma2());
    assert_eq!(captured.gamma3(), integrator.gamma3());
}
