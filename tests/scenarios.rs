//! End to end checks of the factor algebra on small, hand computed factors.

use discrete_factor::{factor_product, Assignment, Factor, FactorError};

fn phi() -> Factor {
    Factor::new(&["x1", "x2", "x3"], &[2, 3, 2], (0..12).map(|x| x as f64))
        .expect("Unexpected error")
}

fn assert_close(expected: &[f64], actual: &Factor) {
    assert_eq!(expected.len(), actual.len());
    for (e, a) in expected.iter().zip(actual.values().iter()) {
        assert!((e - a).abs() < 1e-4, "expected {:?}, got {:?}", expected, actual.values());
    }
}

#[test]
fn marginalize_two_axes() {
    let f = phi().marginalized(&["x1", "x3"]).expect("Unexpected error");
    assert_eq!(vec!["x2"], f.scope());
    assert_close(&[14., 22., 30.], &f);
}

#[test]
fn reduce_two_axes() {
    let f = phi().reduced(&["x1_0", "x2_0"]).expect("Unexpected error");
    assert_eq!(vec!["x3"], f.scope());
    assert_close(&[0., 1.], &f);
}

#[test]
fn divide_by_reordered_scope() {
    let phi2 = Factor::new(&["x3", "x1"], &[2, 2], vec![1., 2., 3., 4.]).expect("Unexpected error");
    let f = phi().divide(&phi2).expect("Unexpected error");

    assert_eq!(vec!["x1", "x2", "x3"], f.scope());
    assert_close(&[0., 0.3333, 2., 1., 4., 1.6667, 3., 1.75, 4., 2.25, 5., 2.75], &f);

    // every cell is the quotient of the aligned cells of the operands
    for i in 0..f.len() {
        let states = &f.assignment_states(&[i]).expect("Unexpected error")[0];
        let assn: Assignment = f.scope()
                                .into_iter()
                                .map(String::from)
                                .zip(states.iter().cloned())
                                .collect();
        let expected = phi().value(&assn).unwrap() / phi2.value(&assn).unwrap();
        assert!((expected - f.values()[i]).abs() < 1e-12);
    }
}

#[test]
fn product_then_divide() {
    let phi2 = Factor::new(&["x3", "x4"], &[2, 2], vec![0., 2., 4., 0.]).expect("Unexpected error");
    let f = phi().product(&phi2).and_then(|p| p.divide(&phi2)).expect("Unexpected error");

    assert_eq!(vec!["x1", "x2", "x3", "x4"], f.scope());
    for (i, states) in (0..f.len()).map(|i| (i, f.assignment_states(&[i]).unwrap().remove(0))) {
        let (x1, x2, x3, x4) = (states[0], states[1], states[2], states[3]);
        let denominator = phi2.values()[x3 * 2 + x4];
        let expected = if denominator == 0. { 0. } else { (x1 * 6 + x2 * 2 + x3) as f64 };
        assert!((expected - f.values()[i]).abs() < 1e-12);
    }
}

#[test]
fn disjoint_divide() {
    let phi2 = Factor::new(&["y"], &[2], vec![1., 2.]).expect("Unexpected error");
    match phi().divide(&phi2) {
        Err(FactorError::UndefinedOperation(_)) => (),
        other => panic!("expected an undefined operation, got {:?}", other)
    }
}

#[test]
fn in_place_and_copy_modes() {
    let original = phi();

    let copy = original.normalized();
    assert_eq!(phi(), original);

    let mut in_place = phi();
    in_place.normalize();
    assert_eq!(copy, in_place);

    let mut in_place = phi();
    in_place.reduce(&["x2_1"]).expect("Unexpected error");
    assert_eq!(original.reduced(&["x2_1"]).expect("Unexpected error"), in_place);
}

/// A Markov network over a, b, c, d with pairwise potentials. Variable elimination of everything
/// but `a` gives the marginal over `a`, which must match brute force enumeration.
#[test]
fn variable_elimination() {
    let ab = Factor::new(&["a", "b"], &[2, 2], vec![100., 1., 1., 100.]).unwrap();
    let ac = Factor::new(&["a", "c"], &[2, 2], vec![40., 30., 100., 20.]).unwrap();
    let bd = Factor::new(&["b", "d"], &[2, 2], vec![1., 100., 100., 1.]).unwrap();
    let cd = Factor::new(&["c", "d"], &[2, 2], vec![60., 60., 40., 40.]).unwrap();

    // eliminate d, then c, then b
    let psi_d = factor_product(&[&bd, &cd]).and_then(|f| f.marginalized(&["d"])).unwrap();
    let psi_c = factor_product(&[&ac, &psi_d]).and_then(|f| f.marginalized(&["c"])).unwrap();
    let psi_b = factor_product(&[&ab, &psi_c]).and_then(|f| f.marginalized(&["b"])).unwrap();
    let marginal = psi_b.normalized();
    assert_eq!(vec!["a"], marginal.scope());

    let joint = factor_product(&[&ab, &ac, &bd, &cd]).unwrap();
    let brute = joint.marginalized(&["b", "c", "d"]).unwrap().normalized();
    assert_eq!(vec!["a"], brute.scope());

    for (x, y) in marginal.values().iter().zip(brute.values().iter()) {
        assert!((x - y).abs() < 1e-12);
    }
}

#[test]
fn debug_table() {
    let out = phi().to_string();
    let mut lines = out.lines();
    assert_eq!(Some("x1\tx2\tx3\tphi(x1, x2, x3)"), lines.next());
    assert_eq!(Some("x1_0\tx2_0\tx3_0\t0"), lines.nth(1));
    assert_eq!(Some("x1_1\tx2_2\tx3_1\t11"), lines.last());
}
