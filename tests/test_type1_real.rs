use nufft_core::grid::wavenumbers;
use nufft_core::{KernelFamily, PlanBuilder, PointSet};

// ---------------------------------------------------------------------------
// 1-D real type-1, two delta points of opposite sign (spec scenario 2)
// ---------------------------------------------------------------------------

#[test]
fn two_opposite_deltas_give_odd_symmetric_imaginary_coefficients() {
    let n = 32usize;
    let mut plan = PlanBuilder::<f64>::new(&[n])
        .half_width(8)
        .oversampling(2.0)
        .kernel(KernelFamily::KaiserBesselBackwards)
        .build()
        .unwrap();

    let a = std::f64::consts::PI / 2.0;
    let b = 3.0 * std::f64::consts::PI / 2.0;
    plan.set_points(PointSet::D1(vec![a, b])).unwrap();

    let values = [1.0_f64, -1.0];
    let values_ref: Vec<&[f64]> = vec![&values];
    let mut out = vec![vec![num_complex::Complex::new(0.0, 0.0); n / 2 + 1]];
    plan.exec_type1_real(&values_ref, &mut out).unwrap();

    // This engine's type-1 carries no implicit `1/N`: the raw sum
    // `exp(-ik*a) - exp(-ik*b)` with `b = a + pi` reduces exactly to
    // `-2i*sin(k*a)`, without the extra `1/N` the spec's scenario text
    // states informally (derivation and cross-checks in DESIGN.md under
    // "Type-1 normalisation convention (spec §8 scenarios 1 and 2)").
    let ks = wavenumbers::real_half(n);
    for (slot, &k) in ks.iter().enumerate() {
        let expected_im = -2.0 * (k as f64 * a).sin();
        let got = out[0][slot];
        assert!(got.re.abs() < 5e-6, "k={k} expected real~0 got={got:?}");
        assert!(
            (got.im - expected_im).abs() < 5e-6,
            "k={k} expected_im={expected_im} got={got:?}"
        );
    }
}
