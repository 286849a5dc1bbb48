//! Builder and factory used together, the way the operation simulator does.

use std::f64::consts::TAU;
use std::sync::Arc;

use approx::assert_abs_diff_eq;
use hs_controls::{
    ClippingPairBuilder, ControlLawFactory, LawSettings, PairBuilder, PairSettings,
    SaturatingLawFactory,
};
use hs_core::{Cut, Strategy};
use hs_signal::{Harmonic, HarmonicSignal, SharedSignal};
use nalgebra::DVector;

fn demand() -> SharedSignal {
    Arc::new(
        HarmonicSignal::new(TAU, vec![Harmonic::new(1.0, 1.0), Harmonic::new(2.0, 3.0)]).unwrap(),
    )
}

#[test]
fn nointer_pair_tracks_demand_exactly() {
    let signal = demand();
    let cut = Cut::new(0.5).unwrap();
    let pair = ClippingPairBuilder
        .build(&signal, cut, Strategy::NoInter, &PairSettings::default())
        .unwrap();
    let law = SaturatingLawFactory
        .build(cut, Strategy::NoInter, &pair.base, &pair.peak, &LawSettings::default())
        .unwrap();

    let zero = DVector::zeros(2);
    for i in 0..=200 {
        let t = i as f64 * TAU / 200.0;
        let p = law.powers(signal.value(t), pair.reference.value(t), &zero);
        // up to the sampling error in the peak demand
        assert_abs_diff_eq!(p.total(), signal.value(t), epsilon = 1e-4);
        assert_eq!(p.interchange(), 0.0);
    }
}

#[test]
fn inter_pair_uses_both_units_within_limits() {
    let signal = demand();
    let cut = Cut::new(0.4).unwrap();
    let pair = ClippingPairBuilder
        .build(&signal, cut, Strategy::Inter, &PairSettings::default())
        .unwrap();
    let law = SaturatingLawFactory
        .build(cut, Strategy::Inter, &pair.base, &pair.peak, &LawSettings::default())
        .unwrap();

    for i in 0..=200 {
        let t = i as f64 * TAU / 200.0;
        // Any peak offset: the recharge term must not cost demand tracking
        let state = DVector::from_vec(vec![0.0, 0.8 * (2.0 * t).sin()]);
        let p = law.powers(signal.value(t), pair.reference.value(t), &state);
        assert!(p.base.abs() <= pair.base.power + 1e-12);
        assert!(p.peak.abs() <= pair.peak.power + 1e-12);
        // up to the sampling error in the peak demand
        assert_abs_diff_eq!(p.total(), signal.value(t), epsilon = 1e-4);
    }
}
