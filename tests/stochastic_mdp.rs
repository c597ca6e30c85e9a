extern crate finite_mdp;
mod common;

use common::*;
use finite_mdp::*;
use float_eq::*;
use itertools::iproduct;
use rand::prelude::*;
use rstest::*;

#[test]
fn sampled_next_states_fit_the_declared_distribution() {
    let env = &mut FiniteMdpEnv::from_config(three_state_stochastic_config(), Some(2718)).unwrap();
    let expected = [0.2, 0.5, 0.3];
    let counts = &mut [0usize; 3];

    let n = 20000;
    for _ in 0..n {
        env.reset();
        counts[env.step(0).unwrap().state] += 1;
    }

    // Chi-square with two degrees of freedom; 20.0 is far in the tail.
    let chi2: f64 = counts
        .iter()
        .zip(expected)
        .map(|(&c, p)| {
            let e = p * n as f64;
            (c as f64 - e).powi(2) / e
        })
        .sum();
    assert!(chi2 < 20.0, "chi2 = {chi2}, counts = {counts:?}");
}

#[test]
fn sampled_next_states_stay_in_the_support() {
    let rng = &mut StdRng::seed_from_u64(31415);
    let mdp = &mut Mdp::from_config(&three_state_stochastic_config(), rng).unwrap();
    let config = three_state_stochastic_config();
    let Some(TransitionTable::Stochastic(probs)) = config.transition else {
        panic!("expected a stochastic table")
    };

    for (s, a) in iproduct!(0..3, 0..2) {
        for _ in 0..500 {
            mdp.set_state(s).unwrap();
            let si = mdp.step(a, rng).unwrap();
            assert!(
                probs[s][a][si.state] > 0.,
                "({s}, {a}) moved to {} which has no probability mass",
                si.state
            );
            assert_float_eq!(si.reward, (2 * s + a) as f64, abs <= 1e-12);
        }
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2718)]
#[case(31415)]
fn conversion_preserves_deterministic_behaviour(#[case] seed: u64) {
    let rng = &mut StdRng::seed_from_u64(seed);
    let config = MdpConfig::deterministic(vec![vec![0; 3]; 5], vec![vec![0.; 3]; 5]).randomized();
    let det = Mdp::from_config(&config, rng).unwrap();
    let sto = det.clone().into_stochastic();
    assert_eq!(sto.mode(), MdpMode::Stochastic);

    for (s, a) in iproduct!(0..det.n_s(), 0..det.n_a()) {
        let d = &mut det.clone();
        let t = &mut sto.clone();
        d.set_state(s).unwrap();
        t.set_state(s).unwrap();

        let expected = d.step(a, rng).unwrap();
        for _ in 0..10 {
            t.set_state(s).unwrap();
            let actual = t.step(a, rng).unwrap();
            assert_eq!(
                (actual.state, actual.reward, actual.done),
                (expected.state, expected.reward, expected.done)
            );
        }
    }
}

#[test]
fn from_deterministic_builds_one_hot_rows() {
    let rng = &mut StdRng::seed_from_u64(0);
    let Mdp::Deterministic(det) = Mdp::from_config(&two_state_config(), rng).unwrap() else {
        panic!("expected a deterministic model")
    };

    let sto = StochasticMdp::from_deterministic(&det);
    assert_eq!(
        Mdp::from(sto).to_config(),
        MdpConfig::stochastic(
            vec![vec![vec![0., 1.]], vec![vec![1., 0.]]],
            vec![vec![5.], vec![1.]]
        )
        .with_terminal(vec![false, true])
    );
}

#[test]
fn randomized_stochastic_rows_are_not_normalized() {
    let config = three_state_stochastic_config().randomized();
    let env = &mut FiniteMdpEnv::from_config(config, Some(2718)).unwrap();

    let Some(TransitionTable::Stochastic(rows)) = env.mdp().to_config().transition else {
        panic!("expected a stochastic table")
    };
    let sums = rows.iter().flatten().map(|p| p.iter().sum::<f64>()).collect::<Vec<_>>();
    assert_eq!(sums.len(), 6);
    assert!(sums.iter().any(|s| (s - 1.).abs() > 1e-9));

    // Unnormalized rows are reported instead of being sampled.
    let err = env.step(1).unwrap_err();
    assert!(matches!(err, MdpError::InvalidDistribution { state: 0, action: 1 }));
    assert_eq!(env.mdp().state(), 0);
    assert_eq!(env.steps(), 0);
}

#[test]
fn copy_with_config_installs_stochastic_tables() {
    let env = &mut FiniteMdpEnv::from_config(three_state_stochastic_config(), Some(2718)).unwrap();
    let partial = MdpConfig {
        transition: Some(TransitionTable::Stochastic(vec![
            vec![vec![0., 1., 0.], vec![0., 0., 1.]],
            vec![vec![0., 0., 1.], vec![1., 0., 0.]],
            vec![vec![0., 0., 1.], vec![0., 0., 1.]],
        ])),
        ..Default::default()
    };

    let copy = &mut env.copy_with_config(partial.clone()).unwrap();
    assert_eq!(trace(copy, &[0, 0]), vec![(1, 0., false), (2, 2., false)]);
    assert_eq!(copy.config(), &partial);
    assert_eq!(env.mdp().to_config(), three_state_stochastic_config());

    // A row that is not a distribution is accepted by the update but not by a step.
    let uneven = MdpConfig {
        transition: Some(TransitionTable::Stochastic(vec![
            vec![vec![0.5, 0.3, 0.], vec![0., 0., 1.]],
            vec![vec![1., 0., 0.], vec![0., 0.5, 0.5]],
            vec![vec![0., 0., 1.], vec![0., 0., 1.]],
        ])),
        ..Default::default()
    };
    let copy = &mut env.copy_with_config(uneven).unwrap();
    assert!(matches!(
        copy.step(0),
        Err(MdpError::InvalidDistribution { state: 0, action: 0 })
    ));
    assert_eq!(copy.mdp().state(), 0);
}

#[test]
fn copies_draw_from_their_own_generator() {
    let env = &mut FiniteMdpEnv::from_config(three_state_stochastic_config(), Some(2718)).unwrap();
    let control = &mut env.clone();
    let copy = &mut env.copy_with_config(MdpConfig::default()).unwrap();

    let run = |env: &mut FiniteMdpEnv| {
        (0..50)
            .map(|_| {
                if env.steps() > 3 {
                    env.reset();
                }
                env.step(0).unwrap().state
            })
            .collect::<Vec<_>>()
    };

    let from_copy = run(copy);
    let from_env = run(env);
    assert_eq!(from_env, run(control));
    assert_eq!(from_env, from_copy);
}
