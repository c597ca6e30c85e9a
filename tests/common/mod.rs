use finite_mdp::*;

/// Two states, one action: `0 -> 1 -> 0`, rewards 5 and 1, state 1 terminal.
#[allow(dead_code)]
pub fn two_state_config() -> MdpConfig {
    MdpConfig::deterministic(vec![vec![1], vec![0]], vec![vec![5.], vec![1.]])
        .with_terminal(vec![false, true])
}

/// Three states, two actions, with genuinely random transitions out of state 0.
#[allow(dead_code)]
pub fn three_state_stochastic_config() -> MdpConfig {
    MdpConfig::stochastic(
        vec![
            vec![vec![0.2, 0.5, 0.3], vec![0., 0., 1.]],
            vec![vec![1., 0., 0.], vec![0., 0.5, 0.5]],
            vec![vec![0., 0., 1.], vec![0., 0., 1.]],
        ],
        vec![vec![0., 1.], vec![2., 3.], vec![4., 5.]],
    )
    .with_terminal(vec![false, false, true])
}

#[allow(dead_code)]
pub fn trace(env: &mut FiniteMdpEnv, actions: &[Discrete]) -> Vec<(Discrete, f64, bool)> {
    actions
        .iter()
        .map(|&a| {
            let si = env.step(a).unwrap();
            (si.state, si.reward, si.done)
        })
        .collect()
}
