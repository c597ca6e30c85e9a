extern crate finite_mdp;

use finite_mdp::*;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => MdpConfig::load(path)?,
        None => MdpConfig::deterministic(
            vec![vec![1, 0], vec![2, 0], vec![2, 2]],
            vec![vec![0., 0.], vec![1., 0.], vec![0., 0.]],
        )
        .with_terminal(vec![false, false, true]),
    };

    let gym = &mut FiniteMdpEnv::from_config(config, Some(2718))?;
    info!(
        observation_space = ?gym.observation_space(),
        action_space = ?gym.action_space(),
        mode = %gym.mdp().mode(),
        "environment ready"
    );

    for s in gym.observation_space().iter() {
        info!(
            state = s,
            reward = ?gym.mdp().reward().row(s).to_vec(),
            terminal = gym.mdp().terminal()[s],
            "state"
        );
    }

    let policy = RandomPolicy::new(gym.action_space());
    let episodes = gym.generate(3, &policy, 2718)?;
    for (i, ep) in episodes.iter().enumerate() {
        let ret: f64 = ep.iter().map(|e| e.r).sum();
        info!(episode = i, length = ep.len(), ret, "episode finished");
    }

    println!("{}", serde_json::to_string_pretty(&episodes)?);
    println!("{}", gym.mdp().to_config().to_json_string()?);

    Ok(())
}
