use crate::{error::*, Discrete};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MdpMode {
    Deterministic,
    Stochastic,
}

impl MdpMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MdpMode::Deterministic => "deterministic",
            MdpMode::Stochastic => "stochastic",
        }
    }
}

impl fmt::Display for MdpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition table as it appears in a configuration: `S x A` next-state indices
/// for a deterministic MDP, `S x A x S` probabilities for a stochastic one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransitionTable {
    Deterministic(Vec<Vec<Discrete>>),
    Stochastic(Vec<Vec<Vec<f64>>>),
}

impl Default for TransitionTable {
    fn default() -> Self {
        TransitionTable::Deterministic(vec![])
    }
}

/// Plain description of an MDP. This is what the factory consumes and what a
/// model serializes back to.
///
/// Every field is optional so the same type doubles as a partial configuration
/// for [`MdpConfig::merge`] and `Mdp::update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MdpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MdpMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "terminal_flags")]
    pub terminal: Option<Vec<bool>>,

    /// Randomize the tables right after construction. Never emitted by a model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random: Option<bool>,
}

impl MdpConfig {
    pub fn deterministic(transition: Vec<Vec<Discrete>>, reward: Vec<Vec<f64>>) -> Self {
        Self {
            mode: Some(MdpMode::Deterministic),
            transition: Some(TransitionTable::Deterministic(transition)),
            reward: Some(reward),
            ..Default::default()
        }
    }

    pub fn stochastic(transition: Vec<Vec<Vec<f64>>>, reward: Vec<Vec<f64>>) -> Self {
        Self {
            mode: Some(MdpMode::Stochastic),
            transition: Some(TransitionTable::Stochastic(transition)),
            reward: Some(reward),
            ..Default::default()
        }
    }

    pub fn with_terminal(mut self, terminal: Vec<bool>) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn randomized(mut self) -> Self {
        self.random = Some(true);
        self
    }

    /// Returns a new configuration where every field present in `partial`
    /// replaces the one in `self`.
    pub fn merge(&self, partial: &MdpConfig) -> MdpConfig {
        MdpConfig {
            mode: partial.mode.or(self.mode),
            transition: partial
                .transition
                .clone()
                .or_else(|| self.transition.clone()),
            reward: partial.reward.clone().or_else(|| self.reward.clone()),
            terminal: partial.terminal.clone().or_else(|| self.terminal.clone()),
            random: partial.random.or(self.random),
        }
    }

    pub fn from_json_str(json: &str) -> MdpResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> MdpResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> MdpResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> MdpResult<()> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Terminal flags are read from booleans or numbers (non-zero is terminal) and
/// written as `0`/`1`.
mod terminal_flags {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
    }

    pub fn serialize<S: Serializer>(flags: &Option<Vec<bool>>, s: S) -> Result<S::Ok, S::Error> {
        match flags {
            Some(flags) => s.collect_seq(flags.iter().map(|&f| u8::from(f))),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<bool>>, D::Error> {
        let flags = Option::<Vec<Flag>>::deserialize(d)?;
        Ok(flags.map(|flags| {
            flags
                .into_iter()
                .map(|f| match f {
                    Flag::Bool(b) => b,
                    Flag::Number(x) => x != 0.0,
                })
                .collect()
        }))
    }
}
