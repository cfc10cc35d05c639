//! Guessing a target among legal actions.
use crate::{DiscreteAct, FlatObs};
use anyhow::{ensure, Result};
use log::info;
use proxima_core::{
    record::{Record, RecordValue},
    ActionSpace, Env, EnvSpec, Info, ObservationSpace, Step,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`MaskedGuess`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct MaskedGuessConfig {
    /// Number of instances.
    pub n_envs: usize,

    /// Number of actions.
    pub n_actions: usize,

    /// Probability that an action other than the target is legal.
    pub p_legal: f64,

    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: usize,
}

impl Default for MaskedGuessConfig {
    fn default() -> Self {
        Self {
            n_envs: 1,
            n_actions: 4,
            p_legal: 0.5,
            max_episode_steps: 10,
        }
    }
}

impl MaskedGuessConfig {
    /// Sets the number of instances.
    pub fn n_envs(mut self, v: usize) -> Self {
        self.n_envs = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the probability that a non-target action is legal.
    pub fn p_legal(mut self, v: f64) -> Self {
        self.p_legal = v;
        self
    }

    /// Sets the maximum length of episodes.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Loads [`MaskedGuessConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MaskedGuessConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Legal actions of all instances, `n_actions` values per instance.
#[derive(Clone, Debug)]
pub struct MaskInfo {
    /// `1.0` for legal actions and `0.0` for illegal ones.
    pub mask: Vec<f32>,
}

impl Info for MaskInfo {
    fn action_mask(&self) -> Option<&[f32]> {
        Some(&self.mask)
    }
}

/// Vectorized guessing game with action masks.
///
/// At every step each instance draws a target action. The observation is
/// the one-hot encoding of the target. The target is always legal, every
/// other action is legal with probability `p_legal`. Choosing the target
/// gives reward 1, another legal action 0 and an illegal action -1.
///
/// The fraction of illegal actions in a step is reported as `"illegal_actions"`.
pub struct MaskedGuess {
    config: MaskedGuessConfig,
    targets: Vec<usize>,
    mask: Vec<f32>,
    steps: Vec<usize>,
    rng: StdRng,
}

impl MaskedGuess {
    // Draws a new target and mask for instance `i`.
    fn draw(&mut self, i: usize) {
        let n = self.config.n_actions;
        let target = self.rng.gen_range(0..n);
        self.targets[i] = target;
        for a in 0..n {
            let legal = a == target || self.rng.gen_bool(self.config.p_legal);
            self.mask[i * n + a] = legal as i32 as f32;
        }
    }

    fn obs(&self) -> FlatObs {
        let n = self.config.n_actions;
        let mut data = vec![0f32; self.targets.len() * n];
        for (i, &target) in self.targets.iter().enumerate() {
            data[i * n + target] = 1.0;
        }
        FlatObs::new(data, n)
    }

    fn info(&self) -> MaskInfo {
        MaskInfo {
            mask: self.mask.clone(),
        }
    }
}

impl Env for MaskedGuess {
    type Config = MaskedGuessConfig;
    type Obs = FlatObs;
    type Act = DiscreteAct;
    type Info = MaskInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        ensure!(config.n_envs > 0, "n_envs must be positive");
        ensure!(config.n_actions > 1, "n_actions must be at least 2");
        ensure!(
            (0.0..=1.0).contains(&config.p_legal),
            "p_legal must be in [0, 1]"
        );
        info!(
            "Build MaskedGuess: {} instances, {} actions, p_legal = {}, seed = {}",
            config.n_envs, config.n_actions, config.p_legal, seed
        );
        Ok(Self {
            config: config.clone(),
            targets: vec![0; config.n_envs],
            mask: vec![1.0; config.n_envs * config.n_actions],
            steps: vec![0; config.n_envs],
            rng: StdRng::seed_from_u64(seed as u64),
        })
    }

    fn spec(&self) -> EnvSpec {
        let n = self.config.n_actions;
        EnvSpec {
            observation_space: ObservationSpace::Box {
                shape: vec![n],
                low: vec![0.0; n],
                high: vec![1.0; n],
            },
            action_space: ActionSpace::Discrete { n },
            n_envs: self.config.n_envs,
            n_agents: 1,
            uses_action_mask: true,
        }
    }

    fn reset(&mut self) -> Result<(FlatObs, MaskInfo)> {
        for i in 0..self.config.n_envs {
            self.draw(i);
            self.steps[i] = 0;
        }
        Ok((self.obs(), self.info()))
    }

    fn step(&mut self, a: &DiscreteAct) -> Result<(Step<Self>, Record)> {
        let n_envs = self.config.n_envs;
        let n = self.config.n_actions;
        ensure!(
            a.0.len() == n_envs,
            "expected {} actions, got {}",
            n_envs,
            a.0.len()
        );

        let mut reward = vec![0f32; n_envs];
        let mut is_truncated = vec![0; n_envs];
        let mut n_illegal = 0;
        for i in 0..n_envs {
            let act = a.0[i];
            ensure!(act >= 0 && (act as usize) < n, "invalid action {}", act);
            let act = act as usize;

            reward[i] = if act == self.targets[i] {
                1.0
            } else if self.mask[i * n + act] == 0.0 {
                n_illegal += 1;
                -1.0
            } else {
                0.0
            };

            self.steps[i] += 1;
            if self.steps[i] >= self.config.max_episode_steps {
                is_truncated[i] = 1;
                self.steps[i] = 0;
            }
            self.draw(i);
        }

        let record = Record::from_scalar("illegal_actions", n_illegal as f32 / n_envs as f32);
        let step = Step::new(
            self.obs(),
            a.clone(),
            reward,
            vec![0; n_envs],
            is_truncated,
            self.info(),
        );
        Ok((step, record))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_target_is_legal() -> Result<()> {
        let config = MaskedGuessConfig::default().n_envs(3).n_actions(5);
        let mut env = MaskedGuess::build(&config, 42)?;
        let (mut obs, mut info) = env.reset()?;

        for _ in 0..20 {
            for i in 0..3 {
                let target = obs.get(i).iter().position(|&v| v == 1.0).unwrap();
                assert_eq!(info.mask[i * 5 + target], 1.0);
            }
            let (step, _) = env.step(&DiscreteAct(vec![0, 1, 2]))?;
            obs = step.obs;
            info = step.info;
        }
        Ok(())
    }

    #[test]
    fn test_rewards() -> Result<()> {
        let config = MaskedGuessConfig::default().n_actions(3).p_legal(0.0);
        let mut env = MaskedGuess::build(&config, 0)?;
        let (obs, _) = env.reset()?;
        let target = obs.get(0).iter().position(|&v| v == 1.0).unwrap() as i64;

        let (step, _) = env.step(&DiscreteAct(vec![target]))?;
        assert_eq!(step.reward, vec![1.0]);

        // Only the target is legal with p_legal = 0.
        let target = step.obs.get(0).iter().position(|&v| v == 1.0).unwrap() as i64;
        let (step, record) = env.step(&DiscreteAct(vec![(target + 1) % 3]))?;
        assert_eq!(step.reward, vec![-1.0]);
        assert_eq!(record.get_scalar("illegal_actions")?, 1.0);
        assert_eq!(step.info.action_mask().map(|m| m.len()), Some(3));
        Ok(())
    }

    #[test]
    fn test_serde_masked_guess_config() -> Result<()> {
        let config = MaskedGuessConfig::default().n_envs(4).p_legal(0.25);
        let dir = TempDir::new("masked_guess_config")?;
        let path = dir.path().join("masked_guess_config.yaml");
        config.save(&path)?;
        assert_eq!(config, MaskedGuessConfig::load(&path)?);
        Ok(())
    }
}
