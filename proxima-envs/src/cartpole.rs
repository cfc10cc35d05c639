//! Cart-pole balancing.
use crate::{DiscreteAct, FlatObs};
use anyhow::{ensure, Result};
use log::info;
use proxima_core::{record::Record, ActionSpace, Env, EnvSpec, ObservationSpace, Step};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    f32::consts::PI,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASS_CART + MASS_POLE;
// Half length of the pole
const LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = MASS_POLE * LENGTH;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;
const X_THRESHOLD: f32 = 2.4;
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * PI / 360.0;

/// Configuration of [`CartPole`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct CartPoleConfig {
    /// Number of instances.
    pub n_envs: usize,

    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: usize,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            n_envs: 1,
            max_episode_steps: 500,
        }
    }
}

impl CartPoleConfig {
    /// Sets the number of instances.
    pub fn n_envs(mut self, v: usize) -> Self {
        self.n_envs = v;
        self
    }

    /// Sets the maximum length of episodes.
    pub fn max_episode_steps(mut self, v: usize) -> Self {
        self.max_episode_steps = v;
        self
    }

    /// Loads [`CartPoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CartPoleConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Vectorized cart-pole.
///
/// A pole is attached to a cart on a frictionless track. Action 0 pushes the
/// cart to the left, action 1 to the right. Every step gives reward 1. An
/// episode terminates when the cart leaves `[-2.4, 2.4]` or the pole leans
/// more than 12 degrees.
///
/// Observation: `[x, x_dot, theta, theta_dot]`.
pub struct CartPole {
    config: CartPoleConfig,

    // x, x_dot, theta, theta_dot of every instance
    states: Vec<[f32; 4]>,
    steps: Vec<usize>,
    rng: StdRng,
}

impl CartPole {
    fn initial_state(rng: &mut StdRng) -> [f32; 4] {
        let mut s = [0f32; 4];
        for v in s.iter_mut() {
            *v = rng.gen_range(-0.05..0.05);
        }
        s
    }

    fn obs(&self) -> FlatObs {
        FlatObs::new(self.states.iter().flatten().copied().collect(), 4)
    }

    fn is_terminal(s: &[f32; 4]) -> bool {
        s[0].abs() > X_THRESHOLD || s[2].abs() > THETA_THRESHOLD
    }

    // Euler integration of the dynamics for one step.
    fn dynamics(s: &[f32; 4], action: i64) -> [f32; 4] {
        let [x, x_dot, theta, theta_dot] = *s;
        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let (sin, cos) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin - cos * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos * cos / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos / TOTAL_MASS;

        [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ]
    }
}

impl Env for CartPole {
    type Config = CartPoleConfig;
    type Obs = FlatObs;
    type Act = DiscreteAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        ensure!(config.n_envs > 0, "n_envs must be positive");
        info!(
            "Build CartPole: {} instances, episodes truncated after {} steps, seed = {}",
            config.n_envs, config.max_episode_steps, seed
        );
        Ok(Self {
            config: config.clone(),
            states: vec![[0.0; 4]; config.n_envs],
            steps: vec![0; config.n_envs],
            rng: StdRng::seed_from_u64(seed as u64),
        })
    }

    fn spec(&self) -> EnvSpec {
        EnvSpec {
            observation_space: ObservationSpace::Box {
                shape: vec![4],
                low: vec![-4.8, f32::MIN, -0.42, f32::MIN],
                high: vec![4.8, f32::MAX, 0.42, f32::MAX],
            },
            action_space: ActionSpace::Discrete { n: 2 },
            n_envs: self.config.n_envs,
            n_agents: 1,
            uses_action_mask: false,
        }
    }

    fn reset(&mut self) -> Result<(FlatObs, ())> {
        for i in 0..self.config.n_envs {
            self.states[i] = Self::initial_state(&mut self.rng);
            self.steps[i] = 0;
        }
        Ok((self.obs(), ()))
    }

    fn step(&mut self, a: &DiscreteAct) -> Result<(Step<Self>, Record)> {
        let n = self.config.n_envs;
        ensure!(a.0.len() == n, "expected {} actions, got {}", n, a.0.len());

        let mut is_terminated = vec![0; n];
        let mut is_truncated = vec![0; n];
        for i in 0..n {
            ensure!(a.0[i] == 0 || a.0[i] == 1, "invalid action {}", a.0[i]);
            self.states[i] = Self::dynamics(&self.states[i], a.0[i]);
            self.steps[i] += 1;

            is_terminated[i] = Self::is_terminal(&self.states[i]) as i8;
            is_truncated[i] = (self.steps[i] >= self.config.max_episode_steps) as i8;
            if is_terminated[i] == 1 || is_truncated[i] == 1 {
                self.states[i] = Self::initial_state(&mut self.rng);
                self.steps[i] = 0;
            }
        }

        let step = Step::new(
            self.obs(),
            a.clone(),
            vec![1.0; n],
            is_terminated,
            is_truncated,
            (),
        );
        Ok((step, Record::empty()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proxima_core::Obs;
    use tempdir::TempDir;

    #[test]
    fn test_pushing_right_terminates() -> Result<()> {
        let config = CartPoleConfig::default().n_envs(2);
        let mut env = CartPole::build(&config, 42)?;
        let (obs, _) = env.reset()?;
        assert_eq!(obs.len(), 2);
        assert!(obs.get(0).iter().all(|v| v.abs() <= 0.05));

        let mut n_steps = 0;
        loop {
            let (step, _) = env.step(&DiscreteAct(vec![1, 1]))?;
            n_steps += 1;
            if step.is_terminated[0] == 1 {
                // The unit was reset.
                assert!(step.obs.get(0).iter().all(|v| v.abs() <= 0.05));
                break;
            }
            assert!(n_steps < 100);
        }
        Ok(())
    }

    #[test]
    fn test_truncation() -> Result<()> {
        let config = CartPoleConfig::default().max_episode_steps(3);
        let mut env = CartPole::build(&config, 0)?;
        env.reset()?;

        let mut flags = vec![];
        for i in 0..6 {
            let (step, _) = env.step(&DiscreteAct(vec![i % 2]))?;
            flags.push(step.is_truncated[0]);
        }
        assert_eq!(flags, vec![0, 0, 1, 0, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_seed() -> Result<()> {
        let config = CartPoleConfig::default().n_envs(3);
        let (obs1, _) = CartPole::build(&config, 1)?.reset()?;
        let (obs2, _) = CartPole::build(&config, 1)?.reset()?;
        assert_eq!(obs1.get(2), obs2.get(2));
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = CartPole::build(&CartPoleConfig::default(), 0)?;
        env.reset()?;
        assert!(env.step(&DiscreteAct(vec![2])).is_err());
        assert!(env.step(&DiscreteAct(vec![0, 1])).is_err());
        Ok(())
    }

    #[test]
    fn test_serde_cartpole_config() -> Result<()> {
        let config = CartPoleConfig::default().n_envs(8).max_episode_steps(200);
        let dir = TempDir::new("cartpole_config")?;
        let path = dir.path().join("cartpole_config.yaml");
        config.save(&path)?;
        assert_eq!(config, CartPoleConfig::load(&path)?);
        Ok(())
    }
}
