//! Pendulum swing-up.
use crate::{ContinuousAct, FlatObs};
use anyhow::{ensure, Result};
use log::info;
use proxima_core::{
    record::{Record, RecordValue},
    ActionSpace, Env, EnvSpec, ObservationSpace, Step,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    f32::consts::PI,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const M: f32 = 1.0;
const L: f32 = 1.0;

/// Configuration of [`Pendulum`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PendulumConfig {
    /// Number of instances.
    pub n_envs: usize,

    /// Episodes are truncated after this number of steps.
    pub max_episode_steps: usize,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            n_envs: 1,
            max_episode_steps: 200,
        }
    }
}

impl PendulumConfig {
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

    /// Loads [`PendulumConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PendulumConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

fn angle_normalize(x: f32) -> f32 {
    (x + PI).rem_euclid(2.0 * PI) - PI
}

/// Vectorized pendulum.
///
/// The torque applied to the free end is the action, in `[-2, 2]`. The reward
/// penalizes the angle from upright, the angular velocity and the torque:
/// `-(theta^2 + 0.1 * theta_dot^2 + 0.001 * u^2)`. Episodes never terminate
/// and are truncated after `max_episode_steps`.
///
/// Observation: `[cos(theta), sin(theta), theta_dot]`. The torques actually
/// applied are reported as `"torque"`.
pub struct Pendulum {
    config: PendulumConfig,

    // theta, theta_dot of every instance
    states: Vec<[f32; 2]>,
    steps: Vec<usize>,
    rng: StdRng,
}

impl Pendulum {
    fn initial_state(rng: &mut StdRng) -> [f32; 2] {
        [rng.gen_range(-PI..PI), rng.gen_range(-1.0..1.0)]
    }

    fn obs(&self) -> FlatObs {
        let data = self
            .states
            .iter()
            .flat_map(|&[th, thdot]| [th.cos(), th.sin(), thdot])
            .collect();
        FlatObs::new(data, 3)
    }
}

impl Env for Pendulum {
    type Config = PendulumConfig;
    type Obs = FlatObs;
    type Act = ContinuousAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        ensure!(config.n_envs > 0, "n_envs must be positive");
        info!(
            "Build Pendulum: {} instances, episodes truncated after {} steps, seed = {}",
            config.n_envs, config.max_episode_steps, seed
        );
        Ok(Self {
            config: config.clone(),
            states: vec![[0.0; 2]; config.n_envs],
            steps: vec![0; config.n_envs],
            rng: StdRng::seed_from_u64(seed as u64),
        })
    }

    fn spec(&self) -> EnvSpec {
        EnvSpec {
            observation_space: ObservationSpace::Box {
                shape: vec![3],
                low: vec![-1.0, -1.0, -MAX_SPEED],
                high: vec![1.0, 1.0, MAX_SPEED],
            },
            action_space: ActionSpace::Box {
                shape: vec![1],
                low: vec![-MAX_TORQUE],
                high: vec![MAX_TORQUE],
            },
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

    fn step(&mut self, a: &ContinuousAct) -> Result<(Step<Self>, Record)> {
        let n = self.config.n_envs;
        ensure!(
            a.dim == 1 && a.data.len() == n,
            "expected {} actions of dimension 1, got {:?}",
            n,
            a
        );

        let mut reward = vec![0f32; n];
        let mut is_truncated = vec![0; n];
        let mut torque = vec![0f32; n];
        for i in 0..n {
            let [th, thdot] = self.states[i];
            let u = a.data[i].clamp(-MAX_TORQUE, MAX_TORQUE);
            torque[i] = u;
            let cost = angle_normalize(th).powi(2) + 0.1 * thdot.powi(2) + 0.001 * u.powi(2);

            let thdot = thdot + (3.0 * G / (2.0 * L) * th.sin() + 3.0 / (M * L * L) * u) * DT;
            let thdot = thdot.clamp(-MAX_SPEED, MAX_SPEED);
            self.states[i] = [th + thdot * DT, thdot];
            self.steps[i] += 1;
            reward[i] = -cost;

            if self.steps[i] >= self.config.max_episode_steps {
                is_truncated[i] = 1;
                self.states[i] = Self::initial_state(&mut self.rng);
                self.steps[i] = 0;
            }
        }

        let step = Step::new(
            self.obs(),
            a.clone(),
            reward,
            vec![0; n],
            is_truncated,
            (),
        );
        let record = Record::from_slice(&[("torque", RecordValue::Array1(torque))]);
        Ok((step, record))
    }
}
