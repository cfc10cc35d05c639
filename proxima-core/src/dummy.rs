//! This module is used for tests.
use crate::{
    error::ProximaError,
    record::{Record, RecordValue},
    Act, ActionSpace, Agent, Env, EnvSpec, Obs, ObservationSpace, Policy, RolloutBufferBase, Step,
};
use anyhow::Result;
use std::path::Path;

/// Step counters of all units.
#[derive(Clone, Debug)]
pub struct CountingObs(pub Vec<usize>);

impl Obs for CountingObs {
    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Dummy action.
#[derive(Clone, Debug)]
pub struct CountingAct(pub usize);

impl Act for CountingAct {
    fn len(&self) -> usize {
        self.0
    }
}

/// Gives reward 1 to every unit at every step; episodes last a fixed number of steps.
pub struct CountingEnv {
    counts: Vec<usize>,
    episode_len: usize,
}

impl Env for CountingEnv {
    /// `(n_units, episode_len)`
    type Config = (usize, usize);
    type Obs = CountingObs;
    type Act = CountingAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            counts: vec![0; config.0],
            episode_len: config.1,
        })
    }

    fn spec(&self) -> EnvSpec {
        EnvSpec {
            observation_space: ObservationSpace::Box {
                shape: vec![1],
                low: vec![0.0],
                high: vec![self.episode_len as f32],
            },
            action_space: ActionSpace::Discrete { n: 1 },
            n_envs: self.counts.len(),
            n_agents: 1,
            uses_action_mask: false,
        }
    }

    fn reset(&mut self) -> Result<(Self::Obs, Self::Info)> {
        self.counts.iter_mut().for_each(|c| *c = 0);
        Ok((CountingObs(self.counts.clone()), ()))
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let mut is_truncated = vec![0; self.counts.len()];
        for (c, tr) in self.counts.iter_mut().zip(is_truncated.iter_mut()) {
            *c += 1;
            if *c == self.episode_len {
                *c = 0;
                *tr = 1;
            }
        }
        let n = self.counts.len();
        let step = Step::new(
            CountingObs(self.counts.clone()),
            a.clone(),
            vec![1.0; n],
            vec![0; n],
            is_truncated,
            (),
        );
        Ok((step, Record::empty()))
    }
}

/// Stores the number of pushed steps only.
pub struct CountingBuffer {
    len: usize,
    capacity: usize,
}

impl RolloutBufferBase<CountingEnv> for CountingBuffer {
    type Config = usize;
    type Estimate = ();

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self {
            len: 0,
            capacity: *config,
        })
    }

    fn push_step(&mut self, _obs: &CountingObs, _estimate: (), _step: &Step<CountingEnv>) -> Result<()> {
        if self.len == self.capacity {
            return Err(ProximaError::BufferFull {
                capacity: self.capacity,
            }
            .into());
        }
        self.len += 1;
        Ok(())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn reset(&mut self) {
        self.len = 0;
    }
}

/// Counts calls and remembers the length of every rollout it was updated with.
#[derive(Default)]
pub struct CountingAgent {
    pub n_samples: usize,
    pub n_opts: usize,
    pub rollout_lens: Vec<usize>,
    train: bool,
}

impl Policy<CountingEnv> for CountingAgent {
    fn sample(&mut self, obs: &CountingObs, _info: &()) -> Result<CountingAct> {
        Ok(CountingAct(obs.len()))
    }
}

impl Agent<CountingEnv, CountingBuffer> for CountingAgent {
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn sample_with_estimates(&mut self, obs: &CountingObs, info: &()) -> Result<(CountingAct, ())> {
        self.n_samples += 1;
        Ok((self.sample(obs, info)?, ()))
    }

    fn opt_with_record(&mut self, buffer: &mut CountingBuffer) -> Result<Record> {
        self.rollout_lens.push(buffer.len());
        self.n_opts += 1;
        Ok(Record::from_slice(&[("loss_value", RecordValue::Scalar(0.0))]))
    }

    fn save_params(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn load_params(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_push_into_full_buffer() -> Result<()> {
        let mut env = CountingEnv::build(&(1, 10), 0)?;
        let mut buffer = CountingBuffer::build(&2)?;
        let (obs, _) = env.reset()?;

        for _ in 0..2 {
            let (step, _) = env.step(&CountingAct(1))?;
            buffer.push_step(&obs, (), &step)?;
        }
        assert!(buffer.is_full());

        let (step, _) = env.step(&CountingAct(1))?;
        let err = buffer.push_step(&obs, (), &step).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProximaError>(),
            Some(&ProximaError::BufferFull { capacity: 2 })
        );
        Ok(())
    }
}
