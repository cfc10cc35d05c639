//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    record::{
        RecordValue::{DateTime, Scalar},
        Recorder,
    },
    Agent, Env, RolloutBufferBase,
};
use anyhow::Result;
use chrono::Local;
pub use config::TrainerConfig;
use log::{info, warn};
pub use sampler::Sampler;
use std::{path::Path, time::SystemTime};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages the training loop of an on-policy agent.
///
/// # Training loop
///
/// 0. Given an environment implementing [`Env`], an agent implementing [`Agent`],
///    a rollout buffer implementing [`RolloutBufferBase`] and a recorder
///    implementing [`Recorder`].
/// 1. Reset the environment. This happens only once; the environment resets
///    finished units by itself afterwards.
/// 2. Sample actions for all units with the behavior policy, step the
///    environment and push the timestep into the rollout buffer.
/// 3. `env_steps += 1`
/// 4. If the buffer is full:
///     1. Update the agent with the rollout in the buffer and add the
///        returned record to the recorder, with `"opt_steps"`.
///     2. Reset the buffer.
/// 5. If the first unit finished an episode, add its return to the recorder
///    as `"episode_reward"`. When `model_dir` is given and the return is the best
///    so far, save the agent's parameters in `(model_dir)/best`.
/// 6. If `env_steps == max_steps`, save the agent's parameters in
///    `model_dir` and finish the training loop. Otherwise back to step 2.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     A -->|RolloutBufferBase::Estimate|C[RolloutBufferBase]
///     B -->|"Step&lt;E: Env&gt;"|C
///     C -->|rollout|A
/// ```
pub struct Trainer {
    /// The maximal number of environment steps.
    max_steps: usize,

    /// Interval of recording throughput in environment steps.
    record_interval: usize,

    /// Where to save the trained model.
    model_dir: Option<String>,

    config: TrainerConfig,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            max_steps: config.max_steps,
            record_interval: config.record_interval,
            model_dir: config.model_dir.clone(),
            config,
        }
    }

    fn save_model<E, A, R>(agent: &A, model_dir: &Path)
    where
        E: Env,
        A: Agent<E, R>,
        R: RolloutBufferBase<E>,
    {
        match agent.save_params(model_dir) {
            Ok(()) => info!("Saved the model in {:?}.", model_dir),
            Err(e) => warn!("Failed to save model in {:?}: {}", model_dir, e),
        }
    }

    /// Train the agent.
    ///
    /// The environment is consumed by the training loop. The buffer must have
    /// been built for the agent, with one row per timestep of all units.
    pub fn train<E, A, R>(
        &mut self,
        env: E,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn Recorder,
    ) -> Result<()>
    where
        E: Env,
        A: Agent<E, R>,
        R: RolloutBufferBase<E>,
    {
        let spec = env.spec();
        info!(
            "Starts training for {} environment steps on {} units, updates every {} steps",
            self.max_steps,
            spec.n_units(),
            buffer.capacity()
        );
        if let Some(model_dir) = &self.model_dir {
            std::fs::create_dir_all(model_dir)?;
            self.config.save(Path::new(model_dir).join("trainer.yaml"))?;
        }

        let mut sampler = Sampler::new(env);
        let mut env_steps = 0;
        let mut opt_steps = 0;
        let mut max_episode_reward = f32::MIN;
        let mut timer = SystemTime::now();
        buffer.reset();
        agent.train();

        while env_steps < self.max_steps {
            let mut record = sampler.sample_and_push(agent, buffer)?;
            env_steps += 1;

            // Optimization step
            if buffer.is_full() {
                let record_agent = agent.opt_with_record(buffer)?;
                buffer.reset();
                opt_steps += 1;
                record = record.merge(record_agent);
                record.insert("opt_steps", Scalar(opt_steps as f32));
            }

            // Save the best model up to the current step
            if let Ok(episode_reward) = record.get_scalar("episode_reward") {
                if episode_reward > max_episode_reward {
                    max_episode_reward = episode_reward;
                    if let Some(model_dir) = &self.model_dir {
                        Self::save_model::<E, A, R>(agent, &Path::new(model_dir).join("best"));
                    }
                }
            }

            if self.record_interval > 0 && env_steps % self.record_interval == 0 {
                let secs = timer.elapsed()?.as_secs_f32();
                let sps = self.record_interval as f32 * spec.n_units() as f32 / secs;
                info!(
                    "env_steps = {}, opt_steps = {}, episodes = {}, {:.1} unit steps per sec",
                    env_steps,
                    opt_steps,
                    sampler.n_episodes(),
                    sps
                );
                record.insert("unit_steps_per_sec", Scalar(sps));
                record.insert("datetime", DateTime(Local::now()));
                timer = SystemTime::now();
            }

            // Store record to the recorder
            if !record.is_empty() {
                record.insert("env_steps", Scalar(env_steps as f32));
                recorder.write(record);
            }
        }

        if let Some(model_dir) = &self.model_dir {
            Self::save_model::<E, A, R>(agent, Path::new(model_dir));
        }
        info!(
            "Finished training: {} environment steps, {} updates, {} episodes",
            env_steps,
            opt_steps,
            sampler.n_episodes()
        );

        Ok(())
    }

    /// Evaluates the agent in evaluation mode on the first unit of `env`.
    ///
    /// Returns the mean return over `n_episodes` episodes.
    pub fn evaluate<E, A, R>(env: &mut E, agent: &mut A, n_episodes: usize) -> Result<f32>
    where
        E: Env,
        A: Agent<E, R>,
        R: RolloutBufferBase<E>,
    {
        let mut returns = Vec::with_capacity(n_episodes);
        let mut episode_reward = 0.0;
        let is_train = agent.is_train();
        agent.eval();

        let (mut obs, mut info) = env.reset()?;
        while returns.len() < n_episodes {
            let act = agent.sample(&obs, &info)?;
            let (step, _) = env.step(&act)?;
            episode_reward += step.reward[0];
            if step.is_done()[0] == 1 {
                returns.push(episode_reward);
                episode_reward = 0.0;
            }
            obs = step.obs;
            info = step.info;
        }

        if is_train {
            agent.train();
        }
        let mean = returns.iter().sum::<f32>() / n_episodes.max(1) as f32;
        info!("Evaluation over {} episodes: mean return = {}", n_episodes, mean);

        Ok(mean)
    }
}
