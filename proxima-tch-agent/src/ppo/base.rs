use super::{
    approx_kl, clip_fraction, clipped_objective, compute_gae, normalize_advantages, Actor, Critic,
    DistKind, PpoConfig,
};
use crate::{
    mlp::Mlp,
    model::ModelBase,
    rollout_buffer::{RolloutBuffer, RolloutBufferConfig, RolloutEstimate},
};
use anyhow::{Context, Result};
use log::{debug, info, trace};
use proxima_core::{
    error::ProximaError,
    record::{Record, RecordValue},
    ActionSpace, Agent, Env, EnvSpec, Info, Policy,
};
use std::{fs, marker::PhantomData, path::Path};
use tch::{no_grad, Kind, Tensor};

/// Lower and upper bounds of continuous actions, `(act_dim,)` each.
struct ActionBounds {
    low: Tensor,
    high: Tensor,
}

/// Proximal policy optimization (PPO) agent.
///
/// The agent supports environments with a discrete action space, optionally
/// with action masks, or a one-dimensional continuous action space. The kind
/// of the action distribution and the use of masks are fixed in
/// [`Ppo::build`] from the [`EnvSpec`] of the environment.
pub struct Ppo<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    pub(super) actor: Actor<Mlp>,
    pub(super) critic: Critic<Mlp>,
    pub(super) dist_kind: DistKind,
    pub(super) masking: bool,
    bounds: Option<ActionBounds>,
    pub(super) n_units: usize,
    pub(super) obs_dim: i64,
    pub(super) act_dim: i64,
    pub(super) mask_dim: i64,
    pub(super) horizon: usize,
    pub(super) gamma: f64,
    pub(super) gae_lambda: f64,
    pub(super) num_epochs: usize,
    pub(super) minibatch_size: usize,
    pub(super) batch_size: usize,
    pub(super) eps: f64,
    pub(super) ent_coef: f64,
    pub(super) vf_coef: f64,
    pub(super) use_grad_clip: bool,
    pub(super) grad_clip: f64,
    pub(super) train: bool,
    pub(super) n_opts: usize,
    pub(super) device: tch::Device,
    phantom: PhantomData<E>,
}

fn action_bounds(shape: &[usize], low: &[f32], high: &[f32]) -> Result<()> {
    let dim = shape[0];
    if low.len() != dim || high.len() != dim {
        return Err(ProximaError::InvalidConfig(format!(
            "bounds of a Box action space of shape {:?} have lengths {} and {}",
            shape,
            low.len(),
            high.len()
        ))
        .into());
    }
    let valid = low
        .iter()
        .zip(high.iter())
        .all(|(l, h)| l.is_finite() && h.is_finite() && l < h);
    if !valid {
        return Err(ProximaError::InvalidConfig(format!(
            "Box action bounds must be finite with low < high, got {:?} and {:?}",
            low, high
        ))
        .into());
    }
    Ok(())
}

impl<E> Ppo<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    /// Constructs [`Ppo`] agent for an environment with the given spec.
    ///
    /// Fails when the action space is neither discrete nor a one-dimensional
    /// box, when action masks are used with a non-discrete action space, when
    /// `horizon * n_units` is not a multiple of the minibatch size or when a
    /// hyperparameter is out of range.
    pub fn build(config: PpoConfig, spec: &EnvSpec) -> Result<Self> {
        config.validate()?;

        let (dist_kind, act_dim, out_dim, bounds) = match &spec.action_space {
            ActionSpace::Discrete { n } => (DistKind::Categorical, 1, *n as i64, None),
            ActionSpace::Box { shape, low, high } if shape.len() == 1 => {
                action_bounds(shape, low, high)?;
                let bounds = (low.clone(), high.clone());
                (DistKind::Gaussian, shape[0] as i64, shape[0] as i64, Some(bounds))
            }
            space => {
                return Err(ProximaError::UnsupportedActionSpace(format!("{:?}", space)).into())
            }
        };

        let masking = spec.uses_action_mask;
        if masking && dist_kind != DistKind::Categorical {
            return Err(ProximaError::ActionMaskOnNonDiscrete.into());
        }

        let n_units = spec.n_units();
        let batch_size = config.horizon * n_units;
        let minibatch_size = config.minibatch_size.unwrap_or(batch_size);
        if minibatch_size == 0 || batch_size % minibatch_size != 0 {
            return Err(ProximaError::MinibatchNotDivisible {
                batch_size,
                minibatch_size,
            }
            .into());
        }

        if let Some(seed) = config.seed.as_ref() {
            tch::manual_seed(*seed);
        }
        let device = match config.device {
            Some(device) => device.into(),
            None => tch::Device::Cpu,
        };

        let obs_dim = spec.observation_space.flat_dim() as i64;
        let actor_config = config.actor_config.in_dim(obs_dim).out_dim(out_dim);
        let critic_config = config.critic_config.in_dim(obs_dim);
        let actor = Actor::build(actor_config, dist_kind, masking, device)?;
        let critic = Critic::build(critic_config, device)?;
        let bounds = bounds.map(|(low, high)| ActionBounds {
            low: Tensor::from_slice(&low).to_device(device),
            high: Tensor::from_slice(&high).to_device(device),
        });

        info!(
            "Build PPO agent: {:?} actions, masking = {}, {} units, batch size = {}, minibatch size = {}",
            dist_kind, masking, n_units, batch_size, minibatch_size
        );
        info!(
            "gamma = {}, gae_lambda = {}, epochs = {}, eps = {}, ent_coef = {}, vf_coef = {}, grad_clip = {}",
            config.gamma,
            config.gae_lambda,
            config.num_epochs,
            config.eps,
            config.ent_coef,
            config.vf_coef,
            if config.use_grad_clip {
                config.grad_clip.to_string()
            } else {
                "off".to_string()
            }
        );

        Ok(Self {
            actor,
            critic,
            dist_kind,
            masking,
            bounds,
            n_units,
            obs_dim,
            act_dim,
            mask_dim: if masking { out_dim } else { 1 },
            horizon: config.horizon,
            gamma: config.gamma,
            gae_lambda: config.gae_lambda,
            num_epochs: config.num_epochs,
            minibatch_size,
            batch_size,
            eps: config.eps,
            ent_coef: config.ent_coef,
            vf_coef: config.vf_coef,
            use_grad_clip: config.use_grad_clip,
            grad_clip: config.grad_clip,
            train: true,
            n_opts: 0,
            device,
            phantom: PhantomData,
        })
    }

    /// Configuration of a rollout buffer matching this agent.
    pub fn rollout_buffer_config(&self) -> RolloutBufferConfig {
        RolloutBufferConfig::default()
            .horizon(self.horizon)
            .n_units(self.n_units)
            .obs_dim(self.obs_dim)
            .act_dim(self.act_dim)
            .mask_dim(self.mask_dim)
            .device(self.device)
    }

    /// Number of gradient steps taken so far.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// Kind of the action distribution.
    pub fn dist_kind(&self) -> DistKind {
        self.dist_kind
    }

    /// Maps actions from `[-1, 1]` into the bounds of the action space.
    ///
    /// Actions are clamped to `[-1, 1]` first. Discrete actions are returned as is.
    pub fn rescale(&self, act: &Tensor) -> Tensor {
        match &self.bounds {
            None => act.shallow_clone(),
            Some(ActionBounds { low, high }) => {
                low + (act.clamp(-1.0, 1.0) + 1.0) * 0.5 * (high - low)
            }
        }
    }

    fn obs_tensor(&self, obs: &E::Obs) -> Result<Tensor> {
        let obs: Tensor = obs.clone().into();
        Ok(obs
            .to_kind(Kind::Float)
            .to_device(self.device)
            .f_reshape([-1, self.obs_dim])?)
    }

    /// Action masks of `n` units. All ones when masking is not used.
    fn mask_tensor(&self, info: &E::Info, n: i64) -> Result<Tensor> {
        if !self.masking {
            return Ok(Tensor::ones([n, 1], (Kind::Float, self.device)));
        }
        let mask = info
            .action_mask()
            .context("The environment declares action masks but did not report one")?;
        Ok(Tensor::from_slice(mask)
            .to_device(self.device)
            .f_reshape([n, self.mask_dim])?)
    }

    fn update(&mut self, buffer: &RolloutBuffer) -> Result<Record> {
        let (advantages, returns) = {
            let all = buffer.get_all();
            let last = self.horizon as i64 - 1;
            no_grad(|| {
                let bootstrap = self.critic.forward(&all.next_states.get(last));
                compute_gae(
                    &all.rewards,
                    &all.values,
                    &all.dones,
                    &bootstrap,
                    self.gamma,
                    self.gae_lambda,
                )
            })
        };
        // Critic targets come from the advantages before normalization.
        let returns = returns.flatten(0, 1);
        let advantages = normalize_advantages(&advantages.flatten(0, 1));

        let flat = buffer.get_all_flattened();
        let old_log_probs = flat.log_probs.detach();
        let n_minibatches = self.batch_size / self.minibatch_size;
        let mb = self.minibatch_size as i64;

        let mut loss_clip = 0f32;
        let mut loss_value = 0f32;
        let mut entropy = 0f32;
        let mut kl = 0f32;
        let mut clip_frac = 0f32;

        for epoch in 0..self.num_epochs {
            let perm = Tensor::randperm(self.batch_size as i64, (Kind::Int64, self.device));
            for i in 0..n_minibatches {
                let ixs = perm.narrow(0, i as i64 * mb, mb);
                let states = flat.states.index_select(0, &ixs);
                let actions = flat.actions.index_select(0, &ixs);
                let masks = flat.action_masks.index_select(0, &ixs);
                let old_lp = old_log_probs.index_select(0, &ixs);
                let adv = advantages.index_select(0, &ixs);
                let ret = returns.index_select(0, &ixs);

                let dist = self.actor.dist(&states, &masks);
                let new_lp = dist.log_prob(&actions);
                let ratio = (&new_lp - &old_lp).exp();
                let l_clip = clipped_objective(&ratio, &adv, self.eps);
                let l_value = self
                    .critic
                    .forward(&states)
                    .mse_loss(&ret, tch::Reduction::Mean);
                let l_entropy = dist.entropy().mean(Kind::Float);
                let loss = l_clip.neg() + &l_value * self.vf_coef - &l_entropy * self.ent_coef;

                self.actor.zero_grad();
                self.critic.zero_grad();
                loss.backward();
                if self.use_grad_clip {
                    self.actor.clip_grad_norm(self.grad_clip);
                    self.critic.clip_grad_norm(self.grad_clip);
                }
                self.actor.step();
                self.critic.step();
                self.n_opts += 1;

                let (kl_, clip_frac_) = no_grad(|| {
                    (
                        approx_kl(&old_lp, &new_lp).double_value(&[]) as f32,
                        clip_fraction(&ratio, self.eps).double_value(&[]) as f32,
                    )
                });
                let l_clip = l_clip.double_value(&[]) as f32;
                let l_value = l_value.double_value(&[]) as f32;
                let l_entropy = l_entropy.double_value(&[]) as f32;
                trace!(
                    "epoch = {}, minibatch = {}, loss_clip = {}, loss_value = {}, entropy = {}",
                    epoch,
                    i,
                    l_clip,
                    l_value,
                    l_entropy
                );

                loss_clip += l_clip;
                loss_value += l_value;
                entropy += l_entropy;
                kl += kl_;
                clip_frac += clip_frac_;
            }
        }

        let n = (self.num_epochs * n_minibatches) as f32;
        debug!(
            "Update {}: loss_clip = {}, loss_value = {}, entropy = {}",
            self.n_opts,
            loss_clip / n,
            loss_value / n,
            entropy / n
        );

        Ok(Record::from_slice(&[
            ("loss_clip", RecordValue::Scalar(loss_clip / n)),
            ("loss_value", RecordValue::Scalar(loss_value / n)),
            ("entropy", RecordValue::Scalar(entropy / n)),
            ("approx_kl", RecordValue::Scalar(kl / n)),
            ("clip_fraction", RecordValue::Scalar(clip_frac / n)),
        ]))
    }
}

impl<E> Policy<E> for Ppo<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    /// Samples actions in training mode and takes the most probable ones in
    /// evaluation mode.
    fn sample(&mut self, obs: &E::Obs, info: &E::Info) -> Result<E::Act> {
        let obs = self.obs_tensor(obs)?;
        let mask = self.mask_tensor(info, obs.size()[0])?;
        let act = no_grad(|| {
            let dist = self.actor.dist(&obs, &mask);
            match self.train {
                true => dist.sample(),
                false => dist.mode(),
            }
        });
        Ok(self.rescale(&act).into())
    }
}

impl<E> Agent<E, RolloutBuffer> for Ppo<E>
where
    E: Env,
    E::Obs: Into<Tensor>,
    E::Act: From<Tensor>,
{
    fn train(&mut self) {
        self.train = true;
    }

    fn eval(&mut self) {
        self.train = false;
    }

    fn is_train(&self) -> bool {
        self.train
    }

    fn sample_with_estimates(
        &mut self,
        obs: &E::Obs,
        info: &E::Info,
    ) -> Result<(E::Act, RolloutEstimate)> {
        let obs = self.obs_tensor(obs)?;
        let mask = self.mask_tensor(info, obs.size()[0])?;
        let (action, log_prob, value) = no_grad(|| {
            let dist = self.actor.dist(&obs, &mask);
            let action = dist.sample();
            let log_prob = dist.log_prob(&action);
            (action, log_prob, self.critic.forward(&obs))
        });
        let act = self.rescale(&action).into();

        Ok((
            act,
            RolloutEstimate {
                action,
                value,
                log_prob,
                mask: self.masking.then_some(mask),
            },
        ))
    }

    fn opt_with_record(&mut self, buffer: &mut RolloutBuffer) -> Result<Record> {
        if buffer.horizon() != self.horizon || buffer.n_units() != self.n_units {
            return Err(ProximaError::InvalidConfig(format!(
                "rollout buffer of horizon {} with {} units does not match the agent, \
                 which expects horizon {} with {} units",
                buffer.horizon(),
                buffer.n_units(),
                self.horizon,
                self.n_units
            ))
            .into());
        }
        if !buffer.is_full() {
            return Err(ProximaError::InvalidConfig(format!(
                "update requires a full rollout, got {} of {} timesteps",
                buffer.len(),
                buffer.horizon()
            ))
            .into());
        }
        self.update(buffer)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.actor.save(path.join("actor.pt.tch"))?;
        self.critic.save(path.join("critic.pt.tch"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.actor.load(path.join("actor.pt.tch"))?;
        self.critic.load(path.join("critic.pt.tch"))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dummy::DummyEnv;
    use proxima_core::{ObservationSpace, RolloutBufferBase};
    use tempdir::TempDir;

    fn spec(action_space: ActionSpace, n_envs: usize, uses_action_mask: bool) -> EnvSpec {
        multi_agent_spec(action_space, n_envs, 1, uses_action_mask)
    }

    fn multi_agent_spec(
        action_space: ActionSpace,
        n_envs: usize,
        n_agents: usize,
        uses_action_mask: bool,
    ) -> EnvSpec {
        EnvSpec {
            observation_space: ObservationSpace::Box {
                shape: vec![4],
                low: vec![-1.0; 4],
                high: vec![1.0; 4],
            },
            action_space,
            n_envs,
            n_agents,
            uses_action_mask,
        }
    }

    fn discrete() -> ActionSpace {
        ActionSpace::Discrete { n: 3 }
    }

    fn continuous() -> ActionSpace {
        ActionSpace::Box {
            shape: vec![1],
            low: vec![-2.0],
            high: vec![2.0],
        }
    }

    fn config() -> PpoConfig {
        PpoConfig::default().hidden_layers(1, 16).seed(42)
    }

    fn build_err(config: PpoConfig, spec: &EnvSpec) -> ProximaError {
        let err = Ppo::<DummyEnv>::build(config, spec).err().unwrap();
        err.downcast_ref::<ProximaError>().unwrap().clone()
    }

    // Fills a rollout buffer through the agent.
    fn collect(agent: &mut Ppo<DummyEnv>, spec: &EnvSpec) -> Result<RolloutBuffer> {
        let buffer = RolloutBuffer::new(&agent.rollout_buffer_config());
        fill(agent, spec, buffer)
    }

    fn fill(
        agent: &mut Ppo<DummyEnv>,
        spec: &EnvSpec,
        mut buffer: RolloutBuffer,
    ) -> Result<RolloutBuffer> {
        let mut env = DummyEnv::build(&(spec.clone(), 3), 0)?;
        let (mut obs, mut info) = env.reset()?;
        while !buffer.is_full() {
            let (act, estimate) = agent.sample_with_estimates(&obs, &info)?;
            let (step, _) = env.step(&act)?;
            buffer.push_step(&obs, estimate, &step)?;
            obs = step.obs;
            info = step.info;
        }
        Ok(buffer)
    }

    #[test]
    fn test_config_errors() {
        let err = build_err(
            config(),
            &spec(ActionSpace::MultiDiscrete { nvec: vec![2, 2] }, 1, false),
        );
        assert!(matches!(err, ProximaError::UnsupportedActionSpace(_)));

        let matrix = ActionSpace::Box {
            shape: vec![2, 2],
            low: vec![-1.0; 4],
            high: vec![1.0; 4],
        };
        let err = build_err(config(), &spec(matrix, 1, false));
        assert!(matches!(err, ProximaError::UnsupportedActionSpace(_)));

        let err = build_err(config(), &spec(continuous(), 1, true));
        assert_eq!(err, ProximaError::ActionMaskOnNonDiscrete);

        let err = build_err(config().minibatch_size(4), &spec(discrete(), 3, false));
        assert_eq!(
            err,
            ProximaError::MinibatchNotDivisible {
                batch_size: 15,
                minibatch_size: 4
            }
        );

        let err = build_err(config().minibatch_size(0), &spec(discrete(), 1, false));
        assert!(matches!(err, ProximaError::MinibatchNotDivisible { .. }));

        let inverted = ActionSpace::Box {
            shape: vec![1],
            low: vec![1.0],
            high: vec![-1.0],
        };
        let err = build_err(config(), &spec(inverted, 1, false));
        assert!(matches!(err, ProximaError::InvalidConfig(_)));

        let err = build_err(config().horizon(0), &spec(discrete(), 1, false));
        assert!(matches!(err, ProximaError::InvalidConfig(_)));
    }

    #[test]
    fn test_divisibility_counts_agents() {
        let spec = multi_agent_spec(discrete(), 1, 2, false);
        let err = build_err(config().horizon(3).minibatch_size(4), &spec);
        assert_eq!(
            err,
            ProximaError::MinibatchNotDivisible {
                batch_size: 6,
                minibatch_size: 4
            }
        );
    }

    #[test]
    fn test_multi_agent_update() -> Result<()> {
        // 1 env with 2 agents, batch size = 4 * 2 = 8, minibatch size = 4, 3 epochs
        let spec = multi_agent_spec(discrete(), 1, 2, false);
        let config = config().horizon(4).minibatch_size(4).num_epochs(3);
        let mut agent = Ppo::<DummyEnv>::build(config, &spec)?;
        assert_eq!(agent.rollout_buffer_config().batch_size(), 8);

        let mut buffer = collect(&mut agent, &spec)?;
        let all = buffer.get_all();
        assert_eq!(all.states.size(), [4, 2, 4]);
        assert_eq!(all.rewards.size(), [4, 2, 1]);
        assert_eq!(buffer.get_all_flattened().states.size(), [8, 4]);

        agent.opt_with_record(&mut buffer)?;
        assert_eq!(agent.n_opts(), 6);
        Ok(())
    }

    #[test]
    fn test_update_rejects_mismatched_buffer() -> Result<()> {
        let spec = spec(discrete(), 2, false);
        let mut agent = Ppo::<DummyEnv>::build(config().horizon(4).minibatch_size(4), &spec)?;

        // Longer rollout than the agent was built for
        let buffer = RolloutBuffer::new(&agent.rollout_buffer_config().horizon(6));
        let mut buffer = fill(&mut agent, &spec, buffer)?;
        assert!(buffer.is_full());
        let err = agent.opt_with_record(&mut buffer).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ProximaError>(),
            Some(ProximaError::InvalidConfig(_))
        ));

        // Shorter rollout
        let buffer = RolloutBuffer::new(&agent.rollout_buffer_config().horizon(2));
        let mut buffer = fill(&mut agent, &spec, buffer)?;
        assert!(agent.opt_with_record(&mut buffer).is_err());
        assert_eq!(agent.n_opts(), 0);
        Ok(())
    }

    #[test]
    fn test_minibatch_updates() -> Result<()> {
        // batch size = 4 * 2 = 8, minibatch size = 4, 2 epochs
        let spec = spec(discrete(), 2, false);
        let config = config().horizon(4).minibatch_size(4).num_epochs(2);
        let mut agent = Ppo::<DummyEnv>::build(config, &spec)?;
        let mut buffer = collect(&mut agent, &spec)?;

        let record = agent.opt_with_record(&mut buffer)?;

        assert_eq!(agent.n_opts(), 4);
        for key in [
            "loss_clip",
            "loss_value",
            "entropy",
            "approx_kl",
            "clip_fraction",
        ] {
            assert!(record.get_scalar(key)?.is_finite(), "{}", key);
        }
        // The entropy of three actions is at most ln 3.
        assert!(record.get_scalar("entropy")? <= 3f32.ln() + 1e-4);
        Ok(())
    }

    #[test]
    fn test_update_requires_full_buffer() -> Result<()> {
        let spec = spec(discrete(), 1, false);
        let mut agent = Ppo::<DummyEnv>::build(config(), &spec)?;
        let mut buffer = RolloutBuffer::new(&agent.rollout_buffer_config());
        assert!(agent.opt_with_record(&mut buffer).is_err());
        assert_eq!(agent.n_opts(), 0);
        Ok(())
    }

    #[test]
    fn test_gaussian_update() -> Result<()> {
        let spec = spec(continuous(), 2, false);
        let config = config().horizon(4).minibatch_size(2).num_epochs(1).grad_clip(0.5);
        let mut agent = Ppo::<DummyEnv>::build(config, &spec)?;
        assert_eq!(agent.dist_kind(), DistKind::Gaussian);

        let mut buffer = collect(&mut agent, &spec)?;
        let all = buffer.get_all();
        assert_eq!(all.actions.size(), [4, 2, 1]);
        assert_eq!(all.log_probs.size(), [4, 2, 1]);

        agent.opt_with_record(&mut buffer)?;
        assert_eq!(agent.n_opts(), 4);
        Ok(())
    }

    #[test]
    fn test_masked_actions() -> Result<()> {
        let spec = spec(discrete(), 2, true);
        let config = config().horizon(4).num_epochs(2);
        let mut agent = Ppo::<DummyEnv>::build(config, &spec)?;
        let mut buffer = collect(&mut agent, &spec)?;

        // On odd steps only the first action is legal.
        let all = buffer.get_all();
        assert_eq!(all.action_masks.size(), [4, 2, 3]);
        for t in [1, 3] {
            for u in 0..2 {
                assert_eq!(all.actions.double_value(&[t, u, 0]), 0.0);
            }
        }

        agent.opt_with_record(&mut buffer)?;
        assert_eq!(agent.n_opts(), 2);
        Ok(())
    }

    #[test]
    fn test_rescale() -> Result<()> {
        let agent = Ppo::<DummyEnv>::build(config(), &spec(continuous(), 1, false))?;
        let act = Tensor::from_slice(&[-1.0f32, 0.0, 0.5, 3.0]).reshape([4, 1]);
        let act = agent.rescale(&act);
        for (i, e) in [-2.0, 0.0, 1.0, 2.0].iter().enumerate() {
            assert!((act.double_value(&[i as i64, 0]) - e).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_greedy_in_eval_mode() -> Result<()> {
        let spec = spec(discrete(), 2, false);
        let mut agent = Ppo::<DummyEnv>::build(config(), &spec)?;
        let mut env = DummyEnv::build(&(spec, 3), 0)?;
        let (obs, info) = env.reset()?;

        agent.eval();
        assert!(!agent.is_train());
        let a1 = agent.sample(&obs, &info)?;
        let a2 = agent.sample(&obs, &info)?;
        assert_eq!(a1.0, a2.0);
        assert_eq!(a1.0.len(), 2);
        Ok(())
    }

    #[test]
    fn test_save_load() -> Result<()> {
        let spec = spec(continuous(), 1, false);
        let agent = Ppo::<DummyEnv>::build(config(), &spec)?;
        let mut agent_ = Ppo::<DummyEnv>::build(config().seed(7), &spec)?;

        let dir = TempDir::new("ppo")?;
        agent.save_params(dir.path())?;
        assert!(dir.path().join("actor.pt.tch").exists());
        assert!(dir.path().join("critic.pt.tch").exists());
        agent_.load_params(dir.path())?;

        let obs = Tensor::randn([3, 4], tch::kind::FLOAT_CPU);
        let diff = (agent.critic.forward(&obs) - agent_.critic.forward(&obs))
            .abs()
            .sum(Kind::Float)
            .double_value(&[]);
        assert_eq!(diff, 0.0);
        Ok(())
    }
}
