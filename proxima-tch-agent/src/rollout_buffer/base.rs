use super::RolloutBufferConfig;
use anyhow::Result;
use log::{info, trace};
use proxima_core::{error::ProximaError, Env, RolloutBufferBase, Step};
use tch::{Device, Kind, Tensor};

/// One timestep of all units.
///
/// Every tensor has leading dimension `n_units`.
pub struct Transition {
    /// Observations the actions were chosen on, `(n_units, obs_dim)`.
    pub states: Tensor,

    /// Observations after the step, `(n_units, obs_dim)`.
    pub next_states: Tensor,

    /// `1.0` where the episode of a unit ended with the step, `(n_units, 1)`.
    pub dones: Tensor,

    /// Actions as sampled by the policy, `(n_units, act_dim)`.
    pub actions: Tensor,

    /// `(n_units, 1)`
    pub rewards: Tensor,

    /// Value estimates of `states`, `(n_units, 1)`.
    pub values: Tensor,

    /// Log-probabilities of `actions` under the behavior policy, `(n_units, act_dim)`.
    pub log_probs: Tensor,

    /// `(n_units, mask_dim)`
    pub action_masks: Tensor,
}

/// All fields of a rollout buffer.
///
/// Returned time-major by [`RolloutBuffer::get_all`], with leading shape
/// `(horizon, n_units)`, or with both axes merged into one batch axis by
/// [`RolloutBuffer::get_all_flattened`].
pub struct RolloutTensors {
    /// Observations the actions were chosen on.
    pub states: Tensor,

    /// Observations after the steps.
    pub next_states: Tensor,

    /// Done flags.
    pub dones: Tensor,

    /// Actions.
    pub actions: Tensor,

    /// Rewards.
    pub rewards: Tensor,

    /// Value estimates.
    pub values: Tensor,

    /// Log-probabilities under the behavior policy.
    pub log_probs: Tensor,

    /// Action masks.
    pub action_masks: Tensor,
}

/// What an agent computes for the actions it samples in a step.
pub struct RolloutEstimate {
    /// Actions as sampled, before any rescaling, `(n_units, act_dim)`.
    pub action: Tensor,

    /// Value estimates of the observations, `(n_units, 1)`.
    pub value: Tensor,

    /// Log-probabilities of the actions, `(n_units, act_dim)`.
    pub log_prob: Tensor,

    /// Action masks the actions were sampled with, `(n_units, mask_dim)`.
    pub mask: Option<Tensor>,
}

/// Fixed-capacity, time-major storage of one rollout.
///
/// Tensors are allocated once in [`RolloutBuffer::build`]. A write cursor
/// counts the stored timesteps; [`RolloutBuffer::reset`] moves it back to zero
/// and later pushes overwrite the previous rollout.
pub struct RolloutBuffer {
    states: Tensor,
    next_states: Tensor,
    dones: Tensor,
    actions: Tensor,
    rewards: Tensor,
    values: Tensor,
    log_probs: Tensor,
    action_masks: Tensor,
    horizon: usize,
    n_units: usize,
    mask_dim: i64,
    i: usize,
    device: Device,
}

impl RolloutBuffer {
    /// Allocates a buffer.
    pub fn new(config: &RolloutBufferConfig) -> Self {
        let device = match config.device {
            Some(device) => device.into(),
            None => Device::Cpu,
        };
        let h = config.horizon as i64;
        let u = config.n_units as i64;
        let zeros = |dim: i64| Tensor::zeros([h, u, dim], (Kind::Float, device));
        info!(
            "Allocate rollout buffer: horizon = {}, units = {}",
            config.horizon, config.n_units
        );

        Self {
            states: zeros(config.obs_dim),
            next_states: zeros(config.obs_dim),
            dones: zeros(1),
            actions: zeros(config.act_dim),
            rewards: zeros(1),
            values: zeros(1),
            log_probs: zeros(config.act_dim),
            action_masks: zeros(config.mask_dim),
            horizon: config.horizon,
            n_units: config.n_units,
            mask_dim: config.mask_dim,
            i: 0,
            device,
        }
    }

    /// Writes a transition at the cursor row and advances the cursor.
    ///
    /// Fails with [`ProximaError::BufferFull`] when the buffer is full and with
    /// [`ProximaError::ShapeMismatch`] when a field does not fit the row. Nothing
    /// is written on failure.
    pub fn push(&mut self, tr: Transition) -> Result<()> {
        if self.is_full() {
            return Err(ProximaError::BufferFull {
                capacity: self.horizon,
            }
            .into());
        }

        let i = self.i as i64;
        let fields = [
            ("states", &self.states, &tr.states),
            ("next_states", &self.next_states, &tr.next_states),
            ("dones", &self.dones, &tr.dones),
            ("actions", &self.actions, &tr.actions),
            ("rewards", &self.rewards, &tr.rewards),
            ("values", &self.values, &tr.values),
            ("log_probs", &self.log_probs, &tr.log_probs),
            ("action_masks", &self.action_masks, &tr.action_masks),
        ];

        for (field, buf, src) in fields.iter() {
            let expected = buf.size()[1..].to_vec();
            let actual = src.size();
            if expected != actual {
                return Err(ProximaError::ShapeMismatch {
                    field: field.to_string(),
                    expected,
                    actual,
                }
                .into());
            }
        }

        tch::no_grad(|| {
            for (_, buf, src) in fields.iter() {
                let mut row = buf.get(i);
                row.copy_(&src.to_kind(Kind::Float).to_device(self.device));
            }
        });
        trace!("Pushed timestep {} into rollout buffer", self.i);
        self.i += 1;

        Ok(())
    }

    /// Returns `true` when the cursor equals the horizon.
    pub fn is_full(&self) -> bool {
        self.i == self.horizon
    }

    /// Number of stored timesteps.
    pub fn len(&self) -> usize {
        self.i
    }

    /// Returns `true` when no timestep is stored.
    pub fn is_empty(&self) -> bool {
        self.i == 0
    }

    /// Number of timesteps in a full buffer.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of parallel units.
    pub fn n_units(&self) -> usize {
        self.n_units
    }

    /// Device of the stored tensors.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Moves the cursor back to zero without touching the stored tensors.
    pub fn reset(&mut self) {
        self.i = 0;
    }

    /// All fields, time-major, with leading shape `(horizon, n_units)`.
    pub fn get_all(&self) -> RolloutTensors {
        RolloutTensors {
            states: self.states.shallow_clone(),
            next_states: self.next_states.shallow_clone(),
            dones: self.dones.shallow_clone(),
            actions: self.actions.shallow_clone(),
            rewards: self.rewards.shallow_clone(),
            values: self.values.shallow_clone(),
            log_probs: self.log_probs.shallow_clone(),
            action_masks: self.action_masks.shallow_clone(),
        }
    }

    /// All fields with the time and unit axes merged into one batch axis of
    /// size `horizon * n_units`.
    ///
    /// Batch index `k` holds timestep `k / n_units` of unit `k % n_units`.
    pub fn get_all_flattened(&self) -> RolloutTensors {
        let flat = |t: &Tensor| t.flatten(0, 1);

        RolloutTensors {
            states: flat(&self.states),
            next_states: flat(&self.next_states),
            dones: flat(&self.dones),
            actions: flat(&self.actions),
            rewards: flat(&self.rewards),
            values: flat(&self.values),
            log_probs: flat(&self.log_probs),
            action_masks: flat(&self.action_masks),
        }
    }
}

fn vec_to_column(xs: &[f32], n: i64) -> Result<Tensor> {
    Ok(Tensor::from_slice(xs).f_reshape([n, 1])?)
}

impl<E> RolloutBufferBase<E> for RolloutBuffer
where
    E: Env,
    E::Obs: Into<Tensor>,
{
    type Config = RolloutBufferConfig;
    type Estimate = RolloutEstimate;

    fn build(config: &Self::Config) -> Result<Self> {
        Ok(Self::new(config))
    }

    fn push_step(&mut self, obs: &E::Obs, estimate: RolloutEstimate, step: &Step<E>) -> Result<()> {
        let n = self.n_units as i64;
        let states: Tensor = obs.clone().into();
        let next_states: Tensor = step.obs.clone().into();
        let dones = step
            .is_done()
            .iter()
            .map(|&d| d as f32)
            .collect::<Vec<_>>();
        let action_masks = match estimate.mask {
            Some(mask) => mask,
            None => Tensor::ones([n, self.mask_dim], (Kind::Float, self.device)),
        };

        self.push(Transition {
            states: states.f_reshape([n, -1])?,
            next_states: next_states.f_reshape([n, -1])?,
            dones: vec_to_column(&dones, n)?,
            actions: estimate.action,
            rewards: vec_to_column(&step.reward, n)?,
            values: estimate.value,
            log_probs: estimate.log_prob,
            action_masks,
        })
    }

    fn len(&self) -> usize {
        self.i
    }

    fn capacity(&self) -> usize {
        self.horizon
    }

    fn reset(&mut self) {
        self.i = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tch::kind::FLOAT_CPU;

    const H: usize = 4;
    const U: usize = 2;

    fn buffer() -> RolloutBuffer {
        let config = RolloutBufferConfig::default()
            .horizon(H)
            .n_units(U)
            .obs_dim(1)
            .act_dim(1);
        RolloutBuffer::new(&config)
    }

    // Every field of unit `u` is filled with `v + u`.
    fn transition(v: f32) -> Transition {
        let col = || Tensor::from_slice(&[v, v + 1.0]).reshape([U as i64, 1]);
        Transition {
            states: col(),
            next_states: col(),
            dones: Tensor::zeros([U as i64, 1], FLOAT_CPU),
            actions: col(),
            rewards: col(),
            values: col(),
            log_probs: col(),
            action_masks: Tensor::ones([U as i64, 1], FLOAT_CPU),
        }
    }

    #[test]
    fn test_cursor_and_full() -> Result<()> {
        let mut buffer = buffer();
        assert!(buffer.is_empty());

        for t in 0..H {
            assert!(!buffer.is_full());
            buffer.push(transition(t as f32))?;
            assert_eq!(buffer.len(), t + 1);
        }
        assert!(buffer.is_full());

        let err = buffer.push(transition(0.0)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProximaError>(),
            Some(&ProximaError::BufferFull { capacity: H })
        );
        assert_eq!(buffer.len(), H);
        Ok(())
    }

    #[test]
    fn test_flattened_order() -> Result<()> {
        let mut buffer = buffer();
        for t in 0..H {
            buffer.push(transition(10.0 * t as f32))?;
        }

        let all = buffer.get_all();
        assert_eq!(all.states.size(), [H as i64, U as i64, 1]);
        assert_eq!(all.rewards.double_value(&[2, 1, 0]), 21.0);

        let flat = buffer.get_all_flattened();
        let batch_size = (H * U) as i64;
        assert_eq!(flat.states.size(), [batch_size, 1]);
        assert_eq!(flat.dones.size(), [batch_size, 1]);
        assert_eq!(flat.action_masks.size(), [batch_size, 1]);
        for k in 0..batch_size {
            let (t, u) = (k / U as i64, k % U as i64);
            let expected = (10 * t + u) as f64;
            assert_eq!(flat.states.double_value(&[k, 0]), expected);
            assert_eq!(flat.log_probs.double_value(&[k, 0]), expected);
        }
        Ok(())
    }

    #[test]
    fn test_reset_overwrites() -> Result<()> {
        let mut buffer = buffer();
        for t in 0..H {
            buffer.push(transition(t as f32))?;
        }
        buffer.reset();
        assert_eq!(buffer.len(), 0);

        // The first row is overwritten, the others still hold the previous rollout.
        buffer.push(transition(100.0))?;
        let all = buffer.get_all();
        assert_eq!(all.values.double_value(&[0, 0, 0]), 100.0);
        assert_eq!(all.values.double_value(&[1, 0, 0]), 1.0);
        Ok(())
    }

    #[test]
    fn test_shape_mismatch() -> Result<()> {
        let mut buffer = buffer();
        let mut tr = transition(0.0);
        tr.states = Tensor::zeros([U as i64, 3], FLOAT_CPU);

        let err = buffer.push(tr).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ProximaError>(),
            Some(&ProximaError::ShapeMismatch {
                field: "states".to_string(),
                expected: vec![U as i64, 1],
                actual: vec![U as i64, 3],
            })
        );
        assert_eq!(buffer.len(), 0);
        Ok(())
    }
}
