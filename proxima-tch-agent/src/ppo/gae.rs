//! Generalized advantage estimation.
use tch::{Kind, Tensor};

/// Added to the standard deviation when normalizing advantages.
const NORM_EPS: f64 = 1e-8;

/// Computes advantages and returns of a rollout.
///
/// `rewards`, `values` and `dones` are time-major with shape `(horizon, n_units, 1)`.
/// `bootstrap` is the value estimate of the observations following the last
/// timestep, `(n_units, 1)`. Returns `(advantages, returns)` shaped like `values`,
/// where `returns = advantages + values`.
///
/// The recursion runs backward from the last timestep:
///
/// ```text
/// delta[t] = reward[t] + gamma * value[t + 1] - value[t]
/// adv[t]   = delta[t] + gamma * lambda * adv[t + 1] * (1 - done[t + 1])
/// ```
///
/// with `value[horizon] = bootstrap` and `adv[horizon] = 0`. The done flag of
/// the step following the last timestep is not in the rollout, so the flag of
/// the last timestep itself takes its place. The TD residuals are not masked
/// by done flags.
pub fn compute_gae(
    rewards: &Tensor,
    values: &Tensor,
    dones: &Tensor,
    bootstrap: &Tensor,
    gamma: f64,
    gae_lambda: f64,
) -> (Tensor, Tensor) {
    let horizon = values.size()[0];
    let next_values = Tensor::cat(
        &[values.narrow(0, 1, horizon - 1), bootstrap.unsqueeze(0)],
        0,
    );
    let deltas = (rewards + &next_values * gamma - values).detach();

    let mut advantages = Vec::with_capacity(horizon as usize);
    let mut last_adv = deltas.get(0).zeros_like();
    let mut next_done = dones.get(horizon - 1);
    for t in (0..horizon).rev() {
        let adv = deltas.get(t) + &last_adv * (gamma * gae_lambda) * (1f32 - &next_done);
        next_done = dones.get(t);
        last_adv = adv.shallow_clone();
        advantages.push(adv);
    }
    advantages.reverse();

    let advantages = Tensor::stack(&advantages, 0);
    let returns = &advantages + values;
    (advantages, returns)
}

/// Normalizes advantages to zero mean and unit variance over all elements.
///
/// Uses the unbiased standard deviation. A batch without variance, or with a
/// single element, normalizes to zeros.
pub fn normalize_advantages(advantages: &Tensor) -> Tensor {
    if advantages.numel() < 2 {
        return advantages.zeros_like();
    }
    let mean = advantages.mean(Kind::Float);
    let std = advantages.std(true);
    (advantages - mean) / (std + NORM_EPS)
}
