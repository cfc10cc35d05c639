//! Terms of the PPO objective.
use tch::{Kind, Tensor};

/// Clipped surrogate objective, to be maximized.
///
/// `mean(min(r * A, clamp(r, 1 - eps, 1 + eps) * A))` where `r` is `ratio`
/// and `A` is `advantages`. Both are broadcast against each other.
pub fn clipped_objective(ratio: &Tensor, advantages: &Tensor, eps: f64) -> Tensor {
    let unclipped = ratio * advantages;
    let clipped = ratio.clamp(1.0 - eps, 1.0 + eps) * advantages;
    unclipped.minimum(&clipped).mean(Kind::Float)
}

/// Approximation of the KL divergence from the behavior policy to the current one.
pub fn approx_kl(old_log_probs: &Tensor, new_log_probs: &Tensor) -> Tensor {
    (old_log_probs - new_log_probs).mean(Kind::Float)
}

/// Fraction of ratios outside `[1 - eps, 1 + eps]`.
pub fn clip_fraction(ratio: &Tensor, eps: f64) -> Tensor {
    (ratio - 1.0)
        .abs()
        .gt(eps)
        .to_kind(Kind::Float)
        .mean(Kind::Float)
}
