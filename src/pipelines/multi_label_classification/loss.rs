use burn::tensor::{activation::relu, backend::Backend, Int, Tensor};

/// Mean binary cross-entropy between raw scores and multi-hot targets, treating every label as
/// an independent yes/no decision.
///
/// Computed as `max(x, 0) - x * t + ln(1 + exp(-|x|))`, which equals
/// `-(t * ln(sigmoid(x)) + (1 - t) * ln(1 - sigmoid(x)))` without overflowing for large `|x|`.
pub fn binary_cross_entropy_with_logits<B: Backend>(
    logits: Tensor<B, 2>,
    targets: Tensor<B, 2, Int>,
) -> Tensor<B, 1> {
    let targets = targets.float();

    let loss = relu(logits.clone()) - logits.clone() * targets + logits.abs().neg().exp().log1p();

    loss.mean()
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    type TestBackend = NdArray;

    fn loss(logits: [f32; 4], targets: [i32; 4]) -> f32 {
        let device = Default::default();

        let logits = Tensor::<TestBackend, 1>::from_floats(logits, &device).reshape([2, 2]);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints(targets, &device).reshape([2, 2]);

        binary_cross_entropy_with_logits(logits, targets).into_scalar()
    }

    #[test]
    fn test_zero_logits_cost_ln_2() {
        let value = loss([0.0; 4], [1, 0, 0, 1]);

        assert!((value - std::f32::consts::LN_2).abs() < 1e-6);
    }

    #[test]
    fn test_matches_the_probability_form() {
        let value = loss([2.0, -1.0, 0.5, -3.0], [0, 1, 1, 0]);

        let sigmoid = |x: f32| 1.0 / (1.0 + (-x).exp());
        let expected = [
            -(1.0 - sigmoid(2.0)).ln(),
            -sigmoid(-1.0).ln(),
            -sigmoid(0.5).ln(),
            -(1.0 - sigmoid(-3.0)).ln(),
        ]
        .iter()
        .sum::<f32>()
            / 4.0;

        assert!((value - expected).abs() < 1e-5);
    }

    #[test]
    fn test_large_logits_stay_finite() {
        let value = loss([100.0, -100.0, 100.0, -100.0], [1, 0, 0, 1]);

        assert!(value.is_finite());
        assert!((value - 100.0).abs() < 1e-3);
    }
}
