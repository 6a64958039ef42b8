use anyhow::{anyhow, Result};
use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LogisticModelConfig {
    pub n_features: usize,
}

impl LogisticModelConfig {
    /// Zero-initialised so repeated fits on the same data are identical.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticModel<B> {
        let linear = LinearConfig::new(self.n_features, 1)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LogisticModel { linear }
    }
}

/// Binary logistic regression: p(repaid | x) = σ(x·w + b).
#[derive(Module, Debug)]
pub struct LogisticModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticModel<B> {
    /// x: [n, n_features] → logits [n, 1]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(x)
    }

    /// x: [n, n_features] → logits [n]
    pub fn decision_function(&self, x: Tensor<B, 2>) -> Tensor<B, 1> {
        let [n, _] = x.dims();
        self.forward(x).reshape([n])
    }

    /// Mean binary log-loss plus `l2 · ||w||²`. The bias is not penalised.
    ///
    /// Written with log σ(z) and log σ(−z) rather than log(p), which
    /// stays finite for large |z|.
    pub fn loss(&self, x: Tensor<B, 2>, targets: Tensor<B, 1>, l2: f64) -> Tensor<B, 1> {
        let z = self.decision_function(x);
        let log_p = activation::log_sigmoid(z.clone());
        let log_q = activation::log_sigmoid(z.neg());
        let negatives = targets.clone().neg().add_scalar(1.0);

        let nll = (targets * log_p + negatives * log_q).mean().neg();

        let w = self.linear.weight.val();
        let penalty = (w.clone() * w).sum().mul_scalar(l2);
        nll + penalty
    }

    /// Learned weights, one per input feature.
    pub fn coefficients(&self) -> Result<Vec<f32>> {
        self.linear
            .weight
            .val()
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("cannot read model weights: {e:?}"))
    }

    pub fn intercept(&self) -> Result<f32> {
        match &self.linear.bias {
            Some(bias) => bias
                .val()
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("cannot read model bias: {e:?}"))?
                .first()
                .copied()
                .ok_or_else(|| anyhow!("model bias is empty")),
            None => Ok(0.0),
        }
    }
}
