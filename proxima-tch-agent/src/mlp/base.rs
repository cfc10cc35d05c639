use super::MlpConfig;
use crate::model::SubModel;
use tch::{nn, nn::Module, Device, Tensor};

/// Multilayer perceptron with ReLU activation function.
pub struct Mlp {
    device: Device,
    seq: nn::Sequential,
}

impl Mlp {
    fn create_net(var_store: &nn::VarStore, config: &MlpConfig) -> nn::Sequential {
        let p = &(var_store.root() / "mlp");
        let mut seq = nn::seq();
        let mut in_dim = config.in_dim;

        for (i, &out_dim) in config.units.iter().enumerate() {
            seq = seq.add(nn::linear(
                p / format!("{}{}", "ln", i),
                in_dim,
                out_dim,
                Default::default(),
            ));
            seq = seq.add_fn(|x| x.relu());
            in_dim = out_dim;
        }

        let out_config = match config.out_std {
            None => Default::default(),
            Some(std) => nn::LinearConfig {
                ws_init: nn::Init::Randn {
                    mean: 0.0,
                    stdev: std / (in_dim as f64).sqrt(),
                },
                bs_init: Some(nn::Init::Const(0.0)),
                bias: true,
            },
        };
        seq = seq.add(nn::linear(
            p / format!("{}{}", "ln", config.units.len()),
            in_dim,
            config.out_dim,
            out_config,
        ));

        seq
    }
}

impl SubModel for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Self::Input) -> Tensor {
        self.seq.forward(&x.to(self.device))
    }

    fn build(var_store: &nn::VarStore, config: Self::Config) -> Self {
        let device = var_store.device();
        let seq = Self::create_net(var_store, &config);

        Self { device, seq }
    }
}
