use anyhow::Result;
use clap::Parser;
use log::info;
use proxima::{
    core::{
        record::{NullRecorder, Recorder},
        Agent as _, Env as _, Trainer, TrainerConfig,
    },
    envs::{CartPole, CartPoleConfig},
    tch_agent::{
        ppo::{Ppo, PpoConfig},
        rollout_buffer::RolloutBuffer,
    },
    tensorboard::TensorboardRecorder,
};
use std::path::Path;

const N_ENVS: usize = 8;
const HORIZON: usize = 128;
const MINIBATCH_SIZE: usize = 256;
const NUM_EPOCHS: usize = 4;
const LR_ACTOR: f64 = 2.5e-4;
const LR_CRITIC: f64 = 1e-3;
const MAX_STEPS: usize = 20_000;
const RECORD_INTERVAL: usize = 1_000;
const N_EPISODES_PER_EVAL: usize = 5;
const MODEL_DIR: &str = "./proxima/examples/model/ppo_cartpole";

mod config {
    use super::*;

    pub fn env_config(n_envs: usize) -> CartPoleConfig {
        CartPoleConfig::default().n_envs(n_envs)
    }

    pub fn trainer_config(max_steps: usize, model_dir: &str) -> TrainerConfig {
        TrainerConfig::default()
            .max_steps(max_steps)
            .record_interval(RECORD_INTERVAL)
            .model_dir(model_dir)
    }

    pub fn agent_config(path: Option<&str>) -> Result<PpoConfig> {
        match path {
            Some(path) => PpoConfig::load(path),
            None => Ok(PpoConfig::default()
                .hidden_layers(2, 64)
                .learning_rates(LR_ACTOR, LR_CRITIC)
                .horizon(HORIZON)
                .minibatch_size(MINIBATCH_SIZE)
                .num_epochs(NUM_EPOCHS)
                .grad_clip(0.5)
                .device(tch::Device::cuda_if_available())),
        }
    }
}

mod utils {
    use super::*;

    pub fn create_recorder(args: &Args, model_dir: &str) -> Box<dyn Recorder> {
        match args.tensorboard {
            true => Box::new(TensorboardRecorder::new(model_dir)),
            false => Box::new(NullRecorder::new()),
        }
    }
}

/// Train/eval PPO agent in cartpole environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train PPO agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate PPO agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,

    /// Number of environment steps for training
    #[arg(long, default_value_t = MAX_STEPS)]
    max_steps: usize,

    /// Number of environment instances stepped together
    #[arg(long, default_value_t = N_ENVS)]
    n_envs: usize,

    /// YAML file of the agent configuration
    #[arg(long)]
    config: Option<String>,

    /// Write records to Tensorboard
    #[arg(long, default_value_t = false)]
    tensorboard: bool,
}

fn train(args: &Args, model_dir: &str) -> Result<()> {
    let env = CartPole::build(&config::env_config(args.n_envs), 0)?;
    let agent_config = config::agent_config(args.config.as_deref())?;
    std::fs::create_dir_all(model_dir)?;
    agent_config.save(Path::new(model_dir).join("ppo.yaml"))?;

    let mut agent = Ppo::<CartPole>::build(agent_config, &env.spec())?;
    let mut buffer = RolloutBuffer::new(&agent.rollout_buffer_config());
    let mut recorder = utils::create_recorder(args, model_dir);
    let mut trainer = Trainer::build(config::trainer_config(args.max_steps, model_dir));

    trainer.train(env, &mut agent, &mut buffer, recorder.as_mut())?;

    Ok(())
}

fn eval(model_dir: &str, best: bool) -> Result<f32> {
    let mut env = CartPole::build(&config::env_config(1), 1)?;
    let mut agent = {
        let mut agent_config = PpoConfig::load(Path::new(model_dir).join("ppo.yaml"))?;
        agent_config.minibatch_size = None;
        let mut agent = Ppo::<CartPole>::build(agent_config, &env.spec())?;
        let best_dir = Path::new(model_dir).join("best");
        match best && best_dir.exists() {
            true => agent.load_params(&best_dir)?,
            false => agent.load_params(Path::new(model_dir))?,
        }
        agent
    };

    let mean_return = Trainer::evaluate::<_, _, RolloutBuffer>(
        &mut env,
        &mut agent,
        N_EPISODES_PER_EVAL,
    )?;
    info!("Mean return over {} episodes: {}", N_EPISODES_PER_EVAL, mean_return);

    Ok(mean_return)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    tch::manual_seed(42);

    let args = Args::parse();

    if args.eval {
        eval(MODEL_DIR, true)?;
    } else if args.train {
        train(&args, MODEL_DIR)?;
    } else {
        train(&args, MODEL_DIR)?;
        eval(MODEL_DIR, true)?;
    }

    Ok(())
}
