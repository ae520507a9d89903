use std::env;
use std::process;

use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use circle_nn::{
    train_loop, Activation, CircleDataset, NetworkConfig, Result, TrainConfig, TwoLayerNetwork,
    VisualConfig, Visualizer,
};

const N_SAMPLES: usize = 100;
const DEFAULT_SEED: u64 = 0;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("{}", usage(&args));
        return;
    }

    if let Err(e) = run(args.get(1..).unwrap_or_default()) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let mut config = match args.first() {
        Some(path) if path.ends_with(".json") => NetworkConfig::load_json(path)?,
        Some(tag) => NetworkConfig { activation: tag.parse::<Activation>()?, ..NetworkConfig::default() },
        None => NetworkConfig::default(),
    };
    if let Some(lr) = args.get(1) {
        config.learning_rate = parse_arg("learning_rate", lr)?;
    }
    let steps = match args.get(2) {
        Some(s) => parse_arg("steps", s)?,
        None => TrainConfig::default().steps,
    };
    let seed = match env::var("CIRCLE_NN_SEED") {
        Ok(s) => parse_arg("CIRCLE_NN_SEED", &s)?,
        Err(_) => DEFAULT_SEED,
    };

    // data first, then weights, from the same generator
    let mut rng = StdRng::seed_from_u64(seed);
    let data = CircleDataset::generate(N_SAMPLES, &mut rng)?;
    let mut network = TwoLayerNetwork::new(config, &mut rng)?;

    let train_config = TrainConfig { steps, ..TrainConfig::default() };
    let mut visualizer = Visualizer::new(VisualConfig::default())?;
    let history = train_loop(&mut network, &data, &train_config, &mut visualizer)?;
    let path = visualizer.finish()?;

    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        info!("loss {:.4} -> {:.4}", first.loss, last.loss);
    }
    info!("animation saved to {}", path.display());
    Ok(())
}

fn usage(args: &[String]) -> String {
    format!(
        "Usage: {} [activation|config.json] [learning_rate] [steps]\n\
         Defaults: tanh 0.1 1000. Seed from CIRCLE_NN_SEED (default 0).",
        args.first().map_or("circle-nn", String::as_str)
    )
}

fn parse_arg<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| circle_nn::Error::Configuration(format!("invalid {name}: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_without_program_name_falls_back() {
        assert!(usage(&[]).starts_with("Usage: circle-nn "));
        assert!(usage(&["./bin/nn".to_string()]).starts_with("Usage: ./bin/nn "));
    }

    #[test]
    fn bad_numbers_are_configuration_errors() {
        assert_eq!(parse_arg::<f64>("learning_rate", "0.5").unwrap(), 0.5);
        assert!(matches!(
            parse_arg::<usize>("steps", "ten"),
            Err(circle_nn::Error::Configuration(_))
        ));
    }
}
