use serde::{Serialize, Deserialize};

use crate::activation::activation::Activation;
use crate::error::{Error, Result};

/// Everything the network needs at construction time.
///
/// Fields:
/// - `input_dim`     — features per sample (columns of X)
/// - `hidden_dim`    — width of the single hidden layer
/// - `output_dim`    — outputs per sample (columns of y)
/// - `learning_rate` — gradient-descent step size, fixed for the lifetime
///                     of the network
/// - `activation`    — nonlinearity used by both layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub learning_rate: f64,
    pub activation: Activation,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            input_dim: 2,
            hidden_dim: 3,
            output_dim: 1,
            learning_rate: 0.1,
            activation: Activation::Tanh,
        }
    }
}

impl NetworkConfig {
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        learning_rate: f64,
        activation: Activation,
    ) -> Self {
        NetworkConfig { input_dim, hidden_dim, output_dim, learning_rate, activation }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("input_dim", self.input_dim),
            ("hidden_dim", self.hidden_dim),
            ("output_dim", self.output_dim),
        ] {
            if value == 0 {
                return Err(Error::Configuration(format!("{name} must be at least 1")));
            }
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::Configuration(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Reads a config from a JSON file. Missing fields take their defaults.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
