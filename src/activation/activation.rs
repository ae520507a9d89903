use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::Error;

/// Element-wise nonlinearity shared by the hidden and output layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Tanh,
    Relu,
    Sigmoid,
}

impl Activation {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
        }
    }

    /// Derivative evaluated at the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            Activation::Relu => if x > 0.0 { 1.0 } else { 0.0 },
            Activation::Sigmoid => {
                let s = sigmoid(x);
                s * (1.0 - s)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Tanh => "tanh",
            Activation::Relu => "relu",
            Activation::Sigmoid => "sigmoid",
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl FromStr for Activation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tanh" => Ok(Activation::Tanh),
            "relu" => Ok(Activation::Relu),
            "sigmoid" => Ok(Activation::Sigmoid),
            other => Err(Error::Configuration(format!(
                "activation function not supported: {other:?} (expected tanh, relu or sigmoid)"
            ))),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ALL: [Activation; 3] = [Activation::Tanh, Activation::Relu, Activation::Sigmoid];

    #[test]
    fn table_values() {
        assert_eq!(Activation::Relu.function(-2.0), 0.0);
        assert_eq!(Activation::Relu.function(1.5), 1.5);
        assert_eq!(Activation::Relu.derivative(0.0), 0.0);
        assert_eq!(Activation::Relu.derivative(0.1), 1.0);
        assert_abs_diff_eq!(Activation::Sigmoid.function(0.0), 0.5);
        assert_abs_diff_eq!(Activation::Sigmoid.derivative(0.0), 0.25);
        assert_abs_diff_eq!(Activation::Tanh.derivative(0.0), 1.0);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let mut rng = StdRng::seed_from_u64(0);
        let h = 1e-6;
        for act in ALL {
            for _ in 0..200 {
                let x: f64 = rng.gen_range(-4.0..4.0);
                // relu is not differentiable at 0
                if act == Activation::Relu && x.abs() < 1e-3 {
                    continue;
                }
                let numeric = (act.function(x + h) - act.function(x - h)) / (2.0 * h);
                assert_abs_diff_eq!(act.derivative(x), numeric, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn parses_known_tags() {
        assert_eq!("tanh".parse::<Activation>().unwrap(), Activation::Tanh);
        assert_eq!("ReLU".parse::<Activation>().unwrap(), Activation::Relu);
        assert_eq!(" sigmoid ".parse::<Activation>().unwrap(), Activation::Sigmoid);
        for act in ALL {
            assert_eq!(act.to_string().parse::<Activation>().unwrap(), act);
        }
    }

    #[test]
    fn unknown_tag_is_a_configuration_error() {
        assert!(matches!("softmax".parse::<Activation>(), Err(Error::Configuration(_))));
    }
}
