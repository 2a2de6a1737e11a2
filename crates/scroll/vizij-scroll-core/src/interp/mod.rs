//! Easing curves.
//!
//! Names follow the usual web tweening vocabulary: `powerN.in|out|inOut`
//! where power1 is quadratic and power2 cubic, plus `cubic-bezier(...)`.

pub mod functions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrollError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EaseDir {
    In,
    Out,
    InOut,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    Linear,
    Power { power: u8, dir: EaseDir },
    CubicBezier([f64; 4]),
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power {
            power: 2,
            dir: EaseDir::Out,
        }
    }
}

impl Ease {
    /// Map linear progress in [0, 1] to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Ease::Linear => t,
            Ease::Power { power: 0, .. } => t,
            Ease::Power { power, dir } => {
                let exp = i32::from(power) + 1;
                match dir {
                    EaseDir::In => functions::power_in(t, exp),
                    EaseDir::Out => functions::power_out(t, exp),
                    EaseDir::InOut => functions::power_in_out(t, exp),
                }
            }
            Ease::CubicBezier([x1, y1, x2, y2]) => functions::bezier_ease(t, x1, y1, x2, y2),
        }
    }
}

impl FromStr for Ease {
    type Err = ScrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScrollError::InvalidEase {
            name: s.to_string(),
        };
        let name = s.trim();
        if name == "none" || name == "linear" {
            return Ok(Ease::Linear);
        }
        if let Some(args) = name
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let parts: Vec<f64> = args
                .split(',')
                .map(|p| p.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| invalid())?;
            return match parts.as_slice() {
                [x1, y1, x2, y2] => Ok(Ease::CubicBezier([*x1, *y1, *x2, *y2])),
                _ => Err(invalid()),
            };
        }
        let rest = name.strip_prefix("power").ok_or_else(invalid)?;
        let (power, dir) = match rest.split_once('.') {
            Some((p, d)) => (p, d),
            // bare "power2" defaults to out
            None => (rest, "out"),
        };
        let power: u8 = power.parse().map_err(|_| invalid())?;
        if power > 4 {
            return Err(invalid());
        }
        let dir = match dir {
            "in" => EaseDir::In,
            "out" => EaseDir::Out,
            "inOut" => EaseDir::InOut,
            _ => return Err(invalid()),
        };
        Ok(Ease::Power { power, dir })
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => f.write_str("none"),
            Ease::Power { power, dir } => {
                let dir = match dir {
                    EaseDir::In => "in",
                    EaseDir::Out => "out",
                    EaseDir::InOut => "inOut",
                };
                write!(f, "power{power}.{dir}")
            }
            Ease::CubicBezier([x1, y1, x2, y2]) => write!(f, "cubic-bezier({x1},{y1},{x2},{y2})"),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = ScrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}
