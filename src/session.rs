//! Data preparation for a front end that visualises one sharing round:
//! split with a seeded generator, reveal a prefix of the shares, reconstruct
//! from it and sample the sharing curve for plotting.

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::{reconstruct_secret, split, FieldContext, FieldElement, Share, SharingError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeConfig {
    /// Accepts a JSON number or a decimal string, so moduli past 64 bits fit.
    #[serde(serialize_with = "as_decimal", deserialize_with = "from_decimal")]
    pub prime: BigUint,
    #[serde(serialize_with = "as_decimal", deserialize_with = "from_decimal")]
    pub secret: BigUint,
    pub share_count: usize,
    pub threshold: usize,
    /// How many shares, taken from `x = 1` upwards, feed the reconstruction.
    pub revealed: usize,
    pub seed: u64,
    /// Exclusive upper bound on the sampled curve's x-range.
    pub curve_samples: u64,
}

impl Default for SchemeConfig {
    fn default() -> Self {
        Self {
            prime: BigUint::from(7919u32),
            secret: BigUint::from(1234u32),
            share_count: 8,
            threshold: 3,
            revealed: 2,
            seed: 0,
            curve_samples: 400,
        }
    }
}

impl SchemeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Checks what the sharing itself does not: the revealed count.
    pub fn validate(&self) -> Result<(), SharingError> {
        if self.revealed == 0 || self.revealed > self.share_count {
            return Err(SharingError::InvalidParameters(format!(
                "revealed share count {} must lie in [1, {}]",
                self.revealed, self.share_count
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlotPoint {
    #[serde(serialize_with = "as_decimal")]
    pub x: BigUint,
    #[serde(serialize_with = "as_decimal")]
    pub y: BigUint,
}

impl From<&Share> for PlotPoint {
    fn from(share: &Share) -> Self {
        Self {
            x: share.x.to_biguint(),
            y: share.y.to_biguint(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SharingReport {
    #[serde(serialize_with = "as_decimal")]
    pub prime: BigUint,
    #[serde(serialize_with = "as_decimal")]
    pub secret: BigUint,
    pub threshold: usize,
    pub polynomial: String,
    #[serde(serialize_with = "as_decimal")]
    pub reconstructed: BigUint,
    /// Enough shares were revealed for reconstruction to be guaranteed.
    pub guaranteed: bool,
    /// Guaranteed and the reconstruction matches the secret.
    pub correct: bool,
    pub shares: Vec<PlotPoint>,
    pub revealed: Vec<PlotPoint>,
    pub curve: Vec<PlotPoint>,
}

pub fn run(config: &SchemeConfig) -> Result<SharingReport, SharingError> {
    config.validate()?;

    let prime = config.prime.clone();
    let secret = config.secret.clone();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let sharing = split(
        &secret,
        config.share_count,
        config.threshold,
        &prime,
        &mut rng,
    )?;

    let revealed = &sharing.shares()[..config.revealed];
    let reconstructed = reconstruct_secret(revealed, sharing.field())?;
    let guaranteed = config.revealed >= config.threshold;
    let correct = guaranteed && reconstructed == secret;

    let curve_end = prime
        .to_u64()
        .map_or(config.curve_samples, |p| p.min(config.curve_samples));
    let curve_x = sharing.field().range(1, curve_end);
    let curve_y = sharing.polynomial().evaluate_many(&curve_x);
    let curve = curve_x
        .iter()
        .zip(curve_y.iter())
        .map(|(x, y)| PlotPoint {
            x: x.to_biguint(),
            y: y.to_biguint(),
        })
        .collect();

    info!(
        reconstructed = %reconstructed,
        revealed = config.revealed,
        threshold = config.threshold,
        correct,
        "reconstructed secret"
    );

    Ok(SharingReport {
        prime,
        secret,
        threshold: sharing.threshold(),
        polynomial: sharing.polynomial().to_string(),
        reconstructed,
        guaranteed,
        correct,
        shares: sharing.shares().iter().map(PlotPoint::from).collect(),
        revealed: revealed.iter().map(PlotPoint::from).collect(),
        curve,
    })
}

/// Parses `x:y` pairs, e.g. `1:10,2:19`, into points of `field`.
pub fn parse_points(input: &str, field: &FieldContext) -> Result<Vec<Share>, SharingError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| -> Result<Share, SharingError> {
            let (x, y) = pair.split_once(':').ok_or_else(|| {
                SharingError::InvalidParameters(format!("expected x:y, got '{}'", pair))
            })?;
            Ok(Share::new(parse_element(x, field)?, parse_element(y, field)?))
        })
        .collect()
}

fn parse_element(value: &str, field: &FieldContext) -> Result<FieldElement, SharingError> {
    value
        .trim()
        .parse::<BigUint>()
        .map(|v| field.element(v))
        .map_err(|e| SharingError::InvalidParameters(format!("bad integer '{}': {}", value, e)))
}

fn as_decimal<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn from_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Number(u64),
        Text(String),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(BigUint::from(n)),
        Decimal::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
