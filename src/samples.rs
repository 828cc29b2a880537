//! Bundled job description / resume pairs for trying the advisor out.

use crate::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const SAMPLES_JSON: &str = include_str!("../data/samples.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub name: String,
    pub job_description: String,
    pub resume: String,
}

/// Parse the samples compiled into the binary.
pub fn bundled() -> Result<Vec<Sample>> {
    Ok(serde_json::from_str(SAMPLES_JSON)?)
}

/// Pick a random sample, avoiding the one whose job description is already
/// loaded when there is any other choice.
pub fn pick_sample<'a, R: Rng + ?Sized>(
    samples: &'a [Sample],
    current_job_description: Option<&str>,
    rng: &mut R,
) -> Option<&'a Sample> {
    let current = current_job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty());

    let candidates: Vec<&Sample> = match current {
        Some(current) if samples.len() > 1 => samples
            .iter()
            .filter(|sample| sample.job_description.trim() != current)
            .collect(),
        _ => samples.iter().collect(),
    };

    candidates.choose(rng).copied()
}
