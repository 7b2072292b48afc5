use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{EvalError, Result};

pub const METRIC_BLEU: &str = "bleu";
pub const METRIC_ROUGE1: &str = "rouge1";
pub const METRIC_ROUGE2: &str = "rouge2";
pub const METRIC_ROUGE_L: &str = "rougeL";
pub const METRIC_ROUGE_LSUM: &str = "rougeLsum";
pub const METRIC_METEOR: &str = "meteor";

/// One scored unit: a generated note and the reference note it is judged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalPair {
    pub candidate: String,
    pub reference: String,
}

/// Aligned candidate/reference pairs for one scoring run.
///
/// Construction is the validation boundary: every scorer downstream may
/// assume equal-length, non-empty input. Empty strings are valid members
/// and score as zero overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCorpus {
    pairs: Vec<EvalPair>,
}

impl EvalCorpus {
    pub fn new(predictions: Vec<String>, references: Vec<String>) -> Result<Self> {
        if predictions.len() != references.len() {
            return Err(EvalError::InputMismatch(format!(
                "{} predictions vs {} references",
                predictions.len(),
                references.len()
            )));
        }
        if predictions.is_empty() {
            return Err(EvalError::InputMismatch(
                "corpus contains no pairs".to_string(),
            ));
        }

        let pairs = predictions
            .into_iter()
            .zip(references)
            .map(|(candidate, reference)| EvalPair {
                candidate,
                reference,
            })
            .collect();

        Ok(Self { pairs })
    }

    pub fn from_pairs(pairs: Vec<EvalPair>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(EvalError::InputMismatch(
                "corpus contains no pairs".to_string(),
            ));
        }
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[EvalPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EvalPair> {
        self.pairs.iter()
    }
}

/// Corpus-level result of one scoring run. All six metric values lie in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub bleu: Decimal,
    pub rouge1: Decimal,
    pub rouge2: Decimal,
    #[serde(rename = "rougeL")]
    pub rouge_l: Decimal,
    #[serde(rename = "rougeLsum")]
    pub rouge_lsum: Decimal,
    pub meteor: Decimal,
    pub num_samples: usize,
}

impl ScoreRecord {
    /// View the record as a metric-name → score mapping for map-shaped consumers.
    pub fn to_map(&self) -> HashMap<String, Decimal> {
        HashMap::from([
            (METRIC_BLEU.to_string(), self.bleu),
            (METRIC_ROUGE1.to_string(), self.rouge1),
            (METRIC_ROUGE2.to_string(), self.rouge2),
            (METRIC_ROUGE_L.to_string(), self.rouge_l),
            (METRIC_ROUGE_LSUM.to_string(), self.rouge_lsum),
            (METRIC_METEOR.to_string(), self.meteor),
        ])
    }
}

/// Boundary conversion for scores computed in `f64`.
pub fn score_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or(Decimal::ZERO)
}
