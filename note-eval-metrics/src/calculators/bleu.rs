use async_trait::async_trait;
use note_eval_core::{score_decimal, EvalCorpus, MetricCalculator, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use super::MetricOutput;
use crate::tokenize::{ngrams, tokenize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMethod {
    None,
    Add1,
    Add01,
}

/// Corpus-level BLEU: n-gram counts are pooled across the whole corpus
/// before any precision is computed, and the brevity penalty compares
/// total candidate length against total reference length.
#[derive(Debug, Clone)]
pub struct BleuCalculator {
    pub max_n: usize,
    pub smoothing: SmoothingMethod,
}

impl BleuCalculator {
    pub fn new(max_n: usize) -> Self {
        Self {
            max_n,
            smoothing: SmoothingMethod::Add01,
        }
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingMethod) -> Self {
        self.smoothing = smoothing;
        self
    }

    fn count_ngrams(grams: &[Vec<String>]) -> HashMap<Vec<String>, usize> {
        let mut counts = HashMap::new();
        for gram in grams {
            *counts.entry(gram.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Modified precision for one order, pooled over the corpus: candidate
    /// counts are clipped per pair at the reference's count, then summed.
    fn pooled_counts(&self, corpus: &EvalCorpus, n: usize) -> (usize, usize) {
        let mut clipped = 0;
        let mut total = 0;

        for pair in corpus.iter() {
            let cand_tokens = tokenize(&pair.candidate);
            let ref_tokens = tokenize(&pair.reference);

            let cand_grams = ngrams(&cand_tokens, n);
            if cand_grams.is_empty() {
                continue;
            }
            let ref_counts = Self::count_ngrams(&ngrams(&ref_tokens, n));

            total += cand_grams.len();
            for (gram, count) in Self::count_ngrams(&cand_grams) {
                let ref_count = ref_counts.get(&gram).copied().unwrap_or(0);
                clipped += count.min(ref_count);
            }
        }

        (clipped, total)
    }

    fn smoothed_precision(&self, clipped: usize, total: usize) -> f64 {
        // An order with no candidate n-grams at all is a hard zero; smoothing
        // only rescues orders that had mass but no matches.
        if total == 0 {
            return 0.0;
        }
        match self.smoothing {
            SmoothingMethod::None => clipped as f64 / total as f64,
            SmoothingMethod::Add1 => (clipped as f64 + 1.0) / (total as f64 + 1.0),
            SmoothingMethod::Add01 => (clipped as f64 + 0.1) / (total as f64 + 0.1),
        }
    }

    fn brevity_penalty(&self, candidate_len: usize, reference_len: usize) -> f64 {
        if candidate_len == 0 {
            0.0
        } else if candidate_len >= reference_len {
            1.0
        } else {
            (1.0 - (reference_len as f64 / candidate_len as f64)).exp()
        }
    }

    /// Calculate corpus BLEU, returning the score and per-order precisions.
    pub fn calculate_bleu(&self, corpus: &EvalCorpus) -> (f64, Vec<f64>) {
        let mut candidate_len = 0;
        let mut reference_len = 0;
        for pair in corpus.iter() {
            candidate_len += tokenize(&pair.candidate).len();
            reference_len += tokenize(&pair.reference).len();
        }

        let mut precisions = Vec::with_capacity(self.max_n);
        let mut log_precision_sum = 0.0;
        let mut any_zero = false;

        for n in 1..=self.max_n {
            let (clipped, total) = self.pooled_counts(corpus, n);
            let precision = self.smoothed_precision(clipped, total);
            precisions.push(precision);

            if precision > 0.0 {
                log_precision_sum += precision.ln();
            } else {
                any_zero = true;
            }
        }

        if any_zero {
            return (0.0, precisions);
        }

        let geometric_mean = (log_precision_sum / self.max_n as f64).exp();
        let bp = self.brevity_penalty(candidate_len, reference_len);

        (bp * geometric_mean, precisions)
    }
}

impl Default for BleuCalculator {
    fn default() -> Self {
        Self::new(4)
    }
}

#[async_trait]
impl MetricCalculator for BleuCalculator {
    type Input = EvalCorpus;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let (bleu, precisions) = self.calculate_bleu(&input);

        Ok(MetricOutput {
            score: score_decimal(bleu),
            metadata: json!({
                "metric": "bleu",
                "max_n": self.max_n,
                "smoothing": self.smoothing,
                "precisions": precisions,
            }),
        })
    }
}

/// Corpus BLEU with the default configuration (orders 1..=4, add-epsilon smoothing).
pub fn corpus_bleu(corpus: &EvalCorpus) -> f64 {
    BleuCalculator::default().calculate_bleu(corpus).0
}
