use async_trait::async_trait;
use note_eval_core::{score_decimal, EvalCorpus, EvalPair, MetricCalculator, Result};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};

use super::MetricOutput;
use crate::tokenize::tokenize;

/// Alignment tiers, tried in priority order. Earlier tiers claim tokens
/// first, so an exact match is never displaced by a stem or synonym match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    Stem,
    Synonym,
}

/// METEOR: per-pair alignment score averaged over the corpus.
///
/// The stem tier uses the Snowball English stemmer. The synonym tier is
/// driven by a caller-supplied table and is inert while that table is
/// empty, which is the default. Scores are only comparable across runs
/// that share one configuration.
#[derive(Debug, Clone)]
pub struct MeteorCalculator {
    pub tiers: Vec<MatchTier>,
    pub synonyms: HashMap<String, HashSet<String>>,
}

impl MeteorCalculator {
    pub fn new() -> Self {
        Self {
            tiers: vec![MatchTier::Exact, MatchTier::Stem, MatchTier::Synonym],
            synonyms: HashMap::new(),
        }
    }

    pub fn with_tiers(mut self, tiers: Vec<MatchTier>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_synonyms(mut self, synonyms: HashMap<String, HashSet<String>>) -> Self {
        self.synonyms = synonyms;
        self
    }

    fn tier_match(&self, tier: MatchTier, cand: &str, reference: &str, stemmer: &Stemmer) -> bool {
        match tier {
            MatchTier::Exact => cand == reference,
            MatchTier::Stem => stemmer.stem(cand) == stemmer.stem(reference),
            MatchTier::Synonym => {
                self.synonyms
                    .get(cand)
                    .is_some_and(|words| words.contains(reference))
                    || self
                        .synonyms
                        .get(reference)
                        .is_some_and(|words| words.contains(cand))
            }
        }
    }

    /// Align candidate and reference tokens, each at most once. Within a
    /// tier, candidate positions are scanned in order and take the first
    /// unmatched compatible reference position, which keeps alignments
    /// close to monotone and the chunk count low.
    fn align(
        &self,
        cand_tokens: &[String],
        ref_tokens: &[String],
        stemmer: &Stemmer,
    ) -> Vec<(usize, usize)> {
        let mut cand_used = vec![false; cand_tokens.len()];
        let mut ref_used = vec![false; ref_tokens.len()];
        let mut matches = Vec::new();

        for tier in &self.tiers {
            for (i, cand) in cand_tokens.iter().enumerate() {
                if cand_used[i] {
                    continue;
                }
                for (j, reference) in ref_tokens.iter().enumerate() {
                    if ref_used[j] {
                        continue;
                    }
                    if self.tier_match(*tier, cand, reference, stemmer) {
                        cand_used[i] = true;
                        ref_used[j] = true;
                        matches.push((i, j));
                        break;
                    }
                }
            }
        }

        matches.sort_unstable();
        matches
    }

    /// Maximal runs of pairs contiguous in both sequences.
    fn count_chunks(matches: &[(usize, usize)]) -> usize {
        if matches.is_empty() {
            return 0;
        }
        let mut chunks = 1;
        for window in matches.windows(2) {
            let (i0, j0) = window[0];
            let (i1, j1) = window[1];
            if i1 != i0 + 1 || j1 != j0 + 1 {
                chunks += 1;
            }
        }
        chunks
    }

    /// Score one pair: recall-weighted F-mean (alpha = 0.9) discounted by
    /// the fragmentation penalty 0.5 * (chunks / matches)^3.
    pub fn score_pair(&self, pair: &EvalPair, stemmer: &Stemmer) -> f64 {
        let cand_tokens = tokenize(&pair.candidate);
        let ref_tokens = tokenize(&pair.reference);

        if cand_tokens.is_empty() || ref_tokens.is_empty() {
            return 0.0;
        }

        let matches = self.align(&cand_tokens, &ref_tokens, stemmer);
        let m = matches.len() as f64;
        if matches.is_empty() {
            return 0.0;
        }

        let precision = m / cand_tokens.len() as f64;
        let recall = m / ref_tokens.len() as f64;
        let f_mean = 10.0 * precision * recall / (recall + 9.0 * precision);

        let chunks = Self::count_chunks(&matches) as f64;
        let penalty = 0.5 * (chunks / m).powi(3);

        f_mean * (1.0 - penalty)
    }

    /// Mean per-pair METEOR over the corpus.
    pub fn calculate_meteor(&self, corpus: &EvalCorpus) -> f64 {
        let stemmer = Stemmer::create(Algorithm::English);
        let sum: f64 = corpus
            .iter()
            .map(|pair| self.score_pair(pair, &stemmer))
            .sum();
        sum / corpus.len() as f64
    }
}

impl Default for MeteorCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricCalculator for MeteorCalculator {
    type Input = EvalCorpus;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let meteor = self.calculate_meteor(&input);

        Ok(MetricOutput {
            score: score_decimal(meteor),
            metadata: json!({
                "metric": "meteor",
                "tiers": self.tiers,
                "synonym_entries": self.synonyms.len(),
            }),
        })
    }
}

/// Corpus METEOR with the default configuration (all tiers, empty synonym table).
pub fn corpus_meteor(corpus: &EvalCorpus) -> f64 {
    MeteorCalculator::new().calculate_meteor(corpus)
}
