use async_trait::async_trait;
use note_eval_core::{score_decimal, EvalCorpus, EvalPair, MetricCalculator, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

use super::MetricOutput;
use crate::tokenize::{ngrams, split_sentences, tokenize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RougeVariant {
    RougeN { n: usize },
    RougeL,
    RougeLsum,
}

/// Per-pair precision/recall/F1 triple.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PrfScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl PrfScore {
    fn from_pr(precision: f64, recall: f64) -> Self {
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}

/// All four ROUGE variants for one corpus, each the mean per-pair F1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RougeScores {
    pub rouge1: f64,
    pub rouge2: f64,
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
    #[serde(rename = "rougeLsum")]
    pub rouge_lsum: f64,
}

/// Flat DP arena for LCS, indexed by two positions. Sized once up front so
/// long notes cannot grow the structure mid-computation or recurse.
struct LcsTable {
    cols: usize,
    data: Vec<usize>,
}

impl LcsTable {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            data: vec![0; rows * cols],
        }
    }

    fn at(&self, i: usize, j: usize) -> usize {
        self.data[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, val: usize) {
        self.data[i * self.cols + j] = val;
    }
}

/// Fill the LCS table for token sequences `a` (rows) and `b` (columns).
/// Row/column 0 is the empty prefix.
fn lcs_table(a: &[String], b: &[String]) -> LcsTable {
    let mut dp = LcsTable::new(a.len() + 1, b.len() + 1);
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                dp.set(i, j, dp.at(i - 1, j - 1) + 1);
            } else {
                dp.set(i, j, dp.at(i - 1, j).max(dp.at(i, j - 1)));
            }
        }
    }
    dp
}

fn lcs_length(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    lcs_table(a, b).at(a.len(), b.len())
}

/// Candidate-side positions of one LCS between `candidate` and `sentence`.
fn lcs_candidate_positions(candidate: &[String], sentence: &[String]) -> Vec<usize> {
    if candidate.is_empty() || sentence.is_empty() {
        return vec![];
    }

    let dp = lcs_table(candidate, sentence);
    let mut positions = Vec::new();
    let mut i = candidate.len();
    let mut j = sentence.len();

    while i > 0 && j > 0 {
        if candidate[i - 1] == sentence[j - 1] && dp.at(i, j) == dp.at(i - 1, j - 1) + 1 {
            positions.push(i - 1);
            i -= 1;
            j -= 1;
        } else if dp.at(i - 1, j) >= dp.at(i, j - 1) {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    positions.reverse();
    positions
}

#[derive(Debug, Clone)]
pub struct RougeCalculator {
    pub variant: RougeVariant,
}

impl RougeCalculator {
    pub fn new(variant: RougeVariant) -> Self {
        Self { variant }
    }

    pub fn rouge_1() -> Self {
        Self::new(RougeVariant::RougeN { n: 1 })
    }

    pub fn rouge_2() -> Self {
        Self::new(RougeVariant::RougeN { n: 2 })
    }

    pub fn rouge_l() -> Self {
        Self::new(RougeVariant::RougeL)
    }

    pub fn rouge_lsum() -> Self {
        Self::new(RougeVariant::RougeLsum)
    }

    fn count_ngrams(grams: &[Vec<String>]) -> HashMap<Vec<String>, usize> {
        let mut counts = HashMap::new();
        for gram in grams {
            *counts.entry(gram.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// ROUGE-N for one pair: clipped n-gram overlap.
    fn rouge_n(cand_tokens: &[String], ref_tokens: &[String], n: usize) -> PrfScore {
        let cand_grams = ngrams(cand_tokens, n);
        let ref_grams = ngrams(ref_tokens, n);

        if cand_grams.is_empty() || ref_grams.is_empty() {
            return PrfScore::default();
        }

        let cand_counts = Self::count_ngrams(&cand_grams);
        let ref_counts = Self::count_ngrams(&ref_grams);

        let mut overlap = 0;
        for (gram, ref_count) in ref_counts.iter() {
            if let Some(cand_count) = cand_counts.get(gram) {
                overlap += (*cand_count).min(*ref_count);
            }
        }

        PrfScore::from_pr(
            overlap as f64 / cand_grams.len() as f64,
            overlap as f64 / ref_grams.len() as f64,
        )
    }

    /// ROUGE-L for one pair: LCS over the full token sequences.
    fn rouge_l_pair(cand_tokens: &[String], ref_tokens: &[String]) -> PrfScore {
        if cand_tokens.is_empty() || ref_tokens.is_empty() {
            return PrfScore::default();
        }

        let lcs = lcs_length(cand_tokens, ref_tokens) as f64;
        PrfScore::from_pr(
            lcs / cand_tokens.len() as f64,
            lcs / ref_tokens.len() as f64,
        )
    }

    /// ROUGE-Lsum for one pair: each reference sentence is matched against
    /// the full candidate by LCS, and the matched candidate positions are
    /// unioned across sentences before precision/recall. A single-sentence
    /// reference reduces to plain ROUGE-L.
    fn rouge_lsum_pair(pair: &EvalPair) -> PrfScore {
        let cand_tokens = tokenize(&pair.candidate);
        let ref_tokens = tokenize(&pair.reference);

        if cand_tokens.is_empty() || ref_tokens.is_empty() {
            return PrfScore::default();
        }

        let sentences = split_sentences(&pair.reference);
        if sentences.len() <= 1 {
            return Self::rouge_l_pair(&cand_tokens, &ref_tokens);
        }

        let mut hit = vec![false; cand_tokens.len()];
        for sentence in &sentences {
            let sentence_tokens = tokenize(sentence);
            for pos in lcs_candidate_positions(&cand_tokens, &sentence_tokens) {
                hit[pos] = true;
            }
        }

        let hits = hit.iter().filter(|h| **h).count() as f64;
        let precision = hits / cand_tokens.len() as f64;
        // Distinct candidate positions can outnumber reference tokens when
        // several short sentences match repeated candidate words; clamp so
        // the F1 stays in [0, 1].
        let recall = (hits / ref_tokens.len() as f64).min(1.0);

        PrfScore::from_pr(precision, recall)
    }

    /// Score one pair under this calculator's variant.
    pub fn score_pair(&self, pair: &EvalPair) -> PrfScore {
        match self.variant {
            RougeVariant::RougeN { n } => {
                Self::rouge_n(&tokenize(&pair.candidate), &tokenize(&pair.reference), n)
            }
            RougeVariant::RougeL => {
                Self::rouge_l_pair(&tokenize(&pair.candidate), &tokenize(&pair.reference))
            }
            RougeVariant::RougeLsum => Self::rouge_lsum_pair(pair),
        }
    }

    /// Mean per-pair scores over the corpus.
    pub fn calculate_rouge(&self, corpus: &EvalCorpus) -> PrfScore {
        let n = corpus.len() as f64;
        let mut sum = PrfScore::default();

        for pair in corpus.iter() {
            let score = self.score_pair(pair);
            sum.precision += score.precision;
            sum.recall += score.recall;
            sum.f1 += score.f1;
        }

        PrfScore {
            precision: sum.precision / n,
            recall: sum.recall / n,
            f1: sum.f1 / n,
        }
    }
}

impl Default for RougeCalculator {
    fn default() -> Self {
        Self::rouge_l()
    }
}

#[async_trait]
impl MetricCalculator for RougeCalculator {
    type Input = EvalCorpus;
    type Output = MetricOutput;

    async fn calculate(&self, input: Self::Input) -> Result<Self::Output> {
        let mean = self.calculate_rouge(&input);

        Ok(MetricOutput {
            score: score_decimal(mean.f1),
            metadata: json!({
                "metric": "rouge",
                "variant": self.variant,
                "precision": mean.precision,
                "recall": mean.recall,
                "f1": mean.f1,
            }),
        })
    }
}

/// All four ROUGE variants over one corpus in a single pass per variant.
pub fn corpus_rouge(corpus: &EvalCorpus) -> RougeScores {
    RougeScores {
        rouge1: RougeCalculator::rouge_1().calculate_rouge(corpus).f1,
        rouge2: RougeCalculator::rouge_2().calculate_rouge(corpus).f1,
        rouge_l: RougeCalculator::rouge_l().calculate_rouge(corpus).f1,
        rouge_lsum: RougeCalculator::rouge_lsum().calculate_rouge(corpus).f1,
    }
}
