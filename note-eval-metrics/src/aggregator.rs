use note_eval_core::{score_decimal, EvalCorpus, Result, ScoreRecord};
use tracing::{debug, info};

use crate::calculators::{corpus_rouge, BleuCalculator, MeteorCalculator};

/// Runs all three scorers over one corpus and merges their outputs into a
/// single [`ScoreRecord`]. Input validation already happened at
/// [`EvalCorpus::new`], so every path here is infallible arithmetic; the
/// `Result` return keeps the calculator contract uniform for callers.
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    bleu: BleuCalculator,
    meteor: MeteorCalculator,
}

impl ScoreAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bleu(mut self, bleu: BleuCalculator) -> Self {
        self.bleu = bleu;
        self
    }

    pub fn with_meteor(mut self, meteor: MeteorCalculator) -> Self {
        self.meteor = meteor;
        self
    }

    /// Score the corpus with the three scorers running concurrently. They
    /// are pure and independent, so join order is irrelevant.
    pub async fn score(&self, corpus: &EvalCorpus) -> Result<ScoreRecord> {
        info!(samples = corpus.len(), "scoring corpus");

        let (bleu, rouge, meteor) = tokio::join!(
            async { self.bleu.calculate_bleu(corpus).0 },
            async { corpus_rouge(corpus) },
            async { self.meteor.calculate_meteor(corpus) },
        );

        debug!(bleu, "computed BLEU");
        debug!(
            rouge1 = rouge.rouge1,
            rouge2 = rouge.rouge2,
            rouge_l = rouge.rouge_l,
            rouge_lsum = rouge.rouge_lsum,
            "computed ROUGE"
        );
        debug!(meteor, "computed METEOR");

        Ok(ScoreRecord {
            bleu: score_decimal(bleu),
            rouge1: score_decimal(rouge.rouge1),
            rouge2: score_decimal(rouge.rouge2),
            rouge_l: score_decimal(rouge.rouge_l),
            rouge_lsum: score_decimal(rouge.rouge_lsum),
            meteor: score_decimal(meteor),
            num_samples: corpus.len(),
        })
    }

    /// Sequential path for callers without an async runtime. Same numbers
    /// as [`ScoreAggregator::score`].
    pub fn score_blocking(&self, corpus: &EvalCorpus) -> Result<ScoreRecord> {
        info!(samples = corpus.len(), "scoring corpus");

        let bleu = self.bleu.calculate_bleu(corpus).0;
        let rouge = corpus_rouge(corpus);
        let meteor = self.meteor.calculate_meteor(corpus);

        Ok(ScoreRecord {
            bleu: score_decimal(bleu),
            rouge1: score_decimal(rouge.rouge1),
            rouge2: score_decimal(rouge.rouge2),
            rouge_l: score_decimal(rouge.rouge_l),
            rouge_lsum: score_decimal(rouge.rouge_lsum),
            meteor: score_decimal(meteor),
            num_samples: corpus.len(),
        })
    }
}
