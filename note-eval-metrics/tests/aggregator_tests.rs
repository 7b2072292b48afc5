use approx::assert_relative_eq;
use note_eval_core::{EvalCorpus, EvalError};
use note_eval_metrics::calculators::{corpus_bleu, corpus_meteor, corpus_rouge};
use note_eval_metrics::ScoreAggregator;
use rust_decimal::prelude::ToPrimitive;

fn corpus(pairs: &[(&str, &str)]) -> EvalCorpus {
    let predictions = pairs.iter().map(|(c, _)| c.to_string()).collect();
    let references = pairs.iter().map(|(_, r)| r.to_string()).collect();
    EvalCorpus::new(predictions, references).unwrap()
}

#[tokio::test]
async fn test_aggregator_perfect_corpus() {
    let aggregator = ScoreAggregator::new();
    let corpus = corpus(&[
        ("the cat sat on the mat", "the cat sat on the mat"),
        ("patient reports mild headache", "patient reports mild headache"),
    ]);

    let record = aggregator.score(&corpus).await.unwrap();

    assert_relative_eq!(record.bleu.to_f64().unwrap(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(record.rouge1.to_f64().unwrap(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(record.rouge2.to_f64().unwrap(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(record.rouge_l.to_f64().unwrap(), 1.0, epsilon = 1e-6);
    assert_relative_eq!(record.rouge_lsum.to_f64().unwrap(), 1.0, epsilon = 1e-6);
    assert!(record.meteor.to_f64().unwrap() > 0.99);
    assert_eq!(record.num_samples, 2);
}

#[tokio::test]
async fn test_aggregator_all_empty_candidates() {
    let aggregator = ScoreAggregator::new();
    let corpus = corpus(&[("", "the cat sat"), ("", "on the mat")]);

    let record = aggregator.score(&corpus).await.unwrap();

    for value in record.to_map().values() {
        assert_eq!(value.to_f64().unwrap(), 0.0);
    }
}

#[tokio::test]
async fn test_aggregator_matches_individual_entry_points() {
    let aggregator = ScoreAggregator::new();
    let corpus = corpus(&[
        ("the cat sat", "the cat sat on the mat"),
        ("patient is stable", "the patient remains stable today"),
    ]);

    let record = aggregator.score(&corpus).await.unwrap();
    let rouge = corpus_rouge(&corpus);

    assert_relative_eq!(
        record.bleu.to_f64().unwrap(),
        corpus_bleu(&corpus),
        epsilon = 1e-9
    );
    assert_relative_eq!(record.rouge1.to_f64().unwrap(), rouge.rouge1, epsilon = 1e-9);
    assert_relative_eq!(
        record.rouge_lsum.to_f64().unwrap(),
        rouge.rouge_lsum,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        record.meteor.to_f64().unwrap(),
        corpus_meteor(&corpus),
        epsilon = 1e-9
    );
}

#[tokio::test]
async fn test_blocking_path_agrees_with_async_path() {
    let aggregator = ScoreAggregator::new();
    let corpus = corpus(&[
        ("mild swelling noted on left ankle", "swelling of the left ankle was noted"),
        ("no acute distress", "patient in no acute distress"),
    ]);

    let concurrent = aggregator.score(&corpus).await.unwrap();
    let blocking = aggregator.score_blocking(&corpus).unwrap();

    assert_eq!(concurrent, blocking);
}

#[test]
fn test_mismatched_inputs_fail_before_scoring() {
    let err = EvalCorpus::new(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec!["x".to_string(), "y".to_string()],
    )
    .unwrap_err();

    assert!(matches!(err, EvalError::InputMismatch(_)));
}

#[tokio::test]
async fn test_record_map_view() {
    let aggregator = ScoreAggregator::new();
    let corpus = corpus(&[("the cat sat", "the cat sat on the mat")]);

    let record = aggregator.score(&corpus).await.unwrap();
    let map = record.to_map();

    assert_eq!(map.len(), 6);
    assert_eq!(map["rouge1"], record.rouge1);
    assert_eq!(map["rougeLsum"], record.rouge_lsum);
}
