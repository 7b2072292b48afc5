use note_eval_core::EvalCorpus;
use note_eval_metrics::ScoreAggregator;
use proptest::prelude::*;
use rust_decimal::prelude::ToPrimitive;

fn text_strategy() -> impl Strategy<Value = String> {
    // Short clinical-note-ish strings, including empty and punctuated ones.
    "[a-z.,! ]{0,40}"
}

proptest! {
    #[test]
    fn all_metrics_stay_in_unit_interval(
        pairs in prop::collection::vec((text_strategy(), text_strategy()), 1..5)
    ) {
        let predictions = pairs.iter().map(|(c, _)| c.clone()).collect();
        let references = pairs.iter().map(|(_, r)| r.clone()).collect();
        let corpus = EvalCorpus::new(predictions, references).unwrap();

        let record = ScoreAggregator::new().score_blocking(&corpus).unwrap();

        for (name, value) in record.to_map() {
            let score = value.to_f64().unwrap();
            prop_assert!(
                (0.0..=1.0).contains(&score),
                "{name} out of bounds: {score}"
            );
        }
    }

    #[test]
    fn identical_texts_maximize_rouge(text in "[a-z]{1,8}( [a-z]{1,8}){0,6}") {
        let corpus = EvalCorpus::new(vec![text.clone()], vec![text]).unwrap();
        let rouge = note_eval_metrics::calculators::corpus_rouge(&corpus);

        prop_assert!((rouge.rouge1 - 1.0).abs() < 1e-9);
        prop_assert!((rouge.rouge_l - 1.0).abs() < 1e-9);
    }
}
