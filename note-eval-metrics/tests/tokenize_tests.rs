use note_eval_metrics::tokenize::{ngrams, split_sentences, tokenize};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_tokenize_lowercases_and_splits() {
    assert_eq!(tokenize("The Patient Presents"), words(&["the", "patient", "presents"]));
}

#[test]
fn test_tokenize_strips_surrounding_punctuation() {
    assert_eq!(
        tokenize("Chief complaint: headache, (severe)."),
        words(&["chief", "complaint", "headache", "severe"])
    );
}

#[test]
fn test_tokenize_keeps_interior_punctuation() {
    // Hyphens and apostrophes inside a token are part of the word.
    assert_eq!(tokenize("follow-up wasn't needed"), words(&["follow-up", "wasn't", "needed"]));
}

#[test]
fn test_tokenize_empty_input() {
    assert_eq!(tokenize(""), Vec::<String>::new());
    assert_eq!(tokenize("   \t\n  "), Vec::<String>::new());
}

#[test]
fn test_tokenize_drops_pure_punctuation_tokens() {
    assert_eq!(tokenize("stable . . . discharged"), words(&["stable", "discharged"]));
}

#[test]
fn test_tokenize_unicode_lowercasing() {
    assert_eq!(tokenize("Débridement PERFORMED"), words(&["débridement", "performed"]));
}

#[rstest]
#[case("The cat sat. It was happy.", vec!["The cat sat", "It was happy"])]
#[case("One sentence without terminator", vec!["One sentence without terminator"])]
#[case("Line one\nLine two", vec!["Line one", "Line two"])]
#[case("Really?! Yes.", vec!["Really", "Yes"])]
#[case("", vec![])]
fn test_split_sentences(#[case] text: &str, #[case] expected: Vec<&str>) {
    assert_eq!(split_sentences(text), words(&expected));
}

#[test]
fn test_ngrams_windows() {
    let tokens = words(&["a", "b", "c"]);
    assert_eq!(ngrams(&tokens, 1).len(), 3);
    assert_eq!(ngrams(&tokens, 2), vec![words(&["a", "b"]), words(&["b", "c"])]);
    assert_eq!(ngrams(&tokens, 3).len(), 1);
    assert_eq!(ngrams(&tokens, 4).len(), 0);
    assert_eq!(ngrams(&tokens, 0).len(), 0);
}
