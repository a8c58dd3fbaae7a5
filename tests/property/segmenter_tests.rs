//! Property-based tests for stream segmentation

use proptest::prelude::*;
use llm_emulator::engine::segment;

proptest! {
    /// Joining the units reproduces the input exactly
    #[test]
    fn test_concatenation_round_trips(text in any::<String>()) {
        let units = segment(&text);
        prop_assert_eq!(units.concat(), text);
    }

    /// No unit is ever empty
    #[test]
    fn test_units_non_empty(text in "\\PC*") {
        for unit in segment(&text) {
            prop_assert!(!unit.is_empty());
        }
    }

    /// Adjacent word units never occur: a word run is a single unit
    #[test]
    fn test_word_runs_are_maximal(words in prop::collection::vec("[a-z]{1,8}", 1..20)) {
        let text = words.join(" ");
        let units = segment(&text);

        prop_assert_eq!(units.len(), words.len() * 2 - 1);
        for pair in units.windows(2) {
            let a_word = pair[0].chars().all(char::is_alphanumeric);
            let b_word = pair[1].chars().all(char::is_alphanumeric);
            prop_assert!(!(a_word && b_word), "adjacent word units {:?}", pair);
        }
    }

    /// Multi-byte characters are never split
    #[test]
    fn test_units_are_char_aligned(text in "[a-zé你😀 ,.!]{0,64}") {
        let units = segment(&text);
        let total: usize = units.iter().map(|u| u.chars().count()).sum();
        prop_assert_eq!(total, text.chars().count());
    }
}

#[test]
fn test_punctuation_stands_alone() {
    assert_eq!(segment("Hi!!"), vec!["Hi", "!", "!"]);
    assert_eq!(segment("a  b"), vec!["a", "  ", "b"]);
    assert!(segment("").is_empty());
}
