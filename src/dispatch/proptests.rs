//! Property-based tests for classification and extraction

use super::*;
use proptest::prelude::*;
use serde_json::json;

// ============================================================================
// Generators
// ============================================================================

/// Lower-case filler text that may or may not contain keywords
fn arb_filler() -> impl Strategy<Value = String> {
    "[a-z ]{0,24}"
}

fn arb_notation() -> impl Strategy<Value = String> {
    (1u32..=100, 2u32..=1000, proptest::option::of(1u32..=100)).prop_map(|(count, sides, keep)| {
        match keep {
            Some(keep) => format!("{count}d{sides}k{keep}"),
            None => format!("{count}d{sides}"),
        }
    })
}

fn arb_request_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        (arb_filler(), arb_filler()).prop_map(|(a, b)| format!("{a} card {b}")),
        (arb_filler(), arb_notation()).prop_map(|(a, n)| format!("{a} {n}")),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_classify_is_total(utterance in any::<String>()) {
        let intent = classify(&utterance);
        prop_assert!(Intent::ALL.contains(&intent));
    }

    #[test]
    fn prop_search_keyword_always_wins(prefix in arb_filler(), suffix in arb_filler()) {
        let utterance = format!("{prefix}search{suffix}");
        prop_assert_eq!(classify(&utterance), Intent::WebSearch);
        prop_assert_eq!(classify(&utterance.to_uppercase()), Intent::WebSearch);
    }

    #[test]
    fn prop_classify_ignores_case(utterance in "[a-zA-Z ]{0,40}") {
        prop_assert_eq!(classify(&utterance), classify(&utterance.to_lowercase()));
    }

    #[test]
    fn prop_dice_notation_recovered_exactly(
        prefix in arb_filler(),
        notation in arb_notation(),
        suffix in arb_filler(),
    ) {
        let utterance = format!("{prefix} {notation} {suffix}");
        match extract(Intent::RollDice, &utterance) {
            Extraction::Invoke(request) => {
                prop_assert_eq!(request.argument("notation"), Some(&json!(notation)));
                prop_assert_eq!(request.argument("num_rolls"), Some(&json!(1)));
            }
            Extraction::ShortCircuit(text) => prop_assert!(false, "short circuit: {}", text),
        }
    }

    #[test]
    fn prop_dice_without_digits_short_circuits(utterance in "[a-z ]{0,40}") {
        prop_assert_eq!(
            extract(Intent::RollDice, &utterance),
            Extraction::ShortCircuit(DICE_NOTATION_HINT.to_string())
        );
    }

    #[test]
    fn prop_password_length_is_first_number(
        prefix in arb_filler(),
        length in 0u64..100_000,
        suffix in arb_filler(),
    ) {
        let utterance = format!("{prefix}{length}{suffix} and 77");
        match extract(Intent::GeneratePassword, &utterance) {
            Extraction::Invoke(request) => {
                prop_assert_eq!(request.argument("length"), Some(&json!(length)));
                prop_assert_eq!(request.argument("include_symbols"), Some(&json!(true)));
            }
            Extraction::ShortCircuit(text) => prop_assert!(false, "short circuit: {}", text),
        }
    }

    #[test]
    fn prop_card_name_is_lowercase_and_trimmed(utterance in "[a-zA-Z ?]{0,40}") {
        match extract(Intent::SearchCardByName, &utterance) {
            Extraction::Invoke(request) => {
                let name = request.argument("card_name").and_then(|v| v.as_str()).unwrap();
                prop_assert_eq!(name, name.trim());
                prop_assert_eq!(name.to_string(), name.to_lowercase());
            }
            Extraction::ShortCircuit(text) => prop_assert!(false, "short circuit: {}", text),
        }
    }

    #[test]
    fn prop_extraction_keeps_intent(utterance in arb_request_utterance()) {
        for intent in Intent::ALL {
            if let Extraction::Invoke(request) = extract(intent, &utterance) {
                prop_assert_eq!(request.intent, intent);
            }
        }
    }
}
