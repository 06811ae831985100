//! Property-based tests for the turn state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::dispatch::Intent;
use crate::tools::ToolError;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Drive a whole turn with a scripted tool outcome, returning the final
/// phase, every effect produced, and how many tool calls were requested.
fn drive(utterance: &str, outcome: &Result<String, ToolError>) -> (TurnPhase, Vec<Effect>, usize) {
    let context = TurnContext::new(utterance);
    let mut state = TurnPhase::Start;
    let mut effects = Vec::new();
    let mut invocations = 0;
    let mut event = Event::Advance;

    for _ in 0..8 {
        let result = transition(&state, &context, event).expect("valid transition");
        state = result.new_state;
        let requested = result
            .effects
            .iter()
            .any(|e| matches!(e, Effect::InvokeTool { .. }));
        effects.extend(result.effects);
        if state.is_terminal() {
            break;
        }
        event = if requested {
            invocations += 1;
            Event::tool_complete(outcome.clone())
        } else {
            Event::Advance
        };
    }

    (state, effects, invocations)
}

fn replies(effects: &[Effect]) -> Vec<&str> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::AppendAssistant { text } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_tool_error() -> impl Strategy<Value = ToolError> {
    prop_oneof![
        "[a-z_]{1,20}".prop_map(ToolError::NotFound),
        "[a-zA-Z ]{0,30}".prop_map(ToolError::InvalidInput),
        (400u16..600, "[a-zA-Z ]{0,30}")
            .prop_map(|(status, message)| ToolError::Upstream { status, message }),
        "[a-zA-Z ]{0,30}".prop_map(ToolError::Failed),
    ]
}

fn arb_outcome() -> impl Strategy<Value = Result<String, ToolError>> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,40}".prop_map(Ok),
        arb_tool_error().prop_map(Err),
    ]
}

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        Just("roll some dice".to_string()),
        Just("Roll 2d20k1".to_string()),
        Just("Tell me about the MTG set DOM".to_string()),
        Just("what is the newest magic set?".to_string()),
        Just("Generate a password with 16 characters".to_string()),
        "[a-z ]{0,30}",
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_every_turn_ends_done_with_one_reply(
        utterance in arb_utterance(),
        outcome in arb_outcome(),
    ) {
        let (state, effects, invocations) = drive(&utterance, &outcome);
        prop_assert_eq!(state, TurnPhase::Done);
        prop_assert_eq!(replies(&effects).len(), 1);
        prop_assert!(invocations <= 1);
    }

    #[test]
    fn prop_intent_set_before_invocation(
        utterance in arb_utterance(),
        outcome in arb_outcome(),
    ) {
        let (_, effects, _) = drive(&utterance, &outcome);
        prop_assert!(matches!(effects.first(), Some(Effect::SetIntent(_))));
    }

    #[test]
    fn prop_failures_reply_with_apology_and_record_nothing(
        utterance in arb_utterance(),
        error in arb_tool_error(),
    ) {
        let (_, effects, invocations) = drive(&utterance, &Err(error.clone()));
        let reply = replies(&effects)[0];
        prop_assert!(!effects.iter().any(|e| matches!(e, Effect::RecordResult { .. })), "unexpected RecordResult effect");
        if invocations == 1 {
            prop_assert_eq!(reply, format!("Sorry, I encountered an error: {error}"));
        }
    }

    #[test]
    fn prop_success_wraps_output_with_tool_name(
        utterance in arb_utterance(),
        output in "[a-zA-Z0-9 ]{0,40}",
    ) {
        let (_, effects, invocations) = drive(&utterance, &Ok(output.clone()));
        if invocations == 1 {
            let Some(Effect::SetIntent(intent)) = effects.first() else {
                return Err(TestCaseError::fail("missing intent"));
            };
            let expected = format!("I used the {} tool to help you:\n\n{output}", intent.tool_name());
            prop_assert_eq!(replies(&effects)[0], expected.as_str());
            prop_assert!(effects.contains(&Effect::RecordResult { intent: *intent, output }), "missing RecordResult effect");
        }
    }

    #[test]
    fn prop_done_rejects_every_event(outcome in arb_outcome()) {
        let context = TurnContext::new("anything");
        prop_assert!(transition(&TurnPhase::Done, &context, Event::Advance).is_err());
        prop_assert!(transition(&TurnPhase::Done, &context, Event::tool_complete(outcome)).is_err());
    }

    #[test]
    fn prop_classification_matches_dispatcher(utterance in any::<String>()) {
        let result = transition(&TurnPhase::Start, &TurnContext::new(&utterance), Event::Advance)
            .expect("start always advances");
        let intent = crate::dispatch::classify(&utterance);
        prop_assert_eq!(result.new_state, TurnPhase::Classified { intent });
        prop_assert!(Intent::ALL.contains(&intent));
    }
}
