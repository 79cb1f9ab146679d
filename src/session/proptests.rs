//! Property-based tests for session turns
//!
//! Invariants:
//! - N successful turns leave 2N entries alternating user/assistant in order
//! - Clearing at any point empties the transcript and drops the chat handle
//! - Sampling seen by the model only changes across a clear

use super::*;
use crate::llm::testing::MockLlmService;
use crate::llm::{GenerationConfig, MessageRole};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

#[derive(Debug, Clone)]
enum Action {
    Submit(String, SamplingConfig),
    Clear,
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9àéè ?!.,]{0,20}[a-zA-Z0-9àéè?!.,]"
}

fn arb_sampling() -> impl Strategy<Value = SamplingConfig> {
    (0u8..=10, 1u32..=20).prop_map(|(t, len)| SamplingConfig {
        temperature: f32::from(t) / 10.0,
        max_output_length: len * 100,
    })
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (arb_message(), arb_sampling()).prop_map(|(m, s)| Action::Submit(m, s)),
        1 => Just(Action::Clear),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_successful_turns_alternate(messages in prop::collection::vec(arb_message(), 0..12)) {
        let mock = Arc::new(MockLlmService::new("mock"));
        for i in 0..messages.len() {
            mock.queue_reply(format!("reply {i}"));
        }
        let mut session = Session::new(mock.clone());

        block_on(async {
            for message in &messages {
                session.submit(message, SamplingConfig::default()).await.unwrap();
            }
        });

        let entries = session.transcript().entries();
        prop_assert_eq!(entries.len(), 2 * messages.len());
        for (i, pair) in entries.chunks(2).enumerate() {
            prop_assert_eq!(pair[0].role, MessageRole::User);
            prop_assert_eq!(&pair[0].content, messages[i].trim());
            prop_assert_eq!(pair[1].role, MessageRole::Assistant);
            prop_assert_eq!(pair[1].content.clone(), format!("reply {i}"));
            prop_assert!(!pair[1].failed);
        }
        prop_assert_eq!(session.transcript().sent_count(), messages.len());
    }

    #[test]
    fn prop_sampling_only_changes_across_clear(actions in prop::collection::vec(arb_action(), 1..20)) {
        let mock = Arc::new(MockLlmService::new("mock"));
        let submits = actions.iter().filter(|a| matches!(a, Action::Submit(..))).count();
        for _ in 0..submits {
            mock.queue_reply("ok");
        }
        let mut session = Session::new(mock.clone());

        // Expected generation per request: the first submit after a clear wins
        let mut expected: Vec<GenerationConfig> = Vec::new();
        let mut active: Option<SamplingConfig> = None;
        let mut since_clear = 0usize;

        block_on(async {
            for action in &actions {
                match action {
                    Action::Submit(text, sampling) => {
                        let open = *active.get_or_insert(*sampling);
                        expected.push(open.into());
                        session.submit(text, *sampling).await.unwrap();
                        since_clear += 2;
                    }
                    Action::Clear => {
                        session.clear();
                        active = None;
                        since_clear = 0;
                    }
                }
            }
        });

        let seen: Vec<GenerationConfig> = mock.recorded_requests().iter().map(|r| r.generation).collect();
        prop_assert_eq!(seen, expected);
        prop_assert_eq!(session.transcript().len(), since_clear);
        prop_assert_eq!(session.sampling(), active);
    }
}
