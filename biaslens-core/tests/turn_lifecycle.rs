//! Turn lifecycle driven through the provider pipeline with a scripted provider.

use async_trait::async_trait;
use biaslens_core::critique::PARSE_FAILURE_SUMMARY;
use biaslens_core::provider::{run_turn, Provider};
use biaslens_core::turn::{Conversation, Turn, TurnStatus, TurnUpdate};
use biaslens_core::{Error, ProviderError, Severity};

struct ScriptedProvider {
    answer: Result<String, ProviderError>,
    critique: Result<String, ProviderError>,
}

impl ScriptedProvider {
    fn ok(answer: &str, critique: &str) -> Self {
        Self {
            answer: Ok(answer.to_owned()),
            critique: Ok(critique.to_owned()),
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn answer(&self, _question: &str) -> Result<String, ProviderError> {
        self.answer.clone()
    }

    async fn critique(&self, _question: &str, _answer: &str) -> Result<String, ProviderError> {
        self.critique.clone()
    }
}

const CRITIQUE: &str = r#"```json
{
  "segments": [
    {
      "text": "everyone agrees",
      "issueType": "assumption",
      "severity": "high",
      "shortLabel": "Assumed consensus",
      "detailedAnalysis": "Presents a contested view as universal."
    },
    {
      "text": "not in the answer",
      "issueType": "bias",
      "severity": "low",
      "shortLabel": "Unlocated",
      "detailedAnalysis": "Quote that cannot be found."
    },
    {
      "text": "ignored",
      "issueType": "vibes",
      "severity": "low",
      "shortLabel": "Unknown",
      "detailedAnalysis": "Unknown issue type."
    }
  ],
  "overallSummary": "Leans on consensus.",
  "positiveAspects": "Clear structure."
}
```"#;

async fn ask(conversation: &mut Conversation, provider: &ScriptedProvider, question: &str) -> String {
    let id = conversation.submit(question).expect("submit accepted");
    run_turn(provider, question, |update| {
        conversation.apply(&id, update).expect("legal transition");
    })
    .await;
    id
}

#[tokio::test]
async fn successful_turn_completes_with_located_segments() {
    let provider = ScriptedProvider::ok("Today everyone agrees on this.", CRITIQUE);
    let mut conversation = Conversation::new();
    let id = ask(&mut conversation, &provider, "  Is this settled?  ").await;

    assert!(!conversation.is_processing());
    let turn = conversation.get(&id).unwrap();
    assert_eq!(turn.question, "Is this settled?");
    let critique = turn.critique().expect("complete turn");
    assert_eq!(critique.segments.len(), 2);
    assert_eq!(critique.segments[0].id, "segment-0");
    assert_eq!(critique.segments[0].severity, Severity::High);
    assert_eq!(critique.segments[0].start_index(), 6);
    assert_eq!(critique.segments[1].start_index(), -1);
    assert_eq!(critique.overall_summary, "Leans on consensus.");
    assert_eq!(critique.positive_aspects, "Clear structure.");

    let resolved = turn.resolved_segments();
    assert_eq!(resolved.len(), 1);
    let breakdown = turn.breakdown().unwrap();
    assert_eq!(breakdown.total, 2);
    assert_eq!(breakdown.located, 1);
}

#[tokio::test]
async fn unparseable_critique_still_completes_the_turn() {
    let provider = ScriptedProvider::ok("An answer.", "not json at all");
    let mut conversation = Conversation::new();
    let id = ask(&mut conversation, &provider, "Question?").await;

    let turn = conversation.get(&id).unwrap();
    assert_eq!(turn.answer(), Some("An answer."));
    let critique = turn.critique().expect("complete turn");
    assert!(critique.segments.is_empty());
    assert_eq!(critique.overall_summary, PARSE_FAILURE_SUMMARY);
    assert!(!conversation.is_processing());
}

#[tokio::test]
async fn rejected_credentials_end_the_turn_and_allow_another() {
    let provider = ScriptedProvider {
        answer: Err(ProviderError::InvalidCredentials),
        critique: Ok(String::new()),
    };
    let mut conversation = Conversation::new();
    let id = ask(&mut conversation, &provider, "First?").await;

    match &conversation.get(&id).unwrap().status {
        TurnStatus::Error { message, answer } => {
            assert!(message.starts_with("Invalid API key"));
            assert_eq!(*answer, None);
        }
        other => panic!("expected error, got {other:?}"),
    }
    assert!(!conversation.is_processing());
    assert!(conversation.submit("Second?").is_some());
    assert_eq!(conversation.len(), 2);
}

#[tokio::test]
async fn failed_critique_keeps_the_answer() {
    let provider = ScriptedProvider {
        answer: Ok("Kept answer.".to_owned()),
        critique: Err(ProviderError::RateLimited),
    };
    let mut conversation = Conversation::new();
    let id = ask(&mut conversation, &provider, "Q").await;

    let turn = conversation.get(&id).unwrap();
    assert_eq!(turn.status.name(), "error");
    assert_eq!(turn.answer(), Some("Kept answer."));
    assert!(turn.critique().is_none());
}

#[test]
fn only_one_turn_is_in_flight() {
    let mut conversation = Conversation::new();
    assert!(conversation.submit("first").is_some());
    assert_eq!(conversation.submit("second"), None);
    assert_eq!(conversation.len(), 1);
    assert!(!conversation.clear());
    assert_eq!(conversation.len(), 1);
}

#[test]
fn blank_questions_are_ignored() {
    let mut conversation = Conversation::new();
    assert_eq!(conversation.submit(""), None);
    assert_eq!(conversation.submit(" \n\t "), None);
    assert!(conversation.is_empty());
    assert!(!conversation.is_processing());
}

#[test]
fn out_of_order_updates_are_rejected_without_change() {
    let mut turn = Turn::new("q");
    let err = turn
        .apply(TurnUpdate::Answered("early".to_owned()))
        .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition { from: "pending", to: "critiquing", .. }));
    assert_eq!(turn.status, TurnStatus::Pending);

    turn.apply(TurnUpdate::Failed("boom".to_owned())).unwrap();
    assert!(turn.is_terminal());
    assert!(turn.apply(TurnUpdate::Answering).is_err());
    assert_eq!(turn.status.name(), "error");
}

#[test]
fn unknown_turn_is_reported() {
    let mut conversation = Conversation::new();
    let err = conversation.apply("missing", TurnUpdate::Answering).unwrap_err();
    assert!(matches!(err, Error::UnknownTurn(id) if id == "missing"));
}

#[tokio::test]
async fn selection_toggles_and_clear_drops_history() {
    let provider = ScriptedProvider::ok("Today everyone agrees on this.", CRITIQUE);
    let mut conversation = Conversation::new();
    let id = ask(&mut conversation, &provider, "Q").await;

    assert!(conversation.select_segment(&id, "segment-0").unwrap());
    assert_eq!(
        conversation.get(&id).unwrap().selected_segment.as_deref(),
        Some("segment-0")
    );
    assert!(conversation.select_segment(&id, "segment-0").unwrap());
    assert_eq!(conversation.get(&id).unwrap().selected_segment, None);

    // Unlocated segments have no highlight to activate.
    assert!(!conversation.select_segment(&id, "segment-1").unwrap());
    assert!(!conversation.select_segment(&id, "segment-7").unwrap());

    assert!(conversation.clear());
    assert!(conversation.is_empty());
}
