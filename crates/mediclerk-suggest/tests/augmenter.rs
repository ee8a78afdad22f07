use std::sync::Mutex;
use std::time::Duration;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mediclerk_core::models::record::ClerkingNote;
use mediclerk_forms::registry::fields_for;
use mediclerk_suggest::augmenter::{SuggestionAugmenter, SuggestionState};
use mediclerk_suggest::error::SuggestError;
use mediclerk_suggest::{SuggestionRequest, SuggestionService};
use tokio::sync::Notify;

const SPECIALTY: &str = "internal medicine";
const COMPLAINTS: &str = "presenting_complaints";

#[derive(Default)]
struct Scripted {
    calls: AtomicUsize,
    seen: Mutex<Vec<SuggestionRequest>>,
    gate: Option<Notify>,
    fail: bool,
}

impl Scripted {
    fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionService for Scripted {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<String>, SuggestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(SuggestError::Api {
                status: 503,
                message: "model overloaded".into(),
            });
        }
        Ok(vec!["Is the cough productive?".into(), "Any night sweats?".into()])
    }
}

fn snapshot() -> ClerkingNote {
    [
        ("first_name", "John"),
        ("last_name", "Okafor"),
        (COMPLAINTS, "Cough for 2 weeks"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn bound(service: Scripted) -> SuggestionAugmenter<Scripted> {
    let augmenter = SuggestionAugmenter::new(service);
    augmenter.reset(SPECIALTY, fields_for(SPECIALTY));
    augmenter
}

async fn until_loading(augmenter: &SuggestionAugmenter<Scripted>, key: &str) {
    while !augmenter.is_loading(key) {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn second_request_while_pending_makes_no_call() {
    let augmenter = bound(Scripted::gated());
    let values = snapshot();

    let (first, second) = tokio::join!(augmenter.request_suggestions(COMPLAINTS, &values), async {
        until_loading(&augmenter, COMPLAINTS).await;
        let second = augmenter.request_suggestions(COMPLAINTS, &values).await;
        augmenter.service().release();
        second
    });

    assert_eq!(augmenter.service().calls(), 1);
    assert_eq!(first.unwrap().len(), 2);
    assert_eq!(second, None);
    assert!(matches!(augmenter.state(COMPLAINTS), Some(SuggestionState::Shown(_))));
}

#[tokio::test]
async fn request_carries_section_label_and_snapshot() {
    let augmenter = bound(Scripted::default());
    let values = snapshot();

    let questions = augmenter.request_suggestions(COMPLAINTS, &values).await.unwrap();
    assert_eq!(questions[0], "Is the cough productive?");
    assert_eq!(augmenter.suggestions(COMPLAINTS), Some(questions));

    let seen = augmenter.service().seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].specialty, SPECIALTY);
    assert_eq!(seen[0].section, "Presenting Complaints");
    assert_eq!(seen[0].snapshot, values);
}

#[tokio::test]
async fn ineligible_and_unknown_fields_are_ignored() {
    let augmenter = bound(Scripted::default());

    assert_eq!(augmenter.request_suggestions("first_name", &snapshot()).await, None);
    assert_eq!(augmenter.request_suggestions("diagnosis", &snapshot()).await, None);
    assert_eq!(augmenter.request_suggestions("no_such_field", &snapshot()).await, None);
    assert_eq!(augmenter.service().calls(), 0);
    assert_eq!(augmenter.state("first_name"), None);
}

#[tokio::test]
async fn nothing_is_requested_before_a_specialty_is_bound() {
    let augmenter = SuggestionAugmenter::new(Scripted::default());
    assert_eq!(augmenter.request_suggestions(COMPLAINTS, &snapshot()).await, None);
    assert_eq!(augmenter.service().calls(), 0);
}

#[tokio::test]
async fn failure_returns_field_to_idle_and_allows_retry() {
    let augmenter = bound(Scripted::failing());

    assert_eq!(augmenter.request_suggestions(COMPLAINTS, &snapshot()).await, None);
    assert_eq!(augmenter.state(COMPLAINTS), Some(SuggestionState::Idle));

    assert_eq!(augmenter.request_suggestions(COMPLAINTS, &snapshot()).await, None);
    assert_eq!(augmenter.service().calls(), 2);
}

#[tokio::test]
async fn abandoned_request_returns_field_to_idle() {
    let augmenter = bound(Scripted::gated());
    let values = snapshot();

    let outcome = tokio::time::timeout(
        Duration::from_millis(10),
        augmenter.request_suggestions(COMPLAINTS, &values),
    )
    .await;

    assert!(outcome.is_err());
    assert_eq!(augmenter.state(COMPLAINTS), Some(SuggestionState::Idle));
    assert!(!augmenter.is_loading(COMPLAINTS));

    augmenter.service().release();
    assert!(augmenter.request_suggestions(COMPLAINTS, &values).await.is_some());
    assert_eq!(augmenter.service().calls(), 2);
}

#[tokio::test]
async fn clearing_discards_shown_questions_locally() {
    let augmenter = bound(Scripted::default());
    augmenter.request_suggestions(COMPLAINTS, &snapshot()).await.unwrap();

    augmenter.clear_suggestions(COMPLAINTS);
    assert_eq!(augmenter.suggestions(COMPLAINTS), None);
    assert_eq!(augmenter.state(COMPLAINTS), Some(SuggestionState::Idle));
    assert_eq!(augmenter.service().calls(), 1);
}

#[tokio::test]
async fn answers_arriving_after_a_specialty_change_are_dropped() {
    let augmenter = bound(Scripted::gated());
    let values = snapshot();

    let (late, _) = tokio::join!(augmenter.request_suggestions(COMPLAINTS, &values), async {
        until_loading(&augmenter, COMPLAINTS).await;
        augmenter.reset("surgery", fields_for("surgery"));
        augmenter.service().release();
    });

    assert_eq!(late, None);
    assert_eq!(augmenter.state(COMPLAINTS), Some(SuggestionState::Idle));
    assert_eq!(augmenter.suggestions(COMPLAINTS), None);
}

#[tokio::test]
async fn closed_augmenter_ignores_late_answers_and_new_requests() {
    let augmenter = bound(Scripted::gated());
    let values = snapshot();

    let (late, _) = tokio::join!(augmenter.request_suggestions(COMPLAINTS, &values), async {
        until_loading(&augmenter, COMPLAINTS).await;
        augmenter.close();
        augmenter.service().release();
    });

    assert_eq!(late, None);
    assert_eq!(augmenter.state(COMPLAINTS), None);
    assert_eq!(augmenter.request_suggestions(COMPLAINTS, &values).await, None);
    assert_eq!(augmenter.service().calls(), 1);
}
