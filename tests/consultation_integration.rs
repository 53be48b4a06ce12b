//! Consultation pipeline integration tests
//!
//! Drives the orchestrator end to end with scripted provider and store doubles.

use async_trait::async_trait;
use ichingsage::consultation::{
    ConsultationOrchestrator, ConsultationRequest, ConsultationState, ConsultationStore,
    InMemoryConsultationStore, NewConsultation, OrchestratorConfig,
};
use ichingsage::interpretation::{InterpretationSource, ModelTier, ResponseValidator};
use ichingsage::llm::{LlmClient, LlmResponse};
use ichingsage::prompt::PromptStrategy;
use ichingsage::{Consultation, ConsultationError, Hexagram, HexagramCaster, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const CAREER_QUESTION: &str = "What should I focus on in my career?";

const DEEP_QUESTION: &str = "What is the deeper meaning and purpose of my spiritual journey, \
    and how can I align my life path with my true destiny?";

const WISE_REPLY: &str = r#"```json
{
  "interpretation": "This hexagram reveals deep wisdom about the path ahead and invites patient reflection.",
  "guidance": "Consider where steady effort may serve you better than haste.",
  "practicalAdvice": "Set one modest goal for the coming month.",
  "culturalContext": "Traditional commentators read this figure as a time of gathering strength."
}
```"#;

/// One scripted provider outcome
#[derive(Clone)]
enum Script {
    Reply(String),
    Fail,
}

/// Provider double that records every call it receives
struct ScriptedLlm {
    script: Script,
    calls: AtomicUsize,
    models: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            models: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_model(&self) -> Option<String> {
        self.models.lock().unwrap().last().cloned()
    }

    fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, model: &str, prompt: &str, _system: &str) -> Result<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(model.to_string());
        self.prompts.lock().unwrap().push(prompt.to_string());

        match &self.script {
            Script::Reply(text) => Ok(LlmResponse::new(text.clone())),
            Script::Fail => Err(ConsultationError::LlmError("503 Service Unavailable".to_string())),
        }
    }
}

/// Store double that counts writes and can be told to fail them
struct RecordingStore {
    inner: InMemoryConsultationStore,
    saves: AtomicUsize,
    fail_with: Option<String>,
}

impl RecordingStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryConsultationStore::new(),
            saves: AtomicUsize::new(0),
            fail_with: None,
        })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryConsultationStore::new(),
            saves: AtomicUsize::new(0),
            fail_with: Some(message.to_string()),
        })
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConsultationStore for RecordingStore {
    async fn save(&self, record: NewConsultation) -> Result<Consultation> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(ConsultationError::Storage(message.clone())),
            None => self.inner.save(record).await,
        }
    }

    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<Consultation>> {
        self.inner.fetch_by_id(id).await
    }

    async fn fetch_by_user(&self, user_id: &str, limit: usize) -> Result<Vec<Consultation>> {
        self.inner.fetch_by_user(user_id, limit).await
    }

    async fn update_notes(&self, id: Uuid, notes: Option<String>) -> Result<Consultation> {
        self.inner.update_notes(id, notes).await
    }

    async fn update_tags(&self, id: Uuid, tags: Vec<String>) -> Result<Consultation> {
        self.inner.update_tags(id, tags).await
    }

    async fn archive(&self, id: Uuid) -> Result<Consultation> {
        self.inner.archive(id).await
    }
}

fn orchestrator(llm: Arc<ScriptedLlm>, store: Arc<RecordingStore>) -> ConsultationOrchestrator {
    ConsultationOrchestrator::new(llm, store).with_caster(HexagramCaster::with_seed(2024))
}

#[tokio::test]
async fn test_end_to_end_consultation() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    let outcome = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1"))
        .await
        .unwrap();

    assert_eq!(outcome.consultation.question, CAREER_QUESTION);
    assert!((1..=64).contains(&outcome.hexagram.number));
    assert!(!outcome.interpretation.interpretation.is_empty());
    assert_eq!(outcome.source, InterpretationSource::Model);
    assert_eq!(
        outcome.interpretation.practical_advice.as_deref(),
        Some("Set one modest goal for the coming month.")
    );

    // The prompt carries the reading and the question
    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains(&outcome.hexagram.to_string()));
    assert!(prompt.contains(CAREER_QUESTION));

    assert_eq!(store.saves(), 1);
    let stored = store.fetch_by_id(outcome.consultation.id).await.unwrap();
    assert_eq!(stored, Some(outcome.consultation.clone()));
    assert_eq!(orch.state(), ConsultationState::Done);
}

#[tokio::test]
async fn test_empty_question_rejected_before_any_side_effect() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    for _ in 0..2 {
        let err = orch
            .create_consultation(ConsultationRequest::new("", "u1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Question cannot be empty");
    }

    assert_eq!(llm.calls(), 0);
    assert_eq!(store.saves(), 0);
    assert_eq!(orch.cache_stats().misses, 0);
    assert_eq!(orch.cost_tracker().get_consultation_count(), 0);
}

#[tokio::test]
async fn test_provider_failure_still_persists_fallback() {
    let llm = ScriptedLlm::new(Script::Fail);
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    let outcome = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1"))
        .await
        .unwrap();

    assert_eq!(outcome.source, InterpretationSource::Fallback);
    assert!(!outcome.interpretation.interpretation.is_empty());
    assert!(ResponseValidator::new().is_valid(&outcome.interpretation));

    assert_eq!(llm.calls(), 1);
    assert_eq!(store.saves(), 1);
    assert_eq!(
        outcome.consultation.metadata.source,
        Some(InterpretationSource::Fallback)
    );
    assert_eq!(outcome.consultation.metadata.model, None);

    // Network failures are not billed and fallbacks are not cached
    assert_eq!(orch.cost_tracker().get_total_cost(), 0.0);
    assert_eq!(orch.cache_stats().entries, 0);
}

#[tokio::test]
async fn test_identical_question_served_from_cache() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());
    let hexagram = Hexagram::from_values([7, 8, 9, 7, 8, 8]).unwrap();

    let first = orch
        .create_consultation(
            ConsultationRequest::new("What about my career?", "u1").with_hexagram(hexagram.clone()),
        )
        .await
        .unwrap();
    let spent = orch.cost_tracker().get_total_cost();
    assert!(spent > 0.0);

    let second = orch
        .create_consultation(
            ConsultationRequest::new("what   about  my  career", "u2").with_hexagram(hexagram),
        )
        .await
        .unwrap();

    assert_eq!(second.source, InterpretationSource::Cache);
    assert_eq!(second.cache_key, first.cache_key);
    assert_eq!(second.interpretation, first.interpretation);

    // Hits are free
    assert_eq!(llm.calls(), 1);
    assert_eq!(orch.cost_tracker().get_total_cost(), spent);
    assert_eq!(orch.cost_tracker().get_consultation_count(), 1);

    // Both consultations are still recorded
    assert_eq!(store.saves(), 2);
    assert_eq!(second.consultation.user_id, "u2");
}

#[tokio::test]
async fn test_different_changing_lines_miss_cache() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let mut orch = orchestrator(llm.clone(), RecordingStore::new());

    let moving_first = Hexagram::from_values([6, 8, 7, 7, 8, 8]).unwrap();
    let moving_second = Hexagram::from_values([8, 6, 7, 7, 8, 8]).unwrap();

    for hexagram in [moving_first, moving_second] {
        orch.create_consultation(
            ConsultationRequest::new("Where does this lead?", "u1").with_hexagram(hexagram),
        )
        .await
        .unwrap();
    }

    assert_eq!(llm.calls(), 2);
    assert_eq!(orch.cache_stats().entries, 2);
}

#[tokio::test]
async fn test_rejected_response_is_billed_but_not_cached() {
    let llm = ScriptedLlm::new(Script::Reply(
        "This is fake and I cannot predict anything.".to_string(),
    ));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    let outcome = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1"))
        .await
        .unwrap();

    assert_eq!(outcome.source, InterpretationSource::Fallback);
    assert!(ResponseValidator::new().is_valid(&outcome.interpretation));
    assert_eq!(orch.cost_tracker().get_consultation_count(), 1);
    assert!(orch.cost_tracker().get_total_cost() > 0.0);
    assert_eq!(orch.cache_stats().entries, 0);
    assert_eq!(store.saves(), 1);
}

#[tokio::test]
async fn test_malformed_reply_is_billed_but_not_cached() {
    for reply in ["", "{\"interpretation\": "] {
        let llm = ScriptedLlm::new(Script::Reply(reply.to_string()));
        let store = RecordingStore::new();
        let mut orch = orchestrator(llm.clone(), store.clone());

        let outcome = orch
            .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1"))
            .await
            .unwrap();

        assert_eq!(outcome.source, InterpretationSource::Fallback, "reply {:?}", reply);
        assert!(ResponseValidator::new().is_valid(&outcome.interpretation));
        assert_eq!(llm.calls(), 1);
        assert_eq!(orch.cost_tracker().get_consultation_count(), 1);
        assert_eq!(orch.cache_stats().entries, 0);
        assert_eq!(store.saves(), 1);
    }
}

#[tokio::test]
async fn test_prose_wrapped_json_reply_is_accepted() {
    let reply = format!("Here is your reading:\n\n{}\n\nMay it serve you well.", WISE_REPLY);
    let llm = ScriptedLlm::new(Script::Reply(reply));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    let outcome = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1"))
        .await
        .unwrap();

    assert_eq!(outcome.source, InterpretationSource::Model);
    assert!(!outcome.interpretation.interpretation.contains("Here is your reading"));
    assert!(outcome.interpretation.guidance.is_some());
    assert_eq!(orch.cache_stats().entries, 1);
}

#[tokio::test]
async fn test_persistence_failure_is_wrapped() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let store = RecordingStore::failing("database unavailable");
    let mut orch = orchestrator(llm, store.clone());

    let err = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsultationError::CreationFailed(_)));
    assert_eq!(
        err.to_string(),
        "Consultation creation failed: database unavailable"
    );
    assert_eq!(store.saves(), 1);
    assert_eq!(orch.state(), ConsultationState::Failed);
}

#[tokio::test]
async fn test_simple_question_routes_to_economy_tier() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let mut orch = orchestrator(llm.clone(), RecordingStore::new());
    let stable = Hexagram::from_values([7, 8, 7, 8, 7, 8]).unwrap();

    let outcome = orch
        .create_consultation(ConsultationRequest::new("Quick advice?", "u1").with_hexagram(stable))
        .await
        .unwrap();

    assert!(outcome.complexity < 0.5);
    assert_eq!(outcome.model.tier, ModelTier::Economy);
    assert_eq!(outcome.strategy, PromptStrategy::Compressed);
    assert_eq!(llm.last_model().as_deref(), Some("gpt-3.5-turbo"));
    assert_eq!(
        outcome.consultation.metadata.model.as_deref(),
        Some("gpt-3.5-turbo")
    );
}

#[tokio::test]
async fn test_deep_question_routes_to_premium_tier() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let mut orch = orchestrator(llm.clone(), RecordingStore::new());
    let moving = Hexagram::from_values([6, 9, 6, 9, 7, 8]).unwrap();

    let outcome = orch
        .create_consultation(ConsultationRequest::new(DEEP_QUESTION, "u1").with_hexagram(moving))
        .await
        .unwrap();

    assert!(outcome.complexity >= 0.6);
    assert_eq!(outcome.model.tier, ModelTier::Premium);
    assert_eq!(outcome.strategy, PromptStrategy::Standard);
    assert_eq!(llm.last_model().as_deref(), Some("gpt-4-turbo"));

    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("Relating hexagram"));
    assert!(prompt.contains("changing lines: 1, 2, 3, 4"));
}

#[tokio::test]
async fn test_supplied_hexagram_is_not_recast() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let mut orch = orchestrator(llm, RecordingStore::new());
    let supplied = Hexagram::from_values([9, 7, 7, 8, 8, 8]).unwrap();

    let outcome = orch
        .create_consultation(
            ConsultationRequest::new(CAREER_QUESTION, "u1").with_hexagram(supplied.clone()),
        )
        .await
        .unwrap();

    assert_eq!(outcome.hexagram, supplied);
    assert_eq!(outcome.consultation.hexagram.changing_lines, vec![1]);
}

#[tokio::test]
async fn test_inconsistent_supplied_hexagram_rejected() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    let mut tampered = Hexagram::from_values([7, 7, 7, 7, 7, 7]).unwrap();
    tampered.number = 2;

    let err = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1").with_hexagram(tampered))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsultationError::InvalidHexagram(_)));
    assert_eq!(llm.calls(), 0);
    assert_eq!(store.saves(), 0);
}

#[tokio::test]
async fn test_misnamed_supplied_hexagram_rejected() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let store = RecordingStore::new();
    let mut orch = orchestrator(llm.clone(), store.clone());

    let mut renamed = Hexagram::from_values([7, 7, 7, 7, 7, 7]).unwrap();
    renamed.name = "Totally Bogus".to_string();

    let err = orch
        .create_consultation(ConsultationRequest::new(CAREER_QUESTION, "u1").with_hexagram(renamed))
        .await
        .unwrap_err();

    assert!(matches!(err, ConsultationError::InvalidHexagram(_)));
    assert_eq!(llm.calls(), 0);
    assert_eq!(store.saves(), 0);
    assert_eq!(orch.cache_stats().entries, 0);
}

#[tokio::test]
async fn test_isolated_orchestrators_do_not_share_state() {
    let llm = ScriptedLlm::new(Script::Reply(WISE_REPLY.to_string()));
    let hexagram = Hexagram::from_values([7, 7, 8, 8, 7, 8]).unwrap();

    let mut first = orchestrator(llm.clone(), RecordingStore::new());
    let mut second = ConsultationOrchestrator::with_config(
        llm.clone(),
        RecordingStore::new(),
        OrchestratorConfig::default(),
    );

    for orch in [&mut first, &mut second] {
        let outcome = orch
            .create_consultation(
                ConsultationRequest::new(CAREER_QUESTION, "u1").with_hexagram(hexagram.clone()),
            )
            .await
            .unwrap();
        assert_eq!(outcome.source, InterpretationSource::Model);
    }

    assert_eq!(llm.calls(), 2);
}
