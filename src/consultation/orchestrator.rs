//! Consultation orchestrator - main coordinator
//!
//! Runs one consultation end to end:
//! - Input validation (fails fast, no external calls)
//! - Casting or accepting a supplied hexagram
//! - Complexity scoring, model routing and prompt construction
//! - Cache lookup before any provider call
//! - Provider call under a deadline, response validation, cost recording
//! - Deterministic fallback when the provider fails or is rejected
//! - Persistence through the store collaborator
//!
//! Side effects per consultation: exactly one cache read, at most one
//! provider call, at most one cost record, at most one cache write and
//! exactly one store write on the success path.

use crate::cache::{CacheKeyGenerator, CacheStats, InterpretationCache};
use crate::consultation::state::ConsultationState;
use crate::consultation::store::ConsultationStore;
use crate::consultation::types::{
    ConsultationContext, ConsultationMetadata, ConsultationOutcome, ConsultationRequest,
    NewConsultation,
};
use crate::cost::{CostConfig, CostTracker};
use crate::errors::{ConsultationError, Result};
use crate::hexagram::{CastingMethod, Hexagram, HexagramCaster};
use crate::interpretation::{
    parse_model_response, AIInterpretation, ComplexityScorer, FallbackGenerator,
    InterpretationSource, ModelChoice, ModelSelector, ResponseValidator,
};
use crate::llm::LlmClient;
use crate::prompt::{PromptBuilder, PromptStrategy, TokenCounter};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Deadline for a single provider call
    pub llm_timeout: Duration,

    /// Complexity at or above which the standard prompt is used
    pub compression_threshold: f64,

    /// Complexity at or above which the premium tier is used
    pub selection_threshold: f64,

    pub economy_model: String,
    pub premium_model: String,

    pub cache_ttl: Duration,
    pub cache_max_entries: usize,

    pub costs: CostConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            llm_timeout: Duration::from_secs(12),
            compression_threshold: 0.6,
            selection_threshold: crate::interpretation::selector::DEFAULT_SELECTION_THRESHOLD,
            economy_model: crate::interpretation::selector::DEFAULT_ECONOMY_MODEL.to_string(),
            premium_model: crate::interpretation::selector::DEFAULT_PREMIUM_MODEL.to_string(),
            cache_ttl: crate::cache::store::DEFAULT_TTL,
            cache_max_entries: crate::cache::store::DEFAULT_MAX_ENTRIES,
            costs: CostConfig::default(),
        }
    }
}

/// Main consultation orchestrator
pub struct ConsultationOrchestrator {
    /// Current pipeline state
    state: ConsultationState,

    caster: HexagramCaster,
    scorer: ComplexityScorer,
    selector: ModelSelector,
    prompts: PromptBuilder,
    counter: TokenCounter,
    keys: CacheKeyGenerator,
    validator: ResponseValidator,
    fallback: FallbackGenerator,

    /// Accepted interpretations by cache key
    cache: InterpretationCache,

    /// Spend on provider calls
    costs: CostTracker,

    /// Provider collaborator
    llm: Arc<dyn LlmClient>,

    /// Persistence collaborator
    store: Arc<dyn ConsultationStore>,

    config: OrchestratorConfig,
}

impl ConsultationOrchestrator {
    /// Create orchestrator with default configuration
    pub fn new(llm: Arc<dyn LlmClient>, store: Arc<dyn ConsultationStore>) -> Self {
        Self::with_config(llm, store, OrchestratorConfig::default())
    }

    /// Create orchestrator with custom configuration
    pub fn with_config(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn ConsultationStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            state: ConsultationState::Idle,
            caster: HexagramCaster::new(),
            scorer: ComplexityScorer::new(),
            selector: ModelSelector::with_models(
                config.selection_threshold,
                &config.economy_model,
                &config.premium_model,
            ),
            prompts: PromptBuilder::new(),
            counter: TokenCounter::new(),
            keys: CacheKeyGenerator::new(),
            validator: ResponseValidator::new(),
            fallback: FallbackGenerator::new(),
            cache: InterpretationCache::with_limits(config.cache_ttl, config.cache_max_entries),
            costs: CostTracker::with_config(config.costs.clone()),
            llm,
            store,
            config,
        }
    }

    /// Replace the caster, e.g. with a seeded one for reproducible runs
    pub fn with_caster(mut self, caster: HexagramCaster) -> Self {
        self.caster = caster;
        self
    }

    /// Get current state
    pub fn state(&self) -> ConsultationState {
        self.state
    }

    pub fn cost_tracker(&self) -> &CostTracker {
        &self.costs
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Clear the cache and zero the cost tracker
    pub fn reset_metrics(&mut self) {
        self.cache.clear();
        self.costs.reset();
    }

    /// Transition to new state
    fn transition(&mut self, next: ConsultationState) -> Result<()> {
        let new_state = self.state.transition(next)?;
        debug!(from = ?self.state, to = ?new_state, "consultation state");
        self.state = new_state;
        Ok(())
    }

    /// Run one consultation
    ///
    /// Errors only for invalid input (`EmptyQuestion`, `MissingUserId`,
    /// `InvalidHexagram`) or a failed store write (`CreationFailed`).
    /// Provider problems always resolve to a fallback interpretation.
    pub async fn create_consultation(
        &mut self,
        request: ConsultationRequest,
    ) -> Result<ConsultationOutcome> {
        if self.state != ConsultationState::Idle {
            // Previous run ended in Done or Failed
            self.state = ConsultationState::Idle;
        }

        match self.run(request).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                if !self.state.is_terminal() {
                    self.state = ConsultationState::Failed;
                }
                warn!(error = %err, "consultation failed");
                Err(err)
            }
        }
    }

    async fn run(&mut self, request: ConsultationRequest) -> Result<ConsultationOutcome> {
        self.transition(ConsultationState::Validating)?;

        let question = request.question.trim().to_string();
        if question.is_empty() {
            return Err(ConsultationError::EmptyQuestion);
        }

        let user_id = request.user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(ConsultationError::MissingUserId);
        }

        let (hexagram, default_method) = match request.hexagram {
            Some(supplied) => {
                supplied.validate()?;
                self.transition(ConsultationState::UsingSuppliedHexagram)?;
                (supplied, CastingMethod::ManualEntry)
            }
            None => {
                self.transition(ConsultationState::Casting)?;
                (self.caster.cast(), CastingMethod::DigitalCoins)
            }
        };

        let mut metadata = request
            .metadata
            .unwrap_or_else(|| ConsultationMetadata::new(default_method));

        let context = ConsultationContext {
            question,
            hexagram,
            timestamp: Utc::now(),
            method: metadata.method,
        };
        debug!(
            hexagram = context.hexagram.number,
            changing = %context.hexagram.changing_lines_label(),
            method = %context.method,
            "hexagram ready"
        );

        self.transition(ConsultationState::ScoringComplexity)?;
        let complexity = self
            .scorer
            .score(&context.question, context.hexagram.changing_lines.len());

        self.transition(ConsultationState::SelectingModel)?;
        let choice = self.selector.choose(complexity);

        self.transition(ConsultationState::BuildingPrompt)?;
        let strategy =
            PromptStrategy::for_complexity(complexity, self.config.compression_threshold);
        let prompt = self
            .prompts
            .build(strategy, &context.hexagram, &context.question);

        self.transition(ConsultationState::CheckingCache)?;
        let cache_key = self.keys.key(&context.hexagram, &context.question);

        let (interpretation, source) = match self.cache.get(&cache_key) {
            Some(cached) => {
                self.transition(ConsultationState::CacheHit)?;
                info!(key = %cache_key, "interpretation served from cache");
                (cached, InterpretationSource::Cache)
            }
            None => {
                self.transition(ConsultationState::CallingModel)?;
                self.interpret(&context.hexagram, &choice, &prompt, &cache_key)
                    .await?
            }
        };

        self.transition(ConsultationState::Persisting)?;
        metadata.source = Some(source);
        metadata.model = match source {
            InterpretationSource::Model => Some(choice.model.clone()),
            _ => None,
        };

        let record = NewConsultation {
            user_id,
            question: context.question.clone(),
            hexagram: context.hexagram.clone(),
            interpretation: interpretation.clone(),
            metadata,
            tags: Vec::new(),
            notes: None,
        };

        let consultation = self
            .store
            .save(record)
            .await
            .map_err(|e| ConsultationError::CreationFailed(e.to_string()))?;

        self.transition(ConsultationState::Done)?;
        info!(
            id = %consultation.id,
            hexagram = context.hexagram.number,
            source = %source,
            tier = %choice.tier,
            complexity,
            "consultation created"
        );

        Ok(ConsultationOutcome {
            consultation,
            hexagram: context.hexagram,
            interpretation,
            source,
            model: choice,
            complexity,
            strategy,
            cache_key,
        })
    }

    /// Call the provider and turn whatever comes back into an interpretation
    async fn interpret(
        &mut self,
        hexagram: &Hexagram,
        choice: &ModelChoice,
        prompt: &str,
        cache_key: &str,
    ) -> Result<(AIInterpretation, InterpretationSource)> {
        let system_prompt = self.prompts.system_prompt();
        let deadline = self.config.llm_timeout;

        let call = self.llm.complete(&choice.model, prompt, system_prompt);
        let reply = match tokio::time::timeout(deadline, call).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                warn!(model = %choice.model, error = %err, "provider call failed, using fallback");
                return self.use_fallback(hexagram);
            }
            Err(_) => {
                let err = ConsultationError::Timeout {
                    duration_ms: deadline.as_millis() as u64,
                };
                warn!(model = %choice.model, error = %err, "provider call timed out, using fallback");
                return self.use_fallback(hexagram);
            }
        };

        self.transition(ConsultationState::ValidatingResponse)?;
        let parsed = parse_model_response(&reply.content);

        // The provider answered, so the call is billed whatever the verdict
        self.transition(ConsultationState::RecordingCost)?;
        let tokens = reply.tokens_used.unwrap_or_else(|| {
            self.counter
                .estimate_batch(&[prompt, system_prompt, reply.content.as_str()])
        });
        let cost = self.costs.add_cost(tokens, choice.tier);
        debug!(tokens, cost, tier = %choice.tier, "recorded provider cost");

        match parsed {
            Ok(candidate) => {
                let verdict = self.validator.check(&candidate);
                if verdict.is_accepted() {
                    self.cache.insert(cache_key.to_string(), candidate.clone());
                    Ok((candidate, InterpretationSource::Model))
                } else {
                    warn!(reason = %verdict, "model response rejected, using fallback");
                    self.use_fallback(hexagram)
                }
            }
            Err(err) => {
                warn!(error = %err, "model response malformed, using fallback");
                self.use_fallback(hexagram)
            }
        }
    }

    fn use_fallback(
        &mut self,
        hexagram: &Hexagram,
    ) -> Result<(AIInterpretation, InterpretationSource)> {
        self.transition(ConsultationState::FallbackInterpretation)?;
        Ok((
            self.fallback.generate(hexagram),
            InterpretationSource::Fallback,
        ))
    }
}
