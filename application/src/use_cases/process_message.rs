//! Process Message use case.
//!
//! Drives one user message through the orchestration loop:
//!
//! ```text
//! classify → detect tools → execute (join) → synthesize → validate
//!     → [one correction per domain] → [follow-ups ≤ N] → finalize
//! ```
//!
//! Tool failures never abort a run; they are narrated to the model. Any
//! language-model failure ends the run with a fixed apology and leaves the
//! conversation memory untouched.

use crate::config::AssistantParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use futures::FutureExt;
use futures::future::join_all;
use serde::{Serialize, Serializer};
use serde_json::json;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use tripwise_domain::intent::follow_up::follow_up_marker;
use tripwise_domain::util::truncate_str;
use tripwise_domain::{
    ConversationMemory, DomainError, IntentScore, Message, OrchestrationState, PromptTemplate,
    QueryCategory, ResponseValidator, ToolCall, ToolDetector, ToolError, ToolInvocation, ToolName,
    ToolResult, Turn, ValidationDomain, classify_query, correction_directive,
};

/// Reply given to the user when the language model cannot be reached.
pub const DECLINE_MESSAGE: &str =
    "I'm sorry, I wasn't able to answer that right now. Please try again in a moment.";

/// A successful run's answer and metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub content: String,
    /// One entry per executed tool call, in execution order
    pub tools_used: Vec<ToolName>,
    /// Language-model calls plus tool invocations
    pub steps: usize,
    pub duration_ms: u64,
    pub intent: QueryCategory,
    /// Domains that triggered a corrective re-invocation
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub corrections: Vec<ValidationDomain>,
    #[serde(skip_serializing_if = "is_zero")]
    pub follow_up_iterations: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Result of processing one message.
///
/// Serializes as `{success: true, content, toolsUsed, steps, durationMs, ..}`
/// or `{success: false, error, details}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Answered(AssistantReply),
    Declined { error: String, details: String },
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Answered(_))
    }

    /// Text to show the user: the answer or the apology.
    pub fn content(&self) -> &str {
        match self {
            ProcessOutcome::Answered(reply) => &reply.content,
            ProcessOutcome::Declined { error, .. } => error,
        }
    }

    pub fn reply(&self) -> Option<&AssistantReply> {
        match self {
            ProcessOutcome::Answered(reply) => Some(reply),
            ProcessOutcome::Declined { .. } => None,
        }
    }
}

impl Serialize for ProcessOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Answered<'a> {
            success: bool,
            #[serde(flatten)]
            reply: &'a AssistantReply,
        }

        #[derive(Serialize)]
        struct Declined<'a> {
            success: bool,
            error: &'a str,
            details: &'a str,
        }

        match self {
            ProcessOutcome::Answered(reply) => Answered {
                success: true,
                reply,
            }
            .serialize(serializer),
            ProcessOutcome::Declined { error, details } => Declined {
                success: false,
                error,
                details,
            }
            .serialize(serializer),
        }
    }
}

/// Per-run aggregate, discarded when the run returns.
#[derive(Debug)]
pub struct RunContext {
    pub message: String,
    pub intent: IntentScore,
    pub invocations: Vec<ToolInvocation>,
    /// Prompt of the latest synthesis call
    pub messages: Vec<Message>,
    pub llm_calls: usize,
    pub corrected: Vec<ValidationDomain>,
    pub follow_up_iterations: usize,
    pub state: OrchestrationState,
    started: Instant,
}

impl RunContext {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            intent: IntentScore {
                category: QueryCategory::General,
                score: 0,
            },
            invocations: Vec::new(),
            messages: Vec::new(),
            llm_calls: 0,
            corrected: Vec::new(),
            follow_up_iterations: 0,
            state: OrchestrationState::Idle,
            started: Instant::now(),
        }
    }

    fn transition(&mut self, next: OrchestrationState, progress: &dyn ProgressNotifier) {
        if !self.state.can_transition_to(next) {
            warn!("Unexpected state transition {} -> {}", self.state, next);
        }
        debug!("State: {} -> {}", self.state, next);
        self.state = next;
        progress.on_state(next);
    }

    fn has_executed(&self, call: &ToolCall) -> bool {
        self.invocations.iter().any(|inv| inv.call == *call)
    }

    fn tools_used(&self) -> Vec<ToolName> {
        self.invocations.iter().map(|inv| inv.tool()).collect()
    }

    fn steps(&self) -> usize {
        self.llm_calls + self.invocations.len()
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Use case for answering one user message.
///
/// Owns the conversation memory of a single chat session; callers must not
/// run two messages through the same instance concurrently.
pub struct ProcessMessageUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    params: AssistantParams,
    memory: ConversationMemory,
    detector: ToolDetector,
    validator: ResponseValidator,
}

impl ProcessMessageUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        params: AssistantParams,
    ) -> Result<Self, DomainError> {
        let memory = ConversationMemory::new(params.history_window)?;
        let detector = ToolDetector::new(params.default_origin.clone())
            .with_history_scan_turns(params.history_scan_turns);
        Ok(Self {
            gateway,
            tool_executor,
            conversation_logger: Arc::new(NoConversationLogger),
            params,
            memory,
            detector,
            validator: ResponseValidator::new(),
        })
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn model_name(&self) -> &str {
        self.gateway.model_name()
    }

    /// Conversation so far, oldest first.
    pub fn history(&self) -> Vec<Turn> {
        self.memory.history()
    }

    pub fn clear_history(&mut self) {
        self.memory.clear();
        info!("Conversation history cleared");
    }

    /// Answer `text`, updating the conversation memory on success.
    pub async fn process_message(
        &mut self,
        text: &str,
        progress: &dyn ProgressNotifier,
    ) -> ProcessOutcome {
        info!("Processing message: {}", truncate_str(text, 100));
        self.log(
            ConversationEventKind::UserMessage,
            json!({ "text": text, "history_turns": self.memory.len() }),
        );

        let mut ctx = RunContext::new(text);
        match self.run(&mut ctx, progress).await {
            Ok(answer) => {
                self.memory.append(Turn::human(text));
                self.memory.append(Turn::assistant(answer.clone()));
                ctx.transition(OrchestrationState::Idle, progress);

                let reply = AssistantReply {
                    content: answer,
                    tools_used: ctx.tools_used(),
                    steps: ctx.steps(),
                    duration_ms: ctx.elapsed_ms(),
                    intent: ctx.intent.category,
                    corrections: ctx.corrected.clone(),
                    follow_up_iterations: ctx.follow_up_iterations,
                };
                info!(
                    "Answered in {}ms ({} steps, {} tool(s), {} correction(s))",
                    reply.duration_ms,
                    reply.steps,
                    reply.tools_used.len(),
                    reply.corrections.len()
                );
                self.log(
                    ConversationEventKind::FinalAnswer,
                    json!({
                        "content": reply.content,
                        "tools_used": reply.tools_used,
                        "steps": reply.steps,
                        "duration_ms": reply.duration_ms,
                    }),
                );
                ProcessOutcome::Answered(reply)
            }
            Err(e) => {
                warn!("Language model call failed, declining: {}", e);
                self.log(
                    ConversationEventKind::LlmFailure,
                    json!({ "error": e.to_string(), "state": ctx.state.as_str() }),
                );
                ctx.state = OrchestrationState::Idle;
                progress.on_state(OrchestrationState::Idle);
                ProcessOutcome::Declined {
                    error: DECLINE_MESSAGE.to_string(),
                    details: e.to_string(),
                }
            }
        }
    }

    async fn run(
        &self,
        ctx: &mut RunContext,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        let history = self.memory.history();

        ctx.transition(OrchestrationState::Classifying, progress);
        ctx.intent = classify_query(&ctx.message);
        let plan = self.detector.detect(&ctx.message, &history);
        debug!(
            "Intent: {} (score {}), tools: {:?}, unresolved: {:?}",
            ctx.intent.category,
            ctx.intent.score,
            plan.tool_names(),
            plan.unresolved
        );
        self.log(
            ConversationEventKind::ToolsScheduled,
            json!({
                "intent": ctx.intent.category,
                "score": ctx.intent.score,
                "calls": plan.calls,
                "unresolved": plan.unresolved,
            }),
        );

        ctx.transition(OrchestrationState::ExecutingTools, progress);
        let invocations = self.execute_tools(&plan.calls, progress).await;
        ctx.invocations.extend(invocations);

        let mut draft = self.synthesize(ctx, &history, progress).await?;
        draft = self.validate(ctx, draft, progress).await?;

        loop {
            ctx.transition(OrchestrationState::ExploringFollowUps, progress);
            if ctx.follow_up_iterations >= self.params.max_follow_up_iterations {
                debug!("Follow-up bound reached ({})", ctx.follow_up_iterations);
                break;
            }
            let Some(marker) = follow_up_marker(&draft) else {
                break;
            };

            ctx.follow_up_iterations += 1;
            let calls: Vec<ToolCall> = self
                .detector
                .detect(&draft, &[])
                .calls
                .into_iter()
                .filter(|call| !ctx.has_executed(call))
                .collect();
            let tools: Vec<ToolName> = calls.iter().map(|call| call.tool).collect();
            self.log(
                ConversationEventKind::FollowUp,
                json!({
                    "iteration": ctx.follow_up_iterations,
                    "marker": marker,
                    "calls": calls,
                }),
            );
            if calls.is_empty() {
                debug!("Follow-up marker '{}' resolved no new tools", marker);
                break;
            }

            info!(
                "Follow-up {} triggered by '{}': {:?}",
                ctx.follow_up_iterations, marker, tools
            );
            progress.on_follow_up(ctx.follow_up_iterations, &tools);

            ctx.transition(OrchestrationState::ExecutingTools, progress);
            let invocations = self.execute_tools(&calls, progress).await;
            ctx.invocations.extend(invocations);

            draft = self.synthesize(ctx, &history, progress).await?;
            draft = self.validate(ctx, draft, progress).await?;
        }

        ctx.transition(OrchestrationState::Finalizing, progress);
        Ok(draft)
    }

    /// Run every call concurrently and wait for all of them. Results come
    /// back in schedule order.
    async fn execute_tools(
        &self,
        calls: &[ToolCall],
        progress: &dyn ProgressNotifier,
    ) -> Vec<ToolInvocation> {
        if calls.is_empty() {
            return Vec::new();
        }

        let timeout = self.params.tool_timeout;
        let executor = &self.tool_executor;
        let futures = calls.iter().map(|call| {
            progress.on_tool_start(call);
            async move {
                let started = Instant::now();
                let attempt = AssertUnwindSafe(executor.execute(call)).catch_unwind();
                match tokio::time::timeout(timeout, attempt).await {
                    Ok(Ok(invocation)) => invocation,
                    Ok(Err(_)) => {
                        warn!("Tool {} panicked", call.tool);
                        let error = ToolError::execution_failed(format!(
                            "{} stopped unexpectedly",
                            call.tool
                        ));
                        ToolInvocation::new(
                            call.clone(),
                            ToolResult::from(Err(error)),
                            started.elapsed().as_millis() as u64,
                        )
                    }
                    Err(_) => {
                        warn!("Tool {} timed out after {:?}", call.tool, timeout);
                        let error = ToolError::timeout(call.tool.as_str())
                            .with_details(format!("no response within {:?}", timeout));
                        ToolInvocation::new(
                            call.clone(),
                            ToolResult::from(Err(error)),
                            started.elapsed().as_millis() as u64,
                        )
                    }
                }
            }
        });

        let invocations = join_all(futures).await;

        for invocation in &invocations {
            match &invocation.result {
                ToolResult::Success { .. } => debug!(
                    "Tool {} succeeded in {}ms",
                    invocation.tool(),
                    invocation.duration_ms
                ),
                ToolResult::Failure { reason } => {
                    warn!("Tool {} failed: {}", invocation.tool(), reason)
                }
            }
            progress.on_tool_complete(invocation);
            self.log(
                ConversationEventKind::ToolResult,
                json!({
                    "tool": invocation.tool(),
                    "arguments": invocation.call.arguments_json(),
                    "result": invocation.result,
                    "duration_ms": invocation.duration_ms,
                }),
            );
        }

        invocations
    }

    async fn synthesize(
        &self,
        ctx: &mut RunContext,
        history: &[Turn],
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        ctx.transition(OrchestrationState::Synthesizing, progress);
        let messages = PromptTemplate::build_messages(
            ctx.intent.category,
            history,
            &ctx.invocations,
            &ctx.message,
        );
        let draft = self.complete(ctx, &messages).await?;
        ctx.messages = messages;
        Ok(draft)
    }

    /// Check `draft` against the tool results of domains not yet corrected
    /// in this run. All violations found are folded into one corrective
    /// re-invocation; its answer is accepted without re-checking.
    async fn validate(
        &self,
        ctx: &mut RunContext,
        draft: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, GatewayError> {
        ctx.transition(OrchestrationState::Validating, progress);
        let violations = self
            .validator
            .check_all(&ctx.invocations, &draft, &ctx.corrected);
        if violations.is_empty() {
            return Ok(draft);
        }

        let domains: Vec<ValidationDomain> = violations.iter().map(|v| v.domain).collect();
        for violation in &violations {
            warn!(
                "Validation violation [{}]: {}",
                violation.domain,
                violation.reasons.join("; ")
            );
            self.log(
                ConversationEventKind::ValidationViolation,
                json!({ "violation": violation, "draft": draft }),
            );
        }

        ctx.transition(OrchestrationState::CorrectingOnce, progress);
        progress.on_correction(&domains);
        ctx.corrected.extend(domains);

        let directive = correction_directive(&violations);
        let messages = PromptTemplate::with_correction(ctx.messages.clone(), &draft, &directive);
        let corrected = self.complete(ctx, &messages).await?;
        ctx.messages = messages;
        Ok(corrected)
    }

    async fn complete(
        &self,
        ctx: &mut RunContext,
        messages: &[Message],
    ) -> Result<String, GatewayError> {
        ctx.llm_calls += 1;
        debug!(
            "Calling {} with {} message(s) (call #{})",
            self.gateway.model_name(),
            messages.len(),
            ctx.llm_calls
        );

        let text = AssertUnwindSafe(self.gateway.complete(messages))
            .catch_unwind()
            .await
            .map_err(|_| GatewayError::Other("model client stopped unexpectedly".to_string()))??;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        self.log(
            ConversationEventKind::LlmDraft,
            json!({
                "call": ctx.llm_calls,
                "state": ctx.state.as_str(),
                "model": self.gateway.model_name(),
                "text": text,
            }),
        );
        Ok(text)
    }

    fn log(&self, kind: ConversationEventKind, payload: serde_json::Value) {
        self.conversation_logger
            .log(ConversationEvent::new(kind, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;
    use tripwise_domain::{Role, ToolSpec};

    // ==================== Test Mocks ====================

    struct MockGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl MockGateway {
        fn new(responses: Vec<&str>) -> Self {
            Self::scripted(responses.into_iter().map(|r| Ok(r.to_string())).collect())
        }

        fn scripted(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> Vec<Message> {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        fn model_name(&self) -> &str {
            "mock-model"
        }

        async fn complete(&self, messages: &[Message]) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }
    }

    struct MockToolExecutor {
        spec: ToolSpec,
        results: HashMap<ToolName, ToolResult>,
        executed: Mutex<Vec<ToolCall>>,
        delay: Option<Duration>,
        panic_on: Option<ToolName>,
    }

    impl MockToolExecutor {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new(),
                results: HashMap::new(),
                executed: Mutex::new(Vec::new()),
                delay: None,
                panic_on: None,
            }
        }

        fn with_result(mut self, tool: ToolName, result: ToolResult) -> Self {
            self.results.insert(tool, result);
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn panicking_on(mut self, tool: ToolName) -> Self {
            self.panic_on = Some(tool);
            self
        }

        fn executed(&self) -> Vec<ToolCall> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockToolExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolInvocation {
            self.executed.lock().unwrap().push(call.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.panic_on == Some(call.tool) {
                panic!("provider exploded");
            }
            let result = self
                .results
                .get(&call.tool)
                .cloned()
                .unwrap_or_else(|| ToolResult::success(call.arguments_json()));
            ToolInvocation::new(call.clone(), result, 1)
        }
    }

    struct RecordingLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type());
        }
    }

    struct RecordingProgress {
        states: Mutex<Vec<OrchestrationState>>,
        corrections: Mutex<Vec<Vec<ValidationDomain>>>,
    }

    impl RecordingProgress {
        fn new() -> Self {
            Self {
                states: Mutex::new(Vec::new()),
                corrections: Mutex::new(Vec::new()),
            }
        }
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_state(&self, state: OrchestrationState) {
            self.states.lock().unwrap().push(state);
        }

        fn on_correction(&self, domains: &[ValidationDomain]) {
            self.corrections.lock().unwrap().push(domains.to_vec());
        }
    }

    fn use_case(
        gateway: &Arc<MockGateway>,
        executor: &Arc<MockToolExecutor>,
        params: AssistantParams,
    ) -> ProcessMessageUseCase {
        ProcessMessageUseCase::new(gateway.clone(), executor.clone(), params).unwrap()
    }

    fn weather(location: &str) -> ToolResult {
        ToolResult::success(json!({
            "location": location,
            "temperature": 12,
            "condition": "Partly cloudy",
            "humidity": 64
        }))
    }

    fn contains_notice(messages: &[Message], needle: &str) -> bool {
        messages
            .iter()
            .any(|m| m.role == Role::System && m.content.contains(needle))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_packing_question_end_to_end() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Tokyo in March is around 12°C and partly cloudy, so pack light layers.",
        ]));
        let executor =
            Arc::new(MockToolExecutor::new().with_result(ToolName::Weather, weather("Tokyo")));
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc
            .process_message("What should I pack for Tokyo in March?", &NoProgress)
            .await;

        let reply = outcome.reply().unwrap();
        assert!(reply.content.contains("Tokyo"));
        assert!(reply.content.contains("12"));
        assert_eq!(reply.tools_used, vec![ToolName::Weather]);
        assert_eq!(reply.intent, QueryCategory::Packing);
        assert_eq!(reply.steps, 2);
        assert!(reply.corrections.is_empty());

        let executed = executor.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].get_string("location"), Some("Tokyo"));

        let prompt = gateway.call(0);
        assert_eq!(prompt[0].role, Role::System);
        assert!(contains_notice(&prompt, "TOOL RESULT [get_weather]"));
        assert_eq!(prompt.last().unwrap().role, Role::Human);

        assert_eq!(uc.history().len(), 2);
    }

    #[tokio::test]
    async fn test_state_sequence_without_tools() {
        let gateway = Arc::new(MockGateway::new(vec!["Hello! Where are you heading?"]));
        let executor = Arc::new(MockToolExecutor::new());
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());
        let progress = RecordingProgress::new();

        let outcome = uc.process_message("hi there", &progress).await;

        assert!(outcome.is_success());
        assert!(executor.executed().is_empty());
        use OrchestrationState::*;
        assert_eq!(
            *progress.states.lock().unwrap(),
            vec![
                Classifying,
                ExecutingTools,
                Synthesizing,
                Validating,
                ExploringFollowUps,
                Finalizing,
                Idle
            ]
        );
    }

    #[tokio::test]
    async fn test_weather_violation_corrected_exactly_once() {
        let gateway = Arc::new(MockGateway::new(vec![
            "It's mild today, around 12 degrees.",
            "Still mild, bring a light jacket.",
        ]));
        let executor =
            Arc::new(MockToolExecutor::new().with_result(ToolName::Weather, weather("Berlin")));
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());
        let progress = RecordingProgress::new();

        let outcome = uc
            .process_message("What's the weather in Berlin?", &progress)
            .await;

        let reply = outcome.reply().unwrap();
        assert_eq!(reply.content, "Still mild, bring a light jacket.");
        assert_eq!(reply.corrections, vec![ValidationDomain::Weather]);
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(reply.steps, 3);

        let correction = gateway.call(1);
        let directive = correction.last().unwrap();
        assert_eq!(directive.role, Role::System);
        assert!(directive.content.contains("CORRECTION REQUIRED"));
        assert!(directive.content.contains("Berlin"));
        let rejected = &correction[correction.len() - 2];
        assert_eq!(rejected.role, Role::Assistant);
        assert_eq!(rejected.content, "It's mild today, around 12 degrees.");

        assert_eq!(
            *progress.corrections.lock().unwrap(),
            vec![vec![ValidationDomain::Weather]]
        );
    }

    #[tokio::test]
    async fn test_violations_accumulate_into_one_correction() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Looks like a nice trip.",
            "Berlin is 12°C; 100 USD is 92.50 EUR.",
        ]));
        let executor = Arc::new(
            MockToolExecutor::new()
                .with_result(ToolName::Weather, weather("Berlin"))
                .with_result(
                    ToolName::Currency,
                    ToolResult::success(json!({
                        "amount": 100.0,
                        "from": "USD",
                        "to": "EUR",
                        "rate": 0.925,
                        "converted_amount": 92.5
                    })),
                ),
        );
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc
            .process_message(
                "What's the weather in Berlin and convert 100 USD to EUR",
                &NoProgress,
            )
            .await;

        let reply = outcome.reply().unwrap();
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(
            reply.corrections,
            vec![ValidationDomain::Weather, ValidationDomain::Currency]
        );
        let directive = gateway.call(1).last().unwrap().content.clone();
        assert!(directive.contains("[WEATHER]"));
        assert!(directive.contains("[CURRENCY]"));
    }

    #[tokio::test]
    async fn test_flight_fabrication_is_corrected() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Turkish Airlines flies there daily from $230.",
            "Compare current options on Skyscanner or Google Flights.",
        ]));
        let executor = Arc::new(MockToolExecutor::new().with_result(
            ToolName::Flights,
            ToolResult::success(json!({
                "origin": "London",
                "destination": "Istanbul",
                "booking_links": [{"provider": "Skyscanner", "url": "https://www.skyscanner.net"}]
            })),
        ));
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc
            .process_message("Find me flights to Istanbul", &NoProgress)
            .await;

        let reply = outcome.reply().unwrap();
        assert_eq!(reply.corrections, vec![ValidationDomain::Flights]);
        assert!(reply.content.contains("Skyscanner"));
        assert_eq!(executor.executed()[0].get_bool("origin_inferred"), Some(true));
    }

    #[tokio::test]
    async fn test_failed_tool_is_narrated() {
        let gateway = Arc::new(MockGateway::new(vec![
            "I couldn't get a rate for ZZZ right now; it may not be a real currency code.",
        ]));
        let executor = Arc::new(MockToolExecutor::new().with_result(
            ToolName::Currency,
            ToolResult::from(Err(ToolError::not_found("currency ZZZ"))),
        ));
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc.process_message("Convert 100 USD to ZZZ", &NoProgress).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.reply().unwrap().tools_used, vec![ToolName::Currency]);
        let call = &executor.executed()[0];
        assert_eq!(call.get_f64("amount"), Some(100.0));
        assert_eq!(call.get_string("to"), Some("ZZZ"));
        assert!(contains_notice(&gateway.call(0), "TOOL FAILED [convert_currency]"));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_panicking_tool_does_not_abort_run() {
        let gateway = Arc::new(MockGateway::new(vec!["The conversion service is unavailable."]));
        let executor = Arc::new(MockToolExecutor::new().panicking_on(ToolName::Currency));
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc.process_message("Convert 100 USD to ZZZ", &NoProgress).await;

        assert!(outcome.is_success());
        let prompt = gateway.call(0);
        assert!(contains_notice(&prompt, "TOOL FAILED [convert_currency]"));
        assert!(contains_notice(&prompt, "EXECUTION_FAILED"));
    }

    #[tokio::test]
    async fn test_tool_timeout_becomes_failure() {
        let gateway = Arc::new(MockGateway::new(vec![
            "I couldn't fetch the Berlin forecast right now.",
        ]));
        let executor = Arc::new(
            MockToolExecutor::new()
                .with_result(ToolName::Weather, weather("Berlin"))
                .with_delay(Duration::from_millis(500)),
        );
        let params = AssistantParams::default().with_tool_timeout(Duration::from_millis(20));
        let mut uc = use_case(&gateway, &executor, params);

        let outcome = uc
            .process_message("What's the weather in Berlin?", &NoProgress)
            .await;

        assert!(outcome.is_success());
        let prompt = gateway.call(0);
        assert!(contains_notice(&prompt, "TOOL FAILED [get_weather]"));
        assert!(contains_notice(&prompt, "TIMEOUT"));
        // Failed weather lookups are not validated
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_hotel_location_resolved_from_human_history() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Lisbon is lovely in spring. Paris is nice too, but you chose well.",
            "Alfama and Baixa are good areas to stay in.",
        ]));
        let executor = Arc::new(MockToolExecutor::new());
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        uc.process_message("I'm flying to Lisbon", &NoProgress).await;
        let outcome = uc.process_message("any hotel tips?", &NoProgress).await;

        assert_eq!(outcome.reply().unwrap().tools_used, vec![ToolName::Hotels]);
        let hotel_call = executor
            .executed()
            .into_iter()
            .find(|c| c.tool == ToolName::Hotels)
            .unwrap();
        assert_eq!(hotel_call.get_string("location"), Some("Lisbon"));
        assert_eq!(uc.history().len(), 4);
    }

    #[tokio::test]
    async fn test_follow_up_runs_new_tools() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Let me check hotels in Oslo.",
            "Here are a few hotels in Oslo worth a look.",
        ]));
        let executor = Arc::new(MockToolExecutor::new());
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc.process_message("Tell me about Oslo", &NoProgress).await;

        let reply = outcome.reply().unwrap();
        assert_eq!(reply.content, "Here are a few hotels in Oslo worth a look.");
        assert_eq!(reply.tools_used, vec![ToolName::Hotels]);
        assert_eq!(reply.follow_up_iterations, 1);
        assert_eq!(gateway.call_count(), 2);
        assert!(contains_notice(&gateway.call(1), "TOOL RESULT [search_hotels]"));
    }

    #[tokio::test]
    async fn test_follow_up_loop_is_bounded() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Let me check hotels in Oslo.",
            "Let me check hotels in Bergen.",
            "Let me check hotels in Tromso.",
            "Let me check hotels in Stavanger.",
            "This response is never requested.",
        ]));
        let executor = Arc::new(MockToolExecutor::new());
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc.process_message("Tell me about Norway", &NoProgress).await;

        let reply = outcome.reply().unwrap();
        assert_eq!(reply.follow_up_iterations, 3);
        assert_eq!(reply.content, "Let me check hotels in Stavanger.");
        assert_eq!(gateway.call_count(), 4);
        assert_eq!(executor.executed().len(), 3);
    }

    #[tokio::test]
    async fn test_follow_up_does_not_repeat_executed_calls() {
        let gateway = Arc::new(MockGateway::new(vec!["Let me check hotels in Oslo."]));
        let executor = Arc::new(MockToolExecutor::new());
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc.process_message("Any hotels in Oslo?", &NoProgress).await;

        let reply = outcome.reply().unwrap();
        assert_eq!(executor.executed().len(), 1);
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(reply.follow_up_iterations, 1);
    }

    #[tokio::test]
    async fn test_llm_failure_declines_and_keeps_memory() {
        let gateway = Arc::new(MockGateway::scripted(vec![
            Ok("Kyoto is beautiful in autumn.".to_string()),
            Err(GatewayError::RequestFailed("503 Service Unavailable".to_string())),
        ]));
        let executor = Arc::new(MockToolExecutor::new());
        let logger = Arc::new(RecordingLogger {
            events: Mutex::new(Vec::new()),
        });
        let mut uc = use_case(&gateway, &executor, AssistantParams::default())
            .with_conversation_logger(logger.clone());

        uc.process_message("Tell me about Kyoto", &NoProgress).await;
        let outcome = uc.process_message("And Osaka?", &NoProgress).await;

        match &outcome {
            ProcessOutcome::Declined { error, details } => {
                assert_eq!(error, DECLINE_MESSAGE);
                assert!(details.contains("503"));
            }
            other => panic!("expected decline, got {other:?}"),
        }
        assert_eq!(outcome.content(), DECLINE_MESSAGE);
        assert_eq!(uc.history().len(), 2);
        assert_eq!(logger.events.lock().unwrap().last(), Some(&"llm_failure"));
    }

    #[tokio::test]
    async fn test_empty_completion_declines() {
        let gateway = Arc::new(MockGateway::new(vec!["   "]));
        let executor = Arc::new(MockToolExecutor::new());
        let mut uc = use_case(&gateway, &executor, AssistantParams::default());

        let outcome = uc.process_message("hello", &NoProgress).await;

        assert!(!outcome.is_success());
        assert!(uc.history().is_empty());
    }

    #[tokio::test]
    async fn test_memory_window_and_clear() {
        let gateway = Arc::new(MockGateway::new(vec!["One.", "Two.", "Three."]));
        let executor = Arc::new(MockToolExecutor::new());
        let params = AssistantParams::default().with_history_window(4);
        let mut uc = use_case(&gateway, &executor, params);

        for text in ["first", "second", "third"] {
            uc.process_message(text, &NoProgress).await;
        }

        let history = uc.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].text(), "second");
        assert_eq!(history[3].text(), "Three.");

        uc.clear_history();
        assert!(uc.history().is_empty());
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let executor = Arc::new(MockToolExecutor::new());
        let params = AssistantParams::default().with_history_window(0);
        assert!(ProcessMessageUseCase::new(gateway, executor, params).is_err());
    }

    #[tokio::test]
    async fn test_conversation_log_events() {
        let gateway = Arc::new(MockGateway::new(vec![
            "It's mild.",
            "Berlin is 12°C and partly cloudy.",
        ]));
        let executor =
            Arc::new(MockToolExecutor::new().with_result(ToolName::Weather, weather("Berlin")));
        let logger = Arc::new(RecordingLogger {
            events: Mutex::new(Vec::new()),
        });
        let mut uc = use_case(&gateway, &executor, AssistantParams::default())
            .with_conversation_logger(logger.clone());

        uc.process_message("Weather in Berlin?", &NoProgress).await;

        assert_eq!(
            *logger.events.lock().unwrap(),
            vec![
                "user_message",
                "tools_scheduled",
                "tool_result",
                "llm_draft",
                "validation_violation",
                "llm_draft",
                "final_answer"
            ]
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let answered = ProcessOutcome::Answered(AssistantReply {
            content: "Tokyo is 12°C.".to_string(),
            tools_used: vec![ToolName::Weather],
            steps: 2,
            duration_ms: 40,
            intent: QueryCategory::Packing,
            corrections: vec![],
            follow_up_iterations: 0,
        });
        let value = serde_json::to_value(&answered).unwrap();
        assert_eq!(value["success"], json!(true));
        assert_eq!(value["toolsUsed"], json!(["get_weather"]));
        assert_eq!(value["durationMs"], json!(40));
        assert!(value.get("corrections").is_none());

        let declined = ProcessOutcome::Declined {
            error: DECLINE_MESSAGE.to_string(),
            details: "Request timed out".to_string(),
        };
        let value = serde_json::to_value(&declined).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["details"], json!("Request timed out"));
    }
}
