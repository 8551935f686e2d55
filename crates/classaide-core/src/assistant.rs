//! The classroom assistant.
//!
//! Validates tool inputs, builds prompts, and drives an [`LlmProvider`] with
//! retries on transient failures.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::try_join_all;

use crate::error::{ProviderError, ToolError};
use crate::model::{ContentType, Language, MaterialType};
use crate::prompts;
use crate::speech::{SpeechError, SpeechSynthesizer, Utterance};
use crate::traits::{GenerateRequest, InlineImage, LlmProvider, DEFAULT_SYSTEM_PROMPT};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Configuration for the assistant.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Text model identifier.
    pub model: String,
    /// Model used for textbook page images.
    pub vision_model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens per generation.
    pub max_tokens: u32,
    /// Retries on provider errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt.
    pub retry_delay: Duration,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".into(),
            vision_model: "gemini-pro-vision".into(),
            temperature: 0.7,
            max_tokens: 2048,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            system_prompt_override: None,
        }
    }
}

/// Runs the AI-backed classroom tools against one provider.
pub struct Assistant {
    provider: Arc<dyn LlmProvider>,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(provider: Arc<dyn LlmProvider>, config: AssistantConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub async fn hyper_local_content(
        &self,
        content_type: ContentType,
        topic: &str,
        grade_level: &str,
        local_context: &str,
        language: Language,
    ) -> Result<String> {
        require(topic, "topic")?;
        let prompt =
            prompts::hyper_local_content(content_type, topic, grade_level, local_context, language);
        self.complete(prompt).await
    }

    /// Generate one material per grade. Grades are generated concurrently.
    pub async fn differentiated_materials(
        &self,
        topic: &str,
        grades: &[String],
        material_type: MaterialType,
        language: Language,
    ) -> Result<BTreeMap<String, String>> {
        require(topic, "topic")?;
        if grades.is_empty() {
            return Err(ToolError::MissingInput("grade").into());
        }

        let jobs = grades.iter().map(|grade| async move {
            let prompt = prompts::differentiated_material(topic, grade, material_type, language);
            let material = self.complete(prompt).await?;
            Ok::<_, anyhow::Error>((grade.clone(), material))
        });

        Ok(try_join_all(jobs).await?.into_iter().collect())
    }

    pub async fn answer_question(
        &self,
        question: &str,
        grade_level: &str,
        language: Language,
    ) -> Result<String> {
        require(question, "question")?;
        self.complete(prompts::student_answer(question, grade_level, language))
            .await
    }

    pub async fn visual_aid(
        &self,
        description: &str,
        subject: &str,
        language: Language,
    ) -> Result<String> {
        require(description, "visual description")?;
        self.complete(prompts::visual_aid(description, subject, language))
            .await
    }

    pub async fn educational_game(
        &self,
        topic: &str,
        grade_level: &str,
        language: Language,
    ) -> Result<String> {
        require(topic, "topic")?;
        self.complete(prompts::educational_game(topic, grade_level, language))
            .await
    }

    pub async fn lesson_plan(
        &self,
        subject: &str,
        topic: &str,
        grade_level: &str,
        duration: &str,
        language: Language,
    ) -> Result<String> {
        require(topic, "topic")?;
        self.complete(prompts::lesson_plan(
            subject,
            topic,
            grade_level,
            duration,
            language,
        ))
        .await
    }

    /// Describe a photographed textbook page following `instructions`.
    pub async fn analyze_textbook_image(
        &self,
        image: InlineImage,
        instructions: &str,
    ) -> Result<String> {
        let prompt = prompts::textbook_image_analysis(instructions);
        let mut request = self.request(&self.config.vision_model, prompt);
        request.images.push(image);
        self.generate_with_retry(&request).await
    }

    /// Analyze a textbook page, then build per-grade materials from it.
    pub async fn materials_from_textbook(
        &self,
        image: InlineImage,
        grades: &[String],
        material_type: MaterialType,
        language: Language,
    ) -> Result<BTreeMap<String, String>> {
        if grades.is_empty() {
            return Err(ToolError::MissingInput("grade").into());
        }
        let instructions = prompts::textbook_material_instructions(material_type, grades);
        let analysis = self.analyze_textbook_image(image, &instructions).await?;
        self.differentiated_materials(&analysis, grades, material_type, language)
            .await
    }

    /// Translate free text. English targets are returned unchanged.
    pub async fn translate_text(&self, text: &str, target: Language) -> Result<String> {
        if target == Language::English {
            return Ok(text.to_string());
        }
        self.complete(prompts::translation(text, target)).await
    }

    /// Read an answer aloud in the given language. Empty answers are skipped.
    pub fn speak_answer(
        &self,
        synth: &dyn SpeechSynthesizer,
        answer: &str,
        language: Language,
    ) -> Result<(), SpeechError> {
        if answer.trim().is_empty() {
            return Ok(());
        }
        synth.speak(&Utterance::new(answer, language))
    }

    async fn complete(&self, prompt: String) -> Result<String> {
        let request = self.request(&self.config.model, prompt);
        self.generate_with_retry(&request).await
    }

    fn request(&self, model: &str, prompt: String) -> GenerateRequest {
        GenerateRequest {
            model: model.to_string(),
            prompt,
            system_prompt: Some(
                self.config
                    .system_prompt_override
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            ),
            images: Vec::new(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    // Retry on transient provider errors with exponential backoff
    async fn generate_with_retry(&self, request: &GenerateRequest) -> Result<String> {
        let mut last_error = None;
        let mut retry_delay = self.config.retry_delay;

        for retry in 0..=self.config.max_retries {
            if retry > 0 {
                tokio::time::sleep(retry_delay).await;
                retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
            }
            match self.provider.generate(request).await {
                Ok(response) => {
                    tracing::debug!(
                        provider = self.provider.name(),
                        model = %response.model,
                        tokens = response.token_usage.total_tokens,
                        latency_ms = response.latency_ms,
                        "generation complete"
                    );
                    return Ok(response.content);
                }
                Err(e) => {
                    if let Some(provider_error) = e.downcast_ref::<ProviderError>() {
                        if provider_error.is_permanent() {
                            return Err(e);
                        }
                        if let Some(ms) = provider_error.retry_after_ms() {
                            retry_delay = Duration::from_millis(ms).min(MAX_RETRY_DELAY);
                        }
                    }
                    tracing::warn!(
                        "{} request failed (attempt {}): {e:#}",
                        self.provider.name(),
                        retry + 1
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
    }
}

fn require(value: &str, field: &'static str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        Err(ToolError::MissingInput(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::speech::RecordingSynthesizer;
    use crate::traits::{GenerateResponse, ModelInfo, TokenUsage};

    /// Echoes the prompt back, failing the first `failures` calls.
    struct EchoProvider {
        failures: AtomicU32,
        error: fn() -> ProviderError,
        calls: AtomicU32,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl EchoProvider {
        fn new() -> Self {
            Self::failing(0, || ProviderError::Timeout(1))
        }

        fn failing(failures: u32, error: fn() -> ProviderError) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                error,
                calls: AtomicU32::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err((self.error)().into());
            }
            Ok(GenerateResponse {
                content: format!("[{}] {}", request.model, request.prompt),
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 0,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    fn config() -> AssistantConfig {
        AssistantConfig {
            retry_delay: Duration::from_millis(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_topic_is_rejected_without_calling_provider() {
        let provider = Arc::new(EchoProvider::new());
        let assistant = Assistant::new(provider.clone(), config());

        let err = assistant
            .educational_game("   ", "Grade 3", Language::English)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ToolError>(),
            Some(&ToolError::MissingInput("topic"))
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn answer_uses_text_model_and_system_prompt() {
        let provider = Arc::new(EchoProvider::new());
        let assistant = Assistant::new(provider.clone(), config());

        let answer = assistant
            .answer_question("Why is the sky blue?", "Grade 5", Language::English)
            .await
            .unwrap();
        assert!(answer.starts_with("[gemini-pro] Answer this student question in English"));

        let requests = provider.requests.lock().unwrap();
        assert_eq!(
            requests[0].system_prompt.as_deref(),
            Some(DEFAULT_SYSTEM_PROMPT)
        );
    }

    #[tokio::test]
    async fn materials_keep_every_grade() {
        let provider = Arc::new(EchoProvider::new());
        let assistant = Assistant::new(provider.clone(), config());
        let grades = vec!["3".to_string(), "4".to_string(), "5".to_string()];

        let materials = assistant
            .differentiated_materials("Fractions", &grades, MaterialType::Worksheet, Language::Hindi)
            .await
            .unwrap();

        assert_eq!(materials.len(), 3);
        assert!(materials["4"].contains("Create a worksheet for Grade 4"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn materials_require_grades() {
        let assistant = Assistant::new(Arc::new(EchoProvider::new()), config());
        let err = assistant
            .differentiated_materials("Fractions", &[], MaterialType::Quiz, Language::English)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("grade"));
    }

    #[tokio::test]
    async fn textbook_page_flows_into_materials() {
        let provider = Arc::new(EchoProvider::new());
        let assistant = Assistant::new(provider.clone(), config());
        let image = InlineImage {
            mime_type: "image/png".into(),
            data: "aGVsbG8=".into(),
        };
        let grades = vec!["Grade 3".to_string()];

        let materials = assistant
            .materials_from_textbook(image.clone(), &grades, MaterialType::Summary, Language::English)
            .await
            .unwrap();
        assert_eq!(materials.len(), 1);

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].model, "gemini-pro-vision");
        assert_eq!(requests[0].images, vec![image]);
        assert!(requests[1].images.is_empty());
        assert!(requests[1].prompt.contains("[gemini-pro-vision] Analyze this textbook page"));
    }

    #[tokio::test]
    async fn english_translation_skips_provider() {
        let provider = Arc::new(EchoProvider::new());
        let assistant = Assistant::new(provider.clone(), config());
        let text = assistant
            .translate_text("Hello class", Language::English)
            .await
            .unwrap();
        assert_eq!(text, "Hello class");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        let text = assistant
            .translate_text("Hello class", Language::Bengali)
            .await
            .unwrap();
        assert!(text.contains("Translate the following text to Bengali"));
    }

    #[tokio::test]
    async fn transient_errors_are_retried() {
        let provider = Arc::new(EchoProvider::failing(2, || ProviderError::NetworkError("reset".into())));
        let assistant = Assistant::new(provider.clone(), config());

        let result = assistant
            .visual_aid("Water cycle diagram", "Science", Language::English)
            .await;
        assert!(result.is_ok());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let provider = Arc::new(EchoProvider::failing(5, || {
            ProviderError::AuthenticationFailed("bad key".into())
        }));
        let assistant = Assistant::new(provider.clone(), config());

        let err = assistant
            .lesson_plan("Science", "Plants", "Grade 5", "45 minutes", Language::English)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("authentication"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let provider = Arc::new(EchoProvider::failing(10, || ProviderError::Timeout(1)));
        let assistant = Assistant::new(
            provider.clone(),
            AssistantConfig {
                max_retries: 2,
                ..config()
            },
        );

        let err = assistant
            .hyper_local_content(ContentType::Poem, "Rain", "Grade 2", "", Language::English)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_hint_is_capped() {
        let provider = Arc::new(EchoProvider::failing(1, || ProviderError::RateLimited {
            retry_after_ms: 3_600_000,
        }));
        let assistant = Assistant::new(provider.clone(), config());

        let started = tokio::time::Instant::now();
        let answer = assistant
            .answer_question("What is rain?", "Grade 2", Language::English)
            .await
            .unwrap();
        assert!(answer.contains("What is rain?"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert!(started.elapsed() >= Duration::from_secs(60));
        assert!(started.elapsed() < Duration::from_secs(61));
    }

    #[test]
    fn answers_are_read_aloud_in_the_class_language() {
        let assistant = Assistant::new(Arc::new(EchoProvider::new()), config());
        let synth = RecordingSynthesizer::new();

        assistant
            .speak_answer(&synth, "बारिश बादलों से होती है", Language::Hindi)
            .unwrap();

        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "बारिश बादलों से होती है");
        assert_eq!(spoken[0].locale, "hi-IN");
        assert_eq!(spoken[0].rate, 0.8);
    }

    #[test]
    fn empty_answer_is_not_spoken() {
        let assistant = Assistant::new(Arc::new(EchoProvider::new()), config());
        let synth = RecordingSynthesizer::new();

        assistant.speak_answer(&synth, "  ", Language::English).unwrap();
        assert!(synth.spoken().is_empty());
        assert_eq!(synth.cancellations(), 0);
    }
}
