//! Integration tests for the complete Metaphora pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Ontology JSON → Analyzer → Evidence / Network
//! - Analyzer hints → Prompt assembly → Adjudicator (mock provider)
//! - Batch runner → JSON results that read back
//!
//! Run with: cargo test --test integration_tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

use metaphora_adjudicator::{
    Adjudicator, AdjudicatorError, BatchItem, BatchRunner, ChatProvider, ChatRequest,
    ChatResponse, ClassifiedItem, ItemStatus, PromptMode, RateLimitPolicy, Role, Usage,
};
use metaphora_core::{
    enhance_system_prompt, generate_prompt_section, MetaphorAnalyzer, MetaphorLevel, Ontology,
    Theory, RESPONSE_FORMAT_MARKER,
};

/// Classifies by echoing the strongest theory named in the user prompt and
/// records every request it sees.
struct EchoProvider {
    seen: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl ChatProvider for EchoProvider {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AdjudicatorError> {
        self.seen.lock().unwrap().push(request.clone());
        let user = &request
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .ok_or_else(|| AdjudicatorError::InvalidResponse("no user message".into()))?
            .content;
        let class = if user.contains("компьютер") {
            "COMP"
        } else if user.contains("предсказание") {
            "PRED"
        } else {
            "UND"
        };
        Ok(ChatResponse {
            content: format!(
                r#"{{"primary_class": "{class}", "confidence": "low", "scores": {{"{class}": 0.6}}, "evidence": []}}"#
            ),
            usage: Usage::default(),
        })
    }

    fn model(&self) -> &str {
        "mock/echo"
    }
}

// ============================================================================
// Ontology → Analyzer
// ============================================================================

#[test]
fn test_exported_ontology_reloads_identically() {
    let builtin = Ontology::builtin();
    let json = builtin.to_json_pretty().unwrap();
    let reloaded = Ontology::from_json(&json).unwrap();
    assert_eq!(reloaded, builtin);

    let text = "Нейросеть обретает сознание.";
    let a = MetaphorAnalyzer::new(builtin).analyze(text);
    let b = MetaphorAnalyzer::new(reloaded).analyze(text);
    assert_eq!(a, b);
    assert_eq!(a.evidence[0].level, MetaphorLevel::MetaMetaphor);
}

#[test]
fn test_ontology_file_on_disk_drives_analysis() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ontology.json");
    std::fs::write(
        &path,
        r#"{"domains": [{"theory": "GWT", "keywords": ["сцена"], "scientific_metaphors": [], "artistic_transformations": []}]}"#,
    )
    .unwrap();

    let ontology = Ontology::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let analyzer = MetaphorAnalyzer::new(ontology);
    let evidence = analyzer.extract_metaphors("Сцена, мозг как компьютер, сцена");
    assert_eq!(evidence.len(), 0, "single keyword stays below the evidence floor");

    assert_eq!(analyzer.identify_semantic_field("сцена")[0].theory, Theory::Gwt);
}

#[test]
fn test_ontology_with_und_domain_is_rejected() {
    let json = r#"{"domains": [{"theory": "UND", "keywords": ["x"]}]}"#;
    assert!(Ontology::from_json(json).is_err());
}

// ============================================================================
// Prompt assembly
// ============================================================================

#[test]
fn test_generated_section_fits_both_system_prompts() {
    let section = generate_prompt_section();
    for mode in [PromptMode::Enhanced, PromptMode::Augmented] {
        let prompt = mode.system_prompt();
        assert!(prompt.contains(RESPONSE_FORMAT_MARKER));
    }
    let augmented = enhance_system_prompt(metaphora_adjudicator::BASE_SYSTEM_PROMPT, &section);
    assert_eq!(augmented, PromptMode::Augmented.system_prompt());
}

// ============================================================================
// Analyzer → Adjudicator → Results
// ============================================================================

#[tokio::test]
async fn test_batch_results_round_trip_through_json() {
    let provider = Arc::new(EchoProvider {
        seen: Mutex::new(Vec::new()),
    });
    let adjudicator = Adjudicator::new(provider.clone(), MetaphorAnalyzer::default())
        .with_prompt_mode(PromptMode::Augmented)
        .with_backoff_base(Duration::from_millis(1));
    let runner = BatchRunner::new(Arc::new(adjudicator))
        .with_concurrency(2)
        .with_rate_limit(RateLimitPolicy {
            min_interval: Duration::from_millis(1),
        });

    let results = runner
        .run(vec![
            BatchItem::new("Машина", "мозг как компьютер"),
            BatchItem::new("Пусто", ""),
            BatchItem::new("Прогноз", "предсказание, ошибка и вероятность"),
        ])
        .await;

    assert_eq!(results[0].primary_class(), Theory::Comp);
    assert_eq!(results[1].status, ItemStatus::Skipped);
    assert_eq!(results[2].primary_class(), Theory::Pred);

    let hints = results[2].metaphor_pre_analysis.as_ref().unwrap();
    assert_eq!(hints.dominant_theory, Some(Theory::Pred));

    // Every outbound request carried the augmented system prompt.
    for request in provider.seen.lock().unwrap().iter() {
        assert!(request.messages[0].content.contains("РАСШИРЕННЫЙ АНАЛИЗ МЕТАФОР"));
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("results.json");
    std::fs::write(&path, serde_json::to_string_pretty(&results).unwrap()).unwrap();
    let back: Vec<ClassifiedItem> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, results);
}
