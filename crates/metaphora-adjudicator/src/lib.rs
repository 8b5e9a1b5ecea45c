//! LLM adjudication of artwork descriptions.
//!
//! The deterministic analyzer in `metaphora-core` runs first and its hints are
//! folded into the prompt; a chat model then returns the final theory
//! classification as JSON. The model sits behind [`ChatProvider`], so tests and
//! alternative backends can replace [`OpenRouterClient`].
//!
//! ```text
//!   description ──► MetaphorAnalyzer::pre_analyze ──► MetaphorHints
//!                                                        │
//!        system prompt (Enhanced | Augmented) + user prompt (+ hint line)
//!                                                        ▼
//!                      ChatProvider::complete  (retry, 2^n backoff)
//!                                                        ▼
//!                                     Classification (lenient JSON)
//! ```
//!
//! [`BatchRunner`] fans a list of descriptions out over a bounded number of
//! concurrent requests with a minimum spacing between request starts.

pub mod adjudicator;
pub mod batch;
pub mod config;
pub mod error;
pub mod prompts;
pub mod provider;
pub mod response;

pub use adjudicator::{Adjudication, Adjudicator};
pub use batch::{BatchItem, BatchRunner, ClassifiedItem, ItemStatus, RateLimitPolicy, EMPTY_DESCRIPTION};
pub use config::{AdjudicatorConfig, ConfigError};
pub use error::AdjudicatorError;
pub use prompts::{build_user_prompt, PromptMode, BASE_SYSTEM_PROMPT, ENHANCED_SYSTEM_PROMPT};
pub use provider::{ChatProvider, ChatRequest, ChatResponse, Message, OpenRouterClient, Role, Usage};
pub use response::{
    parse_classification, strip_code_fences, Classification, Confidence, MetaphorAnalysisReport,
    ReportedEvidence,
};
