//! Bounded, rate-limited batch classification.

use std::sync::Arc;
use std::time::Duration;

use metaphora_core::{MetaphorHints, Theory};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info};

use crate::response::Classification;
use crate::Adjudicator;

pub const EMPTY_DESCRIPTION: &str = "Empty description";

/// Item-level keys; a verdict may not carry these among its extra fields.
pub const RESERVED_KEYS: [&str; 6] = [
    "index",
    "title",
    "status",
    "description_length",
    "error",
    "metaphor_pre_analysis",
];

/// One description queued for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub title: String,
    pub description: String,
}

impl BatchItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Success,
    Skipped,
    Error,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Success => "success",
            ItemStatus::Skipped => "skipped",
            ItemStatus::Error => "error",
        }
    }
}

/// Outcome for one batch item, flattened into the verdict for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedItem {
    pub index: usize,
    pub title: String,
    pub status: ItemStatus,
    /// Character count of the description.
    pub description_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metaphor_pre_analysis: Option<MetaphorHints>,
    #[serde(flatten)]
    pub classification: Classification,
}

impl ClassifiedItem {
    /// A successful verdict; model-supplied copies of the item-level keys are dropped.
    pub fn succeeded(index: usize, item: &BatchItem, mut classification: Classification) -> Self {
        classification
            .extra
            .retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
        Self {
            index,
            title: item.title.clone(),
            status: ItemStatus::Success,
            description_length: item.description.chars().count(),
            error: None,
            metaphor_pre_analysis: None,
            classification,
        }
    }

    fn failed(index: usize, item: &BatchItem, status: ItemStatus, message: String) -> Self {
        Self {
            index,
            title: item.title.clone(),
            status,
            description_length: item.description.chars().count(),
            error: Some(message),
            metaphor_pre_analysis: None,
            classification: Classification::undetermined(),
        }
    }

    pub fn primary_class(&self) -> Theory {
        self.classification.primary_class
    }

    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }
}

// ============================================================================
// Rate limiting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Minimum spacing between the starts of two outbound requests.
    pub min_interval: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(500),
        }
    }
}

/// Hands out request start slots no closer together than `min_interval`.
#[derive(Debug)]
struct RateLimiter {
    policy: RateLimitPolicy,
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            last_start: Mutex::new(None),
        }
    }

    async fn acquire(&self) {
        let mut last = self.last_start.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.policy.min_interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

// ============================================================================
// Runner
// ============================================================================

pub struct BatchRunner {
    adjudicator: Arc<Adjudicator>,
    concurrency: usize,
    rate_limit: RateLimitPolicy,
}

impl BatchRunner {
    pub fn new(adjudicator: Arc<Adjudicator>) -> Self {
        Self {
            adjudicator,
            concurrency: 1,
            rate_limit: RateLimitPolicy::default(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }

    pub fn adjudicator(&self) -> &Adjudicator {
        &self.adjudicator
    }

    /// Classify every item; the result has one entry per item, in input order.
    pub async fn run(&self, items: Vec<BatchItem>) -> Vec<ClassifiedItem> {
        let total = items.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let limiter = Arc::new(RateLimiter::new(self.rate_limit));
        let mut slots: Vec<Option<ClassifiedItem>> = vec![None; total];
        let mut tasks = JoinSet::new();

        for (index, item) in items.iter().enumerate() {
            if item.description.trim().is_empty() {
                slots[index] = Some(ClassifiedItem::failed(
                    index,
                    item,
                    ItemStatus::Skipped,
                    EMPTY_DESCRIPTION.to_string(),
                ));
                continue;
            }

            let adjudicator = Arc::clone(&self.adjudicator);
            let semaphore = Arc::clone(&semaphore);
            let limiter = Arc::clone(&limiter);
            let item = item.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                limiter.acquire().await;
                info!("Processing {}/{}: {}", index + 1, total, item.title);
                (index, classify_item(&adjudicator, index, &item).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!("classification task aborted: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(items.iter())
            .enumerate()
            .map(|(index, (slot, item))| {
                slot.unwrap_or_else(|| {
                    ClassifiedItem::failed(
                        index,
                        item,
                        ItemStatus::Error,
                        "classification task aborted".to_string(),
                    )
                })
            })
            .collect()
    }
}

async fn classify_item(adjudicator: &Adjudicator, index: usize, item: &BatchItem) -> ClassifiedItem {
    let hints = adjudicator.pre_analyze(&item.description);
    let outcome = adjudicator.classify_with_hints(&item.description, &hints).await;

    let mut classified = match outcome {
        Ok(classification) => ClassifiedItem::succeeded(index, item, classification),
        Err(err) => {
            error!("{}: {}", item.title, err);
            ClassifiedItem::failed(index, item, ItemStatus::Error, err.to_string())
        }
    };
    classified.metaphor_pre_analysis = Some(hints);
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_classification;

    #[test]
    fn echoed_item_keys_do_not_override_the_item() {
        let verdict = parse_classification(
            r#"{"primary_class": "PRED", "status": "error", "title": "model title", "index": 7, "rationale": "kept"}"#,
        )
        .unwrap();
        let item = ClassifiedItem::succeeded(0, &BatchItem::new("Real", "предсказание"), verdict);
        assert!(item.classification.extra.contains_key("rationale"));
        assert!(!item.classification.extra.contains_key("status"));

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json.matches("\"status\"").count(), 1);

        let back: ClassifiedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, ItemStatus::Success);
        assert_eq!(back.title, "Real");
        assert_eq!(back.index, 0);
        assert_eq!(back, item);
    }
}
