pub mod client;

// -----------------------------------------------------------------------------

use crate::prelude::Result;
use async_trait::async_trait;

/// Abstract interface over the hosted completion service.
///
#[async_trait]
pub trait Completions {
    /// Sends one prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// -----------------------------------------------------------------------------

/// Pulls the sentiment and tone labels out of a free-form completion.
///
/// The provider gives no schema guarantee, so parsing is heuristic: the first
/// line containing `sentiment` and the first containing `tone`
/// (case-insensitive) are selected, and the label is whatever follows the
/// last colon on that line, trimmed. A response matching neither line leaves
/// both labels absent rather than failing.
///
pub fn extract_labels(completion: &str) -> (Option<String>, Option<String>) {
    let mut sentiment = None;
    let mut tone = None;

    for line in completion.lines() {
        let lowercase = line.to_lowercase();
        if sentiment.is_none() && lowercase.contains("sentiment") {
            sentiment = Some(label_of(line));
        }
        if tone.is_none() && lowercase.contains("tone") {
            tone = Some(label_of(line));
        }
    }

    (sentiment, tone)
}

fn label_of(line: &str) -> String {
    line.rsplit(':').next().unwrap_or(line).trim().to_owned()
}

// -----------------------------------------------------------------------------
