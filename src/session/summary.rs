use serde::{Deserialize, Serialize};

/// Transcripts at or below this many characters are not summarized
pub const MIN_SUMMARY_CHARS: usize = 100;

pub const TOO_SHORT_ERROR: &str = "Transcript is too short to generate a summary.";

/// Generated summary with its keywords
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub keywords: Vec<String>,
}

/// Wire form stored in `curSummary`
#[derive(Debug, Serialize, Deserialize)]
struct SummaryPayload {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    keywords: Vec<String>,
}

impl Summary {
    /// Serialize to the `{summary, keywords}` transport string
    pub fn to_payload(&self) -> String {
        let payload = SummaryPayload {
            summary: self.text.clone(),
            keywords: self.keywords.clone(),
        };
        // A struct of strings always serializes
        serde_json::to_string(&payload).unwrap_or_default()
    }

    /// Parse a stored `curSummary` value.
    ///
    /// Blank input means no summary. Anything that is not the structured
    /// payload is a legacy plain-text summary with no keywords.
    pub fn from_payload(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }

        let summary = match serde_json::from_str::<SummaryPayload>(raw) {
            Ok(payload) => Summary {
                text: payload.summary,
                keywords: payload.keywords,
            },
            Err(_) => Summary {
                text: raw.to_string(),
                keywords: Vec::new(),
            },
        };

        if summary.text.is_empty() && summary.keywords.is_empty() {
            None
        } else {
            Some(summary)
        }
    }
}

/// Serialize an optional summary for the save payload
pub fn summary_field(summary: Option<&Summary>) -> String {
    summary.map(Summary::to_payload).unwrap_or_default()
}

/// Split a comma separated keyword response
pub fn parse_keywords(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn summary_prompt(transcript: &str) -> String {
    format!(
        "Summarize the following transcript in 3-4 clear sentences that capture the main points:\n\n\"{}\"\n\nSummary:",
        transcript
    )
}

pub fn keywords_prompt(transcript: &str) -> String {
    format!(
        "Extract 5-7 important keywords or key phrases from this transcript. Return just the keywords separated by commas, without numbering or explanation:\n\n\"{}\"\n\nKeywords:",
        transcript
    )
}

/// Summary cycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum SummaryState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl SummaryState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SummaryState::Loading)
    }
}

/// Character count used for the length threshold
pub fn transcript_len(text: &str) -> usize {
    text.chars().count()
}
