//! Task tags and provider identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a generation request is for.
///
/// The seven named tags are strict-JSON tasks: the gateway instructs the
/// provider to answer with JSON only, and callers are expected to parse
/// the result. Any other tag is free-form generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Task {
    ProfileStructuring,
    ResumeGeneration,
    AtsAnalysis,
    CoverLetterGeneration,
    PortfolioGeneration,
    RecruiterEval,
    AchievementRewrite,
    #[default]
    General,
    /// Any unrecognised tag, kept verbatim.
    Other(String),
}

impl Task {
    /// Every tag that requires JSON-only output.
    pub const STRICT_JSON: [Task; 7] = [
        Task::ProfileStructuring,
        Task::ResumeGeneration,
        Task::AtsAnalysis,
        Task::CoverLetterGeneration,
        Task::PortfolioGeneration,
        Task::RecruiterEval,
        Task::AchievementRewrite,
    ];

    /// The wire tag for this task.
    pub fn as_str(&self) -> &str {
        match self {
            Task::ProfileStructuring => "profile_structuring",
            Task::ResumeGeneration => "resume_generation",
            Task::AtsAnalysis => "ats_analysis",
            Task::CoverLetterGeneration => "cover_letter_generation",
            Task::PortfolioGeneration => "portfolio_generation",
            Task::RecruiterEval => "recruiter_eval",
            Task::AchievementRewrite => "achievement_rewrite",
            Task::General => "general",
            Task::Other(tag) => tag,
        }
    }

    /// Whether the provider must be told to emit JSON only.
    pub fn is_strict_json(&self) -> bool {
        !matches!(self, Task::General | Task::Other(_))
    }
}

impl From<&str> for Task {
    fn from(tag: &str) -> Self {
        match tag {
            "profile_structuring" => Task::ProfileStructuring,
            "resume_generation" => Task::ResumeGeneration,
            "ats_analysis" => Task::AtsAnalysis,
            "cover_letter_generation" => Task::CoverLetterGeneration,
            "portfolio_generation" => Task::PortfolioGeneration,
            "recruiter_eval" => Task::RecruiterEval,
            "achievement_rewrite" => Task::AchievementRewrite,
            "general" => Task::General,
            other => Task::Other(other.to_string()),
        }
    }
}

impl From<String> for Task {
    fn from(tag: String) -> Self {
        Task::from(tag.as_str())
    }
}

impl From<Task> for String {
    fn from(task: Task) -> Self {
        match task {
            Task::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two provider slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Tried first unless the caller prefers the secondary (Gemini by default).
    Primary,
    /// Failover target (Groq by default).
    Secondary,
}

impl ProviderId {
    /// The other slot.
    pub fn other(self) -> Self {
        match self {
            ProviderId::Primary => ProviderId::Secondary,
            ProviderId::Secondary => ProviderId::Primary,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Primary => "primary",
            ProviderId::Secondary => "secondary",
        }
    }

    /// Lenient preference parsing for string-typed callers.
    ///
    /// Accepts slot names and the default backends' names; anything else
    /// means "no preference".
    pub fn parse_preference(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "primary" | "gemini" => Some(ProviderId::Primary),
            "secondary" | "groq" => Some(ProviderId::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
