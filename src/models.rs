//! Data models and structures
//!
//! Defines the request envelope sent to the advisor backend and the result
//! types every action answers with. Field names follow the camelCase wire
//! format of the backend contract.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One of the five operations the backend proxy can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Analyze,
    Rewrite,
    FindJobs,
    GeneratePitch,
    GenerateLinkedin,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Analyze,
        Action::Rewrite,
        Action::FindJobs,
        Action::GeneratePitch,
        Action::GenerateLinkedin,
    ];

    /// Wire name used in the `action` field of the request envelope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Analyze => "analyze",
            Action::Rewrite => "rewrite",
            Action::FindJobs => "find_jobs",
            Action::GeneratePitch => "generate_pitch",
            Action::GenerateLinkedin => "generate_linkedin",
        }
    }

    /// Whether the backend constrains this action's output to a JSON schema.
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            Action::Analyze | Action::FindJobs | Action::GenerateLinkedin
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Analyze => "Analysis",
            Action::Rewrite => "Resume rewrite",
            Action::FindJobs => "Job search",
            Action::GeneratePitch => "Pitch generation",
            Action::GenerateLinkedin => "LinkedIn profile generation",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzePayload {
    pub job_description: String,
    pub resume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewritePayload {
    pub original_resume: String,
    pub job_description: String,
    pub modernization_suggestions: Vec<ModernizationSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindJobsPayload {
    pub resume: String,
}

/// Payload shared by `generate_pitch` and `generate_linkedin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub resume: String,
    pub job_description: String,
}

/// Outbound `{action, payload}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum OperationRequest {
    Analyze(AnalyzePayload),
    Rewrite(RewritePayload),
    FindJobs(FindJobsPayload),
    GeneratePitch(ProfilePayload),
    GenerateLinkedin(ProfilePayload),
}

impl OperationRequest {
    pub fn action(&self) -> Action {
        match self {
            OperationRequest::Analyze(_) => Action::Analyze,
            OperationRequest::Rewrite(_) => Action::Rewrite,
            OperationRequest::FindJobs(_) => Action::FindJobs,
            OperationRequest::GeneratePitch(_) => Action::GeneratePitch,
            OperationRequest::GenerateLinkedin(_) => Action::GenerateLinkedin,
        }
    }
}

// Analysis result

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: f64,
    pub score_meaning: String,
    pub quick_summary: QuickSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_likelihood: Option<SuccessLikelihood>,
    pub jd_insights: JdInsights,
    pub alignment_table: Vec<Alignment>,
    pub opportunities_for_improvement: Vec<String>,
    pub rewrite_suggestions: Vec<RewriteSuggestion>,
    pub modernization_suggestions: Vec<ModernizationSuggestion>,
    pub keyword_gaps: Vec<KeywordGap>,
    pub section_analysis: Vec<SectionAnalysis>,
    pub formatting_issues: Vec<FormattingIssue>,
    pub in_demand_skills: Vec<InDemandSkill>,
}

impl AnalysisResult {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    /// Keyword gaps the backend marked as `Critical`, in their original order.
    pub fn critical_keyword_gaps(&self) -> impl Iterator<Item = &KeywordGap> {
        self.keyword_gaps
            .iter()
            .filter(|gap| gap.priority == KeywordPriority::Critical)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSummary {
    pub top_strength: String,
    pub top_improvement: String,
    pub final_verdict: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessLikelihood {
    pub overall_score: f64,
    pub summary: String,
    pub factors: Vec<SuccessFactor>,
}

impl SuccessLikelihood {
    pub fn band(&self) -> LikelihoodBand {
        LikelihoodBand::from_percent(self.overall_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessFactor {
    pub name: FactorName,
    pub score: f64,
    pub justification: String,
}

impl SuccessFactor {
    pub fn band(&self) -> LikelihoodBand {
        LikelihoodBand::from_percent(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorName {
    #[serde(rename = "Skill Match", alias = "SkillMatch")]
    SkillMatch,
    #[serde(rename = "Seniority Match", alias = "SeniorityMatch")]
    SeniorityMatch,
    #[serde(rename = "Industry Alignment", alias = "IndustryAlignment")]
    IndustryAlignment,
    #[serde(rename = "Location Compatibility", alias = "LocationCompatibility")]
    LocationCompatibility,
}

impl FactorName {
    pub const ALL: [FactorName; 4] = [
        FactorName::SkillMatch,
        FactorName::SeniorityMatch,
        FactorName::IndustryAlignment,
        FactorName::LocationCompatibility,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FactorName::SkillMatch => "Skill Match",
            FactorName::SeniorityMatch => "Seniority Match",
            FactorName::IndustryAlignment => "Industry Alignment",
            FactorName::LocationCompatibility => "Location Compatibility",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    pub item: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdInsights {
    pub hard_skills: Vec<InsightItem>,
    pub soft_skills: Vec<InsightItem>,
    pub compliance_requirements: Vec<InsightItem>,
    pub hidden_requirements: Vec<InsightItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    pub theme: String,
    pub jd_keyword: String,
    pub resume_evidence: String,
    #[serde(rename = "match")]
    pub match_status: MatchStatus,
}

/// How well one job requirement is evidenced in the resume.
///
/// Serialized by name; deserialization also accepts the check/warning/cross
/// glyphs older backends emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    Matched,
    Partial,
    Missing,
}

impl MatchStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.contains('\u{2714}') || raw.contains('\u{2705}') || raw.eq_ignore_ascii_case("matched")
        {
            Some(MatchStatus::Matched)
        } else if raw.contains('\u{26A0}') || raw.eq_ignore_ascii_case("partial") {
            Some(MatchStatus::Partial)
        } else if raw.contains('\u{274C}') || raw.eq_ignore_ascii_case("missing") {
            Some(MatchStatus::Missing)
        } else {
            None
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "\u{2714}\u{FE0F}",
            MatchStatus::Partial => "\u{26A0}\u{FE0F}",
            MatchStatus::Missing => "\u{274C}",
        }
    }
}

impl<'de> Deserialize<'de> for MatchStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        MatchStatus::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown match status `{}`", raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSuggestion {
    pub original_bullet: String,
    pub suggested_bullet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernizationSuggestion {
    pub item: String,
    pub category: ModernizationCategory,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModernizationCategory {
    #[serde(rename = "Outdated Skill", alias = "OutdatedSkill")]
    OutdatedSkill,
    Buzzword,
}

impl fmt::Display for ModernizationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModernizationCategory::OutdatedSkill => f.write_str("Outdated Skill"),
            ModernizationCategory::Buzzword => f.write_str("Buzzword"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGap {
    pub keyword: String,
    pub priority: KeywordPriority,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordPriority {
    Critical,
    Important,
    Recommended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionAnalysis {
    pub section_name: String,
    pub score: f64,
    pub feedback: String,
}

impl SectionAnalysis {
    pub fn band(&self) -> SectionBand {
        SectionBand::from_score(self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingIssue {
    pub issue: String,
    pub suggestion: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InDemandSkill {
    pub skill: String,
    pub reason: String,
    pub evidence: String,
}

// Generation tool results

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSuggestion {
    pub title: String,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInGeneratorResult {
    pub suggested_headlines: Vec<String>,
    pub generated_about_section: String,
    pub reasoning: Vec<String>,
}

/// Single-field body the backend wraps rewritten resume text in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RewriteResponse {
    pub rewritten_resume: String,
}

/// Single-field body the backend wraps a generated pitch in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PitchResponse {
    pub pitch: String,
}

/// Error body returned with a non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Coarse reading of the overall 0-10 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Strong,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            ScoreBand::Excellent
        } else if score >= 7.0 {
            ScoreBand::Strong
        } else if score >= 5.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Weak
        }
    }
}

/// Reading of a 0-100 likelihood, used for the overall figure and each factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LikelihoodBand {
    High,
    Good,
    Moderate,
    Low,
}

impl LikelihoodBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 85.0 {
            LikelihoodBand::High
        } else if percent >= 70.0 {
            LikelihoodBand::Good
        } else if percent >= 50.0 {
            LikelihoodBand::Moderate
        } else {
            LikelihoodBand::Low
        }
    }
}

/// Heatmap bucket for a 0-10 section score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionBand {
    Strong,
    Adequate,
    Weak,
}

impl SectionBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            SectionBand::Strong
        } else if score >= 5.0 {
            SectionBand::Adequate
        } else {
            SectionBand::Weak
        }
    }
}
