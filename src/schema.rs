//! Response contract for every backend action.
//!
//! Holds both halves of the contract: the JSON schema the backend hands the
//! model to constrain its output, and the parsing/validation the client runs
//! before a body is trusted. Range checks clamp rather than reject, since the
//! producer is a non-deterministic model.

use crate::models::{
    Action, AnalysisResult, FactorName, JobSuggestion, LinkedInGeneratorResult, PitchResponse,
    RewriteResponse, SuccessFactor,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashSet;

pub const SCORE_RANGE: (f64, f64) = (0.0, 10.0);
pub const SECTION_SCORE_RANGE: (f64, f64) = (1.0, 10.0);
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Parse and validate an `analyze` success body.
pub fn parse_analysis(body: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult = decode(Action::Analyze, body)?;
    sanitize_analysis(result)
}

/// Parse a `find_jobs` success body. An empty array is valid.
pub fn parse_job_suggestions(body: &str) -> Result<Vec<JobSuggestion>> {
    decode(Action::FindJobs, body)
}

pub fn parse_linkedin(body: &str) -> Result<LinkedInGeneratorResult> {
    decode(Action::GenerateLinkedin, body)
}

/// Unwraps `{"rewrittenResume": ...}` to the bare text.
pub fn parse_rewrite(body: &str) -> Result<String> {
    let wrapper: RewriteResponse = decode(Action::Rewrite, body)?;
    Ok(wrapper.rewritten_resume)
}

/// Unwraps `{"pitch": ...}` to the bare text.
pub fn parse_pitch(body: &str) -> Result<String> {
    let wrapper: PitchResponse = decode(Action::GeneratePitch, body)?;
    Ok(wrapper.pitch)
}

fn decode<T: DeserializeOwned>(action: Action, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(
            "Response for `{}` does not match the contract: {}",
            action.as_str(),
            e
        );
        Error::schema_violation(format!("{}: {}", action.as_str(), e))
    })
}

/// Clamp every numeric field into its contracted range and enforce the
/// one-factor-per-category invariant on `successLikelihood`.
pub fn sanitize_analysis(mut result: AnalysisResult) -> Result<AnalysisResult> {
    result.score = round_one_decimal(clamp_field("score", result.score, SCORE_RANGE));

    if let Some(likelihood) = result.success_likelihood.as_mut() {
        check_factors(&likelihood.factors)?;
        likelihood.overall_score = clamp_field(
            "successLikelihood.overallScore",
            likelihood.overall_score,
            PERCENT_RANGE,
        );
        for factor in &mut likelihood.factors {
            factor.score = clamp_field(factor.name.label(), factor.score, PERCENT_RANGE);
        }
    }

    for section in &mut result.section_analysis {
        section.score = clamp_field(&section.section_name, section.score, SECTION_SCORE_RANGE);
    }

    Ok(result)
}

fn check_factors(factors: &[SuccessFactor]) -> Result<()> {
    let mut seen = HashSet::new();
    for factor in factors {
        if !seen.insert(factor.name) {
            return Err(Error::schema_violation(format!(
                "duplicate success factor `{}`",
                factor.name.label()
            )));
        }
    }

    if let Some(missing) = FactorName::ALL.iter().find(|name| !seen.contains(*name)) {
        return Err(Error::schema_violation(format!(
            "missing success factor `{}`",
            missing.label()
        )));
    }

    Ok(())
}

fn clamp_field(field: &str, value: f64, (min, max): (f64, f64)) -> f64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(
            "Clamped out-of-range `{}` from {} to {} (allowed {}..={})",
            field,
            value,
            clamped,
            min,
            max
        );
    }
    clamped
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Schema the backend passes to the model for structured actions.
///
/// Returns `None` for free-text actions (`rewrite`, `generate_pitch`).
pub fn response_schema(action: Action) -> Option<Value> {
    match action {
        Action::Analyze => Some(analysis_schema()),
        Action::FindJobs => Some(array(object(
            &[
                ("title", string("A specific job title the candidate is well suited for.")),
                (
                    "justification",
                    string("Why the resume supports this title, citing concrete experience."),
                ),
            ],
            &["title", "justification"],
        ))),
        Action::GenerateLinkedin => Some(object(
            &[
                ("suggestedHeadlines", array(string("A LinkedIn headline under 220 characters."))),
                (
                    "generatedAboutSection",
                    string("A first-person LinkedIn About section."),
                ),
                ("reasoning", array(string("One reason behind the suggestions."))),
            ],
            &["suggestedHeadlines", "generatedAboutSection", "reasoning"],
        )),
        Action::Rewrite | Action::GeneratePitch => None,
    }
}

fn analysis_schema() -> Value {
    let insight_list = || {
        array(object(
            &[
                ("item", string("The requirement or skill.")),
                ("explanation", string("Why it matters for this role.")),
            ],
            &["item", "explanation"],
        ))
    };

    object(
        &[
            ("score", number("Overall alignment score from 0 to 10 with one decimal.")),
            (
                "scoreMeaning",
                string("Short label for the score, e.g. 'Strong Match'."),
            ),
            (
                "quickSummary",
                object(
                    &[
                        ("topStrength", string("The single biggest strength.")),
                        ("topImprovement", string("The single most valuable improvement.")),
                        ("finalVerdict", string("One-sentence overall verdict.")),
                    ],
                    &["topStrength", "topImprovement", "finalVerdict"],
                ),
            ),
            (
                "successLikelihood",
                object(
                    &[
                        ("overallScore", number("Interview likelihood from 0 to 100.")),
                        ("summary", string("Short explanation of the likelihood.")),
                        (
                            "factors",
                            array(object(
                                &[
                                    (
                                        "name",
                                        enum_of(&[
                                            "Skill Match",
                                            "Seniority Match",
                                            "Industry Alignment",
                                            "Location Compatibility",
                                        ]),
                                    ),
                                    ("score", number("Factor score from 0 to 100.")),
                                    ("justification", string("Evidence for the factor score.")),
                                ],
                                &["name", "score", "justification"],
                            )),
                        ),
                    ],
                    &["overallScore", "summary", "factors"],
                ),
            ),
            (
                "jdInsights",
                object(
                    &[
                        ("hardSkills", insight_list()),
                        ("softSkills", insight_list()),
                        ("complianceRequirements", insight_list()),
                        ("hiddenRequirements", insight_list()),
                    ],
                    &[
                        "hardSkills",
                        "softSkills",
                        "complianceRequirements",
                        "hiddenRequirements",
                    ],
                ),
            ),
            (
                "alignmentTable",
                array(object(
                    &[
                        ("theme", string("Requirement theme.")),
                        ("jdKeyword", string("Keyword or phrase from the job description.")),
                        ("resumeEvidence", string("Matching evidence quoted from the resume.")),
                        ("match", enum_of(&["Matched", "Partial", "Missing"])),
                    ],
                    &["theme", "jdKeyword", "resumeEvidence", "match"],
                )),
            ),
            (
                "opportunitiesForImprovement",
                array(string("A concrete concern to address.")),
            ),
            (
                "rewriteSuggestions",
                array(object(
                    &[
                        ("originalBullet", string("Bullet copied from the resume.")),
                        ("suggestedBullet", string("Improved, quantified bullet.")),
                    ],
                    &["originalBullet", "suggestedBullet"],
                )),
            ),
            (
                "modernizationSuggestions",
                array(object(
                    &[
                        ("item", string("The outdated skill or buzzword.")),
                        ("category", enum_of(&["Outdated Skill", "Buzzword"])),
                        ("reason", string("Why it reads as dated or empty.")),
                        ("suggestion", string("What to use instead.")),
                    ],
                    &["item", "category", "reason"],
                )),
            ),
            (
                "keywordGaps",
                array(object(
                    &[
                        ("keyword", string("Missing keyword from the job description.")),
                        ("priority", enum_of(&["Critical", "Important", "Recommended"])),
                        ("suggestion", string("Where and how to add it truthfully.")),
                    ],
                    &["keyword", "priority", "suggestion"],
                )),
            ),
            (
                "sectionAnalysis",
                array(object(
                    &[
                        ("sectionName", string("Resume section name.")),
                        ("score", number("Section score from 1 to 10.")),
                        ("feedback", string("Targeted feedback for the section.")),
                    ],
                    &["sectionName", "score", "feedback"],
                )),
            ),
            (
                "formattingIssues",
                array(object(
                    &[
                        ("issue", string("ATS or readability problem.")),
                        ("suggestion", string("How to fix it.")),
                        ("severity", enum_of(&["Critical", "Warning"])),
                    ],
                    &["issue", "suggestion", "severity"],
                )),
            ),
            (
                "inDemandSkills",
                array(object(
                    &[
                        ("skill", string("A market-relevant skill the candidate has.")),
                        ("reason", string("Why employers value it now.")),
                        ("evidence", string("Where the resume shows it.")),
                    ],
                    &["skill", "reason", "evidence"],
                )),
            ),
        ],
        &[
            "score",
            "scoreMeaning",
            "quickSummary",
            "successLikelihood",
            "jdInsights",
            "alignmentTable",
            "opportunitiesForImprovement",
            "rewriteSuggestions",
            "modernizationSuggestions",
            "keywordGaps",
            "sectionAnalysis",
            "formattingIssues",
            "inDemandSkills",
        ],
    )
}

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "NUMBER", "description": description })
}

fn enum_of(values: &[&str]) -> Value {
    json!({ "type": "STRING", "enum": values })
}

fn array(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

fn object(properties: &[(&str, Value)], required: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, schema)| (name.to_string(), schema.clone()))
        .collect();
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}
