//! Prompt templates and the builders that fill them.
//!
//! Templates live under `data/prompts/` and are compiled in. Builders are
//! pure: identical inputs always produce byte-identical instructions.

use crate::models::ModernizationSuggestion;
use crate::{Error, Result};

pub const SYSTEM: &str = include_str!("../data/prompts/system.txt");
pub const ANALYZE: &str = include_str!("../data/prompts/analyze.txt");
pub const REWRITE: &str = include_str!("../data/prompts/rewrite.txt");
pub const REWRITE_MODERNIZATION: &str = include_str!("../data/prompts/rewrite_modernization.txt");
pub const FIND_JOBS: &str = include_str!("../data/prompts/find_jobs.txt");
pub const PITCH: &str = include_str!("../data/prompts/pitch.txt");
pub const LINKEDIN: &str = include_str!("../data/prompts/linkedin.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single left-to-right pass, so placeholder-like text
/// inside a substituted value is never expanded again. Unknown keys are left
/// in place.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(format!("The {} must not be empty.", field)));
    }
    Ok(trimmed)
}

pub fn build_analyze_prompt(job_description: &str, resume: &str) -> Result<String> {
    let job_description = require("job description", job_description)?;
    let resume = require("resume", resume)?;

    Ok(render(
        ANALYZE,
        &[("job_description", job_description), ("resume", resume)],
    ))
}

/// Build the rewrite instruction. Each modernization suggestion becomes one
/// `category: item`, reason, suggestion line separated by U+2014. With no
/// suggestions the whole "Modernization Instructions" section is left out.
pub fn build_rewrite_prompt(
    resume: &str,
    job_description: &str,
    modernization_suggestions: &[ModernizationSuggestion],
) -> Result<String> {
    let resume = require("resume", resume)?;
    let job_description = require("job description", job_description)?;

    let modernization = if modernization_suggestions.is_empty() {
        String::new()
    } else {
        let items: Vec<String> = modernization_suggestions
            .iter()
            .map(modernization_line)
            .collect();
        render(REWRITE_MODERNIZATION, &[("items", &items.join("\n"))])
    };

    Ok(render(
        REWRITE,
        &[
            ("modernization", &modernization),
            ("job_description", job_description),
            ("resume", resume),
        ],
    ))
}

fn modernization_line(suggestion: &ModernizationSuggestion) -> String {
    let mut line = format!(
        "{}: {} \u{2014} {}",
        suggestion.category,
        suggestion.item.trim(),
        suggestion.reason.trim()
    );
    if let Some(replacement) = suggestion
        .suggestion
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        line.push_str(" \u{2014} ");
        line.push_str(replacement);
    }
    line
}

pub fn build_find_jobs_prompt(resume: &str) -> Result<String> {
    let resume = require("resume", resume)?;
    Ok(render(FIND_JOBS, &[("resume", resume)]))
}

pub fn build_pitch_prompt(resume: &str, job_description: &str) -> Result<String> {
    let resume = require("resume", resume)?;
    let job_description = require("job description", job_description)?;
    Ok(render(
        PITCH,
        &[("job_description", job_description), ("resume", resume)],
    ))
}

pub fn build_linkedin_prompt(resume: &str, job_description: &str) -> Result<String> {
    let resume = require("resume", resume)?;
    let job_description = require("job description", job_description)?;
    Ok(render(
        LINKEDIN,
        &[("job_description", job_description), ("resume", resume)],
    ))
}
