use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::Value;
use workforce_ai::capabilities::{CapabilityError, PolicyHit, PolicySearch, TextModel};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Deterministic stand-in for the hosted text model so the service and demo
/// run without a model endpoint. Classification prompts are answered from
/// keyword checks over the quoted message; generation prompts are answered by
/// templating the tool payload embedded in the prompt.
pub(crate) struct HeuristicTextModel;

fn quoted_message(prompt: &str) -> String {
    prompt
        .rsplit_once("Message: \"")
        .map(|(_, tail)| tail.trim_end_matches('"').to_lowercase())
        .unwrap_or_else(|| prompt.to_lowercase())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

impl TextModel for HeuristicTextModel {
    fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, CapabilityError> {
        if prompt.starts_with("Detect the language") {
            return Ok("en".to_string());
        }

        if prompt.starts_with("Classify this HR employee message") {
            let message = quoted_message(prompt);
            let intent = if contains_any(
                &message,
                &["advance", "early pay", "wage access", "voorskot", "early access"],
            ) {
                "ewa_request"
            } else if contains_any(&message, &["policy", "rule", "beleid", "entitle"]) {
                "policy_question"
            } else {
                "hr_query"
            };
            return Ok(intent.to_string());
        }

        if prompt.starts_with("Does this message request an EWA advance") {
            let message = quoted_message(prompt);
            let action = if contains_any(
                &message,
                &["pay out", "payout", "disburse", "send", "issue", "transfer"],
            ) {
                "request"
            } else {
                "check"
            };
            return Ok(action.to_string());
        }

        if prompt.starts_with("Which HR record") {
            let message = quoted_message(prompt);
            let record = if contains_any(&message, &["payslip", "salary slip", "pay slip"]) {
                "payslip"
            } else if contains_any(&message, &["profile", "my details", "who am i"]) {
                "employee_profile"
            } else {
                "leave_balance"
            };
            return Ok(record.to_string());
        }

        Ok(summarize_generation_prompt(prompt))
    }
}

/// Render a plain-English summary of the tool payload carried inside the
/// generation prompt.
fn summarize_generation_prompt(prompt: &str) -> String {
    let payload = prompt
        .split_once("Tool results: ")
        .and_then(|(_, tail)| tail.rsplit_once("\n\nResponse:"))
        .and_then(|(json, _)| serde_json::from_str::<Value>(json).ok());

    let Some(payload) = payload else {
        return "I could not find anything useful in your records.".to_string();
    };

    if payload["success"] == false {
        let error = payload["error"].as_str().unwrap_or("an unknown problem");
        return format!("I couldn't complete that: {error}.");
    }

    let data = &payload["data"];

    if let Some(request_id) = data["request_id"].as_str() {
        let days = &data["days"];
        return format!(
            "Your leave request {request_id} for {days} working day(s) has been \
             submitted and is pending manager approval."
        );
    }

    if let Some(transaction_id) = data["transaction_id"].as_str() {
        return format!(
            "Your advance of R{} has been sent (reference {transaction_id}). \
             After the R{} fee you will receive R{}.",
            data["amount"], data["fee"], data["net"]
        );
    }

    if data["eligible"] == true {
        return format!(
            "You have earned R{} so far this period. R{} is available to draw now \
             (R{} is still outstanding from earlier advances).",
            data["earned"], data["available"], data["outstanding"]
        );
    }

    if data["eligible"] == false {
        let reason = data["reason"].as_str().unwrap_or("not eligible yet");
        return format!(
            "You can't draw wages yet: {reason}. About {} week(s) to go.",
            data["weeks_remaining"]
        );
    }

    if let Some(results) = data["results"].as_array() {
        if let Some(first) = results.first() {
            return format!(
                "Closest policy guidance: {} ({})",
                first["text"].as_str().unwrap_or(""),
                first["source"].as_str().unwrap_or("")
            );
        }
        return "I could not find a policy section matching your question.".to_string();
    }

    if data["gross"].is_number() {
        return format!(
            "For {} you worked {} hours at R{}/h: gross R{}, advance deductions R{}, net R{}.",
            data["period"],
            data["hours_worked"],
            data["hourly_rate"],
            data["gross"],
            data["ewa_deductions"],
            data["net"]
        );
    }

    if data["annual"].is_number() {
        return format!(
            "Your current leave balances: {} annual, {} sick, and {} family \
             responsibility day(s).",
            data["annual"], data["sick"], data["family"]
        );
    }

    if data["name"].is_string() {
        return format!(
            "{} works as {} in {} and has been with us since {}.",
            data["name"].as_str().unwrap_or(""),
            data["role"].as_str().unwrap_or(""),
            data["department"].as_str().unwrap_or(""),
            data["hire_date"].as_str().unwrap_or("")
        );
    }

    format!("Here is what I found: {data}")
}

/// In-memory policy corpus: markdown documents split into `## ` sections and
/// ranked by keyword overlap with the query.
pub(crate) struct PolicyIndex {
    chunks: Vec<PolicyHit>,
}

const BUILTIN_POLICIES: &[(&str, &str)] = &[
    (
        "leave_policy.md",
        include_str!("../policies/leave_policy.md"),
    ),
    ("ewa_policy.md", include_str!("../policies/ewa_policy.md")),
    (
        "payroll_policy.md",
        include_str!("../policies/payroll_policy.md"),
    ),
];

impl PolicyIndex {
    /// Corpus bundled with the binary, used when no policy directory is
    /// configured.
    pub(crate) fn builtin() -> Self {
        let chunks = BUILTIN_POLICIES
            .iter()
            .flat_map(|(source, content)| split_sections(content, source))
            .collect();
        Self { chunks }
    }

    /// Index every `*.md` file in a directory.
    pub(crate) fn from_dir(path: &Path) -> Result<Self, std::io::Error> {
        let mut chunks = Vec::new();
        let mut entries: Vec<_> = fs::read_dir(path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|ext| ext == "md").unwrap_or(false))
            .collect();
        entries.sort();

        for file in entries {
            let content = fs::read_to_string(&file)?;
            let source = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "policy.md".to_string());
            chunks.extend(split_sections(&content, &source));
        }

        tracing::info!(chunks = chunks.len(), "policy corpus indexed");
        Ok(Self { chunks })
    }

    pub(crate) fn len(&self) -> usize {
        self.chunks.len()
    }
}

fn split_sections(content: &str, source: &str) -> Vec<PolicyHit> {
    let mut sections: Vec<String> = Vec::new();
    for line in content.lines() {
        if line.starts_with("## ") || sections.is_empty() {
            sections.push(String::new());
        }
        if let Some(current) = sections.last_mut() {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    sections
        .into_iter()
        .map(|section| section.trim().to_string())
        .filter(|section| !section.is_empty())
        .map(|section| {
            let header = section
                .lines()
                .next()
                .unwrap_or("")
                .trim_start_matches('#')
                .trim()
                .to_string();
            PolicyHit {
                text: section.clone(),
                source: source.to_string(),
                section: header,
            }
        })
        .collect()
}

fn keyword_overlap(query: &str, text: &str) -> usize {
    let text = text.to_lowercase();
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() > 2)
        .filter(|word| text.contains(*word))
        .count()
}

impl PolicySearch for PolicyIndex {
    fn search(&self, query: &str, top_k: usize) -> Result<Vec<PolicyHit>, CapabilityError> {
        let mut scored: Vec<(usize, &PolicyHit)> = self
            .chunks
            .iter()
            .map(|chunk| (keyword_overlap(query, &chunk.text), chunk))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, chunk)| chunk.clone())
            .collect())
    }
}
