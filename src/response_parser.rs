//! Extraction and repair of the model's free-form response.
//!
//! "Return only JSON" instructions are not reliably honored: the model may
//! wrap its output in markdown fences or surround it with commentary. The
//! parser runs an ordered fallback chain over the raw text and feeds the
//! first recovered JSON object through the validation-and-defaulting pass.
//! It never repairs broken JSON syntax; a truncated or invalid body fails at
//! whichever tier finds it.

use crate::analysis::ContractAnalysis;
use crate::errors::AppError;
use regex::Regex;
use serde_json::Value;

/// Parse the model's raw output into a `ContractAnalysis`.
///
/// Fallback chain, each tier tried only when the prior one fails:
/// 1. parse the entire text as a JSON object,
/// 2. parse the body of the first markdown code fence,
/// 3. parse the span from the first `{` to the last `}`.
///
/// When no tier yields a JSON object the request fails with
/// `MalformedAnalysisResponse` carrying the raw text for diagnostic logging.
/// No retries happen here; retry policy belongs to the caller.
pub fn parse_analysis_response(raw: &str) -> Result<ContractAnalysis, AppError> {
    let value = extract_json_object(raw).ok_or_else(|| AppError::MalformedAnalysisResponse {
        raw: raw.to_string(),
    })?;
    Ok(ContractAnalysis::from_value(&value))
}

/// Locate and parse a JSON object inside arbitrary model output.
fn extract_json_object(text: &str) -> Option<Value> {
    // Tier 1: the whole response is a single JSON value.
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
        tracing::debug!("Direct parse yielded a non-object JSON value, falling back");
    }

    // Tier 2: first fenced code block, optional "json" language tag. Greedy
    // capture from the first `{` inside the fence to the last `}` before a
    // closing fence. If the fence matches but its body is broken JSON we
    // fail here; later blocks are never attempted.
    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").unwrap();
    if let Some(caps) = fence.captures(text) {
        tracing::debug!("Recovering JSON from fenced code block");
        return serde_json::from_str::<Value>(&caps[1])
            .ok()
            .filter(Value::is_object);
    }

    // Tier 3: bare-object span, first `{` to last `}`. Greedy on purpose;
    // stray braces in surrounding prose can defeat it.
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start >= end {
        return None;
    }
    tracing::debug!("Recovering JSON from bare object span");
    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(Value::is_object)
}
