//! Normalize backend response bodies into one reply shape.
//!
//! The backend has shipped several response layouts (`advice`, `response`,
//! `message`; `detected_disease` vs `disease`). Field names come from
//! [`ResponseFieldConfig`] and are searched in order.

use serde_json::Value;

use super::types::DiagnosisResult;
use crate::config::ResponseFieldConfig;
use crate::language::Language;

/// What a successful backend call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteReply {
    pub text: String,
    pub diagnosis: Option<DiagnosisResult>,
}

/// Which route produced the body; only affects the default text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Advisory,
    ImageAnalysis,
}

/// Turn a 2xx response body into a [`RemoteReply`].
///
/// Prefers a structured diagnosis when any disease, analysis or
/// recommendations field is present; otherwise treats the response as free
/// text. A body that is not JSON is used verbatim.
pub fn normalize(
    body: &str,
    kind: ReplyKind,
    fields: &ResponseFieldConfig,
    submitted_filename: Option<&str>,
    language: Language,
) -> RemoteReply {
    let fallback_text = || default_text(kind, language).to_owned();

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            let text = body.trim();
            return RemoteReply {
                text: if text.is_empty() {
                    fallback_text()
                } else {
                    text.to_owned()
                },
                diagnosis: None,
            };
        }
    };

    let Some(object) = value.as_object() else {
        let text = value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(fallback_text);
        return RemoteReply {
            text,
            diagnosis: None,
        };
    };

    let text = first_string(object, &fields.text);
    let disease = first_string(object, &fields.disease);
    let analysis = first_string(object, &fields.analysis);
    let recommendations = first_text_block(object, &fields.recommendations);

    let structured = disease.is_some() || analysis.is_some() || recommendations.is_some();
    if !structured {
        return RemoteReply {
            text: text.unwrap_or_else(fallback_text),
            diagnosis: None,
        };
    }

    let healthy = disease
        .as_deref()
        .is_some_and(|d| d.eq_ignore_ascii_case(&fields.healthy_label));
    let diagnosis = DiagnosisResult {
        disease,
        healthy,
        confidence: first_confidence(object, &fields.confidence),
        analysis: analysis.clone().unwrap_or_default(),
        recommendations: recommendations.unwrap_or_default(),
        filename: first_string(object, &fields.filename)
            .or_else(|| submitted_filename.map(str::to_owned)),
    };

    RemoteReply {
        text: text.or(analysis).unwrap_or_else(fallback_text),
        diagnosis: Some(diagnosis),
    }
}

fn default_text(kind: ReplyKind, language: Language) -> &'static str {
    match kind {
        ReplyKind::Advisory => language.pick("I received your message.", "आपका संदेश मिल गया।"),
        ReplyKind::ImageAnalysis => language.pick(
            "Image analyzed successfully.",
            "छवि का विश्लेषण सफलतापूर्वक हुआ।",
        ),
    }
}

fn first_string(object: &serde_json::Map<String, Value>, names: &[String]) -> Option<String> {
    names.iter().find_map(|name| {
        object
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

/// Like [`first_string`] but also accepts an array of strings, one per line.
fn first_text_block(object: &serde_json::Map<String, Value>, names: &[String]) -> Option<String> {
    names.iter().find_map(|name| match object.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Array(items) => {
            let lines: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }
        _ => None,
    })
}

fn first_confidence(object: &serde_json::Map<String, Value>, names: &[String]) -> Option<f32> {
    names
        .iter()
        .find_map(|name| object.get(name).and_then(Value::as_f64))
        .filter(|c| c.is_finite())
        .map(|c| c.clamp(0.0, 1.0) as f32)
}
