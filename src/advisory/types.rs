//! Query and message types exchanged with the presentation layer.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AdvisoryError, Result};
use crate::language::Language;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// An image attached to a query.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: Bytes,
    pub filename: String,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(
        data: impl Into<Bytes>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Guess an image MIME type from a file extension.
    pub fn mime_for_filename(filename: &str) -> Option<&'static str> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "bmp" => Some("image/bmp"),
            "heic" => Some("image/heic"),
            _ => None,
        }
    }

    fn validate(&self, max_bytes: usize) -> Result<()> {
        if !self.mime_type.starts_with("image/") {
            return Err(AdvisoryError::InvalidInput(format!(
                "'{}' is not an image ({})",
                self.filename, self.mime_type
            )));
        }
        if self.data.is_empty() {
            return Err(AdvisoryError::InvalidInput(format!(
                "'{}' is empty",
                self.filename
            )));
        }
        if self.data.len() > max_bytes {
            return Err(AdvisoryError::InvalidInput(format!(
                "'{}' is {} bytes; the limit is {max_bytes}",
                self.filename,
                self.data.len()
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// One user submission: text, an image, or both.
///
/// The language active at submission time travels with the query.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    image: Option<ImagePayload>,
    language: Language,
}

impl Query {
    /// A text-only query.
    pub fn from_text(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            image: None,
            language,
        }
    }

    /// An image query without text.
    pub fn from_image(image: ImagePayload, language: Language) -> Self {
        Self {
            text: String::new(),
            image: Some(image),
            language,
        }
    }

    /// Attach or replace the text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Attach or replace the image.
    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    /// The query text, trimmed. Empty for image-only queries.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Reject queries that must never reach the dispatcher.
    ///
    /// # Errors
    ///
    /// [`AdvisoryError::InvalidInput`] for blank text without an image, or an
    /// image that is not `image/*`, is empty, or exceeds `max_image_bytes`.
    pub fn validate(&self, max_image_bytes: usize) -> Result<()> {
        match &self.image {
            Some(image) => image.validate(max_image_bytes),
            None if self.text().is_empty() => Err(AdvisoryError::InvalidInput(
                "query has no text and no image".into(),
            )),
            None => Ok(()),
        }
    }

    /// How the query appears as the user's turn in a transcript.
    pub fn display_text(&self) -> String {
        match (&self.image, self.text()) {
            (Some(image), "") => format!("[Image: {}]", image.filename),
            (Some(image), text) => format!("{text}\n[Image: {}]", image.filename),
            (None, text) => text.to_owned(),
        }
    }
}

/// Structured plant-disease result returned by the image route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Disease label; `None` when the backend did not report one.
    pub disease: Option<String>,
    /// True when the backend reported the "no disease" label.
    pub healthy: bool,
    /// Confidence in `[0, 1]`.
    pub confidence: Option<f32>,
    pub analysis: String,
    pub recommendations: String,
    /// Filename the backend stored the upload under, or the submitted name.
    pub filename: Option<String>,
}

impl DiagnosisResult {
    /// Human-readable disease label: `"leaf_blight"` → `"LEAF BLIGHT"`.
    pub fn disease_label(&self, language: Language) -> Option<String> {
        if self.healthy {
            return Some(language.pick("Plant appears healthy", "पौधा स्वस्थ दिखता है").to_owned());
        }
        self.disease
            .as_ref()
            .map(|d| d.replace('_', " ").to_uppercase())
    }

    /// Multi-line summary for text-only front-ends.
    pub fn render(&self, language: Language) -> String {
        let mut lines = Vec::new();
        if let Some(filename) = &self.filename {
            lines.push(format!("{} {filename}", language.pick("File:", "फ़ाइल:")));
        }
        if let Some(label) = self.disease_label(language) {
            let heading = if self.healthy {
                language.pick("Status:", "स्थिति:")
            } else {
                language.pick("Disease detected:", "पाया गया रोग:")
            };
            lines.push(format!("{heading} {label}"));
        }
        if let Some(confidence) = self.confidence {
            lines.push(format!(
                "{} {:.1}%",
                language.pick("Confidence:", "विश्वास स्तर:"),
                confidence * 100.0
            ));
        }
        if !self.analysis.is_empty() {
            lines.push(format!(
                "{} {}",
                language.pick("Analysis:", "विश्लेषण:"),
                self.analysis
            ));
        }
        let recommendations: Vec<String> = self
            .recommendations
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| format!("• {l}"))
            .collect();
        if !recommendations.is_empty() {
            lines.push(language.pick("Recommendations:", "सुझाव:").to_owned());
            lines.extend(recommendations);
        }
        lines.join("\n")
    }
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryMessage {
    pub id: uuid::Uuid,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub diagnosis: Option<DiagnosisResult>,
    /// True when the text came from the local fallback responder.
    pub degraded: bool,
}

impl AdvisoryMessage {
    fn new(role: Role, text: String, diagnosis: Option<DiagnosisResult>, degraded: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            role,
            text,
            created_at: Utc::now(),
            diagnosis,
            degraded,
        }
    }

    /// The user's side of an exchange.
    pub fn user(query: &Query) -> Self {
        Self::new(Role::User, query.display_text(), None, false)
    }

    /// A live backend reply.
    pub fn live(text: impl Into<String>, diagnosis: Option<DiagnosisResult>) -> Self {
        Self::new(Role::Assistant, text.into(), diagnosis, false)
    }

    /// A local fallback reply.
    pub fn degraded(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text.into(), None, true)
    }

    /// An assistant-role notice (voice errors, welcome text).
    pub fn notice(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text.into(), None, false)
    }

    /// Welcome message shown at the start of a conversation.
    pub fn welcome(language: Language) -> Self {
        Self::notice(language.pick(
            "🌾 Welcome to AgriSakha! I'm your smart agriculture assistant. Ask me about crops, pests, fertilizers, irrigation, or upload plant images for analysis.",
            "🌾 एग्रीसखा में आपका स्वागत है! मैं आपका स्मार्ट कृषि सहायक हूँ। फसलों, कीटों, उर्वरकों, सिंचाई के बारे में पूछें या विश्लेषण के लिए पौधों की तस्वीरें भेजें।",
        ))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    const MAX: usize = 10 * 1024 * 1024;

    fn jpeg() -> ImagePayload {
        ImagePayload::new(vec![1, 2, 3], "leaf.jpg", "image/jpeg")
    }

    #[test]
    fn blank_text_without_image_is_invalid() {
        for text in ["", "   ", "\n\t"] {
            let err = Query::from_text(text, Language::English)
                .validate(MAX)
                .unwrap_err();
            assert_eq!(err.code(), "INVALID_INPUT");
        }
    }

    #[test]
    fn image_only_query_is_valid() {
        assert!(Query::from_image(jpeg(), Language::Hindi).validate(MAX).is_ok());
    }

    #[test]
    fn non_image_mime_is_rejected() {
        let doc = ImagePayload::new(vec![1], "notes.pdf", "application/pdf");
        let query = Query::from_text("wheat", Language::English).with_image(doc);
        assert!(query.validate(MAX).is_err());
    }

    #[test]
    fn oversized_image_is_rejected() {
        let big = ImagePayload::new(vec![0u8; 16], "big.png", "image/png");
        assert!(Query::from_image(big, Language::English).validate(8).is_err());
    }

    #[test]
    fn text_is_trimmed() {
        let query = Query::from_text("  wheat  ", Language::English);
        assert_eq!(query.text(), "wheat");
    }

    #[test]
    fn constructed_parts_read_back_through_accessors() {
        let text_only = Query::from_text("paddy blast", Language::Hindi);
        assert_eq!(text_only.text(), "paddy blast");
        assert!(text_only.image().is_none());
        assert_eq!(text_only.language(), Language::Hindi);

        let photo = Query::from_image(jpeg(), Language::English).with_text("spots?");
        assert_eq!(photo.text(), "spots?");
        assert_eq!(photo.image().map(|i| i.filename.as_str()), Some("leaf.jpg"));
    }

    #[test]
    fn display_text_mentions_image() {
        assert_eq!(
            Query::from_image(jpeg(), Language::English).display_text(),
            "[Image: leaf.jpg]"
        );
        let both = Query::from_image(jpeg(), Language::English).with_text("spots?");
        assert_eq!(both.display_text(), "spots?\n[Image: leaf.jpg]");
    }

    #[test]
    fn mime_guess_from_extension() {
        assert_eq!(ImagePayload::mime_for_filename("a.JPG"), Some("image/jpeg"));
        assert_eq!(ImagePayload::mime_for_filename("a.png"), Some("image/png"));
        assert_eq!(ImagePayload::mime_for_filename("a.txt"), None);
        assert_eq!(ImagePayload::mime_for_filename("noext"), None);
    }

    #[test]
    fn debug_hides_image_bytes() {
        let debug = format!("{:?}", jpeg());
        assert!(debug.contains("bytes: 3"));
    }

    #[test]
    fn disease_label_is_humanized() {
        let diagnosis = DiagnosisResult {
            disease: Some("leaf_blight".into()),
            healthy: false,
            confidence: Some(0.91),
            analysis: "Brown lesions".into(),
            recommendations: "Remove leaves\n\nSpray copper".into(),
            filename: Some("leaf.jpg".into()),
        };
        assert_eq!(
            diagnosis.disease_label(Language::English).as_deref(),
            Some("LEAF BLIGHT")
        );
        let rendered = diagnosis.render(Language::English);
        assert!(rendered.contains("Disease detected: LEAF BLIGHT"));
        assert!(rendered.contains("Confidence: 91.0%"));
        assert!(rendered.contains("• Remove leaves\n• Spray copper"));
    }

    #[test]
    fn healthy_diagnosis_renders_status() {
        let diagnosis = DiagnosisResult {
            disease: Some("healthy".into()),
            healthy: true,
            confidence: None,
            analysis: String::new(),
            recommendations: String::new(),
            filename: None,
        };
        assert_eq!(
            diagnosis.render(Language::English),
            "Status: Plant appears healthy"
        );
    }

    #[test]
    fn constructors_set_roles_and_flags() {
        let query = Query::from_text("rice", Language::English);
        let user = AdvisoryMessage::user(&query);
        assert_eq!(user.role, Role::User);
        assert_eq!(user.text, "rice");

        let fallback = AdvisoryMessage::degraded("demo");
        assert_eq!(fallback.role, Role::Assistant);
        assert!(fallback.degraded);

        let live = AdvisoryMessage::live("advice", None);
        assert!(!live.degraded);
        assert_ne!(live.id, fallback.id);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
