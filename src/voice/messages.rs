//! User-visible voice messages in both languages.

use super::capability::CaptureErrorKind;
use crate::error::Capability;
use crate::language::Language;

/// Text shown when a capture cycle fails.
pub fn capture_error(kind: &CaptureErrorKind, language: Language) -> String {
    let prefix = language.pick("Speech recognition error: ", "वाक् पहचान त्रुटि: ");
    let detail = match kind {
        CaptureErrorKind::NoSpeech => language.pick(
            "No speech detected. Please speak clearly and try again.",
            "कोई आवाज़ नहीं मिली। कृपया साफ़ बोलें और फिर से कोशिश करें।",
        ),
        CaptureErrorKind::AudioCapture => language.pick(
            "Microphone not accessible. Please check your microphone.",
            "माइक्रोफ़ोन उपलब्ध नहीं है। कृपया अपना माइक्रोफ़ोन जाँचें।",
        ),
        CaptureErrorKind::NotAllowed => permission_denied(language),
        CaptureErrorKind::Network => language.pick(
            "Network error. Please check your internet connection.",
            "नेटवर्क त्रुटि। कृपया अपना इंटरनेट कनेक्शन जाँचें।",
        ),
        CaptureErrorKind::LanguageNotSupported => language.pick(
            "Language not supported. Switching to English.",
            "भाषा समर्थित नहीं है। अंग्रेज़ी पर स्विच किया जा रहा है।",
        ),
        CaptureErrorKind::Other(code) => return format!("{prefix}{code}"),
    };
    format!("{prefix}{detail}")
}

pub fn permission_denied(language: Language) -> &'static str {
    language.pick(
        "Microphone permission denied. Please allow microphone access.",
        "माइक्रोफ़ोन की अनुमति नहीं मिली। कृपया माइक्रोफ़ोन की अनुमति दें।",
    )
}

/// Text shown when a voice affordance is missing on this platform.
pub fn unsupported_message(capability: Capability, language: Language) -> &'static str {
    match capability {
        Capability::SpeechRecognition => language.pick(
            "Speech recognition is not supported here. Please type your question instead.",
            "यहाँ वाक् पहचान उपलब्ध नहीं है। कृपया अपना प्रश्न टाइप करें।",
        ),
        Capability::SpeechSynthesis => language.pick(
            "Speech playback is not supported here.",
            "यहाँ आवाज़ में सुनने की सुविधा उपलब्ध नहीं है।",
        ),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn english_messages_keep_prefix() {
        let msg = capture_error(&CaptureErrorKind::NoSpeech, Language::English);
        assert_eq!(
            msg,
            "Speech recognition error: No speech detected. Please speak clearly and try again."
        );
    }

    #[test]
    fn unknown_code_is_shown_verbatim() {
        let msg = capture_error(&CaptureErrorKind::Other("bad-grammar".into()), Language::English);
        assert!(msg.ends_with("bad-grammar"));
    }

    #[test]
    fn hindi_variants_exist() {
        let msg = capture_error(&CaptureErrorKind::Network, Language::Hindi);
        assert!(msg.starts_with("वाक् पहचान त्रुटि"));
        assert!(unsupported_message(Capability::SpeechSynthesis, Language::Hindi).contains("उपलब्ध नहीं"));
    }
}
