//! Recognition error translation
//!
//! Maps raw engine error codes onto a closed set of user-facing
//! categories. Recognition backends use the browser-style code
//! vocabulary ("no-speech", "not-allowed", ...), and anything the
//! mapping does not know about lands in `Unknown` rather than failing.

/// Closed set of user-facing recognition error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No speech was detected during the capture turn
    NoSpeech,
    /// Microphone or audio capture failure
    AudioCapture,
    /// The user or platform denied microphone permission
    PermissionDenied,
    /// Network failure while the engine was recognizing
    Network,
    /// The capture turn was aborted before completing
    Aborted,
    /// The recognition service refused the request
    ServiceDenied,
    /// The grammar supplied to the engine was rejected
    BadGrammar,
    /// The configured language is not supported by the engine
    UnsupportedLanguage,
    /// The host exposes no speech-recognition facility at all
    UnsupportedCapability,
    /// Anything the mapping does not recognize
    Unknown,
}

impl ErrorCategory {
    /// Stable lowercase name, used in logs and status output
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::NoSpeech => "no-speech",
            ErrorCategory::AudioCapture => "audio-capture",
            ErrorCategory::PermissionDenied => "permission-denied",
            ErrorCategory::Network => "network",
            ErrorCategory::Aborted => "aborted",
            ErrorCategory::ServiceDenied => "service-denied",
            ErrorCategory::BadGrammar => "bad-grammar",
            ErrorCategory::UnsupportedLanguage => "unsupported-language",
            ErrorCategory::UnsupportedCapability => "unsupported-capability",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified recognition failure, keeping the raw engine code for
/// diagnosis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionError {
    pub category: ErrorCategory,
    pub raw_code: String,
}

impl std::fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.raw_code == self.category.as_str() {
            write!(f, "{}", self.category)
        } else {
            write!(f, "{} (engine code {:?})", self.category, self.raw_code)
        }
    }
}

/// Translate a raw engine error code into a [`RecognitionError`]
///
/// Total over all inputs: unmapped codes become `Unknown` and are logged
/// at debug level so new engine vocabularies can be diagnosed.
pub fn translate(raw_code: &str) -> RecognitionError {
    let normalized = raw_code.trim().to_lowercase();

    let category = match normalized.as_str() {
        "no-speech" => ErrorCategory::NoSpeech,
        "audio-capture" => ErrorCategory::AudioCapture,
        "not-allowed" => ErrorCategory::PermissionDenied,
        "network" => ErrorCategory::Network,
        "aborted" => ErrorCategory::Aborted,
        "service-not-allowed" => ErrorCategory::ServiceDenied,
        "bad-grammar" => ErrorCategory::BadGrammar,
        "language-not-supported" => ErrorCategory::UnsupportedLanguage,
        "not-supported" => ErrorCategory::UnsupportedCapability,
        _ => {
            tracing::debug!("unmapped recognition error code: {:?}", raw_code);
            ErrorCategory::Unknown
        }
    };

    RecognitionError {
        category,
        raw_code: raw_code.to_string(),
    }
}
