use async_trait::async_trait;
use tracing::debug;

use super::interface::TranslateInterface;
use crate::error::TranslateError;

pub static MOCK_SUPPORTED_LANGUAGES: [&str; 4] = ["ta", "hi", "kn", "bn"];

/// English phrase followed by its translation in each of
/// `MOCK_SUPPORTED_LANGUAGES`, in the same order.
const MOCK_TRANSLATIONS: &[(&str, [&str; 4])] = &[
    ("Hello", ["வணக்கம்", "नमस्ते", "ನಮಸ್ತೆ", "হ্যালো"]),
    (
        "How are you?",
        ["எப்படி இருக்கிறீர்கள்?", "आप कैसे हैं?", "ಹೇಗಿದ್ದೀರಾ?", "কেমন আছেন?"],
    ),
    ("Thank you", ["நன்றி", "धन्यवाद", "ಧನ್ಯವಾದಗಳು", "ধন্যবাদ"]),
    ("Good morning", ["காலை வணக்கம்", "सुप्रभात", "ಶುಭೋದಯ", "শুভ সকাল"]),
    (
        "I love programming",
        [
            "நான் நிரலாக்கத்தை விரும்புகிறேன்",
            "मुझे प्रोग्रामिंग पसंद है",
            "ನನಗೆ ಪ್ರೋಗ್ರಾಮಿಂಗ್ ಇಷ್ಟ",
            "আমি প্রোগ্রামিং ভালোবাসি",
        ],
    ),
    (
        "The quick brown fox jumps over the lazy dog.",
        [
            "வேகமான பழுப்பு நரி சோம்பேறி நாயின் மீது குதிக்கிறது.",
            "तेज भूरी लोमड़ी आलसी कुत्ते के ऊपर कूदती है।",
            "ವೇಗದ ಕಂದು ನರಿ ಸೋಮಾರಿ ನಾಯಿಯ ಮೇಲೆ ನೆಗೆಯುತ್ತದೆ.",
            "দ্রুত বাদামী শিয়াল অলস কুকুরের উপর ঝাঁপিয়ে পড়ে।",
        ],
    ),
    (
        "This is a test sentence.",
        [
            "இது ஒரு சோதனை வாக்கியம்.",
            "यह एक परीक्षण वाक्य है।",
            "ಇದು ಒಂದು ಪರೀಕ್ಷಾ ವಾಕ್ಯ.",
            "এটি একটি পরীক্ষা বাক্য।",
        ],
    ),
];

/// Dictionary-backed translator for demos and tests.
///
/// Lookups are exact string matches against English source phrases. Text
/// missing from the dictionary is not an error: it yields a deterministic
/// placeholder saying no mock translation exists.
#[derive(Debug, Clone, Default)]
pub struct MockTranslator;

impl MockTranslator {
    pub fn new() -> Self {
        Self
    }

    fn lookup(text: &str, language_index: usize) -> Option<&'static str> {
        MOCK_TRANSLATIONS
            .iter()
            .find(|(source, _)| *source == text)
            .map(|(_, translations)| translations[language_index])
    }

    pub fn placeholder(text: &str, target_language: &str) -> String {
        format!(
            "Translation for '{}' to '{}' not available in mock. (Mock: {} -> {})",
            text, target_language, text, target_language
        )
    }
}

#[async_trait]
impl TranslateInterface for MockTranslator {
    fn name(&self) -> &str {
        "mock"
    }

    fn supported_languages(&self) -> Option<&[&'static str]> {
        Some(MOCK_SUPPORTED_LANGUAGES.as_slice())
    }

    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, TranslateError> {
        let language_index = MOCK_SUPPORTED_LANGUAGES
            .iter()
            .position(|lang| *lang == target_language)
            .ok_or_else(|| TranslateError::UnsupportedLanguage(target_language.to_string()))?;

        // The dictionary only holds English sources
        let english_source = matches!(source_language, "auto" | "en");
        let translated = english_source
            .then(|| Self::lookup(text, language_index))
            .flatten();

        match translated {
            Some(translated) => Ok(translated.to_string()),
            None => {
                debug!("No mock translation for '{}' -> {}", text, target_language);
                Ok(Self::placeholder(text, target_language))
            }
        }
    }
}
