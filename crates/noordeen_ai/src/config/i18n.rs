//! Localized user-facing messages
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Language options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    #[default]
    Bangla,
    English,
}

impl Language {
    /// Parse language from string
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Self::English,
            _ => Self::Bangla,
        }
    }

    /// Get language code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bangla => "bn",
            Self::English => "en",
        }
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

/// Bangla messages
pub static MESSAGES_BN: phf::Map<&'static str, &'static str> = phf_map! {
    "no_answer" => "দুঃখিত, আমি এই মুহূর্তে উত্তর দিতে পারছি না।",
    "error_retry" => "একটি ত্রুটি ঘটেছে। অনুগ্রহ করে আবার চেষ্টা করুন।",
    "empty_query" => "অনুগ্রহ করে একটি প্রশ্ন লিখুন।",
    "persistent_failure" => "সংযোগে সমস্যা হচ্ছে। কিছুক্ষণ পরে আবার চেষ্টা করুন।",
    "mode_changed" => "উত্তরের ধরন পরিবর্তন করা হয়েছে",
    "transcript_cleared" => "কথোপকথন মুছে ফেলা হয়েছে",
    "you" => "আপনি",
    "assistant" => "নূরদ্বীন AI",
};

/// English messages
pub static MESSAGES_EN: phf::Map<&'static str, &'static str> = phf_map! {
    "no_answer" => "Sorry, no answer is available right now.",
    "error_retry" => "An error occurred. Please try again.",
    "empty_query" => "Please enter a question.",
    "persistent_failure" => "The assistant is having trouble connecting. Please try again later.",
    "mode_changed" => "Response mode changed",
    "transcript_cleared" => "Conversation cleared",
    "you" => "You",
    "assistant" => "NoorDeen AI",
};

/// Get UI messages dictionary by language
pub fn get_messages(lang: Language) -> &'static phf::Map<&'static str, &'static str> {
    match lang {
        Language::English => &MESSAGES_EN,
        Language::Bangla => &MESSAGES_BN,
    }
}

/// Get a single UI message by key and language
/// Returns the message if found, otherwise returns the key as a fallback
pub fn get_message<'a>(key: &'a str, lang: Language) -> &'a str {
    let messages = get_messages(lang);
    match messages.get(key) {
        Some(msg) => msg,
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str("en"), Language::English);
        assert_eq!(Language::from_str(" English "), Language::English);
        assert_eq!(Language::from_str("bn"), Language::Bangla);
        assert_eq!(Language::from_str("fr"), Language::Bangla);
    }

    #[test]
    fn test_language_serde() {
        let langs: Vec<Language> = serde_json::from_str(r#"["en", "english", "bangla", "xx"]"#).unwrap();
        assert_eq!(
            langs,
            vec![Language::English, Language::English, Language::Bangla, Language::Bangla]
        );
        assert_eq!(serde_json::to_string(&Language::English).unwrap(), r#""english""#);
    }

    #[test]
    fn test_get_message() {
        assert_eq!(get_message("error_retry", Language::English), "An error occurred. Please try again.");
        assert_eq!(get_message("missing_key", Language::Bangla), "missing_key");
    }

    #[test]
    fn test_tables_have_same_keys() {
        for key in MESSAGES_BN.keys() {
            assert!(MESSAGES_EN.contains_key(key), "missing English entry for {key}");
        }
        assert_eq!(MESSAGES_BN.len(), MESSAGES_EN.len());
    }
}
