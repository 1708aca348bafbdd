//! Response modes and their system instructions

use serde::{Deserialize, Serialize};
use tracing::warn;

const CONCISE_INSTRUCTION: &str = "You are NoorDeen AI, a helpful Islamic assistant. \
Provide short, easy-to-understand answers in Bangla. Keep it concise.";

const DETAILED_INSTRUCTION: &str = "You are NoorDeen AI, a knowledgeable Islamic assistant. \
Provide comprehensive answers in Bangla with references where possible. \
Use a polite and respectful tone.";

const SCHOLARLY_INSTRUCTION: &str = "You are NoorDeen AI, acting as a virtual Islamic scholar. \
Provide deep theological insights in Bangla, citing Quranic verses and Sahih Hadiths. \
Maintain the highest level of formality and wisdom.";

/// Caller-selected response style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Mode {
    Concise,
    #[default]
    Detailed,
    Scholarly,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Concise, Mode::Detailed, Mode::Scholarly];

    /// Parse a mode name, falling back to `Detailed` for anything unrecognized
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "concise" | "simple" => Self::Concise,
            "detailed" => Self::Detailed,
            "scholarly" | "scholar" => Self::Scholarly,
            other => {
                warn!(mode = other, "unrecognized response mode, using detailed");
                Self::Detailed
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
            Self::Scholarly => "scholarly",
        }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Get the system instruction for a response mode
pub fn get_system_prompt(mode: Mode) -> &'static str {
    match mode {
        Mode::Concise => CONCISE_INSTRUCTION,
        Mode::Detailed => DETAILED_INSTRUCTION,
        Mode::Scholarly => SCHOLARLY_INSTRUCTION,
    }
}
