//! Core data model types for classaide.
//!
//! Languages, the kinds of material the classroom tools produce, and the
//! class roster used for batch reading assessments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages supported for generated content, UI strings and speech.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "pa")]
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Telugu,
        Language::Marathi,
        Language::Tamil,
        Language::Gujarati,
        Language::Kannada,
        Language::Malayalam,
        Language::Punjabi,
    ];

    /// Two-letter code (e.g. "hi").
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Bengali => "bn",
            Language::Telugu => "te",
            Language::Marathi => "mr",
            Language::Tamil => "ta",
            Language::Gujarati => "gu",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Punjabi => "pa",
        }
    }

    /// English name, used in prompts.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Telugu => "Telugu",
            Language::Marathi => "Marathi",
            Language::Tamil => "Tamil",
            Language::Gujarati => "Gujarati",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Punjabi => "Punjabi",
        }
    }

    /// Name in the language's own script.
    pub fn local_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Bengali => "বাংলা",
            Language::Telugu => "తెలుగు",
            Language::Marathi => "मराठी",
            Language::Tamil => "தமிழ்",
            Language::Gujarati => "ગુજરાતી",
            Language::Kannada => "ಕನ್ನಡ",
            Language::Malayalam => "മലയാളം",
            Language::Punjabi => "ਪੰਜਾਬੀ",
        }
    }

    /// Locale handed to speech engines.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Hindi => "hi-IN",
            Language::Bengali => "bn-IN",
            Language::Telugu => "te-IN",
            Language::Marathi => "mr-IN",
            Language::Tamil => "ta-IN",
            Language::Gujarati => "gu-IN",
            Language::Kannada => "kn-IN",
            Language::Malayalam => "ml-IN",
            Language::Punjabi => "pa-IN",
        }
    }
}

/// Speech locale for an arbitrary language code, `en-US` when unknown.
pub fn speech_locale_for(code: &str) -> &'static str {
    code.parse::<Language>()
        .map(Language::speech_locale)
        .unwrap_or("en-US")
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|l| l.code() == needle || l.name().to_lowercase() == needle)
            .ok_or_else(|| format!("unknown language: {s}"))
    }
}

/// Kind of hyper-local content to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Story,
    Poem,
    Explanation,
    Example,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Story => write!(f, "story"),
            ContentType::Poem => write!(f, "poem"),
            ContentType::Explanation => write!(f, "explanation"),
            ContentType::Example => write!(f, "example"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "story" => Ok(ContentType::Story),
            "poem" => Ok(ContentType::Poem),
            "explanation" => Ok(ContentType::Explanation),
            "example" => Ok(ContentType::Example),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Kind of classroom material produced per grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Worksheet,
    Quiz,
    Activity,
    Summary,
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialType::Worksheet => write!(f, "worksheet"),
            MaterialType::Quiz => write!(f, "quiz"),
            MaterialType::Activity => write!(f, "activity"),
            MaterialType::Summary => write!(f, "summary"),
        }
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "worksheet" => Ok(MaterialType::Worksheet),
            "quiz" => Ok(MaterialType::Quiz),
            "activity" => Ok(MaterialType::Activity),
            "summary" => Ok(MaterialType::Summary),
            other => Err(format!("unknown material type: {other}")),
        }
    }
}

/// One student's recorded reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Student name.
    pub student: String,
    /// Recognized speech for this attempt.
    #[serde(default)]
    pub transcript: String,
}

/// A class's readings of one expected text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    /// Unique identifier for this assessment.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The text every student was asked to read aloud.
    pub expected_text: String,
    /// Language the text is written in.
    #[serde(default)]
    pub language: Language,
    /// Grade label, free-form (e.g. "Grade 3").
    #[serde(default)]
    pub grade: Option<String>,
    /// The readings to score.
    #[serde(default)]
    pub readings: Vec<Reading>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_display_and_parse() {
        assert_eq!(Language::Hindi.to_string(), "hi");
        assert_eq!("te".parse::<Language>().unwrap(), Language::Telugu);
        assert_eq!("Tamil".parse::<Language>().unwrap(), Language::Tamil);
        assert_eq!(" PA ".parse::<Language>().unwrap(), Language::Punjabi);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn speech_locales() {
        assert_eq!(Language::English.speech_locale(), "en-US");
        assert_eq!(Language::Malayalam.speech_locale(), "ml-IN");
        assert_eq!(speech_locale_for("kn"), "kn-IN");
        assert_eq!(speech_locale_for("xx"), "en-US");
    }

    #[test]
    fn every_language_roundtrips_through_its_code() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn language_serde_uses_codes() {
        let json = serde_json::to_string(&Language::Bengali).unwrap();
        assert_eq!(json, "\"bn\"");
        let lang: Language = serde_json::from_str("\"gu\"").unwrap();
        assert_eq!(lang, Language::Gujarati);
    }

    #[test]
    fn content_and_material_types_parse() {
        assert_eq!("Poem".parse::<ContentType>().unwrap(), ContentType::Poem);
        assert_eq!(MaterialType::Quiz.to_string(), "quiz");
        assert!("essay".parse::<MaterialType>().is_err());
    }
}
