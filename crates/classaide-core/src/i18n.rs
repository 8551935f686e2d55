//! UI string localization.
//!
//! Catalogs are embedded TOML tables keyed by message id. A [`Translator`]
//! is a plain value carrying its language; callers pass it where strings
//! are rendered instead of consulting shared state.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::Language;

type Catalog = HashMap<String, String>;

const EN: &str = include_str!("../locales/en.toml");
const HI: &str = include_str!("../locales/hi.toml");
const TE: &str = include_str!("../locales/te.toml");

fn parse_catalog(name: &str, source: &str) -> Catalog {
    toml::from_str(source).unwrap_or_else(|e| {
        tracing::error!("failed to parse {name} catalog: {e}");
        Catalog::new()
    })
}

fn catalog(language: Language) -> Option<&'static Catalog> {
    static EN_CATALOG: OnceLock<Catalog> = OnceLock::new();
    static HI_CATALOG: OnceLock<Catalog> = OnceLock::new();
    static TE_CATALOG: OnceLock<Catalog> = OnceLock::new();

    match language {
        Language::English => Some(EN_CATALOG.get_or_init(|| parse_catalog("en", EN))),
        Language::Hindi => Some(HI_CATALOG.get_or_init(|| parse_catalog("hi", HI))),
        Language::Telugu => Some(TE_CATALOG.get_or_init(|| parse_catalog("te", TE))),
        _ => None,
    }
}

/// Languages that ship a UI catalog.
pub fn catalog_languages() -> impl Iterator<Item = Language> {
    Language::ALL.into_iter().filter(|l| catalog(*l).is_some())
}

/// Looks up UI strings in one language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// A translator for another language; `self` is left untouched.
    pub fn with_language(&self, language: Language) -> Self {
        Self::new(language)
    }

    /// The string for `key`, or `key` itself when there is no translation.
    pub fn translate<'a>(&self, key: &'a str) -> &'a str {
        catalog(self.language)
            .and_then(|c| c.get(key))
            .map(String::as_str)
            .unwrap_or(key)
    }

    /// Whether the current catalog has an entry for `key`.
    pub fn has(&self, key: &str) -> bool {
        catalog(self.language).is_some_and(|c| c.contains_key(key))
    }
}
