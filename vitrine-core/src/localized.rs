//! Typed per-language overrides.
//!
//! A value is stored once in the base language, and each other language
//! carries only the fields it translates. Resolution lays the partial
//! override over the base; missing fields fall back to the base.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Lowercased language tag; stored keys are normalized on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl LanguageCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_lowercase())
    }

    pub fn fr() -> Self {
        Self::new("fr")
    }

    pub fn en() -> Self {
        Self::new("en")
    }

    pub fn ar() -> Self {
        Self::new("ar")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A type that can be partially overridden.
pub trait Overlay: Clone {
    type Partial: Clone + std::fmt::Debug + PartialEq;

    fn overlay(&self, partial: &Self::Partial) -> Self;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Localized<T>
where
    T: Overlay,
{
    pub base: T,
    pub overrides: HashMap<LanguageCode, T::Partial>,
}

impl<T> Localized<T>
where
    T: Overlay,
{
    pub fn new(base: T) -> Self {
        Self {
            base,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, lang: LanguageCode, partial: T::Partial) -> Self {
        self.overrides.insert(lang, partial);
        self
    }

    pub fn resolve(&self, lang: &LanguageCode) -> T {
        match self.overrides.get(lang) {
            Some(partial) => self.base.overlay(partial),
            None => self.base.clone(),
        }
    }
}
