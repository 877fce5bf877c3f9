//! Translation tables
//!
//! A table is a flat `key -> text` JSON object. Every lookup carries its own
//! English default, so a missing or blank entry never renders as an empty
//! string. Built-in tables ship with the binary; a `<code>.json` file in the
//! configured language directory overrides the built-in table of that code.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_LANGUAGE: &str = "en";

const BUILTIN: &[(&str, &str)] = &[
    ("en", "{}"),
    ("pt-BR", include_str!("../assets/lang/pt-BR.json")),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translations {
    language: String,
    table: HashMap<String, String>,
}

impl Translations {
    pub fn from_json(language: impl Into<String>, json: &str) -> Result<Self> {
        let table: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("invalid translation table: {e}")))?;
        Ok(Self {
            language: language.into(),
            table,
        })
    }

    /// The table compiled into the binary, or an empty one for unknown codes.
    pub fn builtin(language: &str) -> Self {
        BUILTIN
            .iter()
            .find(|(code, _)| *code == language)
            .and_then(|(code, json)| Self::from_json(*code, json).ok())
            .unwrap_or_else(|| Self {
                language: language.to_string(),
                table: HashMap::new(),
            })
    }

    /// Load `language`, preferring `<lang_dir>/<language>.json` when present.
    pub fn load(language: &str, lang_dir: Option<&Path>) -> Self {
        if let Some(dir) = lang_dir {
            let path = dir.join(format!("{language}.json"));
            if path.exists() {
                match std::fs::read_to_string(&path)
                    .map_err(Error::from)
                    .and_then(|json| Self::from_json(language, &json))
                {
                    Ok(table) => {
                        tracing::debug!("Loaded translations from {:?}", path);
                        return table;
                    }
                    Err(e) => tracing::warn!("Ignoring translation file {:?}: {}", path, e),
                }
            }
        }
        Self::builtin(language)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look up `key`, falling back to `default`.
    pub fn get<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.table.get(key) {
            Some(text) if !text.trim().is_empty() => text,
            _ => default,
        }
    }

    /// Look up `key` and substitute `{name}` placeholders.
    pub fn format(&self, key: &str, default: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.get(key, default).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

/// Built-in codes plus any `*.json` tables in `lang_dir`, sorted.
pub fn available_languages(lang_dir: Option<&Path>) -> Vec<String> {
    let mut codes: Vec<String> = BUILTIN.iter().map(|(c, _)| c.to_string()).collect();
    if let Some(dir) = lang_dir {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        codes.push(stem.to_string());
                    }
                }
            }
        }
    }
    codes.sort();
    codes.dedup();
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_uses_default() {
        let t = Translations::builtin("en");
        assert_eq!(t.get("status.online", "Online"), "Online");
    }

    #[test]
    fn test_blank_value_uses_default() {
        let t = Translations::from_json("xx", r#"{"status.online":"  "}"#).unwrap();
        assert_eq!(t.get("status.online", "Online"), "Online");
    }

    #[test]
    fn test_builtin_portuguese() {
        let t = Translations::builtin("pt-BR");
        assert_eq!(t.language(), "pt-BR");
        assert_eq!(t.get("status.paused", "Paused"), "Pausado");
    }

    #[test]
    fn test_unknown_language_is_empty_table() {
        let t = Translations::builtin("fr");
        assert_eq!(t.language(), "fr");
        assert_eq!(t.get("anything", "fallback"), "fallback");
    }

    #[test]
    fn test_format_placeholders() {
        let t = Translations::from_json("xx", r#"{"add.summary":"Ok: {added}, Erro: {failed}"}"#)
            .unwrap();
        assert_eq!(
            t.format(
                "add.summary",
                "Added: {added}, Failed: {failed}",
                &[("added", "3"), ("failed", "1")]
            ),
            "Ok: 3, Erro: 1"
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Translations::from_json("xx", "[1,2]").is_err());
    }

    #[test]
    fn test_load_prefers_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pt-BR.json"), r#"{"status.paused":"Em pausa"}"#).unwrap();
        let t = Translations::load("pt-BR", Some(dir.path()));
        assert_eq!(t.get("status.paused", "Paused"), "Em pausa");
    }

    #[test]
    fn test_load_bad_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pt-BR.json"), "{oops").unwrap();
        let t = Translations::load("pt-BR", Some(dir.path()));
        assert_eq!(t.get("status.paused", "Paused"), "Pausado");
    }

    #[test]
    fn test_available_languages_includes_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("es.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let codes = available_languages(Some(dir.path()));
        assert_eq!(codes, vec!["en", "es", "pt-BR"]);
    }
}
