//! Labels for the trail view.
//!
//! A [`Dictionary`] is built once and handed to whatever renders; nothing here
//! is global. Lookups fall back to the key itself, so a missing entry shows up
//! as `nature.route.gain` instead of an empty caption.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    Gl,
    En,
    Fr,
    De,
}

impl Language {
    pub const ALL: [Language; 5] = [Self::Es, Self::Gl, Self::En, Self::Fr, Self::De];

    pub fn code(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::Gl => "gl",
            Self::En => "en",
            Self::Fr => "fr",
            Self::De => "de",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code.trim()))
    }
}

/// Labels used by the map overlays, the elevation chart and its legend,
/// in es / gl / en / fr / de order.
const BUILTIN: &[(&str, [&str; 5])] = &[
    ("nature.route.start", ["Inicio", "Inicio", "Start", "Départ", "Start"]),
    ("nature.route.end", ["Fin", "Fin", "Finish", "Arrivée", "Ziel"]),
    ("nature.route.distance", ["Distancia", "Distancia", "Distance", "Distance", "Distanz"]),
    ("nature.route.km", ["km", "km", "km", "km", "km"]),
    ("nature.route.gain", ["Desnivel +", "Desnivel +", "Elevation gain", "Dénivelé +", "Anstieg"]),
    ("nature.route.meters", ["m", "m", "m", "m", "m"]),
    ("nature.route.max_ele", ["Altitud máx.", "Altitude máx.", "Max elevation", "Altitude max.", "Max. Höhe"]),
    ("nature.route.download", ["Descargar GPX", "Descargar GPX", "Download GPX", "Télécharger GPX", "GPX herunterladen"]),
    ("nature.route.elevation_profile", ["Perfil de elevación", "Perfil de elevación", "Elevation profile", "Profil altimétrique", "Höhenprofil"]),
    ("nature.route.elevation_desc", ["Pendiente a lo largo de la ruta", "Pendente ao longo da ruta", "Slope along the route", "Pente le long de l'itinéraire", "Steigung entlang der Route"]),
    ("nature.route.steep", ["Empinado", "Empinado", "Steep", "Raide", "Steil"]),
    ("nature.route.moderate", ["Moderado", "Moderado", "Moderate", "Modéré", "Mittel"]),
    ("nature.route.easy", ["Suave", "Suave", "Easy", "Facile", "Leicht"]),
    ("nature.route.flat", ["Llano", "Chan", "Flat", "Plat", "Flach"]),
    ("nature.route.descent", ["Descenso", "Descenso", "Descent", "Descente", "Abstieg"]),
];

/// Immutable key -> language -> text table.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<String, HashMap<Language, String>>,
}

impl Dictionary {
    /// The trail view's own labels.
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(key, texts)| {
                let per_lang = Language::ALL
                    .into_iter()
                    .zip(texts.iter())
                    .map(|(lang, text)| (lang, text.to_string()))
                    .collect();
                (key.to_string(), per_lang)
            })
            .collect();
        Self { entries }
    }

    /// Load `{"key": {"es": "...", "en": "..."}}`. Unknown language codes are ignored.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, HashMap<String, String>> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|(key, texts)| {
                let per_lang = texts
                    .into_iter()
                    .filter_map(|(code, text)| Language::from_code(&code).map(|l| (l, text)))
                    .collect();
                (key, per_lang)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Texts of `other` replace same-key, same-language texts of `self`.
    pub fn merged(mut self, other: Dictionary) -> Self {
        for (key, texts) in other.entries {
            self.entries.entry(key).or_default().extend(texts);
        }
        self
    }

    pub fn translate<'a>(&'a self, key: &'a str, lang: Language) -> &'a str {
        self.entries
            .get(key)
            .and_then(|texts| texts.get(&lang))
            .map(String::as_str)
            .filter(|text| !text.is_empty())
            .unwrap_or(key)
    }

    pub fn labels(&self, lang: Language) -> Labels<'_> {
        Labels { dict: self, lang }
    }
}

/// A dictionary bound to one language.
#[derive(Debug, Clone, Copy)]
pub struct Labels<'a> {
    dict: &'a Dictionary,
    lang: Language,
}

impl<'a> Labels<'a> {
    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn t(&self, key: &'a str) -> &'a str {
        self.dict.translate(key, self.lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SlopeClass;

    #[test]
    fn test_builtin_covers_legend() {
        let dict = Dictionary::builtin();
        for lang in Language::ALL {
            for class in SlopeClass::ALL {
                assert_ne!(dict.translate(class.label_key(), lang), class.label_key());
            }
        }
        assert_eq!(dict.translate("nature.route.steep", Language::De), "Steil");
        assert_eq!(dict.translate("nature.route.flat", Language::Gl), "Chan");
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let dict = Dictionary::builtin();
        assert_eq!(dict.translate("booking.submit", Language::En), "booking.submit");
    }

    #[test]
    fn test_from_json_missing_language_falls_back() {
        let dict = Dictionary::from_json(
            r#"{"nav.book": {"es": "Reservar", "en": "Book", "xx": "?"}, "empty": {"en": ""}}"#,
        )
        .unwrap();
        assert_eq!(dict.translate("nav.book", Language::En), "Book");
        assert_eq!(dict.translate("nav.book", Language::Fr), "nav.book");
        assert_eq!(dict.translate("empty", Language::En), "empty");
    }

    #[test]
    fn test_merged_overrides() {
        let custom = Dictionary::from_json(r#"{"nature.route.start": {"en": "Trailhead"}}"#).unwrap();
        let dict = Dictionary::builtin().merged(custom);
        let labels = dict.labels(Language::En);
        assert_eq!(labels.t("nature.route.start"), "Trailhead");
        assert_eq!(labels.t("nature.route.end"), "Finish");
        // languages the override leaves out keep their builtin text
        assert_eq!(dict.translate("nature.route.start", Language::Es), "Inicio");
        assert_eq!(dict.translate("nature.route.start", Language::Gl), "Inicio");
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("FR"), Some(Language::Fr));
        assert_eq!(Language::from_code("pt"), None);
        assert_eq!(Language::default(), Language::Es);
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(Dictionary::from_json("[1, 2]").is_err());
    }
}
