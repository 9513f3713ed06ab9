use std::collections::HashMap;

/// Dictionary lemmatizer
///
/// Irregular forms are looked up in an explicit table. Tokens missing from the
/// table optionally go through the regular English noun plural rules
/// (`classes` -> `class`, `studies` -> `study`, `boxes` -> `box`,
/// `cats` -> `cat`). A rule result shorter than 3 chars keeps the original
/// token, so `was` stays `was`.
#[derive(Debug, Clone, Default)]
pub struct LemmaDictionary {
    entries: HashMap<Box<str>, Box<str>>,
    plural_rules: bool,
}

const MIN_RULE_LEMMA_LEN: usize = 3;

impl LemmaDictionary {
    /// Dictionary with only the given entries and no plural rules
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(form, lemma)| (form.as_ref().into(), lemma.as_ref().into()))
                .collect(),
            plural_rules: false,
        }
    }

    /// Built-in English irregular forms plus the regular plural rules
    pub fn english() -> Self {
        Self::from_pairs(ENGLISH_IRREGULAR.iter().copied()).with_plural_rules(true)
    }

    pub fn with_plural_rules(mut self, enabled: bool) -> Self {
        self.plural_rules = enabled;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.entries.get(token) {
            return lemma.to_string();
        }
        if self.plural_rules {
            if let Some(lemma) = singular(token) {
                if lemma.chars().count() >= MIN_RULE_LEMMA_LEN {
                    return lemma;
                }
            }
        }
        token.to_string()
    }
}

fn singular(token: &str) -> Option<String> {
    if let Some(stem) = token.strip_suffix("ies") {
        return Some(format!("{stem}y"));
    }
    if ["sses", "xes", "zzes", "ches", "shes"].iter().any(|s| token.ends_with(s)) {
        return Some(token[..token.len() - 2].to_string());
    }
    if token.ends_with('s') && !["ss", "us", "is"].iter().any(|s| token.ends_with(s)) {
        return Some(token[..token.len() - 1].to_string());
    }
    None
}

const ENGLISH_IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("oxen", "ox"),
    ("data", "datum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("leaves", "leaf"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("lives", "life"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("caches", "cache"),
    ("headaches", "headache"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("lens", "lens"),
    ("gas", "gas"),
    ("bias", "bias"),
    ("atlas", "atlas"),
    ("canvas", "canvas"),
    ("physics", "physics"),
    ("mathematics", "mathematics"),
    ("economics", "economics"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irregular_forms_use_the_table() {
        let dict = LemmaDictionary::english();
        assert_eq!(dict.lemmatize("children"), "child");
        assert_eq!(dict.lemmatize("matrices"), "matrix");
        assert_eq!(dict.lemmatize("series"), "series");
    }

    #[test]
    fn regular_plural_rules() {
        let dict = LemmaDictionary::english();
        assert_eq!(dict.lemmatize("cats"), "cat");
        assert_eq!(dict.lemmatize("classes"), "class");
        assert_eq!(dict.lemmatize("boxes"), "box");
        assert_eq!(dict.lemmatize("churches"), "church");
        assert_eq!(dict.lemmatize("buzzes"), "buzz");
        assert_eq!(dict.lemmatize("prizes"), "prize");
        assert_eq!(dict.lemmatize("studies"), "study");
        assert_eq!(dict.lemmatize("class"), "class");
        assert_eq!(dict.lemmatize("corpus"), "corpus");
        assert_eq!(dict.lemmatize("analysis"), "analysis");
    }

    #[test]
    fn short_rule_results_keep_token() {
        let dict = LemmaDictionary::english();
        assert_eq!(dict.lemmatize("was"), "was");
        assert_eq!(dict.lemmatize("its"), "its");
    }

    #[test]
    fn custom_dictionary_has_no_rules() {
        let dict = LemmaDictionary::from_pairs([("geese", "goose")]);
        assert_eq!(dict.lemmatize("geese"), "goose");
        assert_eq!(dict.lemmatize("cats"), "cats");
        assert_eq!(dict.len(), 1);
    }
}
