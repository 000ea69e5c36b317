use super::domain::Advert;

/// Lower-cased search terms pulled out of free text.
///
/// Terms of a single character are dropped. An advert matches when any term
/// occurs anywhere in its title or synopsis, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    pub fn parse(text: &str) -> Self {
        let terms = text
            .split_whitespace()
            .filter(|word| word.chars().count() > 1)
            .map(str::to_lowercase)
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, title: &str, synopsis: &str) -> bool {
        let title = title.to_lowercase();
        let synopsis = synopsis.to_lowercase();
        self.terms
            .iter()
            .any(|term| title.contains(term.as_str()) || synopsis.contains(term.as_str()))
    }

    pub fn matches_advert(&self, advert: &Advert) -> bool {
        self.matches(&advert.title, &advert.synopsis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_text_have_no_terms() {
        assert!(SearchQuery::parse("").is_empty());
        assert!(SearchQuery::parse("   \t\n ").is_empty());
    }

    #[test]
    fn single_character_words_are_dropped() {
        let query = SearchQuery::parse("a b  cd");
        assert_eq!(query.terms(), &["cd".to_string()]);
        assert!(SearchQuery::parse("x").is_empty());
    }

    #[test]
    fn terms_are_lower_cased() {
        let query = SearchQuery::parse("LapTop Bag");
        assert_eq!(query.terms(), &["laptop".to_string(), "bag".to_string()]);
    }

    #[test]
    fn substring_match_ignores_case() {
        let query = SearchQuery::parse("lap");
        assert!(query.matches("Laptop", ""));
        assert!(query.matches("", "old LAPTOP, works"));
        assert!(!query.matches("Desk", "chair"));
    }

    #[test]
    fn any_term_in_either_field_is_enough() {
        let query = SearchQuery::parse("sofa bike");
        assert!(query.matches("Mountain bike", "barely used"));
        assert!(query.matches("Living room", "comfy sofa"));
        assert!(!query.matches("Car", "diesel"));
    }

    #[test]
    fn multibyte_single_letters_are_dropped() {
        assert!(SearchQuery::parse("ж").is_empty());
        assert!(SearchQuery::parse("Диван").matches("диван угловой", ""));
    }
}
