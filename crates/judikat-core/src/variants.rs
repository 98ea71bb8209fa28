//! Query Variant Generator
//!
//! Expands one user question into a bounded set of alternative search
//! strings that preserve the original intent. The literal question is
//! always element 0 - downstream quality depends on never losing it,
//! whatever the model returns. Generation fails soft: any model failure
//! degrades to single-query search, never to a failed request.

use std::sync::Arc;

use crate::providers::ChatModel;
use crate::record::QueryVariant;

/// Instruction for the query-generation model. Output contract: one plain
/// query per line, Czech legal terminology, no numbering or bullets.
pub const QUERY_GENERATION_PROMPT: &str = "Jste expert na generování vyhledávacích \
dotazů pro právní databáze. Vezměte uživatelskou otázku a vygenerujte 2-3 \
optimalizované vyhledávací dotazy, které pomohou najít relevantní soudní rozhodnutí.

Pravidla:
1. Každý dotaz zachycuje jiný aspekt nebo perspektivu původní otázky
2. Používejte právní terminologii a klíčová slova
3. Buďte konkrétní - vyhněte se příliš obecným dotazům
4. Dotazy jsou v češtině, každý na samostatném řádku
5. Nepoužívejte číslování ani odrážky - pouze čisté dotazy

Příklad:
Otázka: \"Může zaměstnavatel propustit zaměstnance bez udání důvodu?\"

výpověď bez udání důvodu pracovní právo
okamžité zrušení pracovního poměru zaměstnavatelem
ochrana zaměstnance před neodůvodněným propuštěním

Nyní vygenerujte dotazy pro následující otázku:";

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Validation band for generated candidates. Lines outside the band are
/// assumed malformed (prose, preambles, fragments) and dropped.
#[derive(Debug, Clone)]
pub struct VariantConfig {
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self { min_words: 2, max_words: 12 }
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Expands a question into query variants via an injected chat model.
/// Stateless between calls; restartable.
pub struct QueryVariantGenerator {
    model: Arc<dyn ChatModel>,
    config: VariantConfig,
}

impl QueryVariantGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self::with_config(model, VariantConfig::default())
    }

    pub fn with_config(model: Arc<dyn ChatModel>, config: VariantConfig) -> Self {
        Self { model, config }
    }

    /// Generate up to `count` variants for a question, the original
    /// included as element 0.
    ///
    /// Model output is split into lines; empty lines, list-marker lines
    /// and candidates outside the word band are dropped. If fewer usable
    /// candidates remain than requested, the list is simply shorter - no
    /// text is fabricated. An outright model failure returns only the
    /// original question.
    pub async fn generate(&self, question: &str, count: usize) -> Vec<QueryVariant> {
        let mut variants = vec![QueryVariant::original(question)];
        if count <= 1 {
            return variants;
        }

        let raw = match self.model.complete(QUERY_GENERATION_PROMPT, question).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("query generation failed, using original question only: {}", err);
                return variants;
            }
        };

        for line in raw.lines() {
            if variants.len() >= count {
                break;
            }
            let candidate = line.trim();
            if candidate.is_empty() || has_list_marker(candidate) {
                continue;
            }
            let words = candidate.split_whitespace().count();
            if words < self.config.min_words || words > self.config.max_words {
                continue;
            }
            if variants.iter().any(|v| v.text == candidate) {
                continue;
            }
            let index = variants.len();
            variants.push(QueryVariant::generated(index, candidate.to_string()));
        }

        tracing::debug!("generated {} query variants (requested {})", variants.len(), count);
        variants
    }
}

/// Obvious list-marker prefixes: bullets, or leading digits followed by a
/// dot or closing parenthesis.
fn has_list_marker(line: &str) -> bool {
    if line.starts_with('-') || line.starts_with('*') || line.starts_with('•') {
        return true;
    }
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    matches!(line[digits.len()..].chars().next(), Some('.') | Some(')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use async_trait::async_trait;

    /// Chat model returning a canned response or a canned failure.
    struct FakeChat {
        response: Result<&'static str, ()>,
    }

    #[async_trait]
    impl ChatModel for FakeChat {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            match self.response {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(ProviderError::Timeout),
            }
        }
    }

    fn generator(response: Result<&'static str, ()>) -> QueryVariantGenerator {
        QueryVariantGenerator::new(Arc::new(FakeChat { response }))
    }

    #[tokio::test]
    async fn test_original_question_is_always_first() {
        let generator = generator(Ok("vypořádání společného jmění manželů\nrozvod sporný"));
        let variants = generator.generate("rozvod manželství", 3).await;

        assert_eq!(variants[0].text, "rozvod manželství");
        assert_eq!(variants[0].label(), "original");
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[1].label(), "generated-1");
    }

    #[tokio::test]
    async fn test_count_bounds_output_length() {
        let generator = generator(Ok("dotaz číslo jedna\ndotaz číslo dva\ndotaz číslo tři"));
        let variants = generator.generate("otázka?", 2).await;
        assert_eq!(variants.len(), 2);

        let variants = generator.generate("otázka?", 1).await;
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].label(), "original");
    }

    #[tokio::test]
    async fn test_list_markers_and_empty_lines_dropped() {
        let response = "\n1. číslovaný dotaz\n- odrážkový dotaz\n* hvězdičkový dotaz\n2) závorkový dotaz\nplatný právní dotaz\n\n";
        let generator = generator(Ok(response));
        let variants = generator.generate("otázka?", 5).await;

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].text, "platný právní dotaz");
    }

    #[tokio::test]
    async fn test_word_band_enforced() {
        let response = "slovo\ndva slova stačí\ntento vygenerovaný dotaz má rozhodně mnohem více než dvanáct jednotlivých slov celkem dohromady";
        let generator = generator(Ok(response));
        let variants = generator.generate("otázka?", 5).await;

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].text, "dva slova stačí");
        for variant in &variants[1..] {
            let words = variant.text.split_whitespace().count();
            assert!((2..=12).contains(&words));
        }
    }

    #[tokio::test]
    async fn test_short_output_returned_short_without_padding() {
        let generator = generator(Ok("jediný použitelný dotaz"));
        let variants = generator.generate("otázka?", 4).await;
        assert_eq!(variants.len(), 2);
    }

    #[tokio::test]
    async fn test_model_failure_degrades_to_original() {
        let generator = generator(Err(()));
        let variants = generator.generate("rozvod manželství", 3).await;

        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].text, "rozvod manželství");
    }

    #[tokio::test]
    async fn test_duplicate_candidates_skipped() {
        let generator = generator(Ok("rozvod manželství\nstejný dotaz dvakrát\nstejný dotaz dvakrát"));
        let variants = generator.generate("rozvod manželství", 5).await;

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[1].text, "stejný dotaz dvakrát");
    }

    #[test]
    fn test_list_marker_detection() {
        assert!(has_list_marker("1. dotaz"));
        assert!(has_list_marker("12) dotaz"));
        assert!(has_list_marker("- dotaz"));
        assert!(has_list_marker("• dotaz"));
        assert!(!has_list_marker("dotaz bez značky"));
        assert!(!has_list_marker("§ 24 odst. 1"));
    }
}
