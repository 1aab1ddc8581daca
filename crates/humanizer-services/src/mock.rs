//! Local stand-in for the upstream model.
//!
//! Applies a handful of lexical substitutions keyed by style and length, after a random
//! delay that imitates model latency. Used when no API key is configured.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use humanizer_core::{
    HumanizeParameters, HumanizeResult, LengthOption, SimilarityOption, StyleOption,
    TransferMode,
};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::humanizer::{HumanizeError, Humanizer};

const DEFAULT_DELAY_MS: RangeInclusive<u64> = 800..=1200;

const EXPANSIONS: &[&str] = &[
    " This is particularly noteworthy in the current context.",
    " It's worth mentioning that this creates a unique atmosphere.",
    " The implications of this are quite significant.",
    " This aspect deserves further consideration.",
];

const VARIATIONS: &[(&str, &str)] = &[("the", "the very"), ("and", "and also"), ("is", "appears to be")];

pub struct MockHumanizer {
    delay_ms: Option<RangeInclusive<u64>>,
}

impl Default for MockHumanizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHumanizer {
    pub fn new() -> Self {
        Self {
            delay_ms: Some(DEFAULT_DELAY_MS),
        }
    }

    /// Skip the simulated latency.
    pub fn without_delay() -> Self {
        Self { delay_ms: None }
    }
}

#[async_trait]
impl Humanizer for MockHumanizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn humanize(
        &self,
        mode: TransferMode,
        params: &HumanizeParameters,
    ) -> Result<HumanizeResult, HumanizeError> {
        let start = Instant::now();

        let source = match mode {
            TransferMode::Text(text) => text,
            TransferMode::File { filename, bytes } => match String::from_utf8(bytes) {
                Ok(text) if !text.trim().is_empty() => text,
                _ => format!("This is the rewritten content of {}.", filename),
            },
        };

        // ThreadRng is not Send, keep it out of the await below.
        let (content, delay) = {
            let mut rng = rand::rng();
            let delay = self
                .delay_ms
                .clone()
                .map(|range| Duration::from_millis(rng.random_range(range)));
            (transform(&source, params, &mut rng), delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(HumanizeResult::new(
            content,
            start.elapsed().as_millis() as u64,
        ))
    }
}

/// Apply length, then style, then similarity rules.
pub fn transform<R: Rng + ?Sized>(text: &str, params: &HumanizeParameters, rng: &mut R) -> String {
    let mut result = match params.length {
        LengthOption::Normal => text.to_string(),
        LengthOption::Concise => shorten(text),
        LengthOption::Expanded => {
            let expansion = EXPANSIONS.choose(rng).copied().unwrap_or_default();
            format!("{}{}", text, expansion)
        }
    };

    result = match params.style {
        StyleOption::Academic => replace_all(
            &result,
            &[
                ("it's", "it is"),
                ("can't", "cannot"),
                ("don't", "do not"),
                ("won't", "will not"),
                ("I think", "It can be argued that"),
                ("very", "notably"),
            ],
        ),
        StyleOption::Business => replace_all(
            &result,
            &[
                ("I believe", "Our analysis suggests"),
                ("maybe", "potentially"),
                ("a lot of", "substantial"),
            ],
        ),
        StyleOption::Creative => replace_all(
            &result,
            &[("walked", "strolled"), ("looked", "gazed"), ("said", "expressed")],
        ),
        StyleOption::Technical => replace_all(
            &result,
            &[("about", "approximately"), ("use", "utilize"), ("show", "demonstrate")],
        ),
        StyleOption::Friendly => {
            let replaced = replace_all(
                &result,
                &[("Hello", "Hi there"), ("Please", "Please feel free to")],
            );
            format!("{} Hope this helps!", replaced)
        }
        StyleOption::Informal => replace_all(
            &result,
            &[("it is", "it's"), ("cannot", "can't"), (".", "!")],
        ),
        StyleOption::Custom => match params.custom_style() {
            Some(custom) => format!("[{}] {}", custom, result),
            None => result,
        },
        StyleOption::Neutral | StyleOption::Reference => result,
    };

    if matches!(
        params.similarity,
        SimilarityOption::Low | SimilarityOption::Moderate
    ) {
        for (from, to) in VARIATIONS.choose_multiple(rng, 2) {
            result = result.replacen(from, to, 1);
        }
    }

    result
}

/// Keep the first half of the sentences (at least one).
fn shorten(text: &str) -> String {
    let sentences: Vec<&str> = text.split(". ").collect();
    let keep = (sentences.len() / 2).max(1);
    let mut shortened = sentences[..keep].join(". ");
    if !shortened.ends_with('.') {
        shortened.push('.');
    }
    shortened
}

fn replace_all(text: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(length: LengthOption, similarity: SimilarityOption, style: StyleOption) -> HumanizeParameters {
        HumanizeParameters::new(length, similarity, style)
    }

    #[test]
    fn test_concise_keeps_half_the_sentences() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = "One. Two. Three. Four";
        let out = transform(
            text,
            &params(LengthOption::Concise, SimilarityOption::High, StyleOption::Neutral),
            &mut rng,
        );
        assert_eq!(out, "One. Two.");
    }

    #[test]
    fn test_expanded_appends_one_elaboration() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = transform(
            "Base text.",
            &params(LengthOption::Expanded, SimilarityOption::High, StyleOption::Neutral),
            &mut rng,
        );
        assert!(out.starts_with("Base text. "));
        assert!(EXPANSIONS.iter().any(|e| out.ends_with(e.trim_start())));
    }

    #[test]
    fn test_style_substitutions() {
        let mut rng = StdRng::seed_from_u64(1);
        let academic = transform(
            "I think it's fine and we can't stop.",
            &params(LengthOption::Normal, SimilarityOption::High, StyleOption::Academic),
            &mut rng,
        );
        assert_eq!(academic, "It can be argued that it is fine and we cannot stop.");

        let informal = transform(
            "It works. it is done.",
            &params(LengthOption::Normal, SimilarityOption::Neutral, StyleOption::Informal),
            &mut rng,
        );
        assert_eq!(informal, "It works! it's done!");

        let friendly = transform(
            "Hello team.",
            &params(LengthOption::Normal, SimilarityOption::High, StyleOption::Friendly),
            &mut rng,
        );
        assert_eq!(friendly, "Hi there team. Hope this helps!");
    }

    #[test]
    fn test_custom_style_prefix() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = params(LengthOption::Normal, SimilarityOption::High, StyleOption::Custom)
            .with_custom_style("pirate");
        assert_eq!(transform("Ahoy.", &p, &mut rng), "[pirate] Ahoy.");
    }

    #[test]
    fn test_similarity_variations_change_first_occurrences() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = "the cat and the dog is here and there";
        let out = transform(
            text,
            &params(LengthOption::Normal, SimilarityOption::Low, StyleOption::Neutral),
            &mut rng,
        );
        let applied = ["the very", "and also", "appears to be"]
            .iter()
            .filter(|v| out.contains(*v))
            .count();
        assert_eq!(applied, 2);
    }

    #[tokio::test]
    async fn test_humanize_without_delay() {
        let humanizer = MockHumanizer::without_delay();
        let result = humanizer
            .humanize(
                TransferMode::Text("Plain words here.".to_string()),
                &params(LengthOption::Normal, SimilarityOption::High, StyleOption::Neutral),
            )
            .await
            .unwrap();
        assert_eq!(result.content, "Plain words here.");
        assert_eq!(result.chars, result.content.len());
        assert!(result.truncated.is_none());
    }

    #[tokio::test]
    async fn test_humanize_file_mode() {
        let humanizer = MockHumanizer::without_delay();
        let result = humanizer
            .humanize(
                TransferMode::File {
                    filename: "scan.pdf".to_string(),
                    bytes: vec![0x25, 0x50, 0xff, 0xfe],
                },
                &params(LengthOption::Normal, SimilarityOption::High, StyleOption::Neutral),
            )
            .await
            .unwrap();
        assert!(result.content.contains("scan.pdf"));
    }
}
