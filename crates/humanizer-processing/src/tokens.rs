//! Token accounting against the upstream model's context window.
//!
//! Counting and truncation use the model's BPE tokenizer when one is available. When a
//! cut cannot be decoded cleanly, the text is cut on a character boundary instead and
//! the result is still re-counted with the tokenizer. Without any tokenizer the budgeter
//! falls back to a character heuristic and says so in the returned [`Truncation`].

use std::fmt;
use std::sync::Arc;

use humanizer_core::constants::{OUTPUT_TOKEN_RESERVE, PROMPT_OVERHEAD_RESERVE};
use tiktoken_rs::CoreBPE;

/// Characters assumed per token when no tokenizer can be used.
const CHARS_PER_TOKEN: usize = 2;

/// Tail tokens dropped, one at a time, when a cut lands inside a multi-byte sequence.
const MAX_DECODE_RETRIES: usize = 8;

/// How a [`Truncation`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncationMethod {
    /// The text already fit.
    Unchanged,
    Tokenizer,
    /// Approximation at two characters per token.
    CharacterHeuristic,
}

impl fmt::Display for TruncationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TruncationMethod::Unchanged => "unchanged",
            TruncationMethod::Tokenizer => "tokenizer",
            TruncationMethod::CharacterHeuristic => "character_heuristic",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub text: String,
    pub was_truncated: bool,
    /// Token count of the input before truncation
    pub original_tokens: usize,
    pub method: TruncationMethod,
}

#[derive(Clone)]
pub struct TokenBudgeter {
    bpe: Option<Arc<CoreBPE>>,
    max_input_tokens: usize,
}

impl fmt::Debug for TokenBudgeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBudgeter")
            .field("tokenizer", &self.bpe.is_some())
            .field("max_input_tokens", &self.max_input_tokens)
            .finish()
    }
}

/// Context window minus the output and prompt overhead reservations.
pub fn input_ceiling(context_window: usize) -> usize {
    context_window.saturating_sub(OUTPUT_TOKEN_RESERVE + PROMPT_OVERHEAD_RESERVE)
}

impl TokenBudgeter {
    /// Build a budgeter for `model`, falling back to `cl100k_base` when the model has no
    /// known encoding, and to the character heuristic when neither loads.
    pub fn for_model(model: &str, context_window: usize) -> Self {
        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                tracing::warn!(
                    model = %model,
                    error = %e,
                    "No tokenizer registered for model, using cl100k_base"
                );
                match tiktoken_rs::cl100k_base() {
                    Ok(bpe) => Some(bpe),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "Failed to load cl100k_base, token counts will be estimated"
                        );
                        None
                    }
                }
            }
        };

        Self {
            bpe: bpe.map(Arc::new),
            max_input_tokens: input_ceiling(context_window),
        }
    }

    /// A budgeter that never tokenizes, only estimates.
    pub fn heuristic(context_window: usize) -> Self {
        Self {
            bpe: None,
            max_input_tokens: input_ceiling(context_window),
        }
    }

    pub fn max_input_tokens(&self) -> usize {
        self.max_input_tokens
    }

    pub fn has_tokenizer(&self) -> bool {
        self.bpe.is_some()
    }

    pub fn count(&self, text: &str) -> usize {
        match &self.bpe {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => estimate_tokens(text),
        }
    }

    /// Truncate to the input ceiling derived from the context window.
    pub fn fit(&self, text: &str) -> Truncation {
        self.truncate(text, self.max_input_tokens)
    }

    /// Cut `text` down to at most `max_tokens` tokens.
    ///
    /// Applying this twice with the same limit gives the same text as applying it once.
    pub fn truncate(&self, text: &str, max_tokens: usize) -> Truncation {
        let Some(bpe) = &self.bpe else {
            return truncate_by_chars(text, max_tokens, estimate_tokens(text));
        };

        let tokens = bpe.encode_ordinary(text);
        let original_tokens = tokens.len();
        if original_tokens <= max_tokens {
            return Truncation {
                text: text.to_string(),
                was_truncated: false,
                original_tokens,
                method: TruncationMethod::Unchanged,
            };
        }

        let mut keep = max_tokens;
        let mut retries = 0;
        while keep > 0 && retries <= MAX_DECODE_RETRIES {
            match bpe.decode(tokens[..keep].to_vec()) {
                Ok(decoded) => {
                    let recount = bpe.encode_ordinary(&decoded).len();
                    if recount <= max_tokens {
                        tracing::info!(
                            original_tokens,
                            max_tokens,
                            kept_tokens = recount,
                            "Truncated text to fit token budget"
                        );
                        return Truncation {
                            text: decoded,
                            was_truncated: true,
                            original_tokens,
                            method: TruncationMethod::Tokenizer,
                        };
                    }
                    // Re-encoding merged differently; shrink by the overshoot.
                    keep = keep.saturating_sub(recount - max_tokens);
                }
                Err(e) => {
                    tracing::debug!(error = %e, keep, "Decode failed at cut, dropping a tail token");
                    keep -= 1;
                }
            }
            retries += 1;
        }

        let cut = longest_fitting_prefix(bpe, text, max_tokens);
        tracing::warn!(
            original_tokens,
            max_tokens,
            kept_chars = cut.chars().count(),
            "Decode retries exhausted, cut on a character boundary"
        );
        Truncation {
            text: cut.to_string(),
            was_truncated: true,
            original_tokens,
            method: TruncationMethod::Tokenizer,
        }
    }
}

/// Longest prefix ending on a char boundary that encodes to at most `max_tokens` tokens.
fn longest_fitting_prefix<'a>(bpe: &CoreBPE, text: &'a str, max_tokens: usize) -> &'a str {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();

    // boundaries[lo] always fits; the empty prefix encodes to nothing.
    let (mut lo, mut hi) = (0, boundaries.len() - 1);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if bpe.encode_ordinary(&text[..boundaries[mid]]).len() <= max_tokens {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    &text[..boundaries[lo]]
}

fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

fn truncate_by_chars(text: &str, max_tokens: usize, original_tokens: usize) -> Truncation {
    let max_chars = max_tokens.saturating_mul(CHARS_PER_TOKEN);
    if text.chars().count() <= max_chars {
        return Truncation {
            text: text.to_string(),
            was_truncated: false,
            original_tokens,
            method: TruncationMethod::Unchanged,
        };
    }

    tracing::warn!(
        original_tokens,
        max_tokens,
        chars_per_token = CHARS_PER_TOKEN,
        "Truncating by character estimate instead of tokenizer"
    );

    Truncation {
        text: text.chars().take(max_chars).collect(),
        was_truncated: true,
        original_tokens,
        method: TruncationMethod::CharacterHeuristic,
    }
}
