//! Prompt assembly.
//!
//! Every parameter maps to one fixed instruction sentence; the same inputs always give
//! the same prompt.

use humanizer_core::{HumanizeParameters, LengthOption, SimilarityOption, StyleOption};

pub const BASE_INSTRUCTION: &str = "You are a text rewriting assistant. Rewrite the following text to make it sound more natural and human-like.";

const OUTPUT_INSTRUCTION: &str =
    "Output only the rewritten text, without any preamble, notes or explanation.";

pub fn length_instruction(length: LengthOption) -> &'static str {
    match length {
        LengthOption::Normal => "Maintain approximately the same length as the original text.",
        LengthOption::Concise => {
            "Make the text more concise and to the point, reducing unnecessary words."
        }
        LengthOption::Expanded => "Expand the text with more details and explanations.",
    }
}

pub fn similarity_instruction(similarity: SimilarityOption) -> &'static str {
    match similarity {
        SimilarityOption::Low => "Feel free to significantly rephrase and restructure the content while maintaining the core meaning.",
        SimilarityOption::Moderate => {
            "Moderately rephrase the content, balancing between originality and similarity."
        }
        SimilarityOption::High => "Stay very close to the original phrasing, making only minor adjustments for naturalness.",
        SimilarityOption::Neutral => "Use balanced similarity to the original text.",
    }
}

/// The style sentence; for `Custom` this is the caller's description verbatim.
pub fn style_instruction(params: &HumanizeParameters) -> &str {
    match params.style {
        StyleOption::Neutral => "Use a neutral, balanced tone.",
        StyleOption::Academic => "Use formal academic language with proper terminology.",
        StyleOption::Business => "Use professional business communication style.",
        StyleOption::Creative => "Use creative and engaging language.",
        StyleOption::Technical => "Use technical and precise language.",
        StyleOption::Friendly => "Use warm and friendly conversational tone.",
        StyleOption::Informal => "Use casual and relaxed language.",
        StyleOption::Reference => "Use objective and informative reference style.",
        StyleOption::Custom => params
            .custom_style()
            .map(str::trim)
            .unwrap_or("Use a neutral, balanced tone."),
    }
}

fn requirements(params: &HumanizeParameters) -> String {
    format!(
        "Requirements:\n- Length: {}\n- Similarity: {}\n- Style: {}",
        length_instruction(params.length),
        similarity_instruction(params.similarity),
        style_instruction(params),
    )
}

/// Prompt for rewriting `text`.
pub fn build_prompt(text: &str, params: &HumanizeParameters) -> String {
    format!(
        "{}\n\n{}\n\nSource text:\n{}\n\n{}",
        BASE_INSTRUCTION,
        requirements(params),
        text,
        OUTPUT_INSTRUCTION
    )
}

/// Prompt for rewriting the content of an attached document.
pub fn build_file_prompt(filename: &str, params: &HumanizeParameters) -> String {
    format!(
        "{}\n\n{}\n\nSource text: the content of the attached document \"{}\".\n\n{}",
        BASE_INSTRUCTION,
        requirements(params),
        filename,
        OUTPUT_INSTRUCTION
    )
}
