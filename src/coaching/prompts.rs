// Prompt construction and practice phrase fallbacks

use crate::coaching::types::{Difficulty, Language};

/// A single chat completion request for the language model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Request for JSON coaching feedback on one attempt
pub fn feedback_request(
    target: &str,
    transcription: &str,
    language: Language,
) -> CompletionRequest {
    let language_name = language.name();
    let prompt = format!(
        r#"You are an expert pronunciation coach for {language_name} language learners.

Target phrase: "{target}"
What the student said: "{transcription}"

Analyze the pronunciation and provide:
1. If words are missing, remind the student to complete the phrase
2. Provide specific feedback on pronunciation differences (focus on phonemes, word stress, intonation)
3. Provide 2-3 actionable tips for improvement
4. Positive reinforcement for what they did well

Be encouraging but specific. Keep your response concise (3-4 sentences for main feedback).

Return your response as a JSON object with this structure:
{{
    "feedback": "main feedback text here",
    "suggestions": ["tip 1", "tip 2", "tip 3"]
}}"#
    );

    CompletionRequest {
        system: format!(
            "You are an expert pronunciation coach for {} language learners.",
            language_name
        ),
        prompt,
        temperature: 0.7,
        max_tokens: None,
    }
}

/// Request for a single practice phrase
pub fn phrase_request(language: Language, difficulty: Difficulty) -> CompletionRequest {
    let name = language.name();
    let description = match difficulty {
        Difficulty::Easy => format!(
            "Generate a simple {name} phrase that a beginner would use in daily conversation. \
             Use common, simple vocabulary and basic grammar. \
             Examples: greetings, asking for help, expressing needs."
        ),
        Difficulty::Intermediate => match language {
            Language::English => format!(
                "Generate an intermediate {name} phrase with moderate complexity. \
                 Include some phrasal verbs, contractions, or compound sentences. \
                 Should be conversational but more complex than beginner level."
            ),
            Language::Spanish => format!(
                "Generate an intermediate {name} phrase with moderate complexity. \
                 Include some compound tenses or subjunctive mood. \
                 Should be conversational but more complex than beginner level."
            ),
        },
        Difficulty::Difficult => match language {
            Language::English => format!(
                "Generate an advanced {name} phrase with complex vocabulary, idioms, or \
                 sophisticated grammar structures. Include challenging pronunciation elements \
                 like consonant clusters or difficult vowel sounds."
            ),
            Language::Spanish => format!(
                "Generate an advanced {name} phrase with complex vocabulary, idiomatic \
                 expressions, or sophisticated grammar structures. Include challenging \
                 pronunciation elements like rolled r's or complex verb conjugations."
            ),
        },
    };

    CompletionRequest {
        system: "You are a language learning expert who generates practice phrases \
                 for pronunciation."
            .to_string(),
        prompt: format!(
            "{description}\n\nReturn ONLY the phrase itself, nothing else. \
             No quotation marks, no explanations, just the phrase."
        ),
        temperature: 0.9,
        max_tokens: Some(50),
    }
}

/// Trim model output and strip surrounding quotes
pub fn clean_phrase(raw: &str) -> String {
    raw.trim().trim_matches('"').trim_matches('\'').to_string()
}

/// Built-in phrase used when generation fails
pub fn fallback_phrase(language: Language, difficulty: Difficulty) -> &'static str {
    match (difficulty, language) {
        (Difficulty::Easy, Language::English) => "How are you today?",
        (Difficulty::Easy, Language::Spanish) => "¿Cómo estás hoy?",
        (Difficulty::Intermediate, Language::English) => {
            "I would like to order some coffee please."
        }
        (Difficulty::Intermediate, Language::Spanish) => "Me gustaría pedir un café por favor.",
        (Difficulty::Difficult, Language::English) => {
            "Could you recommend a restaurant that serves authentic cuisine?"
        }
        (Difficulty::Difficult, Language::Spanish) => {
            "¿Podrías recomendar un restaurante que sirva comida auténtica?"
        }
    }
}
