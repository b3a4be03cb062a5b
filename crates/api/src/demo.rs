//! Offline provider used when no Gemini API key is configured
//!
//! Every learning operation gets a canned, well-formed JSON reply so the whole
//! HTTP surface (usage recording, feedback, analytics) works without network
//! access. Replies are keyed on the task marker each prompt carries.

use inference_providers::{MockProvider, RequestMatcher};
use services::learning::LearningOperation;

/// Provider label recorded on usage produced by the demo provider
pub const DEMO_PROVIDER_NAME: &str = "demo";

fn canned_reply(operation: LearningOperation) -> &'static str {
    match operation {
        LearningOperation::GenerateContent => {
            r#"{"items":[
                {"text":"Hola, ¿cómo estás?","translation":"Hello, how are you?","hint":"greeting"},
                {"text":"Me gusta leer libros.","translation":"I like reading books.","hint":"gustar + infinitive"}
            ]}"#
        }
        LearningOperation::TranslateText => r#"{"translated_text":"Hello, how are you?"}"#,
        LearningOperation::TranslateWithAnalysis => {
            r#"{"translated_text":"Hello, how are you?","words":[
                {"word":"hola","translation":"hello","part_of_speech":"interjection"},
                {"word":"estás","translation":"you are","part_of_speech":"verb","notes":"estar, 2nd person singular"}
            ]}"#
        }
        LearningOperation::CheckAnswer => {
            r#"{"is_correct":true,"feedback":"Correct, well done."}"#
        }
        LearningOperation::CheckAnswerDetailed => {
            r#"{"is_correct":true,"score":90,"feedback":"Correct. Watch the accent.","corrections":["estas -> estás"]}"#
        }
        LearningOperation::AnalyzeWords => {
            r#"{"words":[
                {"word":"libro","translation":"book","part_of_speech":"noun","notes":"masculine"}
            ]}"#
        }
    }
}

/// Mock provider scripted with a reply for every learning operation
pub fn demo_provider() -> MockProvider {
    LearningOperation::ALL
        .into_iter()
        .fold(
            MockProvider::new().with_provider_name(DEMO_PROVIDER_NAME),
            |provider, operation| {
                provider.with_response(
                    RequestMatcher::Contains(operation.task_marker()),
                    canned_reply(operation),
                )
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_reply_is_json() {
        for operation in LearningOperation::ALL {
            let reply = canned_reply(operation);
            assert!(
                serde_json::from_str::<serde_json::Value>(reply).is_ok(),
                "{} reply is not JSON",
                operation.as_str()
            );
        }
    }
}
