//! Prompt templates for the provider-backed learning adapter.
//!
//! Every prompt starts with a `TASK[<operation>]` line and asks for a single
//! JSON document in a fixed shape.

use super::ports::{
    AnalyzeWordsRequest, CheckAnswerRequest, GenerateContentRequest, LearningOperation,
    TranslateRequest,
};
use inference_providers::ChatMessage;

const SYSTEM_PROMPT: &str = "You are a patient language tutor. \
Answer with exactly one JSON document and no surrounding prose.";

const WORDS_SHAPE: &str = r#"[{"word": string, "translation": string, "part_of_speech": string, "notes": string}]"#;

fn messages(operation: LearningOperation, body: String) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(format!("{}\n{}", operation.task_marker(), body)),
    ]
}

pub fn generate_content(request: &GenerateContentRequest) -> Vec<ChatMessage> {
    let topic = request
        .topic
        .as_deref()
        .map(|topic| format!(" about \"{topic}\""))
        .unwrap_or_default();
    messages(
        LearningOperation::GenerateContent,
        format!(
            "Write {count} {mode} practice items in {language} for a {level} learner{topic}.\n\
             Respond as {{\"items\": [{{\"text\": string, \"translation\": string, \"hint\": string}}]}}.",
            count = request.count,
            mode = request.mode,
            language = request.language,
            level = request.level,
        ),
    )
}

pub fn translate_text(request: &TranslateRequest) -> Vec<ChatMessage> {
    messages(
        LearningOperation::TranslateText,
        format!(
            "Translate from {} to {}:\n\"\"\"\n{}\n\"\"\"\n\
             Respond as {{\"translated_text\": string}}.",
            request.source_language, request.target_language, request.text
        ),
    )
}

pub fn translate_with_analysis(request: &TranslateRequest) -> Vec<ChatMessage> {
    messages(
        LearningOperation::TranslateWithAnalysis,
        format!(
            "Translate from {} to {} and explain each meaningful word of the original:\n\
             \"\"\"\n{}\n\"\"\"\n\
             Respond as {{\"translated_text\": string, \"words\": {WORDS_SHAPE}}}.",
            request.source_language, request.target_language, request.text
        ),
    )
}

pub fn check_answer(request: &CheckAnswerRequest) -> Vec<ChatMessage> {
    messages(
        LearningOperation::CheckAnswer,
        format!(
            "{}\nRespond as {{\"is_correct\": boolean, \"feedback\": string}}.",
            answer_context(request)
        ),
    )
}

pub fn check_answer_detailed(request: &CheckAnswerRequest) -> Vec<ChatMessage> {
    messages(
        LearningOperation::CheckAnswerDetailed,
        format!(
            "{}\nScore the answer from 0 to 100 and list every correction.\n\
             Respond as {{\"is_correct\": boolean, \"score\": number, \"feedback\": string, \"corrections\": [string]}}.",
            answer_context(request)
        ),
    )
}

pub fn analyze_words(request: &AnalyzeWordsRequest) -> Vec<ChatMessage> {
    messages(
        LearningOperation::AnalyzeWords,
        format!(
            "Break this {} text into the words a learner should study:\n\"\"\"\n{}\n\"\"\"\n\
             Respond as {{\"words\": {WORDS_SHAPE}}}.",
            request.language, request.text
        ),
    )
}

fn answer_context(request: &CheckAnswerRequest) -> String {
    let expected = request
        .expected
        .as_deref()
        .map(|expected| format!("Expected answer: {expected}\n"))
        .unwrap_or_default();
    format!(
        "Check a {} learner's answer.\nExercise: {}\n{}Learner answer: {}",
        request.language, request.prompt, expected, request.answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_carry_task_marker() {
        let request = TranslateRequest {
            text: "Good morning".to_string(),
            source_language: "en".to_string(),
            target_language: "es".to_string(),
        };
        let msgs = translate_text(&request);
        assert_eq!(msgs.len(), 2);
        assert!(msgs[1].content.starts_with("TASK[translate_text]\n"));
        assert!(msgs[1].content.contains("Good morning"));

        // The analysis marker must not be mistaken for the plain one
        let msgs = translate_with_analysis(&request);
        assert!(msgs[1].content.starts_with("TASK[translate_with_analysis]\n"));
    }

    #[test]
    fn test_generate_content_mentions_topic_only_when_set() {
        let mut request = GenerateContentRequest {
            language: "fr".to_string(),
            mode: "sentences".to_string(),
            level: "beginner".to_string(),
            topic: None,
            count: 3,
        };
        assert!(!generate_content(&request)[1].content.contains("about"));

        request.topic = Some("food".to_string());
        assert!(generate_content(&request)[1].content.contains("about \"food\""));
    }

    #[test]
    fn test_check_answer_includes_expected() {
        let request = CheckAnswerRequest {
            prompt: "Translate: cat".to_string(),
            expected: Some("gato".to_string()),
            answer: "gata".to_string(),
            language: "es".to_string(),
        };
        let content = &check_answer_detailed(&request)[1].content;
        assert!(content.contains("Expected answer: gato"));
        assert!(content.contains("Learner answer: gata"));
    }
}
