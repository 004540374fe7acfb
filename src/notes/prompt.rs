//! Meeting-notes prompt: turn a raw transcript into named summary sections.

/// Section keys the model is asked to produce, in document order.
pub const SECTION_KEYS: [&str; 4] = ["overview", "key_points", "decisions", "action_items"];

/// System instruction for the summarization model.
pub const NOTES_SYSTEM: &str = r#"You are an assistant that writes meeting notes from voice memo transcripts.
Respond with a single JSON object mapping section names to section text.
Use snake_case keys and plain prose values; no nested objects or arrays.
Do not invent decisions or action items; only report what is stated in the transcript."#;

/// User prompt template: placeholder is replaced with the actual transcript.
pub const NOTES_USER_TEMPLATE: &str = r#"Summarize the following voice memo transcript into meeting notes.

Transcript:
---
{transcript}
---

Return a JSON object with these keys in this order, skipping any the transcript has no content for:
1. "overview" - one paragraph on what the memo covers
2. "key_points" - the main points discussed
3. "decisions" - decisions that were made
4. "action_items" - tasks with owners and deadlines when stated

Each value must be plain text."#;

/// Build the user prompt with the given transcript.
pub fn notes_user_prompt(transcript: &str) -> String {
    NOTES_USER_TEMPLATE.replace("{transcript}", transcript)
}
