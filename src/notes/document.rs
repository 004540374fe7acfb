//! Render meeting notes as a Markdown document.

use crate::notes::summarizer::MeetingNotes;

/// Turn a snake_case section key into a document heading.
///
/// Underscores become spaces and the first letter of each word is
/// capitalized, so `action_items` renders as `Action Items`.
pub fn heading_for_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the notes as Markdown, one level-1 heading per section, in
/// the order the sections were produced.
pub fn render_notes(notes: &MeetingNotes) -> String {
    let mut document = String::new();
    for section in &notes.sections {
        document.push_str(&format!("# {}\n\n", heading_for_key(&section.key)));
        document.push_str(&format!("{}\n\n", section.text));
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_capitalizes_single_word() {
        assert_eq!(heading_for_key("overview"), "Overview");
    }

    #[test]
    fn test_heading_splits_on_underscores() {
        assert_eq!(heading_for_key("action_items"), "Action Items");
        assert_eq!(heading_for_key("key_points"), "Key Points");
    }

    #[test]
    fn test_heading_handles_three_words() {
        assert_eq!(heading_for_key("open_question_log"), "Open Question Log");
    }

    #[test]
    fn test_render_is_exact_for_two_sections() {
        let notes = MeetingNotes::from_pairs([("overview", "A"), ("action_items", "B")]);

        assert_eq!(render_notes(&notes), "# Overview\n\nA\n\n# Action Items\n\nB\n\n");
    }

    #[test]
    fn test_render_preserves_section_order() {
        let notes = MeetingNotes::from_pairs([
            ("decisions", "Ship on Friday."),
            ("overview", "Weekly sync."),
        ]);
        let document = render_notes(&notes);

        let decisions = document.find("# Decisions").unwrap();
        let overview = document.find("# Overview").unwrap();
        assert!(decisions < overview);
    }

    #[test]
    fn test_render_empty_notes_is_empty() {
        assert_eq!(render_notes(&MeetingNotes::default()), "");
    }
}
