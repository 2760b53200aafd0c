//! Property-based tests for the question parser
//!
//! Documents are generated from realistic fragments (numbered questions,
//! lettered options, decorated answer lines, section headers, prose) glued
//! together directly or with spaces or newlines, so that inline markers exercise the
//! normalizer the same way flattened Word exports do.

use import_question_bank::models::SectionKind;
use import_question_bank::parser::normalizer::normalize;
use import_question_bank::parser::segmenter::{looks_like_header, segment};
use import_question_bank::parser::{extract, parse_document};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "what", "is", "the", "output", "of", "this", "program", "which", "stack", "queue", "value",
    "returns", "loop", "prime", "number", "final", "static", "class", "none", "error", "true",
    "false", "list", "tuple",
];

fn phrase_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..6).prop_map(|w| w.join(" "))
}

fn letter_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['A', 'B', 'C', 'D', 'a', 'b', 'c', 'd'])
}

fn question_strategy() -> impl Strategy<Value = String> {
    (1u32..40, prop::sample::select(vec!["", "Q", "#"]), phrase_strategy())
        .prop_map(|(n, prefix, text)| format!("{prefix}{n}. {text}?"))
}

fn option_strategy() -> impl Strategy<Value = String> {
    (letter_strategy(), prop::sample::select(vec!['.', ')', ']']), phrase_strategy())
        .prop_map(|(letter, punct, text)| format!("{letter}{punct} {text}"))
}

fn answer_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "✅ ", "→ ", "✅"]),
        prop::sample::select(vec![
            "Answer",
            "Ans",
            "Correct Answer",
            "Correct Option",
            "Answer Key",
        ]),
        prop::sample::select(vec![": ", " - ", " "]),
        letter_strategy(),
    )
        .prop_map(|(deco, token, sep, letter)| format!("{deco}{token}{sep}{letter}"))
}

fn header_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Section A: General".to_string(),
        "Section B - Long Answer (5 x 5 = 25 Marks)".to_string(),
        "Python Based Questions (Optional - Choose 2 out of 4)".to_string(),
        "[Computer Science]".to_string(),
        "Aptitude".to_string(),
    ])
}

fn fragment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => question_strategy(),
        5 => option_strategy(),
        2 => answer_strategy(),
        1 => header_strategy(),
        2 => phrase_strategy(),
    ]
}

/// A document made of fragments joined by nothing, a space or a newline
fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (fragment_strategy(), prop::sample::select(vec!["", " ", "\n", "\n", "\r\n"])),
        0..30,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(fragment, glue)| format!("{fragment}{glue}"))
            .collect()
    })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(doc in document_strategy()) {
        let once = normalize(&doc);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn segment_keeps_every_body_line_once(doc in any::<String>()) {
        let sections = segment(&doc);
        prop_assert!(!sections.is_empty());

        let expected: Vec<&str> = doc
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty() && !looks_like_header(l))
            .collect();
        let actual: Vec<&str> = sections.iter().flat_map(|s| s.lines()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn committed_questions_have_two_to_four_options(doc in document_strategy()) {
        for section in segment(&normalize(&doc)) {
            for question in extract(&section) {
                prop_assert!(question.options.len() >= 2);
                prop_assert!(question.options.len() <= 4);
            }
        }
    }

    #[test]
    fn answer_is_one_of_the_options(doc in document_strategy()) {
        let parsed = parse_document(&doc);
        for question in parsed.questions() {
            if let Some(answer) = &question.correct_answer_text {
                prop_assert!(question.options.contains(answer));
            }
        }
    }

    #[test]
    fn sequences_are_contiguous_per_section(doc in document_strategy()) {
        let parsed = parse_document(&doc);
        for report in &parsed.sections {
            let sequences: Vec<u32> = report.questions().map(|q| q.sequence_in_section).collect();
            let expected: Vec<u32> = (1..=sequences.len() as u32).collect();
            prop_assert_eq!(sequences, expected);
        }
    }

    #[test]
    fn elective_counts_imply_optional(doc in document_strategy()) {
        for section in segment(&normalize(&doc)) {
            if section.select_count.is_some() {
                prop_assert_eq!(section.kind, SectionKind::Optional);
            }
        }
    }

    #[test]
    fn parser_never_panics(doc in any::<String>()) {
        let _ = parse_document(&doc);
    }
}
