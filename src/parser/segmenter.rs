//! 分区切分
//!
//! 按标题行把预处理后的文本切成有序的 [`Section`]。标题行本身不进入任何分区的正文。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::answer_key::match_answer_line;
use crate::models::{Section, SectionKind, Subject, DEFAULT_SECTION_NAME};

/// 标题行长度上限（字符数）
const MAX_HEADER_CHARS: usize = 150;

/// `Section A: ...`、`Part 2 - ...`
static SECTION_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:section|part)\s+(?:[a-z]|\d+|[ivx]+)\b")
        .expect("valid section label regex")
});

/// 每个词首字母大写、含科目词的短语：`Python Based Questions`、`Multiple Choice MCQ`
///
/// 科目词之后只能跟大写词，或以 `(` `[` `:` 横线引出的说明。
static TITLE_PHRASE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[A-Z][\w'’]*(?:\s*[\-–]\s*|\s+))*(?:Questions?|Based|MCQs?|Answers?)(?:\s+[A-Z][\w'’]*)*\s*(?:[(\[:\-–—].*)?$",
    )
    .expect("valid title phrase regex")
});

/// `[Computer Science]`
static BRACKET_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\[\]]+\]$").expect("valid bracket label regex"));

/// 以 `1.`、`2)` 开头的行是题目，不是标题
static NUMBERED_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]").expect("valid numbered line regex"));

/// `Choose 3 out of 6`、`Select 2 out of 4`、`Attempt any 3 of 5`
static ELECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:choose|select|attempt)\s+(?:any\s+)?(\d+)\s+(?:out\s+)?of\s+(\d+)")
        .expect("valid elective regex")
});

/// 判断一行是否像分区标题
pub fn looks_like_header(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() >= MAX_HEADER_CHARS {
        return false;
    }
    if NUMBERED_LINE_REGEX.is_match(line)
        || match_answer_line(line).is_some()
        || line.ends_with('?')
    {
        return false;
    }

    SECTION_LABEL_REGEX.is_match(line)
        || TITLE_PHRASE_REGEX.is_match(line)
        || BRACKET_LABEL_REGEX.is_match(line)
        || Subject::from_alias(line).is_some()
}

/// 把文本切分成分区
///
/// 永远返回非空列表：没有任何正文时返回一个内容为空的占位分区。
/// 所有非标题行按原顺序恰好出现一次。
pub fn segment(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_name = DEFAULT_SECTION_NAME.to_string();
    let mut body: Vec<&str> = Vec::new();

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if looks_like_header(line) {
            debug!("   🔍 检测到分区标题: \"{}\"", line);
            if !body.is_empty() {
                sections.push(build_section(&current_name, body.join("\n")));
                body.clear();
            }
            current_name = line.to_string();
        } else {
            body.push(line);
        }
    }

    if !body.is_empty() {
        sections.push(build_section(&current_name, body.join("\n")));
    }

    if sections.is_empty() {
        debug!("   ⚠️ 未检测到分区，整个文档作为一个分区");
        sections.push(build_section(DEFAULT_SECTION_NAME, String::new()));
    }

    sections
}

/// 根据标题文本构造分区：`optional` → 选答；`Choose K out of N` → 选答并记录数量
pub fn build_section(name: &str, content: String) -> Section {
    let name = name.trim();
    let mut kind = if name.to_lowercase().contains("optional") {
        SectionKind::Optional
    } else {
        SectionKind::Mandatory
    };

    let (select_count, total_count) = match parse_elective_counts(name) {
        Some((select, total)) => {
            kind = SectionKind::Optional;
            (Some(select), Some(total))
        }
        None => (None, None),
    };

    Section {
        name: name.to_string(),
        kind,
        select_count,
        total_count,
        content,
    }
}

/// 提取 "选 K 道 / 共 N 道"
pub fn parse_elective_counts(header: &str) -> Option<(u32, u32)> {
    let caps = ELECTIVE_REGEX.captures(header)?;
    let select = caps.get(1)?.as_str().parse().ok()?;
    let total = caps.get(2)?.as_str().parse().ok()?;
    Some((select, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_patterns() {
        assert!(looks_like_header("Section A: Multiple Choice Questions"));
        assert!(looks_like_header("Section B - Long Answer (5 x 5 = 25 Marks)"));
        assert!(looks_like_header("Part 2"));
        assert!(looks_like_header("Python Based Questions (Optional - Choose 2 out of 4)"));
        assert!(looks_like_header("JAVA Based Questions"));
        assert!(looks_like_header("[Computer Science]"));
        assert!(looks_like_header("[Java programming output based]"));
        assert!(looks_like_header("PYTHON"));
        assert!(looks_like_header("Aptitude"));
    }

    #[test]
    fn test_non_header_lines() {
        assert!(!looks_like_header("1. Which Questions are Based on Java?"));
        assert!(!looks_like_header("2) Python"));
        assert!(!looks_like_header("Correct Answer: B"));
        assert!(!looks_like_header("A. Stack"));
        assert!(!looks_like_header("What is the output of the program?"));
        assert!(!looks_like_header("Part of the answer"));
        assert!(!looks_like_header(&format!("Section A {}", "x".repeat(150))));
    }

    #[test]
    fn test_sentence_mentioning_keyword_is_not_header() {
        assert!(!looks_like_header("Which of these Questions is about sorting?"));
        assert!(!looks_like_header("Most Questions in this part are easy"));
        assert!(!looks_like_header("Generic Multiple Choice Questions?"));
        assert!(looks_like_header("Generic Multiple-Choice Questions"));
        assert!(looks_like_header("Section A – Generic Multiple Choice Questions"));

        let sections = segment(
            "Which of these Questions is about sorting?\nA. Bubble sort\nB. Hash map\nAnswer: A",
        );
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, DEFAULT_SECTION_NAME);
        assert!(sections[0].content.starts_with("Which of these Questions"));
    }

    #[test]
    fn test_no_header_single_default_section() {
        let sections = segment("1. What?\nA. x\nB. y");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, DEFAULT_SECTION_NAME);
        assert_eq!(sections[0].kind, SectionKind::Mandatory);
        assert_eq!(sections[0].content, "1. What?\nA. x\nB. y");
    }

    #[test]
    fn test_empty_input_still_one_section() {
        let sections = segment("  \n\n ");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.is_empty());
    }

    #[test]
    fn test_headers_split_and_are_excluded_from_content() {
        let text = "Intro line\n[Computer Science]\n1. Q one\nA. a\n\n[Grammar]\n[Logical Reasoning]\n2. Q two";
        let sections = segment(text);

        let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![DEFAULT_SECTION_NAME, "[Computer Science]", "[Logical Reasoning]"]
        );
        assert_eq!(sections[0].content, "Intro line");
        assert_eq!(sections[1].content, "1. Q one\nA. a");
        assert_eq!(sections[2].content, "2. Q two");
    }

    #[test]
    fn test_elective_header() {
        let section = build_section(
            "Python Based Questions (Optional - Choose 2 out of 4)",
            String::new(),
        );
        assert_eq!(section.kind, SectionKind::Optional);
        assert_eq!(section.select_count, Some(2));
        assert_eq!(section.total_count, Some(4));
    }

    #[test]
    fn test_elective_counts_force_optional() {
        let section = build_section("JAVA Based Questions (Select 3 out of 6)", String::new());
        assert_eq!(section.kind, SectionKind::Optional);
        assert_eq!(parse_elective_counts("Attempt any 3 of 5"), Some((3, 5)));
    }

    #[test]
    fn test_optional_without_counts() {
        let section = build_section("Section C (Optional)", String::new());
        assert_eq!(section.kind, SectionKind::Optional);
        assert_eq!(section.select_count, None);
        assert_eq!(section.total_count, None);

        let section = build_section("Section A: General", String::new());
        assert_eq!(section.kind, SectionKind::Mandatory);
    }
}
