//! 题目抽取状态机
//!
//! 逐行扫描一个分区，用 [`ParserState`] 累积当前草稿（题干、选项、答案），
//! 凑够选项后提交为 [`Question`]。每一行依次尝试 [`LINE_RULES`] 中的规则，
//! 第一个认领该行的规则生效；都不认领的行被忽略，但会被记住，
//! 以便后面的选项行回溯地把它认作题干。
//!
//! ## 规则顺序
//!
//! 1. 说明/分值行 → 丢弃
//! 2. 题号行 → 提交或丢弃旧草稿，开始新草稿
//! 3. 带字母的选项行
//! 4. 答案行
//! 5. 无字母的候选选项行
//! 6. 题干续行
//!
//! ## 无字母选项
//!
//! 题干后面没有字母标记的短行，既可能是题干续行，也可能是无字母选项。
//! 这些行先作为候选暂存在草稿里：出现带字母的选项时它们归入题干；
//! 出现答案行或草稿结束时，如果候选有 2~4 行且都满足长度要求，就整体改判为选项。

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::answer_key::{match_answer_line, resolve_letter, MAX_OPTION_LETTERS};
use super::segmenter::looks_like_header;
use crate::models::{Question, Section, SectionKind, Subject};
use crate::utils::logging::truncate_text;

/// 提交一道题最少需要的选项数
pub const MIN_OPTIONS: usize = 2;
/// 说明行的最短长度（字符数），更短的以动词开头的行可能是题干
const INSTRUCTION_MIN_CHARS: usize = 50;
/// 无字母选项的长度范围（字符数）
const PLAIN_OPTION_CHARS: std::ops::RangeInclusive<usize> = 4..=200;

/// `Choose ...`、`Attempt ...` 开头的说明行
static INSTRUCTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:choose|select|answer|attempt)\b").expect("valid instruction regex")
});

/// `5 x 5 = 25 Marks`
static MARKS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s*[x×]\s*\d+\s*=\s*\d+\s*marks?\b").expect("valid marks regex")
});

/// `1.`、`2)`、`Q3.`、`Q 4)`、`#5.`
static QUESTION_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[Qq]\.?\s*|#\s*)?(\d{1,4})[.)](\s*)(.*)$").expect("valid question start regex")
});

/// `A. xxx`、`b) xxx`、`C] xxx`
static OPTION_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Da-d])[.)\]]\s+(.*)$").expect("valid option line regex")
});

/// 行的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Noise,
    QuestionStart,
    LabeledOption,
    AnswerKey,
    PlainOption,
    Continuation,
}

/// 一条按行匹配的规则：返回 true 表示认领了该行
pub struct LineRule {
    pub kind: LineKind,
    apply: fn(&mut SectionExtractor, &str) -> bool,
}

/// 规则表，按顺序尝试，先匹配者胜出
pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        kind: LineKind::Noise,
        apply: SectionExtractor::skip_noise,
    },
    LineRule {
        kind: LineKind::QuestionStart,
        apply: SectionExtractor::start_question,
    },
    LineRule {
        kind: LineKind::LabeledOption,
        apply: SectionExtractor::add_labeled_option,
    },
    LineRule {
        kind: LineKind::AnswerKey,
        apply: SectionExtractor::record_answer,
    },
    LineRule {
        kind: LineKind::PlainOption,
        apply: SectionExtractor::hold_plain_option,
    },
    LineRule {
        kind: LineKind::Continuation,
        apply: SectionExtractor::continue_text,
    },
];

/// 草稿的结局
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOutcome {
    /// 已提交（答案已解析或文档未给答案）
    Committed(Question),
    /// 已提交，但答案行的字母超出已收集的选项
    AnswerUnresolved { question: Question, letter: char },
    /// 选项不足，丢弃
    DroppedIncomplete { text: String, option_count: usize },
}

impl DraftOutcome {
    /// 被提交的题目（丢弃的草稿返回 None）
    pub fn question(&self) -> Option<&Question> {
        match self {
            DraftOutcome::Committed(q) | DraftOutcome::AnswerUnresolved { question: q, .. } => {
                Some(q)
            }
            DraftOutcome::DroppedIncomplete { .. } => None,
        }
    }

    pub fn into_question(self) -> Option<Question> {
        match self {
            DraftOutcome::Committed(q) | DraftOutcome::AnswerUnresolved { question: q, .. } => {
                Some(q)
            }
            DraftOutcome::DroppedIncomplete { .. } => None,
        }
    }
}

/// 一个分区的抽取结果
#[derive(Debug, Clone)]
pub struct SectionReport {
    pub section: Section,
    pub outcomes: Vec<DraftOutcome>,
}

impl SectionReport {
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.outcomes.iter().filter_map(DraftOutcome::question)
    }

    pub fn committed_count(&self) -> usize {
        self.questions().count()
    }

    pub fn dropped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DraftOutcome::DroppedIncomplete { .. }))
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DraftOutcome::AnswerUnresolved { .. }))
            .count()
    }
}

/// 题干之后的一行（可能是续行，也可能是无字母选项）
#[derive(Debug, Clone)]
struct BodyLine {
    text: String,
    plain_option: bool,
}

/// 正在累积的草稿
#[derive(Debug, Clone, Default)]
struct Draft {
    text: String,
    body: Vec<BodyLine>,
    options: Vec<String>,
    answer: Option<usize>,
    unresolved_letter: Option<char>,
}

impl Draft {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// 候选行能否整体改判为选项
    fn body_is_option_run(&self) -> bool {
        self.options.is_empty()
            && (MIN_OPTIONS..=MAX_OPTION_LETTERS).contains(&self.body.len())
            && self.body.iter().all(|l| l.plain_option)
    }

    /// 把候选行改判为选项，返回是否改判
    fn promote_body_to_options(&mut self) -> bool {
        if !self.body_is_option_run() {
            return false;
        }
        self.options = self.body.drain(..).map(|l| l.text).collect();
        true
    }

    /// 题干 + 未改判的续行
    fn full_text(&self) -> String {
        let mut text = self.text.clone();
        for line in &self.body {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&line.text);
        }
        text
    }
}

/// 单个分区内的解析状态（分区结束即丢弃）
#[derive(Debug, Default)]
pub struct ParserState {
    draft: Option<Draft>,
    /// 上一行未被任何规则认领时保留，供回溯认作题干
    last_line: Option<String>,
}

/// 分区抽取器
pub struct SectionExtractor {
    section_name: String,
    section_kind: SectionKind,
    select_count: Option<u32>,
    total_count: Option<u32>,
    subject: Option<Subject>,
    state: ParserState,
    outcomes: Vec<DraftOutcome>,
    next_sequence: u32,
}

impl SectionExtractor {
    pub fn new(section: &Section) -> Self {
        Self {
            section_name: section.name.clone(),
            section_kind: section.kind,
            select_count: section.select_count,
            total_count: section.total_count,
            subject: Subject::classify(&section.name),
            state: ParserState::default(),
            outcomes: Vec::new(),
            next_sequence: 1,
        }
    }

    /// 处理一行，返回认领该行的规则类型（None 表示忽略）
    pub fn feed(&mut self, line: &str) -> Option<LineKind> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let kind = LINE_RULES
            .iter()
            .find(|rule| (rule.apply)(self, line))
            .map(|rule| rule.kind);

        self.state.last_line = match kind {
            Some(_) => None,
            None => Some(line.to_string()),
        };
        kind
    }

    /// 分区结束：强制尝试提交最后一个草稿
    pub fn finish(mut self) -> Vec<DraftOutcome> {
        self.close_draft();
        self.outcomes
    }

    // ========== 规则 ==========

    /// 1. 长说明行、分值行
    fn skip_noise(&mut self, line: &str) -> bool {
        let is_instruction = INSTRUCTION_REGEX.is_match(line)
            && line.chars().count() > INSTRUCTION_MIN_CHARS
            && match_answer_line(line).is_none();
        is_instruction || MARKS_REGEX.is_match(line)
    }

    /// 2. 题号行
    fn start_question(&mut self, line: &str) -> bool {
        let Some(text) = question_start_text(line) else {
            return false;
        };
        self.close_draft();
        self.state.draft = Some(Draft::new(text));
        true
    }

    /// 3. 带字母的选项行
    fn add_labeled_option(&mut self, line: &str) -> bool {
        let Some(caps) = OPTION_LINE_REGEX.captures(line) else {
            return false;
        };
        let letter = caps.get(1).map_or("", |m| m.as_str());
        let text = caps.get(2).map_or("", |m| m.as_str().trim());

        // 选项重新从 A 开始、且上一行无人认领：上一行是下一道题的题干
        let restarts = letter.eq_ignore_ascii_case("a")
            && self
                .state
                .draft
                .as_ref()
                .is_some_and(|d| d.options.len() >= MIN_OPTIONS);
        if restarts {
            if let Some(previous) = self.take_promotable_last_line() {
                debug!("      💡 选项重新开始，回溯识别题干: {}", truncate_text(&previous, 30));
                self.close_draft();
                self.state.draft = Some(Draft::new(previous));
            }
        }

        if self.state.draft.is_none() {
            match self.take_promotable_last_line() {
                Some(previous) => {
                    debug!("      💡 回溯识别题干: {}", truncate_text(&previous, 30));
                    self.state.draft = Some(Draft::new(previous));
                }
                None => {
                    warn!(
                        "      ⚠️ [{}] 选项行前没有题目，已忽略: {}",
                        self.section_name,
                        truncate_text(line, 40)
                    );
                    return true;
                }
            }
        }

        let Some(draft) = self.state.draft.as_mut() else {
            return false;
        };
        if draft.options.len() >= MAX_OPTION_LETTERS {
            return false;
        }

        let (text, starred) = strip_star_marker(text);
        draft.options.push(text);
        if starred && draft.answer.is_none() {
            draft.answer = Some(draft.options.len() - 1);
        }
        true
    }

    /// 4. 答案行
    fn record_answer(&mut self, line: &str) -> bool {
        let Some(letter) = match_answer_line(line) else {
            return false;
        };
        let Some(draft) = self.state.draft.as_mut() else {
            debug!("      答案行前没有题目，已忽略: {}", line);
            return true;
        };

        // 答案行说明候选行就是选项
        if draft.promote_body_to_options() {
            debug!("      💡 答案行触发无字母选项识别 ({} 项)", draft.options.len());
        }

        match resolve_letter(letter, &draft.options) {
            Some(index) => {
                draft.answer = Some(index);
                draft.unresolved_letter = None;
            }
            None => {
                debug!(
                    "      答案 {} 超出已收集的 {} 个选项",
                    letter,
                    draft.options.len()
                );
                draft.unresolved_letter = Some(letter);
            }
        }
        true
    }

    /// 5. 题干之后、尚无选项时的短行：暂存为候选选项
    fn hold_plain_option(&mut self, line: &str) -> bool {
        let Some(draft) = self.state.draft.as_mut() else {
            return false;
        };
        if !draft.options.is_empty() || draft.text.is_empty() || !is_plain_option_candidate(line) {
            return false;
        }
        draft.body.push(BodyLine {
            text: line.to_string(),
            plain_option: true,
        });
        true
    }

    /// 6. 尚无选项时的题干续行
    fn continue_text(&mut self, line: &str) -> bool {
        let Some(draft) = self.state.draft.as_mut() else {
            return false;
        };
        if !draft.options.is_empty() {
            return false;
        }
        if draft.text.is_empty() {
            draft.text = line.to_string();
        } else {
            draft.body.push(BodyLine {
                text: line.to_string(),
                plain_option: false,
            });
        }
        true
    }

    // ========== 提交 ==========

    fn take_promotable_last_line(&mut self) -> Option<String> {
        self.state
            .last_line
            .take()
            .filter(|l| !INSTRUCTION_REGEX.is_match(l))
    }

    /// 提交或丢弃当前草稿
    fn close_draft(&mut self) {
        let Some(mut draft) = self.state.draft.take() else {
            return;
        };
        draft.promote_body_to_options();
        let text = draft.full_text();

        if draft.options.len() < MIN_OPTIONS {
            if !text.is_empty() || !draft.options.is_empty() {
                debug!(
                    "      ✗ 跳过不完整的题目: {} (只有 {} 个选项)",
                    truncate_text(&text, 40),
                    draft.options.len()
                );
            }
            self.outcomes.push(DraftOutcome::DroppedIncomplete {
                text,
                option_count: draft.options.len(),
            });
            return;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let subject = self.subject.or_else(|| Subject::detect_in_text(&text));
        let correct_answer_text = draft.answer.and_then(|i| draft.options.get(i).cloned());
        let question = Question {
            text,
            options: draft.options,
            correct_answer_text,
            subject,
            section_name: self.section_name.clone(),
            section_kind: self.section_kind,
            sequence_in_section: sequence,
            select_count: self.select_count,
            total_count: self.total_count,
        };

        let answer_status = if question.correct_answer_text.is_some() { "✓" } else { "⚠ (无答案)" };
        debug!(
            "      {} Q{}: {} [{}]",
            answer_status,
            sequence,
            truncate_text(&question.text, 50),
            question.subject.map_or("none", Subject::tag)
        );

        let outcome = match (question.correct_answer_text.is_none(), draft.unresolved_letter) {
            (true, Some(letter)) => DraftOutcome::AnswerUnresolved { question, letter },
            _ => DraftOutcome::Committed(question),
        };
        self.outcomes.push(outcome);
    }
}

/// 题号行去掉题号后的文本；不是题号行时返回 None
///
/// `1.5 is ...` 这类小数开头的行不算题号；`1. 2+2=?` 算。
fn question_start_text(line: &str) -> Option<&str> {
    let caps = QUESTION_START_REGEX.captures(line)?;
    let gap = caps.get(2).map_or("", |m| m.as_str());
    let rest = caps.get(3).map_or("", |m| m.as_str());
    if gap.is_empty() && rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(rest.trim())
}

/// 无字母选项候选：长度合适，且不是题号行、答案行或标题行
fn is_plain_option_candidate(line: &str) -> bool {
    PLAIN_OPTION_CHARS.contains(&line.chars().count())
        && question_start_text(line).is_none()
        && match_answer_line(line).is_none()
        && !looks_like_header(line)
}

/// 去掉选项首尾单独的 `*` 标记，返回 (文本, 是否带标记)
///
/// 只认用空白隔开的 `*`（`Stack *`、`* Stack`）；`*args`、`**kwargs` 原样保留。
fn strip_star_marker(text: &str) -> (String, bool) {
    let marked = text
        .strip_suffix('*')
        .filter(|rest| rest.ends_with(char::is_whitespace))
        .or_else(|| {
            text.strip_prefix('*')
                .filter(|rest| rest.starts_with(char::is_whitespace))
        })
        .map(str::trim)
        .filter(|rest| !rest.is_empty());

    match marked {
        Some(rest) => (rest.to_string(), true),
        None => (text.to_string(), false),
    }
}

/// 抽取一个分区的题目（只返回已提交的题目）
pub fn extract(section: &Section) -> Vec<Question> {
    extract_with_outcomes(section)
        .outcomes
        .into_iter()
        .filter_map(DraftOutcome::into_question)
        .collect()
}

/// 抽取一个分区，保留每个草稿的结局
pub fn extract_with_outcomes(section: &Section) -> SectionReport {
    let mut extractor = SectionExtractor::new(section);
    for line in section.lines() {
        extractor.feed(line);
    }
    SectionReport {
        section: section.clone(),
        outcomes: extractor.finish(),
    }
}
