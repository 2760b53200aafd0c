//! 答案行识别
//!
//! 识别形如 `Answer: B`、`✅ Ans: a`、`Correct Option - (c)` 的答案行，返回大写字母。
//! 行首允许任意非字母数字的装饰字符（对勾、箭头、项目符号、空白）。

use regex::Regex;
use std::sync::LazyLock;

/// 答案标记词，长的在前，避免 `Correct` 吞掉 `Correct Answer` 的一部分
pub(crate) const ANSWER_TOKENS: &str =
    r"correct\s+answer|correct\s+option|answer\s+key|correct|answer|ans\.|ans";

/// 标记词与字母之间的分隔符（冒号、各种横线、空白）
pub(crate) const ANSWER_SEPARATOR: &str = r"[\s:\-–—]+";

static ANSWER_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^[^\p{{L}}\p{{N}}]*(?:{ANSWER_TOKENS}){ANSWER_SEPARATOR}\(?([a-d])\b"
    ))
    .expect("valid answer line regex")
});

/// 选项字母个数上限（A~D）
pub const MAX_OPTION_LETTERS: usize = 4;

/// 匹配答案行，返回大写的选项字母
pub fn match_answer_line(line: &str) -> Option<char> {
    ANSWER_LINE_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_uppercase())
}

/// 字母 → 选项下标（A=0 … D=3），大小写不敏感
pub fn letter_index(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        c @ 'A'..='D' => Some(c as usize - 'A' as usize),
        _ => None,
    }
}

/// 选项下标 → 字母
pub fn index_letter(index: usize) -> Option<char> {
    if index < MAX_OPTION_LETTERS {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// 把答案字母解析到已收集的选项上，越界时返回 `None`
pub fn resolve_letter(letter: char, options: &[String]) -> Option<usize> {
    letter_index(letter).filter(|&i| i < options.len())
}
