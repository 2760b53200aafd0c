//! 文本预处理
//!
//! 从 Word 文档抽取的纯文本经常丢失换行，选项标记和答案标记会粘在上一句后面：
//!
//! ```text
//! 1. What is 2+2? A. 3 B. 4 C. 5 D. 6 Answer: B
//! ```
//!
//! 本模块把这些标记推到各自的新行上，保证后面按行处理的状态机能找到边界。
//! 标记前面哪怕只粘着一个字符（`3B. 4`、`6Answer: B`）也要切开。
//! 宁可多切（多出的换行无害），不可漏切（漏掉的标记整题丢失）。

use regex::Regex;
use std::sync::LazyLock;

use super::answer_key::{ANSWER_SEPARATOR, ANSWER_TOKENS};

/// 行内的选项标记：A~D（大小写均可）+ `.` `)` `]` + 空白，前面可紧贴任意字符
static OPTION_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Da-d][.)\]])[ ]+").expect("valid option marker regex")
});

/// 行内的答案标记，前面可带装饰字符（`.` `)` `]` 除外，它们属于选项标记）
///
/// 答案字母后面可以紧贴下一个选项标记（`Answer: BC. x`），这样选项切开后结果不变。
static ANSWER_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)[^\p{{L}}\p{{N}}\s.)\]]*[ ]*(?:{ANSWER_TOKENS}){ANSWER_SEPARATOR}\(?[a-d](?:\b|[a-d][.)\]])"
    ))
    .expect("valid answer marker regex")
});

/// 以答案标记结尾的前缀（`Answer: B. xxx` 中的 `B.` 不是选项）
static ANSWER_TAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{ANSWER_TOKENS})[\s:\-–—]*\(?\s*$"
    ))
    .expect("valid answer tail regex")
});

/// 预处理文档文本
///
/// 纯函数，对任意输入都成功，且幂等：`normalize(normalize(x)) == normalize(x)`。
pub fn normalize(raw: &str) -> String {
    let text = clean_whitespace(raw);
    let text = break_before(&text, &ANSWER_MARKER_REGEX, is_answer_boundary);
    break_before(&text, &OPTION_MARKER_REGEX, |prefix, _| {
        !ANSWER_TAIL_REGEX.is_match(prefix)
    })
}

/// 答案标记紧贴字母时，只在"小写 → 大写"处切开
///
/// `stackAnswer: B` 切；`Means: a`、`Incorrect: b` 里的 `ans` / `correct` 不切。
fn is_answer_boundary(prefix: &str, marker: &str) -> bool {
    let Some(token_start) = marker.chars().next() else {
        return false;
    };
    if !token_start.is_alphabetic() {
        return true;
    }
    match prefix.chars().next_back() {
        Some(prev) if prev.is_alphabetic() => prev.is_lowercase() && token_start.is_uppercase(),
        _ => true,
    }
}

/// 统一换行符，制表符与不换行空格替换为普通空格
fn clean_whitespace(raw: &str) -> String {
    raw.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace(['\t', '\u{00A0}'], " ")
}

/// 在同一行中、前面还有其他内容的标记前插入换行
///
/// `accept` 收到自上一个切分点以来的行内前缀和标记本身，返回 false 时不切。
fn break_before(text: &str, marker: &Regex, accept: impl Fn(&str, &str) -> bool) -> String {
    let mut out = String::with_capacity(text.len() + 16);

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }

        let mut segment_start = 0;
        for m in marker.find_iter(line) {
            let prefix = &line[segment_start..m.start()];
            if prefix.trim().is_empty() || !accept(prefix, m.as_str()) {
                continue;
            }
            out.push_str(prefix.trim_end());
            out.push('\n');
            segment_start = m.start() + leading_spaces(m.as_str());
        }
        out.push_str(&line[segment_start..]);
    }

    out
}

fn leading_spaces(s: &str) -> usize {
    s.len() - s.trim_start_matches(' ').len()
}
