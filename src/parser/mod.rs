//! 解析层（Parsing Layer）
//!
//! 纯函数流水线，不做任何 IO：
//!
//! ```text
//! 原始文本
//!     ↓ normalizer::normalize      (把粘连的选项/答案标记拆到新行)
//!     ↓ segmenter::segment         (按标题切分区)
//!     ↓ extractor::extract         (逐行状态机抽题)
//!     ↓ QuestionRecord::from_question (合并调用方元数据)
//! Vec<QuestionRecord>
//! ```

pub mod answer_key;
pub mod extractor;
pub mod normalizer;
pub mod segmenter;

use tracing::debug;

use crate::models::{ImportMetadata, Question, QuestionRecord, SectionSummary};

pub use extractor::{extract, extract_with_outcomes, DraftOutcome, SectionReport};
pub use normalizer::normalize;
pub use segmenter::segment;

/// 一份文档的解析结果，按分区保留每个草稿的结局
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub sections: Vec<SectionReport>,
}

impl ParsedDocument {
    /// 按文档顺序取出所有已提交的题目
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(SectionReport::questions)
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.sections
            .into_iter()
            .flat_map(|report| report.outcomes)
            .filter_map(DraftOutcome::into_question)
            .collect()
    }

    /// 丢弃、答案无法解析的草稿（供 warn 文件使用）
    pub fn problems(&self) -> impl Iterator<Item = (&SectionReport, &DraftOutcome)> {
        self.sections.iter().flat_map(|report| {
            report
                .outcomes
                .iter()
                .filter(|o| !matches!(o, DraftOutcome::Committed(_)))
                .map(move |o| (report, o))
        })
    }

    pub fn summaries(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|r| SectionSummary::new(&r.section, r.committed_count()))
            .collect()
    }

    pub fn committed_count(&self) -> usize {
        self.sections.iter().map(SectionReport::committed_count).sum()
    }

    pub fn dropped_count(&self) -> usize {
        self.sections.iter().map(SectionReport::dropped_count).sum()
    }

    pub fn unresolved_count(&self) -> usize {
        self.sections.iter().map(SectionReport::unresolved_count).sum()
    }
}

/// 解析整份文档，保留分区和草稿结局
pub fn parse_document(raw: &str) -> ParsedDocument {
    let text = normalize(raw);
    let sections: Vec<SectionReport> = segment(&text)
        .iter()
        .map(extract_with_outcomes)
        .collect();

    debug!(
        "   📑 {} 个分区, {} 道题",
        sections.len(),
        sections.iter().map(SectionReport::committed_count).sum::<usize>()
    );
    ParsedDocument { sections }
}

/// 解析整份文档，只返回题目
pub fn parse_questions(raw: &str) -> Vec<Question> {
    parse_document(raw).into_questions()
}

/// 解析整份文档并合并调用方元数据
///
/// 对任意输入都成功；没有可识别的题目时返回空列表。
pub fn parse(raw: &str, metadata: &ImportMetadata) -> Vec<QuestionRecord> {
    parse_questions(raw)
        .into_iter()
        .map(|q| QuestionRecord::from_question(q, metadata))
        .collect()
}
