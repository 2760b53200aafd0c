use serde::{Deserialize, Serialize};

use crate::models::section::{SectionKind, SectionSummary};
use crate::models::subject::Subject;
use crate::parser::answer_key::index_letter;

/// 已提交的选择题
///
/// 不变量：`options` 有 2~4 项；`correct_answer_text` 非空时一定取自 `options`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub section_name: String,
    pub section_kind: SectionKind,
    /// 分区内序号，从 1 开始
    pub sequence_in_section: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
}

impl Question {
    /// 正确答案对应的选项字母（A~D）
    pub fn correct_option_letter(&self) -> Option<char> {
        let answer = self.correct_answer_text.as_ref()?;
        let index = self.options.iter().position(|o| o == answer)?;
        index_letter(index)
    }
}

/// 调用方提供、无法从文本推导的元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportMetadata {
    pub category: String,
    pub difficulty: String,
    /// 所属考核标准 ID
    pub owner_id: String,
}

impl ImportMetadata {
    pub fn new(
        category: impl Into<String>,
        difficulty: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            difficulty: difficulty.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// 题目所属方向：通用 / 选修
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    General,
    Elective,
}

impl Track {
    /// 选答分区或标题含 "elective" 的分区归为选修
    pub fn for_section(section_name: &str, kind: SectionKind) -> Self {
        if kind == SectionKind::Optional || section_name.to_lowercase().contains("elective") {
            Track::Elective
        } else {
            Track::General
        }
    }
}

/// 交给持久化端的题目记录（题目 + 调用方元数据）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub owner_id: String,
    pub category: String,
    pub difficulty: String,
    pub track: Track,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub section_name: String,
    pub section_kind: SectionKind,
    pub sequence_in_section: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    pub question_text: String,
    pub options: Vec<String>,
    /// 正确选项字母
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<String>,
    /// 正确选项文本
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub is_active: bool,
}

impl QuestionRecord {
    pub fn from_question(question: Question, metadata: &ImportMetadata) -> Self {
        let correct_option = question.correct_option_letter().map(String::from);
        Self {
            owner_id: metadata.owner_id.clone(),
            category: metadata.category.clone(),
            difficulty: metadata.difficulty.clone(),
            track: Track::for_section(&question.section_name, question.section_kind),
            subject: question.subject,
            section_name: question.section_name,
            section_kind: question.section_kind,
            sequence_in_section: question.sequence_in_section,
            select_count: question.select_count,
            total_count: question.total_count,
            question_text: question.text,
            options: question.options,
            correct_option,
            correct_answer: question.correct_answer_text,
            is_active: true,
        }
    }
}

/// 一份文档导出的完整题库
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// 源文件名
    pub source: String,
    pub generated_at: String,
    pub category: String,
    pub difficulty: String,
    pub owner_id: String,
    pub sections: Vec<SectionSummary>,
    pub questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            text: "What is 2+2?".to_string(),
            options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
            correct_answer_text: Some("4".to_string()),
            subject: None,
            section_name: "Python Based Questions (Optional - Choose 2 out of 4)".to_string(),
            section_kind: SectionKind::Optional,
            sequence_in_section: 1,
            select_count: Some(2),
            total_count: Some(4),
        }
    }

    #[test]
    fn test_correct_option_letter() {
        assert_eq!(sample_question().correct_option_letter(), Some('B'));

        let mut q = sample_question();
        q.correct_answer_text = None;
        assert_eq!(q.correct_option_letter(), None);
    }

    #[test]
    fn test_record_merges_metadata() {
        let metadata = ImportMetadata::new("Set A", "easy", "criteria-1");
        let record = QuestionRecord::from_question(sample_question(), &metadata);

        assert_eq!(record.category, "Set A");
        assert_eq!(record.difficulty, "easy");
        assert_eq!(record.owner_id, "criteria-1");
        assert_eq!(record.track, Track::Elective);
        assert_eq!(record.correct_option.as_deref(), Some("B"));
        assert_eq!(record.correct_answer.as_deref(), Some("4"));
        assert!(record.is_active);
    }

    #[test]
    fn test_track_for_section() {
        assert_eq!(
            Track::for_section("Section A: General", SectionKind::Mandatory),
            Track::General
        );
        assert_eq!(
            Track::for_section("Elective - Java", SectionKind::Mandatory),
            Track::Elective
        );
    }
}
