use serde::{Deserialize, Serialize};

/// 未检测到任何分区标题时使用的占位名称
pub const DEFAULT_SECTION_NAME: &str = "Imported Questions";

/// 分区类型：必答 / 选答
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    Mandatory,
    Optional,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Mandatory => "mandatory",
            SectionKind::Optional => "optional",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 文档中一个标题下的连续正文
///
/// `content` 只包含正文行，不含标题行。`select_count` / `total_count`
/// 仅在标题带有 "Choose K out of N" 语义时设置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub kind: SectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    pub content: String,
}

impl Section {
    /// 正文行（已去除首尾空白，跳过空行）
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}

/// 分区摘要（写入题库文件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub kind: SectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u32>,
    pub question_count: usize,
}

impl SectionSummary {
    pub fn new(section: &Section, question_count: usize) -> Self {
        Self {
            name: section.name.clone(),
            kind: section.kind,
            select_count: section.select_count,
            total_count: section.total_count,
            question_count,
        }
    }
}
