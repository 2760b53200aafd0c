//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个文档，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **读取解码**：委托 `TextReader` 读文件（UTF-8 / UTF-16）
//! 2. **解析**：委托 `parser::parse_document` 得到分区和草稿结局
//! 3. **警告记录**：丢弃和答案无法解析的草稿写入 warn 文件
//! 4. **题库输出**：委托 `BankWriter` 写 `<stem>.toml` / `<stem>.json`
//! 5. **统计输出**：分区数、提交/丢弃/未解析数量写到控制台，并追加一行到导入日志

use crate::config::Config;
use crate::models::{ImportMetadata, QuestionBank, QuestionRecord};
use crate::parser::{self, ParsedDocument};
use crate::services::{BankWriter, TextReader, WarnWriter};
use crate::utils::logging::append_log_line;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 单个文档的处理统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub sections: usize,
    pub committed: usize,
    pub dropped: usize,
    pub unresolved: usize,
    /// 写出的题库文件；没有题目时为 None
    pub output_path: Option<PathBuf>,
}

impl DocumentStats {
    /// 导入日志中的一行：`[成功] a.txt | 分区 3 | 导入 12 | 丢弃 1 | 未解析 0 | output_bank/a.toml`
    pub fn log_line(&self, file_name: &str) -> String {
        let status = if self.output_path.is_some() {
            "成功"
        } else {
            "无题目"
        };
        let mut line = format!(
            "[{}] {} | 分区 {} | 导入 {} | 丢弃 {} | 未解析 {}",
            status, file_name, self.sections, self.committed, self.dropped, self.unresolved
        );
        if let Some(path) = &self.output_path {
            line.push_str(&format!(" | {}", path.display()));
        }
        line
    }
}

/// 处理单个文档
///
/// # 参数
/// - `path`: 文档路径
/// - `document_index`: 文档索引（用于日志）
/// - `config`: 配置
pub async fn process_document(
    path: &Path,
    document_index: usize,
    config: &Config,
) -> Result<DocumentStats> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let stem = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    info!("[文档 {}] 📄 开始处理: {}", document_index, file_name);

    let text = TextReader::new()
        .read(path)
        .await
        .with_context(|| format!("无法读取文档: {}", path.display()))?;
    let parsed = parser::parse_document(&text);

    let mut stats = DocumentStats {
        sections: parsed.sections.len(),
        committed: parsed.committed_count(),
        dropped: parsed.dropped_count(),
        unresolved: parsed.unresolved_count(),
        output_path: None,
    };

    record_problems(&parsed, &file_name, config)
        .await
        .with_context(|| format!("无法写入警告文件: {}", config.warn_file))?;

    if stats.committed == 0 {
        warn!(
            "[文档 {}] ⚠️ 未识别到任何题目，跳过输出: {}",
            document_index, file_name
        );
    } else {
        let metadata = import_metadata(config, &stem);
        let bank = build_bank(&file_name, &metadata, parsed);

        let writer = BankWriter::new(&config.output_folder, config.output_format);
        let output_path = writer
            .write(&stem, &bank)
            .await
            .with_context(|| format!("无法写入题库: {}", stem))?;
        stats.output_path = Some(output_path);
    }

    log_document_complete(document_index, &stats);
    append_log_line(&config.output_log_file, &stats.log_line(&file_name))
        .await
        .with_context(|| format!("无法写入导入日志: {}", config.output_log_file))?;
    Ok(stats)
}

/// 调用方元数据；分类为空时使用文件名
pub fn import_metadata(config: &Config, stem: &str) -> ImportMetadata {
    let category = if config.category.trim().is_empty() {
        stem
    } else {
        config.category.as_str()
    };
    ImportMetadata::new(category, &config.difficulty, &config.owner_id)
}

fn build_bank(source: &str, metadata: &ImportMetadata, parsed: ParsedDocument) -> QuestionBank {
    let sections = parsed.summaries();
    let questions = parsed
        .into_questions()
        .into_iter()
        .map(|q| QuestionRecord::from_question(q, metadata))
        .collect();

    QuestionBank {
        source: source.to_string(),
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        category: metadata.category.clone(),
        difficulty: metadata.difficulty.clone(),
        owner_id: metadata.owner_id.clone(),
        sections,
        questions,
    }
}

async fn record_problems(parsed: &ParsedDocument, file_name: &str, config: &Config) -> Result<()> {
    let warn_writer = WarnWriter::with_path(&config.warn_file);
    for (report, outcome) in parsed.problems() {
        warn_writer
            .write_outcome(file_name, &report.section.name, outcome)
            .await?;
    }
    Ok(())
}

fn log_document_complete(document_index: usize, stats: &DocumentStats) {
    info!("\n[文档 {}] {}", document_index, "─".repeat(40));
    info!("[文档 {}] 📊 分区: {}", document_index, stats.sections);
    info!("[文档 {}] ✓ 导入题目: {}", document_index, stats.committed);
    info!("[文档 {}] ✗ 丢弃草稿: {}", document_index, stats.dropped);
    info!("[文档 {}] ⚠ 答案未解析: {}", document_index, stats.unresolved);
    if let Some(path) = &stats.output_path {
        info!("[文档 {}] 💾 输出: {}", document_index, path.display());
    }
    info!("[文档 {}] {}\n", document_index, "─".repeat(40));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_defaults_to_stem() {
        let config = Config::default();
        let metadata = import_metadata(&config, "mock_paper_3");
        assert_eq!(metadata.category, "mock_paper_3");
        assert_eq!(metadata.difficulty, "medium");

        let config = Config {
            category: "Placement".to_string(),
            ..Config::default()
        };
        assert_eq!(import_metadata(&config, "x").category, "Placement");
    }

    #[test]
    fn test_log_line() {
        let mut stats = DocumentStats {
            sections: 2,
            committed: 0,
            dropped: 1,
            unresolved: 0,
            output_path: None,
        };
        assert_eq!(
            stats.log_line("a.txt"),
            "[无题目] a.txt | 分区 2 | 导入 0 | 丢弃 1 | 未解析 0"
        );

        stats.committed = 5;
        stats.output_path = Some(PathBuf::from("out/a.toml"));
        assert!(stats.log_line("a.txt").starts_with("[成功] a.txt | 分区 2 | 导入 5"));
        assert!(stats.log_line("a.txt").ends_with("| out/a.toml"));
    }
}
