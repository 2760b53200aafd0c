//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use crate::error::{AppError, AppResult};
use crate::parser::DraftOutcome;
use crate::utils::logging::truncate_text;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 写入 warn 文件时题干预览的最大长度
const PREVIEW_CHARS: usize = 60;

/// 警告写入服务
///
/// 职责：
/// - 将被丢弃、答案无法解析的题目写入 warn.txt
/// - 每次只写一条记录
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 写入指定路径的警告文件（追加模式）
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入一条警告：`文档 | 分区 | 原因 | 题干预览`
    pub async fn write(
        &self,
        document: &str,
        section: &str,
        reason: &str,
        preview: &str,
    ) -> AppResult<()> {
        debug!("写入警告: {} | {} | {}", document, section, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.warn_file_path, e))?;

        let warn_msg = format!(
            "{} | {} | {} | {}\n",
            document,
            section,
            reason,
            truncate_text(&preview.replace('\n', " "), PREVIEW_CHARS)
        );

        file.write_all(warn_msg.as_bytes())
            .await
            .map_err(|e| AppError::file_write_failed(&self.warn_file_path, e))?;

        Ok(())
    }

    /// 写入一个草稿结局；正常提交的题目不写
    pub async fn write_outcome(
        &self,
        document: &str,
        section: &str,
        outcome: &DraftOutcome,
    ) -> AppResult<()> {
        match outcome {
            DraftOutcome::Committed(_) => Ok(()),
            DraftOutcome::DroppedIncomplete { text, option_count } => {
                let reason = format!("选项不足 ({} 个)", option_count);
                self.write(document, section, &reason, text).await
            }
            DraftOutcome::AnswerUnresolved { question, letter } => {
                let reason = format!(
                    "答案 {} 超出选项范围 ({} 个)",
                    letter,
                    question.options.len()
                );
                self.write(document, section, &reason, &question.text).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warn.txt");
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        tokio_test::block_on(async {
            writer
                .write("a.txt", "Section A", "选项不足 (0 个)", "Explain\npolymorphism.")
                .await
                .unwrap();
            let outcome = DraftOutcome::DroppedIncomplete {
                text: "Lonely?".to_string(),
                option_count: 1,
            };
            writer.write_outcome("a.txt", "Section B", &outcome).await.unwrap();
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "a.txt | Section A | 选项不足 (0 个) | Explain polymorphism.",
                "a.txt | Section B | 选项不足 (1 个) | Lonely?",
            ]
        );
    }
}
