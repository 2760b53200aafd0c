//! 题库写入服务 - 业务能力层
//!
//! 把一份 [`QuestionBank`] 序列化为 TOML 或 JSON，写到输出目录。

use crate::config::OutputFormat;
use crate::error::{AppError, AppResult, SinkError};
use crate::models::QuestionBank;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// 题库写入服务
#[derive(Debug, Clone)]
pub struct BankWriter {
    output_folder: PathBuf,
    format: OutputFormat,
}

impl BankWriter {
    pub fn new(output_folder: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            output_folder: output_folder.into(),
            format,
        }
    }

    /// 某个源文件对应的输出路径：`<output_folder>/<stem>.<ext>`
    pub fn output_path(&self, stem: &str) -> PathBuf {
        self.output_folder
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    /// 写入题库，返回写入的文件路径
    pub async fn write(&self, stem: &str, bank: &QuestionBank) -> AppResult<PathBuf> {
        let content = serialize_bank(bank, self.format)?;

        fs::create_dir_all(&self.output_folder).await.map_err(|e| {
            AppError::file_write_failed(self.output_folder.display().to_string(), e)
        })?;

        let path = self.output_path(stem);
        fs::write(&path, content)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        debug!("写入题库: {} ({} 道题)", path.display(), bank.question_count());
        Ok(path)
    }
}

/// 按格式序列化题库
pub fn serialize_bank(bank: &QuestionBank, format: OutputFormat) -> AppResult<String> {
    let content = match format {
        OutputFormat::Toml => toml::to_string_pretty(bank).map_err(SinkError::from)?,
        OutputFormat::Json => serde_json::to_string_pretty(bank).map_err(SinkError::from)?,
    };
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImportMetadata, QuestionRecord};
    use crate::parser::parse;

    fn sample_bank() -> QuestionBank {
        let metadata = ImportMetadata::new("Unit", "easy", "criteria-1");
        let questions: Vec<QuestionRecord> = parse(
            "Section A: General\n1. What is 2+2? A. 3 B. 4 Answer: B\n2. Pick one A. yes B. no",
            &metadata,
        );
        QuestionBank {
            source: "unit.txt".to_string(),
            generated_at: "2026-01-01 00:00:00".to_string(),
            category: metadata.category.clone(),
            difficulty: metadata.difficulty.clone(),
            owner_id: metadata.owner_id.clone(),
            sections: Vec::new(),
            questions,
        }
    }

    #[test]
    fn test_toml_bank_reads_back() {
        let bank = sample_bank();
        let content = serialize_bank(&bank, OutputFormat::Toml).unwrap();
        let back: QuestionBank = toml::from_str(&content).unwrap();

        assert_eq!(back.question_count(), 2);
        assert_eq!(back.questions, bank.questions);
        // 无答案的题不写 correct_answer 字段
        assert_eq!(back.questions[1].correct_answer, None);
    }

    #[test]
    fn test_json_bank_fields() {
        let content = serialize_bank(&sample_bank(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        let first = &value["questions"][0];
        assert_eq!(first["question_text"], "What is 2+2?");
        assert_eq!(first["correct_option"], "B");
        assert_eq!(first["correct_answer"], "4");
        assert_eq!(first["section_kind"], "mandatory");
        assert_eq!(first["track"], "general");
        assert_eq!(first["is_active"], true);
    }

    #[test]
    fn test_write_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let writer = BankWriter::new(dir.path().join("nested"), OutputFormat::Json);

        let path = tokio_test::block_on(writer.write("paper", &sample_bank())).unwrap();
        assert_eq!(path, dir.path().join("nested").join("paper.json"));
        assert!(path.exists());
    }
}
