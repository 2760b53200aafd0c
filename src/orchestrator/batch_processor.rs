//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的处理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写导入日志头、创建输出目录
//! 2. **批量扫描**：扫描输入目录下所有待导入的 `.txt` 文档
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总分区、导入、丢弃、未解析数量，写到控制台和导入日志
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个文档的细节
//! - **并发安全**：通过 Semaphore 和 tokio::spawn 实现并发
//! - **向下委托**：委托 document_processor 处理单个文档

use crate::config::Config;
use crate::orchestrator::document_processor::{self, DocumentStats};
use crate::services::TextReader;
use crate::utils::logging::{append_log_line, init_log_file};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

/// 一次运行的汇总
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// 处理成功、但没有识别到题目的文档
    pub empty: usize,
    pub sections: usize,
    /// 所有文档导入的题目总数
    pub questions: usize,
    pub dropped: usize,
    pub unresolved: usize,
}

impl RunSummary {
    fn absorb(&mut self, stats: &DocumentStats) {
        self.success += 1;
        if stats.output_path.is_none() {
            self.empty += 1;
        }
        self.sections += stats.sections;
        self.questions += stats.committed;
        self.dropped += stats.dropped;
        self.unresolved += stats.unresolved;
    }

    fn merge(&mut self, other: &RunSummary) {
        self.success += other.success;
        self.failed += other.failed;
        self.empty += other.empty;
        self.sections += other.sections;
        self.questions += other.questions;
        self.dropped += other.dropped;
        self.unresolved += other.unresolved;
    }

    /// 导入日志末尾的汇总行
    pub fn log_line(&self) -> String {
        format!(
            "汇总: 文档 {}/{} 成功（{} 个无题目），失败 {} | 分区 {} | 导入 {} | 丢弃 {} | 未解析 {}",
            self.success,
            self.total,
            self.empty,
            self.failed,
            self.sections,
            self.questions,
            self.dropped,
            self.unresolved
        )
    }
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化导入日志
        init_log_file(&config.output_log_file, &config.input_folder, &config.output_folder)?;

        tokio::fs::create_dir_all(&config.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", config.output_folder))?;

        info!("{}", "=".repeat(60));
        info!("🚀 题库导入启动");
        info!("📁 输入目录: {}", config.input_folder);
        info!("💾 输出目录: {} ({})", config.output_folder, config.output_format);
        info!("📊 最大并发数: {}", config.max_concurrent_documents);
        info!("{}", "=".repeat(60));

        Ok(Self { config })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<RunSummary> {
        // 扫描所有待导入的文档
        let documents = self.load_documents().await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待导入的 .txt 文件，程序结束");
            return Ok(RunSummary::default());
        }

        info!("✓ 找到 {} 个待导入的文档，每批 {} 个", documents.len(), self.batch_size());

        let summary = self.process_all_documents(documents).await?;
        self.report(&summary).await?;

        Ok(summary)
    }

    /// 输出全局统计，并把汇总行追加到导入日志
    async fn report(&self, summary: &RunSummary) -> Result<()> {
        info!("\n{}", "=".repeat(60));
        info!("📊 导入完成");
        info!("{}", "=".repeat(60));
        info!("✅ 文档成功: {}/{}", summary.success, summary.total);
        if summary.empty > 0 {
            warn!("⚠️ 其中 {} 个文档没有识别到题目", summary.empty);
        }
        if summary.failed > 0 {
            warn!("❌ 文档失败: {}", summary.failed);
        }
        info!("📑 分区: {}", summary.sections);
        info!("📝 导入题目: {}", summary.questions);
        info!("✗ 丢弃草稿: {}", summary.dropped);
        info!("⚠ 答案未解析: {}", summary.unresolved);
        if summary.dropped + summary.unresolved > 0 {
            info!("🔍 问题草稿明细见: {}", self.config.warn_file);
        }
        info!("{}", "=".repeat(60));

        append_log_line(&self.config.output_log_file, &summary.log_line())
            .await
            .with_context(|| format!("无法写入导入日志: {}", self.config.output_log_file))?;
        info!("日志已保存至: {}", self.config.output_log_file);
        Ok(())
    }

    /// 扫描文档
    async fn load_documents(&self) -> Result<Vec<PathBuf>> {
        info!("\n📁 正在扫描待导入的文档...");
        TextReader::new()
            .list_documents(&self.config.input_folder)
            .await
            .with_context(|| format!("无法扫描输入目录: {}", self.config.input_folder))
    }

    fn batch_size(&self) -> usize {
        self.config.max_concurrent_documents.max(1)
    }

    /// 处理所有文档
    async fn process_all_documents(&self, documents: Vec<PathBuf>) -> Result<RunSummary> {
        let batch_size = self.batch_size();
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = documents.len();
        let total_batches = total.div_ceil(batch_size);
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };

        // 分批处理
        for (batch_idx, batch) in documents.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            info!(
                "\n📦 第 {}/{} 批: 文档 {}-{} / 共 {} 个",
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total
            );

            let batch_result = self
                .process_batch(batch, batch_start, semaphore.clone())
                .await?;

            info!(
                "✓ 第 {} 批完成: 成功 {}/{}，导入 {} 题，丢弃 {}，未解析 {}",
                batch_num,
                batch_result.success,
                batch.len(),
                batch_result.questions,
                batch_result.dropped,
                batch_result.unresolved
            );
            summary.merge(&batch_result);
        }

        Ok(summary)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[PathBuf],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<RunSummary> {
        let mut batch_handles = Vec::new();

        // 为本批创建并发任务
        for (idx, path) in batch.iter().enumerate() {
            let document_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let path = path.clone();
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result =
                    document_processor::process_document(&path, document_index, &config).await;
                if let Err(e) = &result {
                    error!("[文档 {}] ❌ 处理过程中发生错误: {:#}", document_index, e);
                    let line = format!("[失败] {} | {:#}", path.display(), e);
                    if let Err(log_err) = append_log_line(&config.output_log_file, &line).await {
                        warn!("⚠️ 写入导入日志失败: {}", log_err);
                    }
                }
                result
            });
            batch_handles.push((document_index, handle));
        }

        // 等待本批所有任务完成
        let mut result = RunSummary::default();

        for (document_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(stats)) => result.absorb(&stats),
                Ok(Err(_)) => {
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}
