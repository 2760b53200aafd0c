//! # Import Question Bank
//!
//! 把纯文本试卷（Word 导出的 .txt）批量解析为结构化选择题题库的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的三层架构：
//!
//! ### ① 解析层（Parser）
//! - `parser/` - 纯函数，不做 IO，对任意输入都不会失败
//! - `normalizer` - 把粘连在一行里的选项/答案标记拆到新行
//! - `segmenter` - 识别分区标题，切分必答/选答分区
//! - `extractor` - 逐行状态机，累积题干、选项、答案并提交
//! - `answer_key` - 答案行识别与字母解析
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文件
//! - `TextReader` - 读文件、识别 BOM、UTF-8 / UTF-16 解码
//! - `BankWriter` - 写 TOML / JSON 题库
//! - `WarnWriter` - 写 warn.txt 能力
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量文档处理器，管理并发
//! - `orchestrator/document_processor` - 单个文档处理器，串起读取、解析、输出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::{Config, OutputFormat};
pub use error::{AppError, AppResult};
pub use models::{
    ImportMetadata, Question, QuestionBank, QuestionRecord, Section, SectionKind, Subject,
};
pub use orchestrator::{process_document, App, DocumentStats, RunSummary};
pub use parser::{parse, parse_document, parse_questions, ParsedDocument};
