//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量文档处理器
//! - 管理应用生命周期（初始化、运行）
//! - 扫描输入目录（Vec<PathBuf>）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `document_processor` - 单个文档处理器
//! - 读取并解码单个文档
//! - 调用解析层得到题目
//! - 写 warn 文件和题库文件
//! - 输出单个文档的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! document_processor (处理单个文档)
//!     ↓
//! parser (纯函数：normalize → segment → extract)
//!     ↓
//! services (能力层：read / write bank / warn)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，document_processor 管单个
//! 2. **IO 隔离**：解析层不做 IO，文件读写都在 services
//! 3. **无业务逻辑**：只做调度和统计，不做具体解析判断

pub mod batch_processor;
pub mod document_processor;

// 重新导出主要类型
pub use batch_processor::{App, RunSummary};
pub use document_processor::{process_document, DocumentStats};
