//! 导入日志文件
//!
//! `output.txt` 由三部分组成：运行头、每个文档一行的处理结果、最后的全局汇总。
//! 控制台输出走 tracing，这里只管文件。

use crate::error::{AppError, AppResult};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// 写入运行头（覆盖旧日志）
pub fn init_log_file(
    log_file_path: &str,
    input_folder: &str,
    output_folder: &str,
) -> AppResult<()> {
    let log_header = format!(
        "{rule}\n题库导入日志 - {}\n输入目录: {}\n输出目录: {}\n{rule}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        input_folder,
        output_folder,
        rule = "=".repeat(60),
    );
    std::fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 追加一行
///
/// 各文档任务并发调用；每次只写一整行，行与行之间不会交错。
pub async fn append_log_line(log_file_path: &str, line: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    file.write_all(format!("{}\n", line.trim_end()).as_bytes())
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 截断长文本用于日志显示（按字符计数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
