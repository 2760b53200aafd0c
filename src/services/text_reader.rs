//! 文档读取服务 - 业务能力层
//!
//! 只负责"把一个文件读成字符串"：识别 BOM，按 UTF-8 / UTF-16 解码。
//! Word 另存为"Unicode 文本"时得到的是带 BOM 的 UTF-16LE。

use crate::error::{AppError, AppResult, EncodingError, FileError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// 文档读取服务
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReader;

impl TextReader {
    pub fn new() -> Self {
        Self
    }

    /// 读取并解码一个文档
    pub async fn read(&self, path: &Path) -> AppResult<String> {
        let bytes = fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound {
                path: path.display().to_string(),
            }
            .into(),
            _ => AppError::file_read_failed(path.display().to_string(), e),
        })?;
        debug!("读取文件: {} ({} 字节)", path.display(), bytes.len());
        decode_text(&bytes)
    }

    /// 列出目录下所有 `.txt` 文档，按文件名排序
    pub async fn list_documents(&self, folder: &str) -> AppResult<Vec<PathBuf>> {
        let folder_path = PathBuf::from(folder);
        if !folder_path.is_dir() {
            return Err(FileError::DirectoryNotFound {
                path: folder.to_string(),
            }
            .into());
        }

        let mut documents = Vec::new();
        let mut entries = fs::read_dir(&folder_path)
            .await
            .map_err(|e| AppError::file_read_failed(folder, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::file_read_failed(folder, e))?
        {
            let path = entry.path();
            let is_txt = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
            if is_txt {
                info!(
                    "正在加载: {}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                );
                documents.push(path);
            }
        }

        documents.sort();
        Ok(documents)
    }
}

/// 按 BOM 解码字节
///
/// - `EF BB BF` → UTF-8（去掉 BOM）
/// - `FF FE` → UTF-16LE
/// - `FE FF` → UTF-16BE
/// - 无 BOM → UTF-8，非法字节替换为 U+FFFD 并记录警告
pub fn decode_text(bytes: &[u8]) -> AppResult<String> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return Ok(decode_utf8_lossy(rest));
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    Ok(decode_utf8_lossy(bytes))
}

fn decode_utf8_lossy(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            warn!("⚠️ 文档不是合法的 UTF-8（位置 {}），非法字节已替换", e.valid_up_to());
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> AppResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(EncodingError::OddUtf16Length { len: bytes.len() }.into());
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|source| EncodingError::InvalidUtf16 { source }.into())
}
