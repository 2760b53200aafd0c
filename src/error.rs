use thiserror::Error;

/// 应用程序错误类型
///
/// 只覆盖外围协作者（读文件、解码、配置、写题库）。
/// 解析核心对任意输入都是全函数，不会产生错误。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 文本编码错误
    #[error("编码错误: {0}")]
    Encoding(#[from] EncodingError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 题库输出错误
    #[error("输出错误: {0}")]
    Sink(#[from] SinkError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 文本编码错误
#[derive(Debug, Error)]
pub enum EncodingError {
    /// UTF-16 字节数不是偶数
    #[error("UTF-16 数据长度为奇数: {len} 字节")]
    OddUtf16Length { len: usize },
    /// UTF-16 数据包含非法代理对
    #[error("UTF-16 解码失败: {source}")]
    InvalidUtf16 {
        #[source]
        source: std::string::FromUtf16Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 未知的输出格式
    #[error("未知的输出格式: '{value}' (可选: toml, json)")]
    InvalidOutputFormat { value: String },
}

/// 题库输出错误
#[derive(Debug, Error)]
pub enum SinkError {
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),
}

// ========== 从常见错误类型转换 ==========

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(), // io::Error 不携带路径
            source: err,
        })
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Sink(SinkError::TomlSerializeFailed(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Sink(SinkError::JsonSerializeFailed(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建环境变量解析错误
    pub fn env_parse_failed(
        var_name: impl Into<String>,
        value: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_to_file_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }

    #[test]
    fn test_config_error_message_names_variable() {
        let err = AppError::env_parse_failed("MAX_CONCURRENT_DOCUMENTS", "abc", "usize");
        let msg = err.to_string();
        assert!(msg.contains("MAX_CONCURRENT_DOCUMENTS"));
        assert!(msg.contains("abc"));
    }
}
