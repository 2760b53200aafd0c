use crate::error::{AppError, AppResult, ConfigError, FileError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 题库输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Toml,
    Json,
}

impl OutputFormat {
    /// 输出文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Toml => "toml",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "toml" => Ok(OutputFormat::Toml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidOutputFormat {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待导入文档（.txt）所在目录
    pub input_folder: String,
    /// 题库输出目录
    pub output_folder: String,
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 丢弃题目记录文件
    pub warn_file: String,
    /// 题库输出格式
    pub output_format: OutputFormat,
    // --- 导入元数据（解析器本身不产生，由调用方合并） ---
    /// 题目分类（为空时使用文件名）
    pub category: String,
    pub difficulty: String,
    /// 所属考核标准 ID
    pub owner_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "input_docs".to_string(),
            output_folder: "output_bank".to_string(),
            max_concurrent_documents: 8,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            output_format: OutputFormat::Toml,
            category: String::new(),
            difficulty: "medium".to_string(),
            owner_id: String::new(),
        }
    }
}

impl Config {
    /// 加载配置：`CONFIG_FILE` 指向的 TOML 文件（可选）+ 环境变量覆盖
    ///
    /// 无法解析的环境变量返回错误，不静默回退到默认值。
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path, e))?;
        toml::from_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: path.to_string(),
                source,
            })
        })
    }

    fn with_env_overrides(mut self) -> AppResult<Self> {
        if let Ok(v) = std::env::var("INPUT_FOLDER") {
            self.input_folder = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_FOLDER") {
            self.output_folder = v;
        }
        if let Some(v) = parse_env::<usize>("MAX_CONCURRENT_DOCUMENTS", "usize")? {
            self.max_concurrent_documents = v;
        }
        if let Some(v) = parse_env::<bool>("VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        if let Ok(v) = std::env::var("WARN_FILE") {
            self.warn_file = v;
        }
        if let Ok(v) = std::env::var("OUTPUT_FORMAT") {
            self.output_format = v.parse()?;
        }
        if let Ok(v) = std::env::var("IMPORT_CATEGORY") {
            self.category = v;
        }
        if let Ok(v) = std::env::var("IMPORT_DIFFICULTY") {
            self.difficulty = v;
        }
        if let Ok(v) = std::env::var("IMPORT_OWNER_ID") {
            self.owner_id = v;
        }
        // 并发数为 0 时 Semaphore 永远拿不到许可
        self.max_concurrent_documents = self.max_concurrent_documents.max(1);
        Ok(self)
    }
}

fn parse_env<T: FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::env_parse_failed(var_name, value, expected_type)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path.to_string_lossy().to_string())
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let (_dir, path) = write_config(
            r#"
            input_folder = "docs"
            output_format = "json"
            "#,
        );
        let config = Config::from_toml_file(&path).unwrap();

        assert_eq!(config.input_folder, "docs");
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.difficulty, "medium");
        assert_eq!(config.max_concurrent_documents, 8);
    }

    #[test]
    fn test_invalid_toml_is_file_error() {
        let (_dir, path) = write_config("input_folder = [");
        let err = Config::from_toml_file(&path).unwrap_err();
        assert!(matches!(
            err,
            AppError::File(FileError::TomlParseFailed { path: p, .. }) if p == path
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_toml_file("/no/such/config.toml").unwrap_err();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("TOML".parse::<OutputFormat>().unwrap(), OutputFormat::Toml);
        assert_eq!(" json ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
