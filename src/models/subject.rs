use phf::phf_map;

/// 科目标签
///
/// 只作为题目的附加元数据，不会导致任何题目被丢弃。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    #[serde(rename = "javascript")]
    JavaScript,
    Java,
    Python,
    Sql,
    /// 数量/能力测试
    Aptitude,
    /// 逻辑推理
    Reasoning,
    /// 语法 / 英语 / 言语能力
    Verbal,
    /// 计算机基础
    ComputerScience,
}

/// 独立成行的科目关键字（精确匹配，小写）
static SUBJECT_ALIASES: phf::Map<&'static str, Subject> = phf_map! {
    "javascript" => Subject::JavaScript,
    "js" => Subject::JavaScript,
    "java" => Subject::Java,
    "python" => Subject::Python,
    "sql" => Subject::Sql,
    "dbms" => Subject::Sql,
    "aptitude" => Subject::Aptitude,
    "reasoning" => Subject::Reasoning,
    "logical reasoning" => Subject::Reasoning,
    "grammar" => Subject::Verbal,
    "english" => Subject::Verbal,
    "verbal" => Subject::Verbal,
    "computer science" => Subject::ComputerScience,
};

/// 标题关键字 → 科目，按整词顺序匹配，先匹配者胜出
const HEADER_KEYWORDS: &[(&[&str], Subject)] = &[
    (&["javascript", "typescript", "node.js"], Subject::JavaScript),
    (&["java"], Subject::Java),
    (&["python"], Subject::Python),
    (&["sql", "mysql", "database", "dbms"], Subject::Sql),
    (&["aptitude", "quantitative"], Subject::Aptitude),
    (&["logic", "logical", "reasoning"], Subject::Reasoning),
    (&["grammar", "english", "verbal"], Subject::Verbal),
    (&["computer science", "computer fundamentals"], Subject::ComputerScience),
];

/// 题干中的语言特征词（按整词匹配）
const CONTENT_KEYWORDS: &[(&[&str], Subject)] = &[
    (&["java", "jvm", "spring", "hibernate", "servlet", "jsp"], Subject::Java),
    (&["python", "django", "flask", "pandas", "numpy", "pip"], Subject::Python),
];

impl Subject {
    /// 获取科目标签（持久化使用）
    pub fn tag(self) -> &'static str {
        match self {
            Subject::JavaScript => "javascript",
            Subject::Java => "java",
            Subject::Python => "python",
            Subject::Sql => "sql",
            Subject::Aptitude => "aptitude",
            Subject::Reasoning => "reasoning",
            Subject::Verbal => "verbal",
            Subject::ComputerScience => "computer_science",
        }
    }

    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::JavaScript => "JavaScript",
            Subject::Java => "Java",
            Subject::Python => "Python",
            Subject::Sql => "SQL",
            Subject::Aptitude => "Aptitude",
            Subject::Reasoning => "Logical Reasoning",
            Subject::Verbal => "Verbal Ability",
            Subject::ComputerScience => "Computer Science",
        }
    }

    /// 尝试把整行文本当作科目关键字解析（精确匹配，忽略大小写）
    pub fn from_alias(s: &str) -> Option<Self> {
        SUBJECT_ALIASES
            .get(s.trim().to_lowercase().as_str())
            .copied()
    }

    /// 根据分区标题判断科目（关键字按整词匹配）
    pub fn classify(section_name: &str) -> Option<Self> {
        let lower = section_name.to_lowercase();
        HEADER_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| contains_word(&lower, k)))
            .map(|(_, subject)| *subject)
    }

    /// 根据题干内容判断编程语言（分区标题没有科目时的兜底）
    pub fn detect_in_text(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        CONTENT_KEYWORDS
            .iter()
            .find(|(keywords, _)| words.iter().any(|w| keywords.contains(w)))
            .map(|(_, subject)| *subject)
    }
}

/// `word` 在 `haystack` 中出现，且两侧不是字母或数字
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
