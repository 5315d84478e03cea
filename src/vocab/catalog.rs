//! 手语词汇目录
//!
//! 启动时加载一次的有序词汇表，之后只读

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SignBridgeError};

/// 内置词汇 (与 GIF 资源文件名一致)
pub const DEFAULT_GLOSSES: &[&str] = &[
    "ANGRY", "BAD", "BYE", "COME-GO", "CONGRATULATIONS", "DAY", "DRINK", "EAT",
    "EXCITED", "FAMILY", "FRIEND", "GOOD-MORNING", "GOOD", "HAPPY", "HAVE", "HELLO",
    "HELP", "HUNGRY", "I-LOVE-YOU", "KNOW", "LATER", "LEARN", "LIKE", "MAYBE",
    "MORNING", "MY", "NEED", "NIGHT", "NO", "NOT-LIKE", "NOW", "PLAY",
    "PLEASE", "SAD", "SEE-YOU-LATER", "SEE", "SIT", "SLEEP", "SORRY", "STAND",
    "STOP", "SURPRISE", "THANKYOU", "TIRED", "TOMORROW", "UNDERSTAND", "WAIT", "WANT",
    "WE", "WELCOME", "WORK", "YES", "YOU", "YOUR",
];

/// 词汇条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub canonical_name: String,
    pub asset_id: String,
}

impl VocabularyEntry {
    /// 资源 ID 与规范名相同的条目
    pub fn named(name: impl Into<String>) -> Self {
        let canonical_name = name.into();
        Self {
            asset_id: canonical_name.clone(),
            canonical_name,
        }
    }
}

/// 目录文件格式：名字列表或完整条目列表
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Names(Vec<String>),
    Entries(Vec<VocabularyEntry>),
}

/// 词汇目录
///
/// 顺序固定，子串回退匹配依赖这个顺序
#[derive(Debug, Clone)]
pub struct VocabularyCatalog {
    entries: Vec<VocabularyEntry>,
}

impl VocabularyCatalog {
    /// 从条目构建，校验名字非空且不重复 (大小写不敏感)
    pub fn new(entries: Vec<VocabularyEntry>) -> Result<Self> {
        let mut seen: Vec<String> = Vec::with_capacity(entries.len());

        for entry in &entries {
            let name = entry.canonical_name.trim();
            if name.is_empty() {
                return Err(SignBridgeError::InvalidCatalog {
                    message: "empty canonical name".to_string(),
                });
            }
            if entry.asset_id.trim().is_empty() {
                return Err(SignBridgeError::InvalidCatalog {
                    message: format!("empty asset id for {}", name),
                });
            }

            let key = fold_case(name);
            if seen.contains(&key) {
                return Err(SignBridgeError::InvalidCatalog {
                    message: format!("duplicate gloss {}", name),
                });
            }
            seen.push(key);
        }

        Ok(Self { entries })
    }

    /// 从名字列表构建
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(VocabularyEntry::named).collect())
    }

    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| SignBridgeError::io("read catalog file", e))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(data)
            .map_err(|e| SignBridgeError::json("parse catalog file", e))?;

        match file {
            CatalogFile::Names(names) => Self::from_names(names),
            CatalogFile::Entries(entries) => Self::new(entries),
        }
    }

    /// 精确匹配 (大小写不敏感)
    pub fn get(&self, name: &str) -> Option<&VocabularyEntry> {
        let key = fold_case(name);
        self.entries
            .iter()
            .find(|e| fold_case(&e.canonical_name) == key)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// 按目录顺序的规范名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.canonical_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 名字比较统一用的大小写折叠 (Unicode 大写)
pub(crate) fn fold_case(name: &str) -> String {
    name.to_uppercase()
}

impl Default for VocabularyCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_GLOSSES.iter().map(|n| VocabularyEntry::named(*n)).collect(),
        }
    }
}
