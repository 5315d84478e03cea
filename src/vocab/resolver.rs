//! 资源解析器
//!
//! 手语词 → 资源 ID，失败时回退为文字显示

use std::path::PathBuf;
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, warn};

use super::catalog::{fold_case, VocabularyCatalog};
use crate::external::assets::AssetStore;

/// 单步显示内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDisplay {
    /// 可加载的资源
    Asset { asset_id: String, path: PathBuf },
    /// 回退：直接显示原词
    Text(String),
}

impl StepDisplay {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// 资源解析器
///
/// 解析顺序 (先匹配者胜)：
/// 1. 与规范名精确匹配 (大小写不敏感)
/// 2. 规范名包含该词的条目，多个候选时取目录顺序中的第一个
/// 3. 无匹配返回 `None`
///
/// 目录不可变且有序，所以同一个词的结果总是相同
#[derive(Debug, Clone)]
pub struct AssetResolver {
    catalog: Arc<VocabularyCatalog>,
}

impl AssetResolver {
    pub fn new(catalog: Arc<VocabularyCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VocabularyCatalog {
        &self.catalog
    }

    /// 解析资源 ID
    pub fn resolve(&self, word: &str) -> Option<&str> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }

        if let Some(entry) = self.catalog.get(word) {
            return Some(entry.asset_id.as_str());
        }

        let needle = fold_case(word);
        self.catalog
            .entries()
            .iter()
            .find(|e| fold_case(&e.canonical_name).contains(&needle))
            .map(|e| e.asset_id.as_str())
    }

    /// 解析并检查资源是否可加载
    pub fn locate(&self, word: &str, store: &dyn AssetStore) -> StepDisplay {
        let Some(asset_id) = self.resolve(word) else {
            debug!("No asset for gloss {:?}, showing text", word);
            return StepDisplay::Text(word.to_string());
        };

        match store.locate(asset_id) {
            Some(path) => StepDisplay::Asset {
                asset_id: asset_id.to_string(),
                path,
            },
            None => {
                warn!("Asset {} for gloss {:?} failed to load, showing text", asset_id, word);
                StepDisplay::Text(word.to_string())
            }
        }
    }
}
