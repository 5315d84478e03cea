//! 资源存储
//!
//! 资源 ID → `{asset_dir}/{ASSET_ID}.{ext}`，核心只关心存在与否

use std::collections::HashSet;
use std::path::PathBuf;

/// 资源存储接口
pub trait AssetStore: Send + Sync {
    /// 返回可加载的资源路径，不存在时返回 `None`
    fn locate(&self, asset_id: &str) -> Option<PathBuf>;
}

/// 文件系统资源存储
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    asset_dir: PathBuf,
    extension: String,
}

impl FsAssetStore {
    pub fn new(asset_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            extension: extension.into(),
        }
    }

    /// 约定路径 (不检查是否存在)
    pub fn path_for(&self, asset_id: &str) -> PathBuf {
        self.asset_dir.join(format!("{}.{}", asset_id, self.extension))
    }
}

impl AssetStore for FsAssetStore {
    fn locate(&self, asset_id: &str) -> Option<PathBuf> {
        let path = self.path_for(asset_id);
        path.is_file().then_some(path)
    }
}

/// 内存资源存储，路径按约定拼出
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    available: HashSet<String>,
}

impl MemoryAssetStore {
    pub fn new<I, S>(asset_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: asset_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetStore for MemoryAssetStore {
    fn locate(&self, asset_id: &str) -> Option<PathBuf> {
        self.available
            .contains(asset_id)
            .then(|| PathBuf::from(format!("{}.gif", asset_id)))
    }
}
