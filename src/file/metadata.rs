//! ファイルメタデータ
//!
//! 一覧表示用のサイズと最終更新時刻。レジストリではなくファイルストアから取得する

use crate::error::{MinidbError, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

/// 一覧表示用のメタデータ（整形は表示層で行う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    /// サイズ（バイト）
    pub size: u64,
    /// 最終更新時刻
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    /// メタデータを取得。ディスク上に存在しなければ `None`
    pub fn probe(path: &Path) -> Result<Option<Self>> {
        let metadata = match path.metadata() {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MinidbError::not_accessible(path, &e)),
        };

        Ok(Some(FileMetadata {
            size: metadata.len(),
            modified: metadata.modified().ok(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_existing_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sized.txt");
        fs::write(&path, "12345\n").unwrap();

        let meta = FileMetadata::probe(&path).unwrap().unwrap();
        assert_eq!(meta.size, 6);
        assert!(meta.modified.is_some());

        fs::remove_file(&path).unwrap();
        assert_eq!(FileMetadata::probe(&path).unwrap(), None);
    }
}
