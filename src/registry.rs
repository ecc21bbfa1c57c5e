//! ファイルレジストリ
//!
//! このセッションで作成したファイル名の順序付き集合。
//! 「ファイルが存在するか」の唯一の判断基準で、ディスクの状態とは同期しない
//! （プロセス外での作成・削除は反映されない）

use crate::error::RegistryError;

/// ファイルレジストリ
///
/// 挿入順を保持し、同じ名前は高々一つ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRegistry {
    names: Vec<String>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追跡中かどうか
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// 追加（既に存在する場合はエラー）
    pub fn add(&mut self, name: &str) -> Result<(), RegistryError> {
        if self.contains(name) {
            return Err(RegistryError::AlreadyTracked {
                name: name.to_string(),
            });
        }
        self.names.push(name.to_string());
        Ok(())
    }

    /// 削除。存在しなければ何もしない
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    /// 挿入順の名前一覧
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
