//! セッション
//!
//! レジストリとファイルストアを一つのセッションが所有し、
//! 作成・読み込み・更新・削除・一覧の各操作でレジストリとディスクの整合を保つ。
//!
//! レジストリはこのセッションで作成したファイルだけを追跡する。
//! 起動時にディスクを走査して初期化することはしない

pub mod edit;

use crate::error::{InputError, MinidbError, Result};
use crate::file::editor::is_temp_name;
use crate::file::{
    EditOutcome, FileMetadata, FileStore, LineCounter, LineEditor, ReadOutcome, RemoveOutcome,
};
use crate::registry::FileRegistry;
use std::path::{Path, PathBuf};

pub use edit::{EditLoop, EditMode, EditStep, Feedback, Prompt, SENTINEL};

/// 一覧の一項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    /// ディスク上に見つからなければ `None`
    pub metadata: Option<FileMetadata>,
}

/// ファイル管理セッション
pub struct Session {
    registry: FileRegistry,
    store: FileStore,
    editor: LineEditor,
    uniform_retry: bool,
}

impl Session {
    /// 新しいセッションを作成（レジストリは空）
    pub fn new(store: FileStore) -> Self {
        Self {
            registry: FileRegistry::new(),
            store,
            editor: LineEditor::new(),
            uniform_retry: false,
        }
    }

    /// 行削除モードでも範囲外の行番号で再入力を求める
    pub fn with_uniform_retry(mut self, uniform_retry: bool) -> Self {
        self.uniform_retry = uniform_retry;
        self
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub(crate) fn uniform_retry(&self) -> bool {
        self.uniform_retry
    }

    fn ensure_tracked(&self, name: &str) -> Result<PathBuf> {
        if !self.registry.contains(name) {
            return Err(MinidbError::UnknownFile {
                name: name.to_string(),
            });
        }
        Ok(self.store.path_of(name))
    }

    /// 空ファイルを作成してレジストリへ追加
    ///
    /// 編集用の一時ファイル名と衝突する名前は受け付けない
    pub fn create(&mut self, name: &str) -> Result<PathBuf> {
        if is_temp_name(name) {
            return Err(InputError::ReservedName {
                name: name.to_string(),
            }
            .into());
        }
        if self.registry.contains(name) {
            return Err(MinidbError::DuplicateFile {
                name: name.to_string(),
            });
        }

        let path = self.store.create_empty(name)?;
        self.registry.add(name)?;
        log::info!("created {}", name);
        Ok(path)
    }

    /// ファイル内容を一行ずつ読む
    pub fn read(&self, name: &str) -> Result<ReadOutcome> {
        self.ensure_tracked(name)?;
        self.store.read_lines(name)
    }

    /// ディスクから削除し、成功した場合のみレジストリから外す
    ///
    /// ディスク上に既に無い場合はレジストリだけを整理する
    pub fn delete(&mut self, name: &str) -> Result<RemoveOutcome> {
        self.ensure_tracked(name)?;

        let outcome = self.store.remove(name)?;
        self.registry.remove(name);
        log::info!("deleted {} ({:?})", name, outcome);
        Ok(outcome)
    }

    /// 追跡中のファイルの一覧（挿入順）
    pub fn view(&self) -> Vec<FileEntry> {
        self.registry
            .names()
            .iter()
            .map(|name| {
                let path = self.store.path_of(name);
                let metadata = match FileMetadata::probe(&path) {
                    Ok(Some(meta)) => Some(meta),
                    Ok(None) => {
                        log::warn!("{} is tracked but missing on disk", name);
                        None
                    }
                    Err(e) => {
                        log::warn!("metadata for {} unavailable: {}", name, e);
                        None
                    }
                };
                FileEntry {
                    name: name.clone(),
                    metadata,
                }
            })
            .collect()
    }

    /// 現在の行数
    pub fn line_count(&self, name: &str) -> Result<usize> {
        let path = self.ensure_tracked(name)?;
        LineCounter::count(&path)
    }

    /// 行番号（1始まり）を現在の行数に対して検証
    fn checked_ordinal(&self, name: &str, ordinal: i64) -> Result<(PathBuf, usize)> {
        let path = self.ensure_tracked(name)?;
        let count = LineCounter::count(&path)?;

        match usize::try_from(ordinal) {
            Ok(index) if (1..=count).contains(&index) => Ok((path, index)),
            _ => Err(MinidbError::InvalidOrdinal { ordinal, count }),
        }
    }

    /// `ordinal` 行目を置き換える
    pub fn replace_line(&self, name: &str, ordinal: i64, content: &str) -> Result<EditOutcome> {
        let (path, index) = self.checked_ordinal(name, ordinal)?;
        let outcome = self.editor.replace_line(&path, index, content)?;
        self.expect_match(outcome, ordinal, &path)
    }

    /// `ordinal` 行目を取り除く
    pub fn remove_line(&self, name: &str, ordinal: i64) -> Result<EditOutcome> {
        let (path, index) = self.checked_ordinal(name, ordinal)?;
        let outcome = self.editor.remove_line(&path, index)?;
        self.expect_match(outcome, ordinal, &path)
    }

    fn expect_match(&self, outcome: EditOutcome, ordinal: i64, path: &Path) -> Result<EditOutcome> {
        if outcome.matched() {
            return Ok(outcome);
        }
        // 検証後にファイルが外部で縮んだ
        let count = LineCounter::count(path)?;
        Err(MinidbError::InvalidOrdinal { ordinal, count })
    }

    /// 更新用の編集ループを開始
    pub fn begin_update(&self, name: &str, mode: EditMode) -> Result<EditLoop<'_>> {
        let path = self.ensure_tracked(name)?;
        EditLoop::start(self, name, path, mode)
    }
}
