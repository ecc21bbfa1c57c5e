//! ファイルストアI/O
//!
//! 作業ディレクトリ内の平文ファイルの作成・読み込み・削除

use crate::error::{MinidbError, PathContext, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind};
use std::path::PathBuf;

/// 読み込み結果
#[derive(Debug)]
pub enum ReadOutcome {
    /// 0バイトのファイル
    Empty,
    /// 行を順に読み出すストリーム
    Lines(LineStream),
}

impl ReadOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, ReadOutcome::Empty)
    }

    /// 残りの行をすべて集める
    pub fn into_lines(self) -> Result<Vec<String>> {
        match self {
            ReadOutcome::Empty => Ok(Vec::new()),
            ReadOutcome::Lines(stream) => stream.collect(),
        }
    }
}

/// ファイルを一行ずつ読む反復子（改行は含まない）
///
/// 改行で終わらない最後の断片も一行として返す
#[derive(Debug)]
pub struct LineStream {
    path: PathBuf,
    segments: io::Split<BufReader<File>>,
}

impl Iterator for LineStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.segments.next()?;
        Some(
            segment
                .with_path(&self.path)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        )
    }
}

/// 削除結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// ディスクから削除した
    Removed,
    /// 既にディスク上に存在しなかった
    AlreadyMissing,
}

/// ファイルストア
///
/// ユーザーが指定した名前をそのままルートディレクトリに連結する（サンドボックスなし）
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// ファイル名からパスを解決
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// 空ファイルを作成（既存の内容は切り詰める）
    pub fn create_empty(&self, name: &str) -> Result<PathBuf> {
        let path = self.path_of(name);

        if path.is_file() {
            log::warn!("{} already exists on disk, truncating", path.display());
        }

        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_path(&path)?;

        log::debug!("created empty file {}", path.display());
        Ok(path)
    }

    /// ファイルを開いて行単位で読み出す
    ///
    /// 全体をメモリへ読み込まず、呼び出し側が一行ずつ取り出す
    pub fn read_lines(&self, name: &str) -> Result<ReadOutcome> {
        let path = self.path_of(name);
        let file = File::open(&path).with_path(&path)?;

        let mut reader = BufReader::new(file);
        if reader.fill_buf().with_path(&path)?.is_empty() {
            return Ok(ReadOutcome::Empty);
        }

        Ok(ReadOutcome::Lines(LineStream {
            path,
            segments: reader.split(b'\n'),
        }))
    }

    /// ファイルを削除
    pub fn remove(&self, name: &str) -> Result<RemoveOutcome> {
        let path = self.path_of(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("removed {}", path.display());
                Ok(RemoveOutcome::Removed)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("{} was already missing on disk", path.display());
                Ok(RemoveOutcome::AlreadyMissing)
            }
            Err(e) => Err(MinidbError::not_accessible(&path, &e)),
        }
    }
}
