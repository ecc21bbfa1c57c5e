//! ロギングシステム
//!
//! `log` クレートのバックエンドとして stderr と JSON Lines ファイルへ出力する

use crate::config::ensure_parent_dir;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// ロガー
///
/// * stderr へはタグ付きの一行を出力
/// * ファイル出力が設定されていれば JSON Lines 形式で追記
#[derive(Debug, Clone)]
pub struct Logger {
    level: log::LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

/// ファイルに書き出すログレコード
#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    level: &'a str,
    target: &'a str,
    ts: u128,
    message: String,
}

impl Logger {
    /// デフォルト構築
    pub fn new(level: log::LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(log::LevelFilter::Debug)
    }

    /// ログレベルを取得
    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    /// ログレベルを変更
    pub fn with_level(mut self, level: log::LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> io::Result<Self> {
        let path = path.into();
        ensure_parent_dir(&path)?;
        self.output_file = Some(path);
        Ok(self)
    }

    /// 標準エラー出力を無効化
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    fn should_log(&self, level: log::Level) -> bool {
        level <= self.level
    }

    fn write_file_record(&self, path: &Path, record: &log::Record) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let entry = LogRecord {
            level: record.level().as_str(),
            target: record.target(),
            ts: timestamp_ms(),
            message: record.args().to_string(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(file, "{line}")
    }

    /// グローバルロガーとして登録
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if self.output_stderr {
            eprintln!("{}: {}", record.level(), record.args());
        }

        if let Some(path) = &self.output_file {
            // ログ書き込み失敗は REPL を止めない
            let _ = self.write_file_record(path, record);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|dur| dur.as_millis())
        .unwrap_or_default()
}
