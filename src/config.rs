//! セッション設定
//!
//! コマンドライン引数と環境変数からセッションのオプションを構築する。
//! コア（session / file / registry）は環境を直接参照せず、ここで解決した値を受け取る

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// デバッグ出力を有効にする環境変数
pub const DEBUG_ENV_VAR: &str = "MINIDB_DEBUG";

/// 使い方
pub const USAGE: &str = "\
usage: minidb [--dir <path>] [--debug] [--debug-log [path]] [--log-level <level>] [--uniform-retry]

  --dir <path>         directory holding the managed files (default: current directory)
  --debug              log at debug level to stderr
  --debug-log [path]   also append JSON Lines logs to a file (default: ~/.minidb-log/debug.log)
  --log-level <level>  off, error, warn, info, debug or trace
  --uniform-retry      re-prompt instead of leaving delete mode on an invalid line number
  --help               show this message";

/// セッション制御のオプション
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionOptions {
    /// 管理対象ファイルを置くディレクトリ（未指定時はカレントディレクトリ）
    pub working_directory: Option<PathBuf>,
    /// JSON Lines ログの出力先
    pub debug_log_path: Option<PathBuf>,
    /// ログレベル（未指定時は warn）
    pub log_level: Option<log::LevelFilter>,
    /// 行削除モードでも範囲外の行番号で再入力を求める
    pub uniform_retry: bool,
    /// 使い方を表示して終了
    pub show_help: bool,
}

impl SessionOptions {
    /// コマンドライン引数（プログラム名を除く）を解析
    pub fn parse_args(args: &[String]) -> Result<Self> {
        let mut options = SessionOptions::default();

        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dir" => {
                    let value = iter.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    options.working_directory = Some(PathBuf::from(value));
                }
                "--debug" => options.log_level = Some(log::LevelFilter::Debug),
                "--debug-log" => {
                    let path = iter
                        .next_if(|next| !next.starts_with('-'))
                        .map(PathBuf::from)
                        .or_else(default_log_path)
                        .unwrap_or_else(|| PathBuf::from("minidb-debug.log"));
                    options.debug_log_path = Some(path);
                }
                "--log-level" => {
                    let value = iter.next().ok_or_else(|| ConfigError::MissingValue {
                        flag: arg.clone(),
                    })?;
                    let level = value.parse::<log::LevelFilter>().map_err(|_| {
                        ConfigError::InvalidValue {
                            key: "log-level".to_string(),
                            value: value.clone(),
                        }
                    })?;
                    options.log_level = Some(level);
                }
                "--uniform-retry" => options.uniform_retry = true,
                "--help" | "-h" => options.show_help = true,
                other => {
                    return Err(ConfigError::UnknownFlag {
                        flag: other.to_string(),
                    }
                    .into())
                }
            }
        }

        Ok(options)
    }

    /// 環境変数由来のオプション
    pub fn from_env() -> Self {
        let mut options = SessionOptions::default();
        if std::env::var_os(DEBUG_ENV_VAR).is_some() {
            options.log_level = Some(log::LevelFilter::Debug);
        }
        options
    }

    /// 上書き側の値を優先して結合
    pub fn merged_with(&self, overrides: &SessionOptions) -> SessionOptions {
        SessionOptions {
            working_directory: overrides
                .working_directory
                .clone()
                .or_else(|| self.working_directory.clone()),
            debug_log_path: overrides
                .debug_log_path
                .clone()
                .or_else(|| self.debug_log_path.clone()),
            log_level: overrides.log_level.or(self.log_level),
            uniform_retry: overrides.uniform_retry || self.uniform_retry,
            show_help: overrides.show_help || self.show_help,
        }
    }

    pub fn resolve_log_level(&self) -> log::LevelFilter {
        self.log_level.unwrap_or(log::LevelFilter::Warn)
    }

    /// 作業ディレクトリを展開（~ と $VAR）し、存在を確認
    pub fn resolve_working_directory(&self) -> Result<PathBuf> {
        let Some(raw) = &self.working_directory else {
            return Ok(PathBuf::from("."));
        };

        let raw_str = raw.to_string_lossy();
        let expanded = shellexpand::full(&raw_str).map_err(|e| ConfigError::InvalidValue {
            key: "dir".to_string(),
            value: e.to_string(),
        })?;

        let path = PathBuf::from(expanded.as_ref());
        if !path.is_dir() {
            return Err(ConfigError::InvalidDirectory {
                path: path.display().to_string(),
            }
            .into());
        }

        Ok(path)
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".minidb-log").join("debug.log"))
}

/// ヘルパー：親ディレクトリを作成
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
