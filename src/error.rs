//! エラーハンドリングシステム
//!
//! minidb 全体で使用される統一されたエラー型とユーティリティを定義
//! コア操作のエラーはすべて回復可能で、REPL はエラー表示後に継続する

use std::path::Path;
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MinidbError {
    /// レジストリに存在しないファイル名を対象にした
    #[error("File is not tracked: {name}")]
    UnknownFile { name: String },

    /// 既に追跡中のファイル名で作成しようとした
    #[error("File is already tracked: {name}")]
    DuplicateFile { name: String },

    /// ファイルストアへのオープン・読み書き・削除に失敗
    #[error("Cannot access {path}: {message}")]
    NotAccessible { path: String, message: String },

    /// 現在の行数に対して範囲外の行番号
    #[error("Line {ordinal} is out of range (file has {count} lines)")]
    InvalidOrdinal { ordinal: i64, count: usize },

    /// レジストリ操作エラー
    #[error("Registry operation failed")]
    Registry(#[from] RegistryError),

    /// 入力処理エラー
    #[error("Input processing failed")]
    Input(#[from] InputError),

    /// 設定エラー
    #[error("Configuration error")]
    Config(#[from] ConfigError),
}

/// レジストリ固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Name already tracked: {name}")]
    AlreadyTracked { name: String },
}

/// 入力処理固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Unknown keyword: {word}")]
    MissingKeyword { word: String },

    #[error("{verb} takes exactly one file name (got {given})")]
    WrongArity { verb: String, given: usize },

    #[error("Not a number: {input}")]
    NotANumber { input: String },

    #[error("Invalid option: {input}")]
    InvalidOption { input: String },

    #[error("Line content must not contain a line break")]
    EmbeddedLineBreak,

    #[error("File name is reserved for temporary files: {name}")]
    ReservedName { name: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown flag: {flag}")]
    UnknownFlag { flag: String },

    #[error("Missing value for {flag}")]
    MissingValue { flag: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Not a directory: {path}")]
    InvalidDirectory { path: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Warning,
    Error,
}

impl MinidbError {
    /// パス付きのアクセスエラーを作成
    pub fn not_accessible(path: &Path, error: &std::io::Error) -> Self {
        MinidbError::NotAccessible {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// 表示レベル
    pub fn level(&self) -> ErrorLevel {
        match self {
            MinidbError::Input(_) | MinidbError::InvalidOrdinal { .. } => ErrorLevel::Warning,
            _ => ErrorLevel::Error,
        }
    }

    /// REPL に表示する一行メッセージ
    pub fn user_message(&self) -> String {
        match self {
            MinidbError::UnknownFile { .. } => "ERROR : FILE DOES NOT EXIST.".to_string(),
            MinidbError::DuplicateFile { .. } => "ERROR : FILE ALREADY EXIST.".to_string(),
            MinidbError::NotAccessible { .. } => "ERROR : FAILED TO OPEN THE FILE.".to_string(),
            MinidbError::InvalidOrdinal { .. } => "ERROR : INVALID INPUT.".to_string(),
            MinidbError::Registry(RegistryError::AlreadyTracked { .. }) => {
                "ERROR : FILE ALREADY EXIST.".to_string()
            }
            MinidbError::Input(InputError::MissingKeyword { .. }) => {
                "ERROR : KEYWORD IS MISSING".to_string()
            }
            MinidbError::Input(InputError::WrongArity { .. }) => {
                "ERROR : KEYWORD MUST ACCOMPANY BY THE FILE NAME ONLY".to_string()
            }
            MinidbError::Input(InputError::NotANumber { .. })
            | MinidbError::Input(InputError::InvalidOption { .. }) => {
                "ERROR : INVALID INPUT.".to_string()
            }
            MinidbError::Input(InputError::EmbeddedLineBreak) => {
                "ERROR : A LINE CANNOT CONTAIN A LINE BREAK.".to_string()
            }
            MinidbError::Input(InputError::ReservedName { .. }) => {
                "ERROR : FILE NAME IS RESERVED.".to_string()
            }
            MinidbError::Config(err) => format!("ERROR : {}", err),
        }
    }
}

/// パニックハンドラの設定
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        eprintln!("Stack trace: {}", std::backtrace::Backtrace::capture());

        std::process::exit(1);
    }));
}

/// I/O エラーへパス情報を付与するためのトレイト
pub trait PathContext<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> PathContext<T> for std::io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| {
            let error = MinidbError::not_accessible(path, &e);
            log::debug!("{}", error);
            error
        })
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, MinidbError>;

// パス不明の I/O エラー
impl From<std::io::Error> for MinidbError {
    fn from(error: std::io::Error) -> Self {
        MinidbError::NotAccessible {
            path: "<unknown>".to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_match_repl_wording() {
        let unknown = MinidbError::UnknownFile { name: "a.txt".to_string() };
        assert_eq!(unknown.user_message(), "ERROR : FILE DOES NOT EXIST.");

        let duplicate = MinidbError::DuplicateFile { name: "a.txt".to_string() };
        assert_eq!(duplicate.user_message(), "ERROR : FILE ALREADY EXIST.");

        let ordinal = MinidbError::InvalidOrdinal { ordinal: 9, count: 3 };
        assert_eq!(ordinal.user_message(), "ERROR : INVALID INPUT.");
        assert_eq!(ordinal.level(), ErrorLevel::Warning);
    }

    #[test]
    fn test_io_error_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_path(Path::new("locked.txt")).unwrap_err();

        match err {
            MinidbError::NotAccessible { path, message } => {
                assert_eq!(path, "locked.txt");
                assert!(message.contains("denied"));
            }
            other => panic!("Expected NotAccessible, got {:?}", other),
        }
    }

    #[test]
    fn test_sub_error_conversion() {
        let err: MinidbError = InputError::EmbeddedLineBreak.into();
        assert!(matches!(err, MinidbError::Input(InputError::EmbeddedLineBreak)));
        assert_eq!(err.level(), ErrorLevel::Warning);
    }

    #[test]
    fn test_access_failures_are_error_level() {
        let err = MinidbError::NotAccessible {
            path: "a.txt".to_string(),
            message: "denied".to_string(),
        };
        assert_eq!(err.level(), ErrorLevel::Error);

        let reserved: MinidbError = InputError::ReservedName {
            name: ".a.txt.minidb-tmp".to_string(),
        }
        .into();
        assert_eq!(reserved.user_message(), "ERROR : FILE NAME IS RESERVED.");
    }
}
