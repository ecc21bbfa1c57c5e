//! minidb - REPL-driven manager for plain-text files
//!
//! 行単位の編集エンジンと、セッション内で作成したファイルのレジストリ

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// データ層
pub mod file;
pub mod registry;

// ロジック層
pub mod command;
pub mod session;

// 表示層
pub mod repl;
pub mod ui;

// 公開API
pub use command::Command;
pub use config::SessionOptions;
pub use error::{MinidbError, Result};
pub use file::{EditOutcome, FileStore, LineCounter, LineEditor, ReadOutcome};
pub use registry::FileRegistry;
pub use repl::Repl;
pub use session::{EditLoop, EditMode, EditStep, FileEntry, Session};
