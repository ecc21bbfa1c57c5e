//! ファイル操作モジュール
//!
//! ホストのファイルシステム（ファイルストア）に対する操作：
//! - 空ファイルの作成・読み込み・削除（io）
//! - 行数のカウント（counter）
//! - 行単位の置換・削除・追記（editor）
//! - 一覧表示用のメタデータ（metadata）

pub mod counter;
pub mod editor;
pub mod io;
pub mod metadata;

pub use counter::LineCounter;
pub use editor::{EditOutcome, LineAppender, LineEditor};
pub use io::{FileStore, LineStream, ReadOutcome, RemoveOutcome};
pub use metadata::FileMetadata;
