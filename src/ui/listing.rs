//! ファイル一覧の整形

use crate::session::FileEntry;
use chrono::{DateTime, Local};
use std::time::SystemTime;
use unicode_width::UnicodeWidthStr;

/// 最終更新時刻をローカル時刻で整形
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// 一項目を整形（`width` は名前欄の表示幅）
pub fn format_entry(entry: &FileEntry, width: usize) -> String {
    let padding = " ".repeat(width.saturating_sub(entry.name.width()));

    match &entry.metadata {
        Some(meta) => {
            let modified = meta
                .modified
                .map(format_timestamp)
                .unwrap_or_else(|| "unknown".to_string());
            format!(
                " - {}{} (last modified: {}, size: {} bytes)",
                entry.name, padding, modified, meta.size
            )
        }
        None => format!(" - {}{} (missing on disk)", entry.name, padding),
    }
}

/// 一覧全体を整形
pub fn render_listing(entries: &[FileEntry]) -> String {
    if entries.is_empty() {
        return "NO FILES YET.".to_string();
    }

    let width = entries
        .iter()
        .map(|entry| entry.name.width())
        .max()
        .unwrap_or(0);

    let mut output = String::from("THE LIST OF EXISTING FILES : ");
    for entry in entries {
        output.push('\n');
        output.push_str(&format_entry(entry, width));
    }
    output
}
