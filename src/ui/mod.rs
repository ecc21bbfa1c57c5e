//! UIモジュール
//!
//! 行ベースの REPL 向けのヘルプと一覧の表示

pub mod listing;

// 公開API
pub use listing::{format_entry, format_timestamp, render_listing};

/// ヘルプ表示
pub fn render_help() -> String {
    [
        "--- HELP ---",
        "THERE ARE A FEW COMMANDS AVAILABLE IN THE SOFTWARE :",
        " - CREATE <FILENAME>  -> create new files",
        " - READ <FILENAME>    -> read data from an existing file",
        " - UPDATE <FILENAME>  -> update the existing file (e.g. add new data)",
        " - DELETE <FILENAME>  -> delete an existing file",
        " - VIEW  -> view all existing files",
        " - HELP  -> get all information about the software",
        " - EXIT  -> leave the program",
    ]
    .join("\n")
}

/// 更新メニュー
pub fn render_update_menu() -> String {
    [
        "CHOOSE AN OPTION : ",
        "1. CHANGE BY LINE",
        "2. ADD NEW DATA",
        "3. REMOVE A LINE",
        "4. EXIT",
    ]
    .join("\n")
}
