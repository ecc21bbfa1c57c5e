//! 更新モードの編集ループ
//!
//! 対話入力を直接読むのではなく、`prompt()` で次に尋ねる内容を示し
//! `submit()` で応答を受け取る要求／応答の状態機械として表す。
//! REPL 以外（テストなど）からも入力ストリームなしで駆動できる

use super::Session;
use crate::error::{InputError, MinidbError, Result};
use crate::file::LineAppender;
use std::path::PathBuf;

/// 各ループを終了する入力
pub const SENTINEL: &str = "-1";

/// 更新モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// 行番号を指定して置換
    ChangeByLine,
    /// 末尾に追記
    Append,
    /// 行番号を指定して削除
    DeleteByLine,
}

impl EditMode {
    /// メニュー入力を解釈（`4` は何もせず終了で `None`）
    pub fn from_menu(input: &str) -> Result<Option<Self>> {
        match input.trim() {
            "1" => Ok(Some(EditMode::ChangeByLine)),
            "2" => Ok(Some(EditMode::Append)),
            "3" => Ok(Some(EditMode::DeleteByLine)),
            "4" => Ok(None),
            other => Err(InputError::InvalidOption {
                input: other.to_string(),
            }
            .into()),
        }
    }
}

/// 次に尋ねる内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// 置換する行番号
    LineToChange,
    /// 置換後の内容
    Replacement { ordinal: i64 },
    /// 追記する内容
    TextToAppend,
    /// 削除する行番号
    LineToDelete,
    /// ループ終了済み
    Done,
}

impl Prompt {
    /// 表示文字列
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::LineToChange => "ENTER THE NUMBER OF THE LINE TO CHANGE ('-1' to quit): ",
            Prompt::Replacement { .. } => "ENTER NEW DATA FOR THE LINE: ",
            Prompt::TextToAppend => "ENTER NEW DATA TO ADD TO THE FILE (-1 TO QUIT) : ",
            Prompt::LineToDelete => "ENTER THE LINE NUMBER TO DELETE ('-1' to quit): ",
            Prompt::Done => "",
        }
    }
}

/// 成功時の通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// 行番号を受け付け、置換内容を待っている
    OrdinalAccepted { ordinal: i64 },
    LineChanged { ordinal: i64 },
    LineAppended,
    LineRemoved { ordinal: i64 },
}

impl Feedback {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Feedback::LineChanged { .. } => Some("THE LINE CHANGED SUCCESSFULLY."),
            Feedback::LineRemoved { .. } => Some("THE LINE REMOVED SUCCESSFULLY"),
            Feedback::OrdinalAccepted { .. } | Feedback::LineAppended => None,
        }
    }
}

/// 応答を処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStep {
    /// 続行
    Continue(Feedback),
    /// この応答は拒否。同じ質問を繰り返す
    Rejected(MinidbError),
    /// ループ終了（番兵なら `None`、打ち切りならそのエラー）
    Finished(Option<MinidbError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitOrdinal,
    AwaitReplacement { ordinal: i64 },
    AwaitText,
    Done,
}

/// 一回の UPDATE に対応する編集ループ
///
/// 範囲外の行番号への対応はモードで異なる：
/// 置換モードは再入力（fail-soft）、削除モードはループを打ち切る（fail-fast）。
/// セッションの `uniform_retry` が有効なら削除モードも再入力にする
pub struct EditLoop<'a> {
    session: &'a Session,
    name: String,
    mode: EditMode,
    state: State,
    appender: Option<LineAppender>,
    fail_fast: bool,
}

impl<'a> EditLoop<'a> {
    pub(super) fn start(session: &'a Session, name: &str, path: PathBuf, mode: EditMode) -> Result<Self> {
        let (state, appender) = match mode {
            EditMode::Append => (State::AwaitText, Some(LineAppender::open(&path)?)),
            EditMode::ChangeByLine | EditMode::DeleteByLine => (State::AwaitOrdinal, None),
        };

        log::debug!("update {} in {:?} mode", name, mode);

        Ok(Self {
            session,
            name: name.to_string(),
            mode,
            state,
            appender,
            fail_fast: mode == EditMode::DeleteByLine && !session.uniform_retry(),
        })
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::Done
    }

    /// 次に尋ねる内容
    pub fn prompt(&self) -> Prompt {
        match (self.state, self.mode) {
            (State::Done, _) => Prompt::Done,
            (State::AwaitReplacement { ordinal }, _) => Prompt::Replacement { ordinal },
            (State::AwaitText, _) => Prompt::TextToAppend,
            (State::AwaitOrdinal, EditMode::DeleteByLine) => Prompt::LineToDelete,
            (State::AwaitOrdinal, _) => Prompt::LineToChange,
        }
    }

    /// 応答を一つ処理
    pub fn submit(&mut self, response: &str) -> EditStep {
        match self.state {
            State::Done => EditStep::Finished(None),
            State::AwaitOrdinal => self.submit_ordinal(response),
            State::AwaitReplacement { ordinal } => self.submit_replacement(ordinal, response),
            State::AwaitText => self.submit_text(response),
        }
    }

    fn submit_ordinal(&mut self, response: &str) -> EditStep {
        let response = response.trim();
        if response == SENTINEL {
            return self.finish(None);
        }

        let ordinal = match response.parse::<i64>() {
            Ok(ordinal) => ordinal,
            Err(_) => {
                return self.reject(
                    InputError::NotANumber {
                        input: response.to_string(),
                    }
                    .into(),
                )
            }
        };

        match self.mode {
            EditMode::DeleteByLine => match self.session.remove_line(&self.name, ordinal) {
                Ok(_) => EditStep::Continue(Feedback::LineRemoved { ordinal }),
                Err(e) => self.reject(e),
            },
            _ => {
                // 置換内容を尋ねる前に範囲を確認する
                let count = match self.session.line_count(&self.name) {
                    Ok(count) => count,
                    Err(e) => return self.reject(e),
                };
                if ordinal < 1 || ordinal as u64 > count as u64 {
                    return self.reject(MinidbError::InvalidOrdinal { ordinal, count });
                }
                self.state = State::AwaitReplacement { ordinal };
                EditStep::Continue(Feedback::OrdinalAccepted { ordinal })
            }
        }
    }

    fn submit_replacement(&mut self, ordinal: i64, response: &str) -> EditStep {
        self.state = State::AwaitOrdinal;
        match self.session.replace_line(&self.name, ordinal, response) {
            Ok(_) => EditStep::Continue(Feedback::LineChanged { ordinal }),
            Err(e) => self.reject(e),
        }
    }

    fn submit_text(&mut self, response: &str) -> EditStep {
        if response == SENTINEL {
            return self.finish(None);
        }

        let Some(appender) = self.appender.as_mut() else {
            return self.finish(None);
        };

        match appender.append_line(response) {
            Ok(()) => EditStep::Continue(Feedback::LineAppended),
            Err(e) => self.reject(e),
        }
    }

    /// エラー処理の方針を適用
    fn reject(&mut self, error: MinidbError) -> EditStep {
        let recoverable = matches!(
            error,
            MinidbError::InvalidOrdinal { .. } | MinidbError::Input(_)
        );

        if recoverable && !self.fail_fast {
            log::debug!("rejected input for {}: {}", self.name, error);
            EditStep::Rejected(error)
        } else {
            log::debug!("leaving {:?} mode for {}: {}", self.mode, self.name, error);
            self.finish(Some(error))
        }
    }

    fn finish(&mut self, error: Option<MinidbError>) -> EditStep {
        self.state = State::Done;
        self.appender = None;
        EditStep::Finished(error)
    }
}
