//! コマンド解析
//!
//! 入力行を動詞とファイル名に分解する。構文として正しいファイル名だけをセッションへ渡す

use crate::error::{InputError, Result};

/// REPL コマンド
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(String),
    Read(String),
    Update(String),
    Delete(String),
    View,
    Help,
    Exit,
}

impl Command {
    /// 一行を解析。空行は `None`
    ///
    /// 動詞は大文字で完全一致。HELP / VIEW / EXIT は余分な語を無視する
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Ok(None);
        };

        let build: fn(String) -> Command = match verb {
            "HELP" => return Ok(Some(Command::Help)),
            "VIEW" => return Ok(Some(Command::View)),
            "EXIT" | "QUIT" => return Ok(Some(Command::Exit)),
            "CREATE" => Command::Create,
            "READ" => Command::Read,
            "UPDATE" => Command::Update,
            "DELETE" => Command::Delete,
            other => {
                return Err(InputError::MissingKeyword {
                    word: other.to_string(),
                }
                .into())
            }
        };

        match args {
            [name] => Ok(Some(build(name.to_string()))),
            _ => Err(InputError::WrongArity {
                verb: verb.to_string(),
                given: args.len(),
            }
            .into()),
        }
    }

    /// 動詞名
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Create(_) => "CREATE",
            Command::Read(_) => "READ",
            Command::Update(_) => "UPDATE",
            Command::Delete(_) => "DELETE",
            Command::View => "VIEW",
            Command::Help => "HELP",
            Command::Exit => "EXIT",
        }
    }
}
