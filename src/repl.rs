//! 対話ループ
//!
//! 入力を一行ずつ読み、コマンド解析・セッション操作・表示をつなぐ。
//! 入出力は `BufRead` / `Write` で受け取るため、テストではメモリ上のバッファで駆動できる

use crate::command::Command;
use crate::error::{ErrorLevel, MinidbError};
use crate::file::ReadOutcome;
use crate::session::{EditMode, EditStep, Prompt, Session};
use crate::ui;
use std::io::{self, BufRead, Write};

/// 対話ループ
pub struct Repl<R, W> {
    session: Session,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(session: Session, input: R, output: W) -> Self {
        Self {
            session,
            input,
            output,
        }
    }

    /// 出力先を取り出す
    pub fn into_output(self) -> W {
        self.output
    }

    /// EOF または EXIT まで実行
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "---Welcome to mini database engine (EXIT or Ctrl+D to leave)---"
        )?;
        writeln!(self.output, "(type \"HELP\" to get information!)")?;

        while let Some(line) = read_line(&mut self.input)? {
            match Command::parse(&line) {
                Ok(Some(Command::Exit)) => break,
                Ok(Some(command)) => self.dispatch(command)?,
                Ok(None) => {}
                Err(e) => report(&mut self.output, &e)?,
            }
        }

        self.output.flush()
    }

    fn dispatch(&mut self, command: Command) -> io::Result<()> {
        log::debug!("dispatch {}", command.verb());

        match command {
            Command::Create(name) => match self.session.create(&name) {
                Ok(_) => writeln!(self.output, "FILE CREATED : {}", name),
                Err(e) => report(&mut self.output, &e),
            },
            Command::Read(name) => match self.session.read(&name) {
                Ok(ReadOutcome::Empty) => writeln!(self.output, "FILE IS EMPTY"),
                Ok(ReadOutcome::Lines(lines)) => {
                    for line in lines {
                        match line {
                            Ok(line) => writeln!(self.output, "{}", line)?,
                            Err(e) => return report(&mut self.output, &e),
                        }
                    }
                    Ok(())
                }
                Err(e) => report(&mut self.output, &e),
            },
            Command::Update(name) => {
                let Repl {
                    session,
                    input,
                    output,
                } = self;
                run_update(session, &name, input, output)
            }
            Command::Delete(name) => match self.session.delete(&name) {
                Ok(_) => writeln!(self.output, "FILE IS DELETED PERMANENTLY"),
                Err(e) => report(&mut self.output, &e),
            },
            Command::View => {
                let listing = ui::render_listing(&self.session.view());
                writeln!(self.output, "{}", listing)?;
                writeln!(self.output)
            }
            Command::Help => writeln!(self.output, "{}", ui::render_help()),
            Command::Exit => Ok(()),
        }
    }
}

/// UPDATE：メニューを表示し、選ばれたモードの編集ループを回す
fn run_update<R: BufRead, W: Write>(
    session: &Session,
    name: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<()> {
    if !session.registry().contains(name) {
        return report(
            output,
            &MinidbError::UnknownFile {
                name: name.to_string(),
            },
        );
    }

    writeln!(output, "{}", ui::render_update_menu())?;
    output.flush()?;

    let Some(choice) = read_line(input)? else {
        return Ok(());
    };

    let mode = match EditMode::from_menu(&choice) {
        Ok(Some(mode)) => mode,
        Ok(None) => return Ok(()),
        Err(e) => return report(output, &e),
    };

    let mut edit = match session.begin_update(name, mode) {
        Ok(edit) => edit,
        Err(e) => return report(output, &e),
    };

    loop {
        let prompt = edit.prompt();
        if prompt == Prompt::Done {
            break;
        }
        write!(output, "{}", prompt.text())?;
        output.flush()?;

        let Some(response) = read_line(input)? else {
            // 入力終了
            writeln!(output)?;
            break;
        };

        match edit.submit(&response) {
            EditStep::Continue(feedback) => {
                if let Some(message) = feedback.message() {
                    writeln!(output, "{}", message)?;
                }
            }
            EditStep::Rejected(e) => report(output, &e)?,
            EditStep::Finished(Some(e)) => {
                report(output, &e)?;
                break;
            }
            EditStep::Finished(None) => break,
        }
    }

    Ok(())
}

/// 一行読み込み（改行は除去）。EOF で `None`
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

fn report<W: Write>(output: &mut W, error: &MinidbError) -> io::Result<()> {
    match error.level() {
        ErrorLevel::Warning => log::warn!("{}", error),
        ErrorLevel::Error => log::error!("{}", error),
    }
    writeln!(output, "{}", error.user_message())
}
