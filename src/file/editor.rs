//! 行単位編集
//!
//! 既存の行をすべて一時ファイルへ流し、対象行だけ置換または除去してから
//! 元ファイルへリネームする。行は可変長なのでその場での書き換えはしない。
//!
//! 書き込み途中で失敗した場合は一時ファイルを削除し、元ファイルは変更しない。
//! fsync もジャーナルも行わないため、クラッシュ耐性は弱い。

use crate::error::{InputError, MinidbError, PathContext, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// 一時ファイル名の接尾辞
const TEMP_SUFFIX: &str = ".minidb-tmp";

/// 編集結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// 変更された行数（0 または 1）
    pub lines_changed: usize,
}

impl EditOutcome {
    fn changed() -> Self {
        Self { lines_changed: 1 }
    }

    fn unchanged() -> Self {
        Self { lines_changed: 0 }
    }

    /// 対象行が見つかったか
    pub fn matched(&self) -> bool {
        self.lines_changed == 1
    }
}

/// 対象行に対する処理
enum LineAction<'a> {
    Replace(&'a str),
    Remove,
}

/// 行エディタ
pub struct LineEditor;

impl LineEditor {
    pub fn new() -> Self {
        Self
    }

    /// `ordinal` 行目（1始まり）を `content` で置き換える
    ///
    /// 範囲外の行番号ではファイルに触れず `lines_changed == 0` を返す
    pub fn replace_line(&self, path: &Path, ordinal: usize, content: &str) -> Result<EditOutcome> {
        ensure_single_line(content)?;
        self.rewrite(path, ordinal, LineAction::Replace(content))
    }

    /// `ordinal` 行目（1始まり）を取り除く
    ///
    /// 範囲外の行番号ではファイルに触れず `lines_changed == 0` を返す
    pub fn remove_line(&self, path: &Path, ordinal: usize) -> Result<EditOutcome> {
        self.rewrite(path, ordinal, LineAction::Remove)
    }

    fn rewrite(&self, path: &Path, ordinal: usize, action: LineAction) -> Result<EditOutcome> {
        log::debug!("rewrite {} at line {}", path.display(), ordinal);

        // 破壊的な処理の前にオープンの失敗を検出する
        let source = File::open(path).with_path(path)?;
        let temp_path = temp_path_for(path)?;
        let temp = File::create(&temp_path).with_path(&temp_path)?;

        let matched = match stream_lines(source, temp, ordinal, &action) {
            Ok(matched) => matched,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(MinidbError::not_accessible(path, &e));
            }
        };

        if !matched {
            log::debug!("line {} not found in {}, left unchanged", ordinal, path.display());
            let _ = fs::remove_file(&temp_path);
            return Ok(EditOutcome::unchanged());
        }

        fs::rename(&temp_path, path).map_err(|e| {
            log::error!("rename {} failed: {}", temp_path.display(), e);
            let _ = fs::remove_file(&temp_path);
            MinidbError::not_accessible(path, &e)
        })?;

        Ok(EditOutcome::changed())
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// 全行を一時ファイルへコピーし、対象行が存在したかを返す
fn stream_lines(source: File, temp: File, ordinal: usize, action: &LineAction) -> io::Result<bool> {
    let mut writer = BufWriter::new(temp);
    let mut matched = false;

    for (index, segment) in BufReader::new(source).split(b'\n').enumerate() {
        let segment = segment?;
        if index + 1 == ordinal {
            matched = true;
            match action {
                LineAction::Replace(content) => {
                    writer.write_all(content.as_bytes())?;
                    writer.write_all(b"\n")?;
                }
                LineAction::Remove => {}
            }
        } else {
            writer.write_all(&segment)?;
            writer.write_all(b"\n")?;
        }
    }

    writer.flush()?;
    Ok(matched)
}

/// 一時ファイルのパス（同じディレクトリに `.{name}.minidb-tmp`）
pub fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let filename = path.file_name().ok_or_else(|| MinidbError::NotAccessible {
        path: path.display().to_string(),
        message: "path has no file name".to_string(),
    })?;

    let temp_name = format!(".{}{}", filename.to_string_lossy(), TEMP_SUFFIX);
    Ok(match path.parent() {
        Some(parent) => parent.join(temp_name),
        None => PathBuf::from(temp_name),
    })
}

/// 一時ファイルの命名規則に一致する名前か
///
/// このような名前のファイルは編集時に一時ファイルとして上書きされる
pub fn is_temp_name(name: &str) -> bool {
    Path::new(name)
        .file_name()
        .map(|filename| {
            let filename = filename.to_string_lossy();
            filename.starts_with('.') && filename.ends_with(TEMP_SUFFIX)
        })
        .unwrap_or(false)
}

fn ensure_single_line(content: &str) -> Result<()> {
    if content.contains('\n') || content.contains('\r') {
        return Err(InputError::EmbeddedLineBreak.into());
    }
    Ok(())
}

/// 追記モードで開いたファイルへの行追加
///
/// 追記ループの間ファイルを開いたままにする
pub struct LineAppender {
    path: PathBuf,
    file: File,
}

impl LineAppender {
    /// 追記モードで開く
    ///
    /// 既存の内容が改行で終わっていなければ先に改行を補う
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .with_path(path)?;

        if needs_line_break(&mut file).with_path(path)? {
            file.write_all(b"\n").with_path(path)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// 一行追加
    pub fn append_line(&mut self, text: &str) -> Result<()> {
        ensure_single_line(text)?;

        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        self.file.write_all(line.as_bytes()).with_path(&self.path)?;

        log::debug!("appended line to {}", self.path.display());
        Ok(())
    }
}

fn needs_line_break(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }

    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
