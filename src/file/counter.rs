//! 行数カウント

use crate::error::{PathContext, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 行数カウンタ
///
/// 呼び出しごとにファイル全体を走査する（編集直後の内容を反映するためキャッシュしない）
pub struct LineCounter;

impl LineCounter {
    /// 現在の行数を返す
    ///
    /// 改行で終わらない末尾の断片も1行として数える
    pub fn count(path: &Path) -> Result<usize> {
        let file = File::open(path).with_path(path)?;

        let mut count = 0;
        for segment in BufReader::new(file).split(b'\n') {
            segment.with_path(path)?;
            count += 1;
        }

        Ok(count)
    }
}
