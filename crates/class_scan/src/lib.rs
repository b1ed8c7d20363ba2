// https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-4.html

mod constant_pool;
mod error;
mod mutf8;
mod scanner;

use std::fmt;
use std::io::Read;

pub use error::ClassScanError;

use scanner::Scanner;

pub type Result<T, E = ClassScanError> = std::result::Result<T, E>;

/// Source location recovered from a compiled class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInfo {
    /// The class carries no SourceFile attribute (or no bytes were
    /// obtainable at all).
    NoSourceInfo,
    /// The bytes could not be read as a class file.
    UnknownSourceFormat { reason: String },
    /// A source file name, but no line number information.
    SourceFile { file: String },
    /// A source file name and the inclusive span of lines covered by the
    /// scanned methods' code. `from <= to` always holds.
    SourceFileLines { file: String, from: u16, to: u16 },
}

impl SourceInfo {
    /// Reads one class file and composes the final answer. This is the
    /// sole catch point: any parse failure from any stage surfaces here
    /// as [`SourceInfo::UnknownSourceFormat`], never as a panic or an
    /// `Err` the caller has to handle. The reader is dropped on every
    /// path.
    ///
    /// `method_filter`, when set, restricts line numbers to methods whose
    /// name is exactly that string; the SourceFile attribute is read
    /// either way.
    pub fn scan(r: impl Read, method_filter: Option<&str>) -> SourceInfo {
        match Scanner::new(r).scan(method_filter) {
            Ok(outcome) => match (outcome.source_file, outcome.lines) {
                // A line range without a file name is not reportable.
                (None, _) => SourceInfo::NoSourceInfo,
                (Some(file), None) => SourceInfo::SourceFile { file },
                (Some(file), Some(range)) => SourceInfo::SourceFileLines {
                    file,
                    from: range.from,
                    to: range.to,
                },
            },
            Err(e) => SourceInfo::UnknownSourceFormat {
                reason: e.to_string(),
            },
        }
    }
}

impl fmt::Display for SourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceInfo::NoSourceInfo => write!(f, "no source information"),
            SourceInfo::UnknownSourceFormat { reason } => write!(f, "{}", reason),
            SourceInfo::SourceFile { file } => write!(f, "{}", file),
            SourceInfo::SourceFileLines { file, from, to } if from == to => {
                write!(f, "{}:{}", file, from)
            }
            SourceInfo::SourceFileLines { file, from, to } => {
                write!(f, "{}:{}-{}", file, from, to)
            }
        }
    }
}
