use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassScanError {
    #[error(transparent)]
    IOError(io::Error),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicIdentifier(u32),
    #[error("Unsupported constant pool tag: {0}")]
    UnsupportedConstantTag(u8),
    #[error("Premature end of class data")]
    Truncated,
}

impl From<io::Error> for ClassScanError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => ClassScanError::Truncated,
            _ => ClassScanError::IOError(e),
        }
    }
}
