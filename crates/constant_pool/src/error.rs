use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConstantPoolError {
    #[error("Unexpected end of data at offset {offset}: {needed} more byte(s) required")]
    UnexpectedEndOfData { offset: usize, needed: usize },
    #[error("Unknown constant tag {tag} at offset {offset}")]
    UnknownConstantTag { tag: u8, offset: usize },
    #[error("Invalid modified UTF-8 sequence at offset {offset}")]
    InvalidUtf8Encoding { offset: usize },
    #[error("Broken class reference at pool index {index}")]
    BrokenClassReference { index: u16 },
    #[error("Utf8 constant of {length} bytes does not fit a u16 length prefix")]
    Utf8TooLong { length: usize },
}
