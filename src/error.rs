use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// 入力列の長さ・次元が揃っていない
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// 数値として不正な入力 (空, 重み和0, 分散<=0, 非PSD など)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, MergeError>;

impl MergeError {
    pub(crate) fn shape(what: &'static str, expected: usize, found: usize) -> Self {
        MergeError::ShapeMismatch {
            what,
            expected,
            found,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        MergeError::InvalidInput(msg.into())
    }
}
