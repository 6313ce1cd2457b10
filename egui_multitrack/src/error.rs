//! 错误类型模块
//!
//! 引擎本身对普通误用不报错（越界拖拽、未知轨道 ID 等都是静默的空操作），
//! 这里只定义音频源加载和配置解析会返回的错误。

use thiserror::Error;

/// 音频源加载/解码错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// 引擎配置错误
#[derive(Error, Debug)]
pub enum MultitrackError {
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

pub type Result<T, E = MultitrackError> = std::result::Result<T, E>;
