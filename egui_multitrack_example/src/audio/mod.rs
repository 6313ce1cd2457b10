//! 基于 rodio 的音频源实现

mod rodio_source;

pub use rodio_source::{RodioFactory, RodioSource};
