//! Image decoding primitives and helpers.

pub mod image;

pub use self::image::{decode_bytes, decode_image};

pub type Result<T> = crate::Result<T>;
