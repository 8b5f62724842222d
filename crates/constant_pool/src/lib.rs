// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.4

mod bytes;
mod constant_pool;
mod decoder;
mod encoder;
mod error;
mod mutf8;

pub use bytes::{ByteReader, ByteWriter};
pub use constant_pool::{Constant, ConstantPool, ConstantTag};
pub use decoder::{decode_pool, Decoder};
pub use encoder::{encode_pool, Encoder};
pub use error::ConstantPoolError;
pub use mutf8::Utf8Mode;

pub type Result<T, E = ConstantPoolError> = std::result::Result<T, E>;

/// Follows a `Class` entry at `class_index` to the `Utf8` entry holding its
/// fully-qualified name.
pub fn resolve_class_name(pool: &ConstantPool, class_index: u16) -> Result<&str> {
    pool.resolve_class_name(class_index)
}
