use crate::{
    bytes::ByteWriter,
    constant_pool::{Constant, ConstantPool, ConstantTag},
    mutf8, ConstantPoolError, Result,
};

/// Serializes every entry of `pool` in order. When no entry has been
/// replaced since decoding, the output is byte-identical to the source.
pub fn encode_pool(pool: &ConstantPool) -> Result<Vec<u8>> {
    let mut encoder = Encoder::new();
    for constant in pool {
        encoder.encode_constant(constant)?;
    }
    Ok(encoder.into_bytes())
}

#[derive(Default)]
pub struct Encoder {
    w: ByteWriter,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one tagged entry, the exact inverse of the decoder's layout.
    pub fn encode_constant(&mut self, constant: &Constant) -> Result<()> {
        match constant {
            Constant::Integer(value) => {
                self.w.write_u8(ConstantTag::Integer.tag());
                self.w.write_u32(*value as u32);
            }
            Constant::Long(value) => {
                self.w.write_u8(ConstantTag::Long.tag());
                self.w.write_u64(*value as u64);
            }
            Constant::Float(value) => {
                self.w.write_u8(ConstantTag::Float.tag());
                self.w.write_u32(value.to_bits());
            }
            Constant::Double(value) => {
                self.w.write_u8(ConstantTag::Double.tag());
                self.w.write_u64(value.to_bits());
            }
            Constant::Utf8(value) => {
                let bytes = mutf8::encode(value);
                let length = u16::try_from(bytes.len()).map_err(|_| {
                    ConstantPoolError::Utf8TooLong {
                        length: bytes.len(),
                    }
                })?;

                self.w.write_u8(ConstantTag::Utf8.tag());
                self.w.write_u16(length);
                self.w.write_bytes(&bytes);
            }
            Constant::Class(name_index) => {
                self.w.write_u8(ConstantTag::Class.tag());
                self.w.write_u16(*name_index);
            }
            // The phantom slot after a Long or Double has no encoding.
            Constant::Unusable => {}
        }

        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.w.into_bytes()
    }
}
