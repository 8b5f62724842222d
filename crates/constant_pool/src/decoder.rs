use crate::{
    bytes::ByteReader,
    constant_pool::{Constant, ConstantPool, ConstantTag},
    mutf8::{self, Utf8Mode},
    ConstantPoolError, Result,
};

/// Decodes `entry_count` pool slots from `bytes`. Bytes after the last
/// entry are left untouched. Any decode failure aborts the whole pool; a
/// partially decoded pool is never returned.
pub fn decode_pool(bytes: &[u8], entry_count: u16, mode: Utf8Mode) -> Result<ConstantPool> {
    Decoder::new(bytes, mode).decode_pool(entry_count)
}

pub struct Decoder<'a> {
    r: ByteReader<'a>,
    mode: Utf8Mode,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8], mode: Utf8Mode) -> Self {
        Self {
            r: ByteReader::new(bytes),
            mode,
        }
    }

    /// `entry_count` counts slots, matching the class file's
    /// `constant_pool_count - 1` convention: a Long or Double fills its own
    /// slot plus a following `Unusable` one.
    pub fn decode_pool(mut self, entry_count: u16) -> Result<ConstantPool> {
        let mut count = entry_count as usize;
        let mut constants = Vec::with_capacity(count);
        while count > 0 {
            let (constant, slot_size) = self.decode_constant()?;
            constants.push(constant);
            // A Long or Double in the final declared slot gets no phantom
            // slot; the pool never grows past entry_count.
            if slot_size == 2 && count > 1 {
                constants.push(Constant::Unusable);
            }

            count = count.saturating_sub(slot_size);
        }
        Ok(ConstantPool::new(constants))
    }

    /// Decodes exactly one tagged entry, leaving the cursor just past its
    /// payload. Returns the entry together with its slot width.
    pub fn decode_constant(&mut self) -> Result<(Constant, usize)> {
        let offset = self.r.position();
        let tag = ConstantTag::try_from(self.r.read_u8()?)
            .map_err(|tag| ConstantPoolError::UnknownConstantTag { tag, offset })?;

        let constant = match tag {
            ConstantTag::Utf8 => self.decode_utf8()?,
            ConstantTag::Integer => self.decode_integer()?,
            ConstantTag::Float => self.decode_float()?,
            ConstantTag::Long => self.decode_long()?,
            ConstantTag::Double => self.decode_double()?,
            ConstantTag::Class => self.decode_class()?,
        };

        Ok((constant, tag.slot_size()))
    }

    fn decode_utf8(&mut self) -> Result<Constant> {
        let length = self.r.read_u16()?;
        let offset = self.r.position();
        let bytes = self.r.read_bytes(length as usize)?;

        Ok(Constant::Utf8(mutf8::decode(bytes, self.mode, offset)?))
    }

    fn decode_integer(&mut self) -> Result<Constant> {
        Ok(Constant::Integer(self.r.read_u32()? as i32))
    }

    fn decode_long(&mut self) -> Result<Constant> {
        Ok(Constant::Long(self.r.read_u64()? as i64))
    }

    // The raw pattern is kept as-is: NaN payloads, infinities, signed zeros
    // and subnormals all survive from_bits unchanged.
    fn decode_float(&mut self) -> Result<Constant> {
        Ok(Constant::Float(f32::from_bits(self.r.read_u32()?)))
    }

    fn decode_double(&mut self) -> Result<Constant> {
        Ok(Constant::Double(f64::from_bits(self.r.read_u64()?)))
    }

    fn decode_class(&mut self) -> Result<Constant> {
        let name_index = self.r.read_u16()?;

        Ok(Constant::Class(name_index))
    }
}
