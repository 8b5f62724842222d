use std::ops::Index;

use crate::{ConstantPoolError, Result};

/// Tag bytes of the entry kinds in scope, per Table 4.4-A of the class file
/// format. Any other tag byte is a hard decode failure; skipping it would
/// desynchronize every later entry offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
}

impl ConstantTag {
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Pool slots occupied by an entry of this kind. Long and Double take
    /// two, the second being a phantom slot.
    pub fn slot_size(self) -> usize {
        match self {
            ConstantTag::Long | ConstantTag::Double => 2,
            _ => 1,
        }
    }
}

impl TryFrom<u8> for ConstantTag {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(ConstantTag::Utf8),
            3 => Ok(ConstantTag::Integer),
            4 => Ok(ConstantTag::Float),
            5 => Ok(ConstantTag::Long),
            6 => Ok(ConstantTag::Double),
            7 => Ok(ConstantTag::Class),
            tag => Err(tag),
        }
    }
}

/// A single decoded constant pool entry.
///
/// `Class` stores an unresolved index of the `Utf8` entry holding the class
/// name; the target may appear later in the stream, so resolution is
/// deferred to [`ConstantPool::resolve_class_name`].
#[derive(Debug, Clone)]
pub enum Constant {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Utf8(String),
    Class(u16),
    /// Fills the second slot after a Long or Double. Never decoded from a
    /// tag and never encoded.
    Unusable,
}

impl Constant {
    pub fn tag(&self) -> Option<ConstantTag> {
        match self {
            Constant::Integer(_) => Some(ConstantTag::Integer),
            Constant::Long(_) => Some(ConstantTag::Long),
            Constant::Float(_) => Some(ConstantTag::Float),
            Constant::Double(_) => Some(ConstantTag::Double),
            Constant::Utf8(_) => Some(ConstantTag::Utf8),
            Constant::Class(_) => Some(ConstantTag::Class),
            Constant::Unusable => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match *self {
            Constant::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match *self {
            Constant::Long(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Constant::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Constant::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_utf8(&self) -> Option<&str> {
        match *self {
            Constant::Utf8(ref value) => Some(value),
            _ => None,
        }
    }

    pub fn as_class_index(&self) -> Option<u16> {
        match *self {
            Constant::Class(name_index) => Some(name_index),
            _ => None,
        }
    }
}

// Float and Double compare by bit pattern so that the round-trip law holds
// for NaN payloads and distinguishes +0.0 from -0.0; the host `==` on
// floats would erase both distinctions.
impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Integer(a), Constant::Integer(b)) => a == b,
            (Constant::Long(a), Constant::Long(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => a.to_bits() == b.to_bits(),
            (Constant::Double(a), Constant::Double(b)) => a.to_bits() == b.to_bits(),
            (Constant::Utf8(a), Constant::Utf8(b)) => a == b,
            (Constant::Class(a), Constant::Class(b)) => a == b,
            (Constant::Unusable, Constant::Unusable) => true,
            _ => false,
        }
    }
}

/// The constant pool of one class file: an ordered, 1-indexed, immutable
/// collection of entries. Index 0 is reserved by the format and never
/// resolves.
#[derive(Debug, Default, PartialEq)]
pub struct ConstantPool {
    constants: Vec<Constant>,
}

impl ConstantPool {
    pub fn new(constants: Vec<Constant>) -> Self {
        Self { constants }
    }

    /// Number of pool slots (Long and Double count as two). Saturates at
    /// `u16::MAX`: slots past that are unreachable through 1-based u16
    /// indexing anyway.
    pub fn len(&self) -> u16 {
        u16::try_from(self.constants.len()).unwrap_or(u16::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn get(&self, index: u16) -> Option<&Constant> {
        if index == 0 {
            return None;
        }
        self.constants.get(index as usize - 1)
    }

    /// Follows the `Class` entry at `class_index` to the `Utf8` entry
    /// holding its fully-qualified name.
    ///
    /// A failure here is local to this lookup: the pool stays valid and the
    /// same or other lookups may still be performed.
    pub fn resolve_class_name(&self, class_index: u16) -> Result<&str> {
        let name_index = match self.get(class_index) {
            Some(Constant::Class(name_index)) => *name_index,
            _ => {
                return Err(ConstantPoolError::BrokenClassReference {
                    index: class_index,
                })
            }
        };

        match self.get(name_index) {
            Some(Constant::Utf8(name)) => Ok(name),
            _ => Err(ConstantPoolError::BrokenClassReference { index: name_index }),
        }
    }
}

impl Index<u16> for ConstantPool {
    type Output = Constant;

    fn index(&self, index: u16) -> &Self::Output {
        &self.constants[index as usize - 1]
    }
}

impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a Constant;
    type IntoIter = std::slice::Iter<'a, Constant>;

    fn into_iter(self) -> Self::IntoIter {
        self.constants.iter()
    }
}
