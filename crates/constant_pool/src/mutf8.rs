//! Modified UTF-8, the string encoding of the class file format. It differs
//! from standard UTF-8 in two ways: U+0000 is written as the two-byte form
//! `C0 80`, and characters above U+FFFF are written as a CESU-8 style pair
//! of three-byte surrogate encodings instead of a single four-byte sequence.

use crate::{ConstantPoolError, Result};

/// Validation policy for incoming `Utf8` payloads.
///
/// Strict mode accepts exactly what a conforming class file producer emits.
/// Lenient mode additionally accepts plain UTF-8 (raw NUL bytes and
/// four-byte sequences); note that such input does not re-encode to the
/// original bytes, since the encoder always emits the modified forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8Mode {
    #[default]
    Strict,
    Lenient,
}

/// Decodes a modified UTF-8 payload. `offset` is the payload's position in
/// the surrounding buffer, used only for error reporting.
pub fn decode(bytes: &[u8], mode: Utf8Mode, offset: usize) -> Result<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let start = offset + i;
        let b = bytes[i];
        let c = match b {
            0x00 => {
                // A conforming producer writes NUL as C0 80.
                if mode == Utf8Mode::Strict {
                    return Err(invalid(start));
                }
                i += 1;
                '\0'
            }
            0x01..=0x7F => {
                i += 1;
                b as char
            }
            0xC0..=0xDF => {
                let b2 = continuation(bytes, i + 1, offset)?;
                i += 2;
                let cp = (u32::from(b) & 0x1F) << 6 | u32::from(b2) & 0x3F;
                if cp == 0 {
                    '\0'
                } else if cp < 0x80 {
                    // Overlong form other than C0 80.
                    return Err(invalid(start));
                } else {
                    char::from_u32(cp).ok_or_else(|| invalid(start))?
                }
            }
            0xE0..=0xEF => {
                let b2 = continuation(bytes, i + 1, offset)?;
                let b3 = continuation(bytes, i + 2, offset)?;
                i += 3;
                let cp =
                    (u32::from(b) & 0x0F) << 12 | (u32::from(b2) & 0x3F) << 6 | u32::from(b3) & 0x3F;
                if cp < 0x800 {
                    return Err(invalid(start));
                } else if (0xD800..=0xDBFF).contains(&cp) {
                    // High surrogate: a supplementary character spans this
                    // unit and the low surrogate unit that must follow.
                    let low = decode_low_surrogate(bytes, &mut i, offset)?;
                    let sup = 0x10000 + ((cp - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(sup).ok_or_else(|| invalid(start))?
                } else if (0xDC00..=0xDFFF).contains(&cp) {
                    // Low surrogate without a preceding high surrogate.
                    return Err(invalid(start));
                } else {
                    char::from_u32(cp).ok_or_else(|| invalid(start))?
                }
            }
            0xF0..=0xF7 => {
                // Four-byte sequences are the standard UTF-8 supplementary
                // form, which the modified encoding never uses.
                if mode == Utf8Mode::Strict {
                    return Err(invalid(start));
                }
                let b2 = continuation(bytes, i + 1, offset)?;
                let b3 = continuation(bytes, i + 2, offset)?;
                let b4 = continuation(bytes, i + 3, offset)?;
                i += 4;
                let cp = (u32::from(b) & 0x07) << 18
                    | (u32::from(b2) & 0x3F) << 12
                    | (u32::from(b3) & 0x3F) << 6
                    | u32::from(b4) & 0x3F;
                if cp < 0x10000 {
                    return Err(invalid(start));
                }
                char::from_u32(cp).ok_or_else(|| invalid(start))?
            }
            // Stray continuation byte or the never-valid F8..FF range.
            _ => return Err(invalid(start)),
        };
        out.push(c);
    }

    Ok(out)
}

/// Encodes a string as modified UTF-8. Inverse of [`decode`] in strict mode.
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());

    for c in s.chars() {
        let cp = c as u32;
        match cp {
            0x00 => out.extend_from_slice(&[0xC0, 0x80]),
            0x01..=0x7F => out.push(cp as u8),
            0x80..=0x7FF => {
                out.push(0xC0 | (cp >> 6) as u8);
                out.push(0x80 | (cp & 0x3F) as u8);
            }
            0x800..=0xFFFF => encode_unit(&mut out, cp),
            _ => {
                let v = cp - 0x10000;
                encode_unit(&mut out, 0xD800 + (v >> 10));
                encode_unit(&mut out, 0xDC00 + (v & 0x3FF));
            }
        }
    }

    out
}

fn encode_unit(out: &mut Vec<u8>, unit: u32) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | (unit >> 6 & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

fn decode_low_surrogate(bytes: &[u8], i: &mut usize, offset: usize) -> Result<u32> {
    let start = offset + *i;
    let b1 = match bytes.get(*i) {
        Some(b) if (0xE0..=0xEF).contains(b) => *b,
        _ => return Err(invalid(start)),
    };
    let b2 = continuation(bytes, *i + 1, offset)?;
    let b3 = continuation(bytes, *i + 2, offset)?;
    *i += 3;

    let cp = (u32::from(b1) & 0x0F) << 12 | (u32::from(b2) & 0x3F) << 6 | u32::from(b3) & 0x3F;
    if !(0xDC00..=0xDFFF).contains(&cp) {
        return Err(invalid(start));
    }
    Ok(cp)
}

fn continuation(bytes: &[u8], at: usize, offset: usize) -> Result<u8> {
    match bytes.get(at) {
        Some(b) if (0x80..=0xBF).contains(b) => Ok(*b),
        _ => Err(invalid(offset + at)),
    }
}

fn invalid(offset: usize) -> ConstantPoolError {
    ConstantPoolError::InvalidUtf8Encoding { offset }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        let bytes = b"This is a string constant";

        assert_eq!(
            "This is a string constant",
            decode(bytes, Utf8Mode::Strict, 0).unwrap()
        );
        assert_eq!(bytes.to_vec(), encode("This is a string constant"));
    }

    #[test]
    fn test_nul_uses_two_byte_form() {
        assert_eq!(vec![0xC0, 0x80], encode("\0"));
        assert_eq!("\0", decode(&[0xC0, 0x80], Utf8Mode::Strict, 0).unwrap());
    }

    #[test]
    fn test_raw_nul_is_rejected_in_strict_mode() {
        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 11 }),
            decode(&[0x41, 0x00], Utf8Mode::Strict, 10)
        );
        assert_eq!("A\0", decode(&[0x41, 0x00], Utf8Mode::Lenient, 10).unwrap());
    }

    #[test]
    fn test_two_byte_form() {
        // U+00E9 LATIN SMALL LETTER E WITH ACUTE
        assert_eq!("é", decode(&[0xC3, 0xA9], Utf8Mode::Strict, 0).unwrap());
        assert_eq!(vec![0xC3, 0xA9], encode("é"));
    }

    #[test]
    fn test_supplementary_character_uses_surrogate_pair() {
        // U+1D11E MUSICAL SYMBOL G CLEF -> D834 DD1E
        let bytes = [0xED, 0xA0, 0xB4, 0xED, 0xB4, 0x9E];

        assert_eq!("\u{1D11E}", decode(&bytes, Utf8Mode::Strict, 0).unwrap());
        assert_eq!(bytes.to_vec(), encode("\u{1D11E}"));
    }

    #[test]
    fn test_four_byte_form_rejected_in_strict_accepted_in_lenient() {
        // Plain UTF-8 for U+1D11E.
        let bytes = [0xF0, 0x9D, 0x84, 0x9E];

        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 0 }),
            decode(&bytes, Utf8Mode::Strict, 0)
        );
        assert_eq!("\u{1D11E}", decode(&bytes, Utf8Mode::Lenient, 0).unwrap());
    }

    #[test]
    fn test_lone_surrogate_is_rejected() {
        // High surrogate D834 with no low surrogate following.
        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 3 }),
            decode(&[0xED, 0xA0, 0xB4], Utf8Mode::Strict, 0)
        );
        // Low surrogate DD1E on its own.
        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 0 }),
            decode(&[0xED, 0xB4, 0x9E], Utf8Mode::Strict, 0)
        );
    }

    #[test]
    fn test_overlong_and_truncated_sequences_are_rejected() {
        // Overlong encoding of 'A'.
        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 0 }),
            decode(&[0xC1, 0x81], Utf8Mode::Strict, 0)
        );
        // Two-byte lead with no continuation.
        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 1 }),
            decode(&[0xC3], Utf8Mode::Strict, 0)
        );
        // Stray continuation byte.
        assert_eq!(
            Err(ConstantPoolError::InvalidUtf8Encoding { offset: 0 }),
            decode(&[0x80], Utf8Mode::Strict, 0)
        );
    }

    #[test]
    fn test_strict_round_trip() {
        for s in ["", "plain", "é\0ü", "\u{1D11E}x\u{10FFFF}", "\u{FFFF}"] {
            let bytes = encode(s);
            assert_eq!(s, decode(&bytes, Utf8Mode::Strict, 0).unwrap());
        }
    }
}
