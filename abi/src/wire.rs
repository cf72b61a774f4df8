//! Low-level pieces of the binary format: a bounds-checked reader, variable-length integers, and
//! the packed text encodings of `name`, `symbol` and `asset`.

use super::error::CodecError;

pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::EndOfData(what));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], CodecError> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_bytes(N, what)?);
        Ok(array)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>(what)?[0])
    }

    pub fn read_varuint32(&mut self) -> Result<u32, CodecError> {
        let mut value: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = self.read_u8("varuint32")?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift >= 35 {
                return Err(CodecError::VarintOverflow);
            }
        }
        u32::try_from(value).map_err(|_| CodecError::VarintOverflow)
    }

    /// Fails if any bytes are left unread.
    pub fn finish(self) -> Result<(), CodecError> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(CodecError::TrailingData(left)),
        }
    }
}

pub fn write_varuint32(out: &mut Vec<u8>, mut value: u32) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Writes a length prefix, rejecting lengths that do not fit the 32-bit wire field.
pub fn write_length(out: &mut Vec<u8>, len: usize, type_name: &str) -> Result<(), CodecError> {
    let len = u32::try_from(len).map_err(|_| CodecError::OutOfRange {
        type_name: type_name.into(),
        value: len.to_string(),
    })?;
    write_varuint32(out, len);
    Ok(())
}

const NAME_CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

fn name_char_value(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some(u64::from(c - b'a') + 6),
        b'1'..=b'5' => Some(u64::from(c - b'1') + 1),
        b'.' => Some(0),
        _ => None,
    }
}

/// Packs an account name (up to 13 characters of `.1-5a-z`) into 64 bits.
pub fn string_to_name(text: &str) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidText {
        kind: "name",
        text: text.into(),
    };
    if text.len() > 13 {
        return Err(invalid());
    }

    let mut value = 0;
    for (i, c) in text.bytes().enumerate() {
        let symbol = name_char_value(c).ok_or_else(invalid)?;
        if i < 12 {
            value |= symbol << (64 - 5 * (i + 1));
        } else {
            // The 13th character only has four bits left.
            if symbol > 0x0f {
                return Err(invalid());
            }
            value |= symbol;
        }
    }
    Ok(value)
}

pub fn name_to_string(value: u64) -> String {
    let mut chars = [b'.'; 13];
    let mut remaining = value;
    for i in 0..13 {
        let (mask, width) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
        chars[12 - i] = NAME_CHARMAP[(remaining & mask) as usize];
        remaining >>= width;
    }
    let text: String = chars.iter().map(|&c| char::from(c)).collect();
    text.trim_end_matches('.').to_owned()
}

const MAX_PRECISION: u8 = 18;

fn symbol_from_parts(precision: u8, code: &str) -> Option<u64> {
    if precision > MAX_PRECISION
        || code.is_empty()
        || code.len() > 7
        || !code.bytes().all(|c| c.is_ascii_uppercase())
    {
        return None;
    }
    let mut value = u64::from(precision);
    for (i, c) in code.bytes().enumerate() {
        value |= u64::from(c) << (8 * (i + 1));
    }
    Some(value)
}

fn symbol_parts(value: u64) -> (u8, String) {
    let precision = (value & 0xff) as u8;
    let mut code = String::new();
    let mut remaining = value >> 8;
    while remaining & 0xff != 0 {
        code.push(char::from((remaining & 0xff) as u8));
        remaining >>= 8;
    }
    (precision, code)
}

/// Parses `"precision,CODE"`, e.g. `"4,EOS"`.
pub fn string_to_symbol(text: &str) -> Result<u64, CodecError> {
    let invalid = || CodecError::InvalidText {
        kind: "symbol",
        text: text.into(),
    };
    let (precision, code) = text.split_once(',').ok_or_else(invalid)?;
    let precision: u8 = precision.trim().parse().map_err(|_| invalid())?;
    symbol_from_parts(precision, code.trim()).ok_or_else(invalid)
}

pub fn symbol_to_string(value: u64) -> String {
    let (precision, code) = symbol_parts(value);
    format!("{precision},{code}")
}

/// Parses `"amount CODE"`, e.g. `"-1.0500 EOS"`. The number of fraction digits is the symbol's
/// precision.
pub fn string_to_asset(text: &str) -> Result<(i64, u64), CodecError> {
    let invalid = || CodecError::InvalidText {
        kind: "asset",
        text: text.into(),
    };
    let (amount, code) = text.trim().split_once(' ').ok_or_else(invalid)?;
    let (negative, digits) = match amount.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, amount),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let all_digits = |s: &str| s.bytes().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let precision = u8::try_from(fraction.len()).map_err(|_| invalid())?;
    let magnitude: i64 = format!("{whole}{fraction}")
        .parse()
        .map_err(|_| invalid())?;
    let amount = if negative { -magnitude } else { magnitude };
    let symbol = symbol_from_parts(precision, code.trim()).ok_or_else(invalid)?;
    Ok((amount, symbol))
}

pub fn asset_to_string(amount: i64, symbol: u64) -> String {
    let (precision, code) = symbol_parts(symbol);
    let precision = usize::from(precision);
    let sign = if amount < 0 { "-" } else { "" };
    let digits = format!(
        "{:0>width$}",
        amount.unsigned_abs(),
        width = precision + 1
    );
    let (whole, fraction) = digits.split_at(digits.len() - precision);
    if fraction.is_empty() {
        format!("{sign}{whole} {code}")
    } else {
        format!("{sign}{whole}.{fraction} {code}")
    }
}
