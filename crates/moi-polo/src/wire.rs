use crate::PoloError;

/// Wire tags understood by the codec. The tag occupies the low nibble of every
/// header varint and the first byte of a top-level encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Null = 0,
    False = 1,
    True = 2,
    PosInt = 3,
    NegInt = 4,
    Raw = 5,
    Word = 6,
    Float = 7,
    Document = 13,
    Pack = 14,
    Load = 15,
}

impl WireType {
    pub fn from_u8(tag: u8) -> Result<Self, PoloError> {
        Ok(match tag {
            0 => WireType::Null,
            1 => WireType::False,
            2 => WireType::True,
            3 => WireType::PosInt,
            4 => WireType::NegInt,
            5 => WireType::Raw,
            6 => WireType::Word,
            7 => WireType::Float,
            13 => WireType::Document,
            14 => WireType::Pack,
            15 => WireType::Load,
            other => return Err(PoloError::InvalidWireType(other)),
        })
    }

    pub fn is_compound(self) -> bool {
        matches!(self, WireType::Pack | WireType::Document)
    }
}

pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

pub(crate) fn read_varint(buf: &[u8], pos: &mut usize) -> Result<u64, PoloError> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = *buf.get(*pos).ok_or(PoloError::Truncated)?;
        *pos += 1;
        if shift >= 64 || (shift == 63 && byte > 1) {
            return Err(PoloError::VarintOverflow);
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

/// Builds a pack body: the load header, one header per element and the
/// concatenated element bodies.
pub(crate) fn write_pack(elements: &[(WireType, Vec<u8>)]) -> Vec<u8> {
    let mut headers = Vec::with_capacity(elements.len() * 2);
    let mut data_len = 0usize;
    for (wire, body) in elements {
        write_varint(&mut headers, ((data_len as u64) << 4) | *wire as u64);
        data_len += body.len();
    }

    let mut out = Vec::with_capacity(headers.len() + data_len + 4);
    write_varint(&mut out, ((headers.len() as u64) << 4) | WireType::Load as u64);
    out.extend_from_slice(&headers);
    for (_, body) in elements {
        out.extend_from_slice(body);
    }
    out
}

pub(crate) fn read_pack(body: &[u8]) -> Result<Vec<(WireType, &[u8])>, PoloError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let mut pos = 0usize;
    let load = read_varint(body, &mut pos)?;
    if load & 0x0f != WireType::Load as u64 {
        return Err(PoloError::MalformedPack("missing load header"));
    }
    let headers_len = usize::try_from(load >> 4)
        .map_err(|_| PoloError::MalformedPack("load length overflows"))?;
    let headers_end = pos
        .checked_add(headers_len)
        .filter(|end| *end <= body.len())
        .ok_or(PoloError::Truncated)?;
    let headers = &body[pos..headers_end];
    let data = &body[headers_end..];

    let mut entries = Vec::new();
    let mut cursor = 0usize;
    while cursor < headers.len() {
        let header = read_varint(headers, &mut cursor)?;
        let wire = WireType::from_u8((header & 0x0f) as u8)?;
        let offset = usize::try_from(header >> 4)
            .map_err(|_| PoloError::MalformedPack("offset overflows"))?;
        entries.push((wire, offset));
    }

    let mut out = Vec::with_capacity(entries.len());
    for (idx, (wire, start)) in entries.iter().enumerate() {
        let end = entries.get(idx + 1).map_or(data.len(), |(_, next)| *next);
        if *start > end || end > data.len() {
            return Err(PoloError::MalformedPack("element offsets out of order"));
        }
        out.push((*wire, &data[*start..end]));
    }
    Ok(out)
}
