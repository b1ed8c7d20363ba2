//! Decoder for the modified UTF-8 encoding used by constant pool text
//! entries: NUL is encoded as the two-byte sequence 0xC0 0x80, and
//! supplementary characters as a CESU-8 style pair of three-byte encoded
//! UTF-16 surrogates. Both forms are rejected by a strict UTF-8 decoder,
//! so plain `from_utf8` is not enough here.

/// Lossy decode: malformed sequences become U+FFFD rather than failing,
/// since the decoded strings are only ever compared against attribute
/// names or shown in diagnostics.
pub fn decode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            0x01..=0x7F => {
                out.push(b as char);
                i += 1;
            }
            0xC0..=0xDF => match continuation(bytes, i + 1, 1) {
                Some(&[b1]) => {
                    let c = ((b as u32 & 0x1F) << 6) | (b1 as u32 & 0x3F);
                    out.push(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER));
                    i += 2;
                }
                _ => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    i += 1;
                }
            },
            0xE0..=0xEF => match continuation(bytes, i + 1, 2) {
                Some(&[b1, b2]) => {
                    let c = ((b as u32 & 0x0F) << 12)
                        | ((b1 as u32 & 0x3F) << 6)
                        | (b2 as u32 & 0x3F);
                    if (0xD800..=0xDBFF).contains(&c) {
                        // High surrogate; a paired low surrogate follows in
                        // another three-byte sequence.
                        if let Some((low, len)) = low_surrogate(&bytes[i + 3..]) {
                            let combined = 0x10000 + ((c - 0xD800) << 10) + (low - 0xDC00);
                            out.push(
                                char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER),
                            );
                            i += 3 + len;
                            continue;
                        }
                        out.push(char::REPLACEMENT_CHARACTER);
                    } else {
                        out.push(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                    i += 3;
                }
                _ => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    i += 1;
                }
            },
            _ => {
                // 0x00, stray continuation bytes, and four-byte UTF-8 lead
                // bytes never appear in well-formed modified UTF-8.
                out.push(char::REPLACEMENT_CHARACTER);
                i += 1;
            }
        }
    }

    out
}

fn continuation(bytes: &[u8], at: usize, n: usize) -> Option<&[u8]> {
    let tail = bytes.get(at..at + n)?;
    tail.iter().all(|b| b & 0xC0 == 0x80).then_some(tail)
}

fn low_surrogate(bytes: &[u8]) -> Option<(u32, usize)> {
    match bytes {
        [b0 @ 0xE0..=0xEF, b1, b2, ..] if b1 & 0xC0 == 0x80 && b2 & 0xC0 == 0x80 => {
            let c =
                ((*b0 as u32 & 0x0F) << 12) | ((*b1 as u32 & 0x3F) << 6) | (*b2 as u32 & 0x3F);
            (0xDC00..=0xDFFF).contains(&c).then_some((c, 3))
        }
        _ => None,
    }
}
