use crate::DecodeError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const PAD: u8 = b'=';
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 6;

/// Lookup table for standard base64 decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 64 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Length of the padded encoding of `len` input bytes.
pub const fn encoded_len(len: usize) -> usize {
    len.div_ceil(3) * 4
}

/// Encodes `input` with the standard RFC 4648 alphabet, padded with `=`.
pub fn encode_base64(input: &[u8]) -> String {
    let mut out = String::with_capacity(encoded_len(input.len()));
    for chunk in input.chunks(3) {
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        let n = (u32::from(chunk[0]) << 16) | (u32::from(b1) << 8) | u32::from(b2);

        for i in 0..4 {
            if i <= chunk.len() {
                let shift = 18 - BITS_PER_CHAR * i as u32;
                out.push(char::from(ALPHABET[((n >> shift) & 0x3F) as usize]));
            } else {
                out.push(char::from(PAD));
            }
        }
    }
    out
}

/// Decodes padded standard base64.
///
/// # Errors
///
/// - [`DecodeError::InvalidLength`] if the length is not a multiple of 4
/// - [`DecodeError::InvalidByte`] for a byte outside the alphabet, including
///   padding anywhere but the last two positions
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    let input = encoded.as_bytes();
    if input.len() % 4 != 0 {
        return Err(DecodeError::InvalidLength { len: input.len() });
    }

    let padding = input.iter().rev().take(2).take_while(|&&b| b == PAD).count();
    let body = &input[..input.len() - padding];

    let mut out = Vec::with_capacity(input.len() / 4 * 3);
    let mut acc = 0_u32;
    let mut bits = 0;
    for (index, &byte) in body.iter().enumerate() {
        let val = LOOKUP[usize::from(byte)];
        if val == NO_VALUE {
            return Err(DecodeError::InvalidByte { byte, index });
        }
        acc = (acc << BITS_PER_CHAR) | u32::from(val);
        bits += BITS_PER_CHAR;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }

    Ok(out)
}
