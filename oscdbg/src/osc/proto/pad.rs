use super::Error;

// OSC aligns every string and blob to a 4 byte boundary
pub fn padded(len: usize) -> usize {
    (len + 3) & !3
}

pub fn peel<'a>(raw: &'a [u8], len: usize, full_data: &[u8]) -> Result<(&'a [u8], &'a [u8]), Error> {
    if len <= raw.len() {
        Ok((&raw[0..len], &raw[len..]))
    } else {
        Err(Error::Truncated(full_data.to_vec()))
    }
}

pub fn peel_array<'a, const N: usize>(
    raw: &'a [u8],
    full_data: &[u8],
) -> Result<([u8; N], &'a [u8]), Error> {
    let (bytes, rest) = peel(raw, N, full_data)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok((out, rest))
}

pub fn peel_i32<'a>(raw: &'a [u8], full_data: &[u8]) -> Result<(i32, &'a [u8]), Error> {
    let (bytes, rest) = peel_array::<4>(raw, full_data)?;
    Ok((i32::from_be_bytes(bytes), rest))
}

/// Splits a null terminated, padded string off the front of `raw`.
/// Trailing padding missing at the very end of the datagram is tolerated.
pub fn peel_cstr<'a>(raw: &'a [u8], full_data: &[u8]) -> Result<(&'a [u8], &'a [u8]), Error> {
    let end = match raw.iter().position(|b| *b == 0) {
        Some(end) => end,
        None => return Err(Error::UnterminatedString(full_data.to_vec())),
    };
    let consumed = padded(end + 1).min(raw.len());
    Ok((&raw[..end], &raw[consumed..]))
}

pub fn peel_string<'a>(raw: &'a [u8], full_data: &[u8]) -> Result<(String, &'a [u8]), Error> {
    let (bytes, rest) = peel_cstr(raw, full_data)?;
    Ok((String::from_utf8_lossy(bytes).to_string(), rest))
}

pub fn peel_blob<'a>(raw: &'a [u8], full_data: &[u8]) -> Result<(Vec<u8>, &'a [u8]), Error> {
    let (size, rest) = peel_i32(raw, full_data)?;
    let size = match usize::try_from(size) {
        Ok(size) => size,
        Err(_) => return Err(Error::InvalidBlobSize(full_data.to_vec())),
    };
    let (blob, _) = peel(rest, size, full_data)?;
    let consumed = padded(size).min(rest.len());
    Ok((blob.to_vec(), &rest[consumed..]))
}
