//! Length-prefixed wire encodings: SHORT, WORD, DATA and MPI, all big-endian.
//!
//! `extract_*` functions return the decoded value together with the bytes that
//! follow it, so callers can chain them and check for trailing input at the end.
use crate::CryptoError;
use num_bigint_dig::BigUint;

pub fn append_short(mut dest: Vec<u8>, value: u16) -> Vec<u8> {
    dest.extend_from_slice(&value.to_be_bytes());
    dest
}

pub fn append_word(mut dest: Vec<u8>, value: u32) -> Vec<u8> {
    dest.extend_from_slice(&value.to_be_bytes());
    dest
}

pub fn append_data(dest: Vec<u8>, data: &[u8]) -> Vec<u8> {
    let mut dest = append_word(dest, data.len() as u32);
    dest.extend_from_slice(data);
    dest
}

/// Appends the minimal big-endian magnitude of `value`, zero encodes as an empty MPI.
pub fn append_mpi(dest: Vec<u8>, value: &BigUint) -> Vec<u8> {
    let bytes = match value.bits() {
        0 => Vec::new(),
        _ => value.to_bytes_be(),
    };
    append_data(dest, &bytes)
}

pub fn encode_mpi(value: &BigUint) -> Vec<u8> {
    append_mpi(Vec::new(), value)
}

pub fn extract_short(src: &[u8]) -> Result<(u16, &[u8]), CryptoError> {
    if src.len() < 2 {
        Err(CryptoError::TruncatedData)?
    }
    let (head, rest) = src.split_at(2);
    Ok((u16::from_be_bytes([head[0], head[1]]), rest))
}

pub fn extract_word(src: &[u8]) -> Result<(u32, &[u8]), CryptoError> {
    if src.len() < 4 {
        Err(CryptoError::TruncatedData)?
    }
    let (head, rest) = src.split_at(4);
    Ok((u32::from_be_bytes([head[0], head[1], head[2], head[3]]), rest))
}

pub fn extract_data(src: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    let (len, rest) = extract_word(src)?;
    let len = len as usize;
    if rest.len() < len {
        Err(CryptoError::TruncatedData)?
    }
    Ok(rest.split_at(len))
}

/// Fails with `MalformedInteger` when the declared length does not fit the input.
/// A successful decode says nothing about whether the value is a valid group element.
pub fn extract_mpi(src: &[u8]) -> Result<(BigUint, &[u8]), CryptoError> {
    let (magnitude, rest) = extract_data(src).map_err(|_| CryptoError::MalformedInteger)?;
    Ok((BigUint::from_bytes_be(magnitude), rest))
}
