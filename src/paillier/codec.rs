//! Binary encoding for key material and ciphertexts
//!
//! Record layout (all integers big-endian):
//!
//! ```text
//! magic[4] | version: u8 | ( len: u32 | magnitude[len] )*
//! ```
//!
//! Public keys carry (n, g), secret keys (lambda, mu), ciphertexts (c).

use std::io::{self, Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_bigint::BigUint;

use crate::error::{codec_err, Result, TallyError};

use super::types::{Ciphertext, PublicKey, SecretKey};

/// Current record version
pub const CODEC_VERSION: u8 = 1;

/// Upper bound on a single encoded integer (bytes)
pub const MAX_FIELD_LEN: usize = 1 << 16;

const PUBLIC_KEY_MAGIC: &[u8; 4] = b"PTPK";
const SECRET_KEY_MAGIC: &[u8; 4] = b"PTSK";
const CIPHERTEXT_MAGIC: &[u8; 4] = b"PTCT";

fn write_header<W: Write>(writer: &mut W, magic: &[u8; 4]) -> Result<()> {
    writer.write_all(magic)?;
    writer.write_u8(CODEC_VERSION)?;
    Ok(())
}

fn read_header<R: Read>(reader: &mut R, magic: &[u8; 4]) -> Result<()> {
    let mut found = [0u8; 4];
    reader.read_exact(&mut found).map_err(truncated)?;
    if &found != magic {
        return Err(codec_err!(
            "expected magic {:?}, found {:?}",
            String::from_utf8_lossy(magic),
            String::from_utf8_lossy(&found)
        ));
    }
    let version = reader.read_u8().map_err(truncated)?;
    if version != CODEC_VERSION {
        return Err(codec_err!("unsupported version {}", version));
    }
    Ok(())
}

fn write_field<W: Write>(writer: &mut W, value: &BigUint) -> Result<()> {
    let bytes = value.to_bytes_be();
    writer.write_u32::<BigEndian>(bytes.len() as u32)?;
    writer.write_all(&bytes)?;
    Ok(())
}

fn read_field<R: Read>(reader: &mut R) -> Result<BigUint> {
    let len = reader.read_u32::<BigEndian>().map_err(truncated)? as usize;
    if len == 0 {
        return Err(codec_err!("zero-length integer field"));
    }
    if len > MAX_FIELD_LEN {
        return Err(codec_err!("integer field of {} bytes exceeds limit", len));
    }
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes).map_err(truncated)?;
    Ok(BigUint::from_bytes_be(&bytes))
}

fn truncated(err: io::Error) -> TallyError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        codec_err!("truncated record")
    } else {
        TallyError::Io(err)
    }
}

fn ensure_consumed(cursor: &Cursor<&[u8]>) -> Result<()> {
    let extra = cursor.get_ref().len() as u64 - cursor.position();
    if extra != 0 {
        return Err(codec_err!("{} trailing bytes after record", extra));
    }
    Ok(())
}

fn invalid_to_codec(err: TallyError) -> TallyError {
    match err {
        TallyError::InvalidParameter(msg) => TallyError::Codec(msg),
        other => other,
    }
}

impl PublicKey {
    /// Write (n, g) as a length-prefixed record
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_header(writer, PUBLIC_KEY_MAGIC)?;
        write_field(writer, self.n())?;
        write_field(writer, self.g())
    }

    /// Read a public key record, checking g = n + 1
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        read_header(reader, PUBLIC_KEY_MAGIC)?;
        let n = read_field(reader)?;
        let g = read_field(reader)?;
        Self::from_parts(n, g).map_err(invalid_to_codec)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    /// Deserialize from bytes, rejecting trailing data
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let pk = Self::read_from(&mut cursor)?;
        ensure_consumed(&cursor)?;
        Ok(pk)
    }
}

impl SecretKey {
    /// Write (lambda, mu) as a length-prefixed record
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_header(writer, SECRET_KEY_MAGIC)?;
        write_field(writer, self.lambda())?;
        write_field(writer, self.mu())
    }

    /// Read a secret key record and check it against its public key
    pub fn read_from<R: Read>(reader: &mut R, pk: &PublicKey) -> Result<Self> {
        read_header(reader, SECRET_KEY_MAGIC)?;
        let lambda = read_field(reader)?;
        let mu = read_field(reader)?;
        Self::from_parts(lambda, mu, pk).map_err(invalid_to_codec)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let _ = self.write_to(&mut out);
        out
    }

    /// Deserialize from bytes, rejecting trailing data
    pub fn from_bytes(bytes: &[u8], pk: &PublicKey) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let sk = Self::read_from(&mut cursor, pk)?;
        ensure_consumed(&cursor)?;
        Ok(sk)
    }
}

impl Ciphertext {
    /// Write c as a length-prefixed record
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_header(writer, CIPHERTEXT_MAGIC)?;
        write_field(writer, self.value())
    }

    /// Read a ciphertext record
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        read_header(reader, CIPHERTEXT_MAGIC)?;
        Ok(Self::from_value(read_field(reader)?))
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let _ = self.write_to(&mut out);
        out
    }

    /// Deserialize from bytes, rejecting trailing data
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let c = Self::read_from(&mut cursor)?;
        ensure_consumed(&cursor)?;
        Ok(c)
    }
}
