//! The `scrty` file, §6: 1000 little-endian u32 pairs `{key,
//! continuumExeChecksum}`; the first pair is `{0, continuum overall
//! checksum}`. Absence is a permanent-I/O degraded mode (§7): the seed
//! cycle falls back to a random key with a zero exe checksum.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

pub const SCRTY_PAIR_COUNT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrtyPair {
    pub key: u32,
    pub continuum_exe_checksum: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ScrtyTable {
    pairs: Vec<ScrtyPair>,
}

impl ScrtyTable {
    /// The `{0, overall checksum}` sentinel pair, if the table loaded.
    pub fn continuum_overall_checksum(&self) -> Option<u32> {
        self.pairs.first().map(|p| p.continuum_exe_checksum)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ScrtyPair> {
        self.pairs.get(index).copied()
    }

    pub fn load(mut reader: impl Read) -> io::Result<ScrtyTable> {
        let mut pairs = Vec::with_capacity(SCRTY_PAIR_COUNT);
        loop {
            let key = match reader.read_u32::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            };
            let checksum = reader.read_u32::<LittleEndian>()?;
            pairs.push(ScrtyPair { key, continuum_exe_checksum: checksum });
        }
        Ok(ScrtyTable { pairs })
    }
}
