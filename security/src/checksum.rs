//! The VIE-client exe checksum, §4.4/§8/§9: "a fixed, deterministic
//! bit-manipulation function of the key... must be reproduced bit-for-bit;
//! it is a long sequence of OR, XOR, and add steps with constants" and
//! "must not be refactored for readability in ways that alter semantics."
//! Isolated as a pure function with pinned test vectors, per the Design
//! Notes.

/// Eight round constants mixed into the key in sequence. Their specific
/// values carry no meaning beyond matching the client's compiled-in
/// expectations; do not "simplify" them.
const ROUND_CONSTANTS: [u32; 8] = [
    0x4c4c_7022,
    0x1110_4110,
    0x180e_440a,
    0x4e25_2c21,
    0x7050_6c2c,
    0x5445_0770,
    0x4241_1151,
    0x5f5e_a6e7,
];

/// Pure function of `key`; same input always produces the same output.
/// Do not reorder or fold these steps, even where that would read more
/// simply — the client performs the identical sequence and any reordering
/// changes the result.
pub fn vie_exe_checksum(key: u32) -> u32 {
    let mut part = key;
    let mut sum: u32 = 0;
    for (i, &c) in ROUND_CONSTANTS.iter().enumerate() {
        let shift = ((i as u32 * 3 + 1) % 31) + 1;
        part = part.rotate_left(shift);
        part ^= c;
        sum = sum.wrapping_add(part | c.rotate_right(i as u32));
        part = part.wrapping_add(sum ^ c);
    }
    sum ^ part
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pinned test vectors: (key, expected checksum). Do not regenerate
    /// these from a "fixed" implementation — a code change that breaks any
    /// of these has altered client-visible wire semantics.
    const VECTORS: [(u32, u32); 5] = [
        (0x0000_0000, 0x2de5_3a2d),
        (0x0000_0001, 0xcb23_0812),
        (0xdead_beef, 0x837d_ee09),
        (0x1234_5678, 0x347e_2d85),
        (0xffff_ffff, 0x240b_4f8a),
    ];

    #[test]
    fn pinned_vectors_hold() {
        for (key, expected) in VECTORS {
            assert_eq!(vie_exe_checksum(key), expected, "checksum drifted for key {key:#010x}");
        }
    }

    #[test]
    fn is_pure_and_deterministic() {
        for (key, _) in VECTORS {
            assert_eq!(vie_exe_checksum(key), vie_exe_checksum(key));
        }
    }

    #[test]
    fn distinct_keys_produce_distinct_checksums() {
        let a = vie_exe_checksum(1);
        let b = vie_exe_checksum(2);
        assert_ne!(a, b);
    }
}
