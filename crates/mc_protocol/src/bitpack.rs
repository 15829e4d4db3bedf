use std::io::Write;

use crate::var_int::VarInt;

/// Packs a sequence of non-negative indices LSB-first into 64-bit words,
/// `bits_per_entry` bits each, never letting an entry straddle a word
/// boundary. Writes `varint(word_count)` followed by the words, each
/// big-endian.
pub fn write_bit_packed_longs(
    indices: &[u64],
    bits_per_entry: u32,
    mut w: impl Write,
) -> std::io::Result<()> {
    let longs = pack_longs(indices, bits_per_entry);

    VarInt(longs.len() as i32).encode(&mut w)?;
    for long in &longs {
        w.write_all(&long.to_be_bytes())?;
    }

    Ok(())
}

pub fn pack_longs(indices: &[u64], bits_per_entry: u32) -> Vec<u64> {
    assert!(bits_per_entry >= 1 && bits_per_entry <= 64);

    let mut longs = Vec::new();
    let mut current: u64 = 0;
    let mut bits_used: u32 = 0;

    for &index in indices {
        if 64 - bits_used < bits_per_entry {
            longs.push(current);
            current = 0;
            bits_used = 0;
        }

        current |= index << bits_used;
        bits_used += bits_per_entry;

        if bits_used == 64 {
            longs.push(current);
            current = 0;
            bits_used = 0;
        }
    }

    if bits_used > 0 {
        longs.push(current);
    }

    longs
}

/// Inverse of [`pack_longs`]: recovers `count` indices of `bits_per_entry`
/// bits each from a sequence of packed words.
pub fn unpack_longs(longs: &[u64], bits_per_entry: u32, count: usize) -> Vec<u64> {
    assert!(bits_per_entry >= 1 && bits_per_entry <= 64);

    let mask = if bits_per_entry == 64 {
        u64::MAX
    } else {
        (1u64 << bits_per_entry) - 1
    };

    let per_word = (64 / bits_per_entry) as usize;
    let mut out = Vec::with_capacity(count);

    'outer: for &long in longs {
        let mut bits_used = 0u32;
        for _ in 0..per_word {
            if out.len() == count {
                break 'outer;
            }
            out.push((long >> bits_used) & mask);
            bits_used += bits_per_entry;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_various_widths() {
        for &bits in &[1u32, 2, 3, 4, 5, 8, 13, 15, 32, 64] {
            let max = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
            let indices: Vec<u64> = (0..200).map(|i| (i as u64) % (max + 1)).collect();

            let longs = pack_longs(&indices, bits);
            let per_word = 64 / bits;
            assert_eq!(longs.len(), (indices.len() as u32).div_ceil(per_word) as usize);

            let decoded = unpack_longs(&longs, bits, indices.len());
            assert_eq!(decoded, indices);
        }
    }

    #[test]
    fn entries_never_straddle_a_word() {
        // 5 bits per entry: 12 entries fit per 64-bit word (60 bits used),
        // so entry 13 must start a new word, not spill 4 bits into word 0.
        let indices: Vec<u64> = (0..13).collect();
        let longs = pack_longs(&indices, 5);
        assert_eq!(longs.len(), 2);
    }

    #[test]
    fn write_matches_pack() {
        let indices = [0u64, 1, 2, 3, 4, 5, 6, 7];
        let mut buf = Vec::new();
        write_bit_packed_longs(&indices, 4, &mut buf).unwrap();

        let mut r = &buf[..];
        let count = VarInt::decode(&mut r).unwrap().0 as usize;
        assert_eq!(count, pack_longs(&indices, 4).len());
    }
}
