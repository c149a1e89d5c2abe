/*!
The 32-bit hashing primitives every tag is built from
*/
use lazy_static::lazy_static;

/// The reflected CRC-32 polynomial
pub const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

/// The golden-ratio constant mixed in by `combine`
pub const COMBINE_CONSTANT: u32 = 0x9e37_79b9;

lazy_static! {
    /// Byte-indexed lookup table for `CRC32_POLYNOMIAL`
    static ref CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        for (byte, entry) in table.iter_mut().enumerate() {
            let mut crc = byte as u32;
            for _ in 0..8 {
                let mask = (crc & 1).wrapping_neg();
                crc = (crc >> 1) ^ (CRC32_POLYNOMIAL & mask);
            }
            *entry = crc;
        }
        table
    };
}

/**
Hash a byte string with CRC-32 (initial value `0xFFFFFFFF`, final complement)

# Example
```rust
use alpha_tag::util::hash::hash_bytes;
assert_eq!(hash_bytes(b""), 0);
assert_eq!(hash_bytes(b"123456789"), 0xCBF43926);
```
*/
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let table = &*CRC32_TABLE;
    let crc = bytes.iter().fold(0xFFFF_FFFFu32, |crc, &byte| {
        (crc >> 8) ^ table[((crc ^ byte as u32) & 0xFF) as usize]
    });
    !crc
}

/// Inject a raw 32-bit value as a hash
#[inline]
pub fn hash_u32(value: u32) -> u32 {
    value
}

/**
Combine two hashes. The result depends on argument order, which is what lets a parent
distinguish its left child from its right child.

# Example
```rust
use alpha_tag::util::hash::combine;
assert_ne!(combine(1, 2), combine(2, 1));
```
*/
#[inline]
pub fn combine(a: u32, b: u32) -> u32 {
    a ^ b
        .wrapping_add(COMBINE_CONSTANT)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2)
}
