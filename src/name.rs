/*!
Names: immutable identifiers carrying a precomputed CRC-32
*/
use crate::util::hash::hash_bytes;
use crate::util::open_map::TableKey;
use crate::{debug_from_display, quick_display};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};

/// The number of identifier bytes stored inline before allocating
pub const INLINE_NAME: usize = 8;

/// The bytes of an identifier
pub type NameBytes = SmallVec<[u8; INLINE_NAME]>;

/// An identifier together with its hash.
///
/// Names are plain values: cloning one is the only way to share it, and each holder drops its
/// own copy.
#[derive(Clone, Eq)]
pub struct Name {
    identifier: NameBytes,
    hash: u32,
}

impl Name {
    /// Create a new name from its bytes
    pub fn new(identifier: &[u8]) -> Name {
        Name {
            identifier: NameBytes::from_slice(identifier),
            hash: hash_bytes(identifier),
        }
    }
    /// Get the bytes of this name
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.identifier
    }
    /// Get the CRC-32 of this name's bytes
    #[inline]
    pub fn hash(&self) -> u32 {
        self.hash
    }
    /// Get the length of this name, in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.identifier.len()
    }
    /// Check whether this name is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty()
    }
}

impl PartialEq for Name {
    #[inline]
    fn eq(&self, other: &Name) -> bool {
        self.hash == other.hash && self.identifier == other.identifier
    }
}

impl Hash for Name {
    #[inline]
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        hasher.write_u32(self.hash)
    }
}

impl TableKey for Name {
    #[inline]
    fn table_hash(&self) -> u32 {
        self.hash
    }
}

impl From<&str> for Name {
    #[inline]
    fn from(identifier: &str) -> Name {
        Name::new(identifier.as_bytes())
    }
}

impl From<&[u8]> for Name {
    #[inline]
    fn from(identifier: &[u8]) -> Name {
        Name::new(identifier)
    }
}

quick_display!(Name, name, fmt => write!(fmt, "{}", String::from_utf8_lossy(&name.identifier)));
debug_from_display!(Name);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names_compare_by_content() {
        let x = Name::from("x");
        let y = Name::from("y");
        assert_eq!(x, Name::new(b"x"));
        assert_ne!(x, y);
        assert_eq!(x.hash(), hash_bytes(b"x"));
        assert_eq!(x.len(), 1);
        assert!(Name::from("").is_empty());
        assert_eq!(Name::from("").hash(), 0);
    }

    #[test]
    fn copies_are_independent() {
        let long = Name::from("a_rather_long_identifier");
        let copy = long.clone();
        drop(long);
        assert_eq!(copy.as_bytes(), b"a_rather_long_identifier");
        assert_eq!(copy.to_string(), "a_rather_long_identifier");
    }
}
