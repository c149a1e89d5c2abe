/*!
Position trees: the shape of the occurrences of one variable within a subtree
*/
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter, Write};

/// The number of codes a position tree stores inline
pub const INLINE_POSITIONS: usize = 8;

/// The number of bytes of an encoded position tree stored inline
pub const INLINE_ENCODING: usize = 4;

/// The number of bits used to encode a single node
pub const BITS_PER_CODE: usize = 2;

/// The two-bit code for an absent node, also used to pad the last byte of an encoding
pub const CODE_ABSENT: u8 = 0b00;

/// The two-bit code for a `Here` node
pub const CODE_HERE: u8 = 0b01;

/// The two-bit code for a `Join` node
pub const CODE_JOIN: u8 = 0b10;

/// A node of a position tree
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Position {
    /// No occurrence on this side of a join
    Absent,
    /// A single occurrence
    Here,
    /// The union of the occurrences described by the next two subtrees
    Join,
}

impl Position {
    /// Get the two-bit code of this node
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Position::Absent => CODE_ABSENT,
            Position::Here => CODE_HERE,
            Position::Join => CODE_JOIN,
        }
    }
}

/// A binary tree of `Here` and `Absent` leaves and `Join` nodes, stored in pre-order.
///
/// Every merge wraps the positions coming from the smaller side in a `Join`, whose left child is
/// the bigger side's tree for the same variable or `Absent` if the bigger side lacks it. A
/// variable occurring `n` times therefore has a tree with `n` `Here` leaves, shaped by the order
/// and direction of the merges.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct PositionTree {
    nodes: SmallVec<[Position; INLINE_POSITIONS]>,
}

impl PositionTree {
    /// A single occurrence
    pub fn here() -> PositionTree {
        let mut nodes = SmallVec::new();
        nodes.push(Position::Here);
        PositionTree { nodes }
    }
    /// A placeholder for the side of a join on which a variable does not occur
    pub fn absent() -> PositionTree {
        let mut nodes = SmallVec::new();
        nodes.push(Position::Absent);
        PositionTree { nodes }
    }
    /// The union of two sets of occurrences
    pub fn join(left: &PositionTree, right: &PositionTree) -> PositionTree {
        let mut nodes = SmallVec::with_capacity(1 + left.nodes.len() + right.nodes.len());
        nodes.push(Position::Join);
        nodes.extend_from_slice(&left.nodes);
        nodes.extend_from_slice(&right.nodes);
        PositionTree { nodes }
    }
    /// Whether this tree is a single occurrence
    #[inline]
    pub fn is_here(&self) -> bool {
        self.nodes[..] == [Position::Here]
    }
    /// Whether this tree is a single node, i.e. not a `Join`
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.nodes.len() == 1
    }
    /// Get the number of nodes in this tree
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    /// Get the number of occurrences described by this tree
    pub fn occurrences(&self) -> usize {
        self.nodes.iter().filter(|node| **node == Position::Here).count()
    }
    /// Get the nodes of this tree, in pre-order
    #[inline]
    pub fn nodes(&self) -> &[Position] {
        &self.nodes
    }
    /// Split a `Join` into its two subtrees. Returns `None` for leaves
    pub fn children(&self) -> Option<(PositionTree, PositionTree)> {
        if self.is_leaf() {
            return None;
        }
        // The left subtree ends once it has one more leaf than it has joins
        let mut open = 1usize;
        let mut split = 1;
        while open > 0 {
            match self.nodes[split] {
                Position::Here | Position::Absent => open -= 1,
                Position::Join => open += 1,
            }
            split += 1;
        }
        let left = PositionTree {
            nodes: SmallVec::from_slice(&self.nodes[1..split]),
        };
        let right = PositionTree {
            nodes: SmallVec::from_slice(&self.nodes[split..]),
        };
        Some((left, right))
    }
    /**
    Bit-pack this tree, two bits per node in pre-order, filling each byte from its least
    significant bits. Absent children take a `CODE_ABSENT` slot of their own; the last byte is
    padded with the same code, which is unambiguous since a pre-order tree ends by itself.

    # Example
    ```rust
    use alpha_tag::hashing::PositionTree;
    let here = PositionTree::here();
    assert_eq!(&here.encode()[..], &[0b01]);
    let join = PositionTree::join(&here, &here);
    assert_eq!(&join.encode()[..], &[0b01_01_10]);
    let one_sided = PositionTree::join(&PositionTree::absent(), &here);
    assert_eq!(&one_sided.encode()[..], &[0b01_00_10]);
    ```
    */
    pub fn encode(&self) -> SmallVec<[u8; INLINE_ENCODING]> {
        let codes_per_byte = 8 / BITS_PER_CODE;
        let len = (self.nodes.len() + codes_per_byte - 1) / codes_per_byte;
        let mut bytes = SmallVec::from_elem(CODE_ABSENT, len);
        for (ix, node) in self.nodes.iter().enumerate() {
            let shift = (ix % codes_per_byte) * BITS_PER_CODE;
            bytes[ix / codes_per_byte] |= node.code() << shift;
        }
        bytes
    }
}

impl Display for PositionTree {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        // For each open join, the number of its subtrees not yet finished
        let mut pending = SmallVec::<[u8; INLINE_POSITIONS]>::new();
        for node in self.nodes.iter() {
            match node {
                Position::Join => {
                    fmt.write_str("Join(")?;
                    pending.push(2);
                    continue;
                }
                Position::Here => fmt.write_str("Here")?,
                Position::Absent => fmt.write_str("Absent")?,
            }
            while let Some(top) = pending.last_mut() {
                *top -= 1;
                if *top == 1 {
                    fmt.write_str(")(")?;
                    break;
                }
                fmt.write_char(')')?;
                pending.pop();
            }
        }
        Ok(())
    }
}
