/*!
`alpha-tag` parses programs in a small, explicitly typed lambda calculus and tags every subterm
with a 32-bit hash which is invariant under the renaming of bound variables. Terms which are
alpha-equivalent receive the same tag, so tags can serve as keys for sharing and caching
structurally equal terms.

The pieces:
- `term`: the arena-allocated syntax tree
- `parser`: a lexer and recursive-descent parser producing terms
- `hashing`: the alpha-invariant hashing passes
- `prettyprinter`: a printer producing source text the parser accepts

# Example
```rust
use alpha_tag::{hashing::hash_term, parser::parse};
let (mut left, left_root) = parse("fn x:a. f x").unwrap();
let (mut right, right_root) = parse("fn y:a. f y").unwrap();
hash_term(&mut left, left_root);
hash_term(&mut right, right_root);
assert_eq!(left[left_root].tag(), right[right_root].tag());
```
*/
#![forbid(unsafe_code, missing_docs, missing_debug_implementations)]

pub mod util;
pub mod name;
pub mod term;
pub mod hashing;

#[cfg(feature = "parser")]
pub mod parser;

pub mod prettyprinter;
