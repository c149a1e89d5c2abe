/*!
Term kinds and their hash salts
*/
use crate::{debug_from_display, quick_display};

/// The kind of a term
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Kind {
    /// A variable
    Var,
    /// An application of a function to an argument
    App,
    /// A lambda abstraction over a binder
    Lambda,
    /// A link in a chain of let-statements
    Statement,
    /// A variable together with its type
    Bind,
    /// A binder and the value assigned to it
    Assignment,
    /// A binder without a value
    Declaration,
    /// A function type
    ArrowType,
}

/// Every kind, in declaration order
pub const KINDS: [Kind; 8] = [
    Kind::Var,
    Kind::App,
    Kind::Lambda,
    Kind::Statement,
    Kind::Bind,
    Kind::Assignment,
    Kind::Declaration,
    Kind::ArrowType,
];

impl Kind {
    /// The constant mixed into the structural hash of every term of this kind.
    ///
    /// These are fixed literals: reordering the variants of `Kind` must not change any tag.
    pub const fn salt(self) -> u32 {
        match self {
            Kind::App => 1_607_021_125,
            Kind::Var => 4_218_930_572,
            Kind::Lambda => 593_836_036,
            Kind::Statement => 2_216_251_289,
            Kind::Bind => 1_884_888_807,
            Kind::Assignment => 995_776_901,
            Kind::Declaration => 4_154_476_586,
            Kind::ArrowType => 1_540_463_079,
        }
    }
    /// A short, human-readable name for this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Var => "var",
            Kind::App => "app",
            Kind::Lambda => "lambda",
            Kind::Statement => "statement",
            Kind::Bind => "bind",
            Kind::Assignment => "assignment",
            Kind::Declaration => "declaration",
            Kind::ArrowType => "arrow",
        }
    }
}

quick_display!(Kind, kind, fmt => write!(fmt, "{}", kind.as_str()));
debug_from_display!(Kind);

#[cfg(test)]
mod tests {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn salts_are_distinct() {
        let salts: FxHashSet<u32> = KINDS.iter().map(|kind| kind.salt()).collect();
        assert_eq!(salts.len(), KINDS.len());
    }

    #[test]
    fn salts_are_pinned() {
        assert_eq!(Kind::App.salt(), 1607021125);
        assert_eq!(Kind::ArrowType.salt(), 1540463079);
    }
}
