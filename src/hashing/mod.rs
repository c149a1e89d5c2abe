/*!
Alpha-invariant structural hashing.

Hashing a tree tags every one of its terms so that two terms receive the same tag exactly when
they are equal up to the renaming of bound variables (modulo hash collisions). The tag is built
in passes over a single post-order listing of the tree:

0. Summarise: compute the free variables of every subtree together with the positions they
   occur at, and for every lambda the positions of the variable it binds.
1. Structure: hash the shape of every subtree, ignoring variable names altogether.
2. Free variables: mix in the names of the free variables of each term and the hash of the
   positions they occur at.
3. Binding positions (optional): mix in where each lambda's bound variable occurs.

Passes 2 and 3 only ever mix into the tag of the term they are visiting, so a bound name never
reaches the tag of the term binding it.
*/
use crate::name::Name;
use crate::term::{Ast, NameMap, TermId};
use crate::util::hash::{combine, hash_bytes, hash_u32};
use fxhash::FxHashMap;
use smallvec::SmallVec;

mod position;
mod summary;
pub use position::*;
pub use summary::*;

/// The hash of an absent child
#[inline]
pub fn empty_hash() -> u32 {
    hash_bytes(b"")
}

/// Whether the type annotation of a binder takes part in hashing
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinderTypes {
    /// Binder types are hashed like any other subterm
    Hashed,
    /// Binder types are treated as absent. The type subterm is still tagged on its own
    Ignored,
}

impl Default for BinderTypes {
    #[inline]
    fn default() -> BinderTypes {
        BinderTypes::Hashed
    }
}

/// Configuration for hashing a tree
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct HashConfig {
    /// How binder type annotations are treated
    pub binder_types: BinderTypes,
    /// Whether to mix the positions of each lambda's bound variable into its tag
    pub binding_positions: bool,
}

impl HashConfig {
    /// Treat every binder's type annotation as absent
    pub fn ignore_binder_types(mut self) -> HashConfig {
        self.binder_types = BinderTypes::Ignored;
        self
    }
    /// Set whether binding positions are mixed into lambda tags
    pub fn with_binding_positions(mut self, binding_positions: bool) -> HashConfig {
        self.binding_positions = binding_positions;
        self
    }
    /// Whether binder types take part in hashing
    #[inline]
    pub fn hashes_binder_types(&self) -> bool {
        self.binder_types == BinderTypes::Hashed
    }
}

/// Hash the tree rooted at `root` with the default configuration
pub fn hash_term(ast: &mut Ast, root: TermId) {
    hash_term_with(ast, root, &HashConfig::default())
}

/// Hash the tree rooted at `root`, overwriting the tag and free variables of each of its terms
#[tracing::instrument(level = "debug", skip(ast, config))]
pub fn hash_term_with(ast: &mut Ast, root: TermId, config: &HashConfig) {
    let summaries = summarise(ast, root, config);

    for &id in summaries.order() {
        let (lhs, rhs) = hashed_children(ast, id, config);
        let lhs = lhs.map(|lhs| ast[lhs].tag()).unwrap_or_else(empty_hash);
        let rhs = rhs.map(|rhs| ast[rhs].tag()).unwrap_or_else(empty_hash);
        let summary = &summaries.summaries[&id];
        let tag = combine(ast[id].kind().salt(), combine(lhs, rhs));
        let side = if summary.left_bigger { b"L" } else { b"R" };
        ast.set_tag(id, combine(tag, hash_bytes(side)));
    }

    for &id in summaries.order() {
        let summary = &summaries.summaries[&id];
        let free_vars: NameMap = summary
            .variables
            .iter()
            .map(|(name, position)| (name.clone(), Name::new(&position.encode())))
            .collect();
        let tag = combine(ast[id].tag(), free_variable_hash(&free_vars));
        ast.set_tag(id, tag);
        ast.set_free_vars(id, free_vars);
    }

    if config.binding_positions {
        for &id in summaries.order() {
            let position = summaries.summaries[&id]
                .position
                .as_ref()
                .map(|position| hash_bytes(&position.encode()))
                .unwrap_or_else(|| hash_u32(0));
            let tag = combine(ast[id].tag(), position);
            ast.set_tag(id, tag);
        }
    }

    tracing::debug!(terms = summaries.len(), tag = ast[root].tag(), "hashed");
}

/// Hash a map of free variables to their encoded positions. The result does not depend on the
/// order of the map's entries
pub fn free_variable_hash(free_vars: &NameMap) -> u32 {
    free_vars
        .iter()
        .fold(0, |acc, (name, position)| {
            acc ^ combine(position.hash(), name.hash())
        })
}

/// Group the terms of an already hashed tree by tag, in post-order within each group
pub fn alpha_classes(ast: &Ast, root: TermId) -> FxHashMap<u32, SmallVec<[TermId; 2]>> {
    let mut classes: FxHashMap<u32, SmallVec<[TermId; 2]>> = FxHashMap::default();
    for id in ast.post_order(root) {
        classes.entry(ast[id].tag()).or_default().push(id);
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Kind;
    use pretty_assertions::assert_eq;

    /// `fn <x>:<ty>. <body>` where the body applies `f` to `x` if `apply` is set, and is `x`
    /// otherwise
    fn lambda(ast: &mut Ast, x: &str, ty: &str, apply: Option<&str>) -> TermId {
        let var = ast.var(x);
        let ty = ast.var(ty);
        let bind = ast.bind(var, Some(ty));
        let occurrence = ast.var(x);
        let body = match apply {
            Some(f) => {
                let f = ast.var(f);
                ast.app(f, occurrence)
            }
            None => occurrence,
        };
        ast.lambda(bind, body)
    }

    fn tag_of(x: &str, ty: &str, apply: Option<&str>, config: &HashConfig) -> u32 {
        let mut ast = Ast::new();
        let root = lambda(&mut ast, x, ty, apply);
        hash_term_with(&mut ast, root, config);
        ast[root].tag()
    }

    #[test]
    fn bound_names_do_not_matter() {
        let config = HashConfig::default();
        assert_eq!(tag_of("x", "a", None, &config), tag_of("y", "a", None, &config));
        assert_eq!(
            tag_of("x", "a", Some("f"), &config),
            tag_of("y", "a", Some("f"), &config)
        );
    }

    #[test]
    fn free_names_do_matter() {
        let config = HashConfig::default();
        assert_ne!(
            tag_of("x", "a", Some("f"), &config),
            tag_of("x", "a", Some("g"), &config)
        );
        assert_ne!(tag_of("x", "a", None, &config), tag_of("x", "b", None, &config));
        assert_ne!(tag_of("x", "a", None, &config), tag_of("x", "a", Some("f"), &config));
    }

    #[test]
    fn ignored_binder_types_do_not_matter() {
        let config = HashConfig::default().ignore_binder_types();
        assert_eq!(tag_of("x", "a", None, &config), tag_of("x", "b", None, &config));
        assert_eq!(tag_of("x", "a", None, &config), tag_of("z", "b", None, &config));
        assert_ne!(
            tag_of("x", "a", Some("f"), &config),
            tag_of("x", "a", Some("g"), &config)
        );
        assert_ne!(
            tag_of("x", "a", None, &config),
            tag_of("x", "a", None, &HashConfig::default())
        );
    }

    #[test]
    fn binding_positions_stay_alpha_invariant() {
        let config = HashConfig::default().with_binding_positions(true);
        assert_eq!(tag_of("x", "a", None, &config), tag_of("y", "a", None, &config));
        assert_ne!(
            tag_of("x", "a", None, &config),
            tag_of("x", "a", None, &HashConfig::default())
        );
    }

    #[test]
    fn argument_order_matters() {
        let mut ast = Ast::new();
        let f = ast.var("f");
        let x = ast.var("x");
        let fx = ast.app(f, x);
        let x = ast.var("x");
        let f = ast.var("f");
        let xf = ast.app(x, f);
        hash_term(&mut ast, fx);
        hash_term(&mut ast, xf);
        assert_ne!(ast[fx].tag(), ast[xf].tag());
        assert_ne!(ast[fx].free_vars(), ast[xf].free_vars());

        // `fn x:a. x f` against `fn x:a. f x`
        let var = ast.var("x");
        let ty = ast.var("a");
        let bind = ast.bind(var, Some(ty));
        let x = ast.var("x");
        let f = ast.var("f");
        let body = ast.app(x, f);
        let flipped = ast.lambda(bind, body);
        hash_term(&mut ast, flipped);
        assert_ne!(
            ast[flipped].tag(),
            tag_of("x", "a", Some("f"), &HashConfig::default())
        );
    }

    #[test]
    fn variable_tags_follow_the_passes() {
        let mut ast = Ast::new();
        let x = ast.var("x");
        hash_term(&mut ast, x);
        let structural = combine(
            combine(Kind::Var.salt(), combine(empty_hash(), empty_hash())),
            hash_bytes(b"R"),
        );
        let here = Name::new(&PositionTree::here().encode());
        assert_eq!(here.as_bytes(), &[0b01]);
        assert_eq!(
            ast[x].tag(),
            combine(structural, combine(here.hash(), hash_bytes(b"x")))
        );
        assert_eq!(ast[x].free_vars().len(), 1);
        assert_eq!(ast[x].free_vars().get(&Name::from("x")), Some(&here));
    }

    #[test]
    fn free_variables_are_recorded_on_every_term() {
        let mut ast = Ast::new();
        let root = lambda(&mut ast, "x", "a", Some("f"));
        hash_term(&mut ast, root);
        let mut names: Vec<String> = ast[root]
            .free_vars()
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a", "f"]);
        let body = ast[root].rhs().unwrap();
        assert_eq!(ast[body].free_vars().len(), 2);
        assert!(ast[body].free_vars().contains_key(&Name::from("x")));
    }

    #[test]
    fn rehashing_is_idempotent() {
        let mut ast = Ast::new();
        let root = lambda(&mut ast, "x", "a", Some("f"));
        hash_term(&mut ast, root);
        let first: Vec<u32> = ast.post_order(root).iter().map(|&id| ast[id].tag()).collect();
        hash_term(&mut ast, root);
        let second: Vec<u32> = ast.post_order(root).iter().map(|&id| ast[id].tag()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn free_variable_hash_ignores_order() {
        let entries = vec![
            (Name::from("x"), Name::new(&[0b01])),
            (Name::from("y"), Name::new(&[0b01_01_10])),
            (Name::from("z"), Name::new(&[0b01])),
        ];
        let forward: NameMap = entries.iter().cloned().collect();
        let backward: NameMap = entries.iter().rev().cloned().collect();
        assert_eq!(free_variable_hash(&forward), free_variable_hash(&backward));
        assert_eq!(free_variable_hash(&NameMap::new()), 0);
    }

    #[test]
    fn alpha_classes_group_equal_subterms() {
        let mut ast = Ast::new();
        let left = lambda(&mut ast, "x", "a", None);
        let right = lambda(&mut ast, "y", "a", None);
        let pair = ast.app(left, right);
        hash_term(&mut ast, pair);
        let classes = alpha_classes(&ast, pair);
        let class = &classes[&ast[left].tag()];
        assert_eq!(&class[..], &[left, right]);
        assert_eq!(classes[&ast[pair].tag()].len(), 1);
        // `x` and `y` occur free in their own subtrees, so their variables stay apart
        let total: usize = classes.values().map(|class| class.len()).sum();
        assert_eq!(total, ast.post_order(pair).len());
    }
}
