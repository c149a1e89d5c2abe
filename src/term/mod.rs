/*!
The abstract syntax tree of programs.

Terms live in an arena, the `Ast`, and refer to each other by `TermId`. Every term is owned by
exactly one parent (or is a root): constructors attach their children, and a child which
already has a parent cannot be attached again. The `parent` link is a plain index back into the
arena, so ownership only ever flows from parent to child.
*/
use crate::name::Name;
use crate::{debug_from_display, quick_display};
use smallvec::SmallVec;
use std::ops::Index;

mod kind;
pub use kind::*;

/// A map from free variables to the hash of their occurrence positions
pub type NameMap = crate::util::open_map::OpenMap<Name, Name>;

/// The size of the stack used by tree walks before allocating
const TERM_STACK_DEPTH: usize = 32;

/// The index of a term within its `Ast`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TermId(u32);

impl TermId {
    /// Get the index of this term within its arena
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

quick_display!(TermId, id, fmt => write!(fmt, "%{}", id.0));
debug_from_display!(TermId);

/// A node of the syntax tree
#[derive(Debug, Clone)]
pub struct Term {
    kind: Kind,
    name: Option<Name>,
    lhs: Option<TermId>,
    rhs: Option<TermId>,
    parent: Option<TermId>,
    tag: u32,
    free_vars: NameMap,
}

impl Term {
    fn new(kind: Kind, name: Option<Name>, lhs: Option<TermId>, rhs: Option<TermId>) -> Term {
        Term {
            kind,
            name,
            lhs,
            rhs,
            parent: None,
            tag: 0,
            free_vars: NameMap::new(),
        }
    }
    /// Get the kind of this term
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }
    /// Get the name of this term. Only variables have one
    #[inline]
    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }
    /// Get the left child of this term
    #[inline]
    pub fn lhs(&self) -> Option<TermId> {
        self.lhs
    }
    /// Get the right child of this term
    #[inline]
    pub fn rhs(&self) -> Option<TermId> {
        self.rhs
    }
    /// Get the term this term is a child of, if any
    #[inline]
    pub fn parent(&self) -> Option<TermId> {
        self.parent
    }
    /// Get the tag of this term. Only meaningful once its tree has been hashed
    #[inline]
    pub fn tag(&self) -> u32 {
        self.tag
    }
    /// Get the free variables of this term, mapped to the hash of their positions. Only filled
    /// in once its tree has been hashed
    #[inline]
    pub fn free_vars(&self) -> &NameMap {
        &self.free_vars
    }
}

/// An arena of terms
#[derive(Debug, Clone, Default)]
pub struct Ast {
    terms: Vec<Term>,
}

impl Ast {
    /// Create a new, empty arena
    pub fn new() -> Ast {
        Ast { terms: Vec::new() }
    }
    /// Get the number of terms in this arena
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }
    /// Check whether this arena is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
    /// Get a term, if `id` is in bounds
    #[inline]
    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.index())
    }
    /// Push a term, attaching its children
    fn push(&mut self, term: Term) -> TermId {
        let id = TermId(self.terms.len() as u32);
        for child in term.lhs.iter().chain(term.rhs.iter()) {
            let child = &mut self.terms[child.index()];
            assert!(
                child.parent.is_none(),
                "{} term already has parent {:?}",
                child.kind,
                child.parent
            );
            child.parent = Some(id);
        }
        self.terms.push(term);
        id
    }
    /// Drop every term allocated at or after `len`. The dropped terms must not be reachable
    /// from any remaining term.
    pub(crate) fn truncate(&mut self, len: usize) {
        debug_assert!(self.terms[..len.min(self.terms.len())]
            .iter()
            .all(|term| term.parent.map(|p| p.index() < len).unwrap_or(true)));
        self.terms.truncate(len)
    }
    #[inline]
    fn kind_of(&self, id: TermId) -> Kind {
        self[id].kind
    }
    /// Create a variable
    pub fn var<N: Into<Name>>(&mut self, name: N) -> TermId {
        self.push(Term::new(Kind::Var, Some(name.into()), None, None))
    }
    /// Apply `function` to `argument`
    pub fn app(&mut self, function: TermId, argument: TermId) -> TermId {
        self.push(Term::new(Kind::App, None, Some(function), Some(argument)))
    }
    /// Create a lambda abstraction. `bind` must be a binder
    pub fn lambda(&mut self, bind: TermId, body: TermId) -> TermId {
        assert_eq!(self.kind_of(bind), Kind::Bind, "lambda over a non-binder");
        self.push(Term::new(Kind::Lambda, None, Some(bind), Some(body)))
    }
    /// Bind a variable to a type. `var` must be a variable; an absent type marks an unannotated
    /// binder
    pub fn bind(&mut self, var: TermId, ty: Option<TermId>) -> TermId {
        assert_eq!(self.kind_of(var), Kind::Var, "binding a non-variable");
        self.push(Term::new(Kind::Bind, None, Some(var), ty))
    }
    /// Assign `value` to a binder
    pub fn assign(&mut self, bind: TermId, value: TermId) -> TermId {
        assert_eq!(self.kind_of(bind), Kind::Bind, "assigning to a non-binder");
        self.push(Term::new(Kind::Assignment, None, Some(bind), Some(value)))
    }
    /// Declare a binder without a value
    pub fn declaration(&mut self, bind: TermId) -> TermId {
        assert_eq!(self.kind_of(bind), Kind::Bind, "declaring a non-binder");
        self.push(Term::new(Kind::Declaration, None, Some(bind), None))
    }
    /// Create a let-statement from an assignment or declaration and the statement it continues
    /// with, if any
    pub fn statement(&mut self, binding: TermId, rest: Option<TermId>) -> TermId {
        let kind = self.kind_of(binding);
        assert!(
            kind == Kind::Assignment || kind == Kind::Declaration,
            "statement over {}",
            kind
        );
        if let Some(rest) = rest {
            assert_eq!(self.kind_of(rest), Kind::Statement, "statement continued by a non-statement");
        }
        self.push(Term::new(Kind::Statement, None, Some(binding), rest))
    }
    /// Create a function type
    pub fn arrow(&mut self, domain: TermId, codomain: TermId) -> TermId {
        self.push(Term::new(Kind::ArrowType, None, Some(domain), Some(codomain)))
    }
    /// List the terms of the tree rooted at `root`, children before parents and left before
    /// right
    pub fn post_order(&self, root: TermId) -> Vec<TermId> {
        let mut order = Vec::new();
        let mut stack = SmallVec::<[(TermId, bool); TERM_STACK_DEPTH]>::new();
        stack.push((root, false));
        while let Some((top, expanded)) = stack.pop() {
            if expanded {
                order.push(top);
                continue;
            }
            stack.push((top, true));
            let term = &self[top];
            if let Some(rhs) = term.rhs {
                stack.push((rhs, false));
            }
            if let Some(lhs) = term.lhs {
                stack.push((lhs, false));
            }
        }
        order
    }
    /// Get the number of ancestors of a term
    pub fn depth(&self, mut id: TermId) -> usize {
        let mut depth = 0;
        while let Some(parent) = self[id].parent {
            depth += 1;
            id = parent;
        }
        depth
    }
    /// Check whether two trees have the same shape and variable names. Tags are not compared
    pub fn same_tree(&self, left: TermId, other: &Ast, right: TermId) -> bool {
        let mut stack = SmallVec::<[(TermId, TermId); TERM_STACK_DEPTH]>::new();
        stack.push((left, right));
        while let Some((l, r)) = stack.pop() {
            let (l, r) = (&self[l], &other[r]);
            if l.kind != r.kind || l.name != r.name {
                return false;
            }
            for (lc, rc) in [(l.lhs, r.lhs), (l.rhs, r.rhs)].iter() {
                match (lc, rc) {
                    (Some(lc), Some(rc)) => stack.push((*lc, *rc)),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }
        true
    }
    /// Record the tag of a term
    pub(crate) fn set_tag(&mut self, id: TermId, tag: u32) {
        self.terms[id.index()].tag = tag;
    }
    /// Record the free variables of a term
    pub(crate) fn set_free_vars(&mut self, id: TermId, free_vars: NameMap) {
        self.terms[id.index()].free_vars = free_vars;
    }
}

impl Index<TermId> for Ast {
    type Output = Term;
    #[inline]
    fn index(&self, id: TermId) -> &Term {
        &self.terms[id.index()]
    }
}
