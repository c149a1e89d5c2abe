/*!
Summaries: the free variables of every subtree, with the positions they occur at
*/
use super::{HashConfig, PositionTree};
use crate::name::Name;
use crate::term::{Ast, Kind, TermId};
use crate::util::open_map::OpenMap;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::fmt::{self, Debug, Formatter};

/// A map from the free variables of a subtree to where they occur
pub type VariableMap = OpenMap<Name, PositionTree>;

/// The summary of a single subtree
#[derive(Clone, Eq, PartialEq)]
pub struct Summary {
    /// The free variables of this subtree
    pub(super) variables: VariableMap,
    /// Where the variable bound here occurs, for lambdas
    pub(super) position: Option<PositionTree>,
    /// Whether the left child's map was the one merged into
    pub(super) left_bigger: bool,
}

impl Summary {
    /// Get the free variables of this subtree
    #[inline]
    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }
    /// Get the positions of the variable bound by this term, if it is a lambda
    #[inline]
    pub fn position(&self) -> Option<&PositionTree> {
        self.position.as_ref()
    }
    /// Whether the left child's map absorbed the right one
    #[inline]
    pub fn left_bigger(&self) -> bool {
        self.left_bigger
    }
}

impl Debug for Summary {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        write!(
            fmt,
            "{}[{}]",
            if self.left_bigger { "lbigger" } else { "rbigger" },
            self.variables
                .iter()
                .map(|(name, position)| format!("{}={}", name, position))
                .join(", ")
        )?;
        if let Some(position) = &self.position {
            write!(fmt, " binds {}", position)?;
        }
        Ok(())
    }
}

/// The summaries of every subtree of a tree
#[derive(Debug, Clone)]
pub struct Summaries {
    /// The terms of the tree, in post-order
    pub(super) order: Vec<TermId>,
    /// The summary of each term
    pub(super) summaries: FxHashMap<TermId, Summary>,
}

impl Summaries {
    /// Get the summary of a term, if it is part of the summarised tree
    #[inline]
    pub fn get(&self, id: TermId) -> Option<&Summary> {
        self.summaries.get(&id)
    }
    /// Get the terms of the summarised tree, in post-order
    #[inline]
    pub fn order(&self) -> &[TermId] {
        &self.order
    }
    /// Get the number of summarised terms
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }
    /// Check whether no terms were summarised
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Get the children of a term which take part in hashing
pub(super) fn hashed_children(
    ast: &Ast,
    id: TermId,
    config: &HashConfig,
) -> (Option<TermId>, Option<TermId>) {
    let term = &ast[id];
    if term.kind() == Kind::Bind && !config.hashes_binder_types() {
        (term.lhs(), None)
    } else {
        (term.lhs(), term.rhs())
    }
}

/// Merge the variable maps of two children, the smaller into the bigger. Every position taken
/// from the smaller side becomes the right child of a `Join`, whose left child is the bigger
/// side's position for the same variable or `Absent`. Returns the merged map and whether the
/// left child was the bigger one.
fn merge(lhs: Option<&Summary>, rhs: Option<&Summary>) -> (VariableMap, bool) {
    match (lhs, rhs) {
        (None, None) => (VariableMap::new(), false),
        (Some(lhs), None) => (lhs.variables.clone(), true),
        (None, Some(rhs)) => (rhs.variables.clone(), false),
        (Some(lhs), Some(rhs)) => {
            let left_bigger = lhs.variables.len() >= rhs.variables.len();
            let (bigger, smaller) = if left_bigger { (lhs, rhs) } else { (rhs, lhs) };
            let merged = OpenMap::merge_with(
                &bigger.variables,
                &smaller.variables,
                |in_bigger, in_smaller| match in_bigger {
                    Some(in_bigger) => PositionTree::join(&in_bigger, in_smaller),
                    None => PositionTree::join(&PositionTree::absent(), in_smaller),
                },
            );
            (merged, left_bigger)
        }
    }
}

/// Get the name bound by a lambda
fn bound_name(ast: &Ast, lambda: TermId) -> &Name {
    let bind = ast[lambda].lhs().expect("lambdas have a binder");
    let var = ast[bind].lhs().expect("binders have a variable");
    ast[var].name().expect("variables have a name")
}

/// Summarise every subtree of the tree rooted at `root`, children first
pub fn summarise(ast: &Ast, root: TermId, config: &HashConfig) -> Summaries {
    let order = ast.post_order(root);
    let mut summaries: FxHashMap<TermId, Summary> =
        FxHashMap::with_capacity_and_hasher(order.len(), Default::default());
    for &id in order.iter() {
        let (lhs, rhs) = hashed_children(ast, id, config);
        let lhs = lhs.map(|lhs| &summaries[&lhs]);
        let rhs = rhs.map(|rhs| &summaries[&rhs]);
        let term = &ast[id];
        let summary = match term.kind() {
            Kind::Var => {
                let mut variables = VariableMap::new();
                let name = term.name().expect("variables have a name").clone();
                variables.add(name, PositionTree::here());
                Summary {
                    variables,
                    position: None,
                    left_bigger: false,
                }
            }
            // The binder stays free until the enclosing lambda removes it
            Kind::Bind => Summary {
                variables: merge(lhs, rhs).0,
                position: None,
                left_bigger: false,
            },
            Kind::Lambda => {
                let mut variables = merge(lhs, rhs).0;
                let position = variables.remove(bound_name(ast, id));
                Summary {
                    variables,
                    position,
                    left_bigger: false,
                }
            }
            Kind::Declaration => Summary {
                variables: lhs.map(|lhs| lhs.variables.clone()).unwrap_or_default(),
                position: None,
                left_bigger: false,
            },
            Kind::App | Kind::Statement | Kind::Assignment | Kind::ArrowType => {
                let (variables, left_bigger) = merge(lhs, rhs);
                Summary {
                    variables,
                    position: None,
                    left_bigger,
                }
            }
        };
        tracing::trace!(term = %id, kind = %term.kind(), ?summary, "summarised");
        summaries.insert(id, summary);
    }
    Summaries { order, summaries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// `fn x:a. f x x`, built as `fn x:a. ((f x) x)`
    fn twice(ast: &mut Ast) -> (TermId, TermId) {
        let x = ast.var("x");
        let a = ast.var("a");
        let bind = ast.bind(x, Some(a));
        let f = ast.var("f");
        let x1 = ast.var("x");
        let x2 = ast.var("x");
        let fx = ast.app(f, x1);
        let fxx = ast.app(fx, x2);
        (ast.lambda(bind, fxx), fxx)
    }

    #[test]
    fn variables_merge_with_joins() {
        let mut ast = Ast::new();
        let (lambda, body) = twice(&mut ast);
        let summaries = summarise(&ast, lambda, &HashConfig::default());
        let here = PositionTree::here();
        let from_right = PositionTree::join(&PositionTree::absent(), &here);

        let body = summaries.get(body).unwrap();
        // `f x` has two variables, so it absorbs the lone `x`
        assert!(body.left_bigger());
        assert_eq!(body.variables().len(), 2);
        let x_in_body = PositionTree::join(&from_right, &here);
        assert_eq!(body.variables().get(&Name::from("x")), Some(&x_in_body));
        assert_eq!(body.variables().get(&Name::from("f")), Some(&here));

        let lambda = summaries.get(lambda).unwrap();
        assert_eq!(lambda.variables().len(), 2);
        assert_eq!(lambda.variables().get(&Name::from("a")), Some(&from_right));
        assert_eq!(lambda.variables().get(&Name::from("f")), Some(&from_right));
        assert!(!lambda.variables().contains_key(&Name::from("x")));
        // The binder has two free variables, the body two: the binder's side wins the tie
        assert_eq!(
            lambda.position(),
            Some(&PositionTree::join(&here, &x_in_body))
        );
    }

    #[test]
    fn ignored_binder_types_stay_out_of_the_map() {
        let mut ast = Ast::new();
        let (lambda, _) = twice(&mut ast);
        let config = HashConfig::default().ignore_binder_types();
        let summaries = summarise(&ast, lambda, &config);
        let lambda = summaries.get(lambda).unwrap();
        assert_eq!(lambda.variables().len(), 1);
        assert!(lambda.variables().contains_key(&Name::from("f")));
        assert_eq!(summaries.len(), 9);
    }

    #[test]
    fn one_sided_variables_remember_their_side() {
        let mut ast = Ast::new();
        let f = ast.var("f");
        let x = ast.var("x");
        let fx = ast.app(f, x);
        let x = ast.var("x");
        let f = ast.var("f");
        let xf = ast.app(x, f);
        let config = HashConfig::default();
        let here = PositionTree::here();
        let from_right = PositionTree::join(&PositionTree::absent(), &here);

        let fx_summaries = summarise(&ast, fx, &config);
        let fx = fx_summaries.get(fx).unwrap();
        assert!(fx.left_bigger());
        assert_eq!(fx.variables().get(&Name::from("f")), Some(&here));
        assert_eq!(fx.variables().get(&Name::from("x")), Some(&from_right));
        let rendered = format!("{:?}", fx);
        assert!(rendered.starts_with("lbigger["), "{}", rendered);
        assert!(rendered.contains("x=Join(Absent)(Here)"), "{}", rendered);

        let xf_summaries = summarise(&ast, xf, &config);
        let xf = xf_summaries.get(xf).unwrap();
        assert!(xf.left_bigger());
        assert_eq!(xf.variables().get(&Name::from("x")), Some(&here));
        assert_eq!(xf.variables().get(&Name::from("f")), Some(&from_right));
    }

    #[test]
    fn missing_children_count_as_empty() {
        let mut ast = Ast::new();
        let x = ast.var("x");
        let bind = ast.bind(x, None);
        let decl = ast.declaration(bind);
        let stmt = ast.statement(decl, None);
        let summaries = summarise(&ast, stmt, &HashConfig::default());
        let stmt = summaries.get(stmt).unwrap();
        assert!(stmt.left_bigger());
        assert_eq!(stmt.variables().len(), 1);
        assert_eq!(format!("{:?}", stmt), "lbigger[x=Here]");
    }
}
