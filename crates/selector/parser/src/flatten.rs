//! Flattening of the selector AST into alternative descendant chains.

use crate::ast::{Chain, Expr, Term};

/// Chain under construction.
///
/// `pending` holds exclusions seen before any positive term; it is only
/// non-empty while `terms` is empty.
#[derive(Debug, Clone, Default)]
struct Partial {
	terms: Vec<Term>,
	pending: Vec<Chain>,
}

impl Partial {
	/// Concatenates `next` after `self`.
	///
	/// Exclusions attach to the preceding term, or to the following one when
	/// nothing precedes them.
	fn join(mut self, mut next: Partial) -> Partial {
		match (self.terms.is_empty(), next.terms.is_empty()) {
			(true, true) => {
				self.pending.append(&mut next.pending);
				self
			}
			(true, false) => {
				let first = &mut next.terms[0];
				let mut excludes = std::mem::take(&mut self.pending);
				excludes.append(&mut first.excludes);
				first.excludes = excludes;
				next
			}
			(false, true) => {
				if let Some(last) = self.terms.last_mut() {
					last.excludes.append(&mut next.pending);
				}
				self
			}
			(false, false) => {
				self.terms.append(&mut next.terms);
				self
			}
		}
	}

	fn finish(self) -> Chain {
		Chain {
			terms: self.terms,
			excludes: self.pending,
		}
	}
}

/// Number of chains [`flatten`] materializes for `expr`, counting the excluded
/// chains copied onto each one. Saturates instead of overflowing.
pub(crate) fn expansion(expr: &Expr) -> usize {
	let (chains, excluded) = measure(expr);
	chains.saturating_mul(excluded.saturating_add(1))
}

/// Alternatives `expr` expands into, and excluded chains carried by each.
fn measure(expr: &Expr) -> (usize, usize) {
	match expr {
		Expr::Scope(_) => (1, 0),
		Expr::Group(inner) => measure(inner),
		Expr::Exclusion(inner) => (1, expansion(inner)),
		Expr::Alternation(alternatives) => alternatives
			.iter()
			.map(measure)
			.fold((0, 0), |(chains, excluded), (c, e)| (chains.saturating_add(c), excluded.max(e))),
		Expr::Chain(parts) => parts
			.iter()
			.map(measure)
			.fold((1, 0), |(chains, excluded), (c, e)| (chains.saturating_mul(c), excluded.saturating_add(e))),
	}
}

pub(crate) fn flatten(expr: &Expr) -> Vec<Chain> {
	expand(expr).into_iter().map(Partial::finish).collect()
}

fn expand(expr: &Expr) -> Vec<Partial> {
	match expr {
		Expr::Scope(pattern) => vec![Partial {
			terms: vec![Term::new(pattern.clone())],
			pending: Vec::new(),
		}],
		Expr::Group(inner) => expand(inner),
		Expr::Alternation(alternatives) => alternatives.iter().flat_map(expand).collect(),
		Expr::Exclusion(inner) => vec![Partial {
			terms: Vec::new(),
			pending: flatten(inner),
		}],
		Expr::Chain(parts) => {
			let mut acc = vec![Partial::default()];
			for part in parts {
				let options = expand(part);
				acc = acc
					.into_iter()
					.flat_map(|prefix| options.iter().map(move |option| prefix.clone().join(option.clone())))
					.collect();
			}
			acc
		}
	}
}
