use std::ops::Index;

use itertools::Itertools;
use varisat::{CnfFormula, ExtendFormula, Lit};

pub(crate) fn exactly_one(lits: Vec<Lit>) -> Vec<Vec<Lit>> {
    let mut clauses = Vec::with_capacity(lits.len() * (lits.len() + 1) / 2 + 1);

    // no two are true; (!A + !B) * (!A + !C) * ...
    clauses.extend(lits.iter()
        .combinations(2)
        .map(|pair| vec![!**pair.index(0), !**pair.index(1)])
    );
    // at least one is true; A + B + C + ...
    clauses.push(lits);

    clauses
}

/// Encode "at most `k` of `lits` are true" into `formula` with Sinz's sequential counter.
///
/// The counter allocates `(n - 1) * k` fresh variables, where `n = lits.len()`.
/// Those registers are implied by the inputs but not determined by them, so they must never be read back as part of a model.
pub(crate) fn at_most_k(formula: &mut CnfFormula, lits: &[Lit], k: usize) {
    let n = lits.len();
    if k >= n {
        return;
    }
    if k == 0 {
        lits.iter().for_each(|lit| formula.add_clause(&[!*lit]));
        return;
    }

    // registers[i][j] is implied by "at least j + 1 of lits[..=i] are true"
    let registers = (0..n - 1)
        .map(|_| (0..k).map(|_| formula.new_lit()).collect_vec())
        .collect_vec();

    formula.add_clause(&[!lits[0], registers[0][0]]);
    for j in 1..k {
        formula.add_clause(&[!registers[0][j]]);
    }

    for i in 1..n - 1 {
        let x = lits[i];
        let prev = &registers[i - 1];
        let cur = &registers[i];

        formula.add_clause(&[!x, cur[0]]);
        formula.add_clause(&[!prev[0], cur[0]]);
        for j in 1..k {
            // X_i and a count of j before it carries into a count of j + 1
            formula.add_clause(&[!x, !prev[j - 1], cur[j]]);
            formula.add_clause(&[!prev[j], cur[j]]);
        }
        // overflow: X_i on top of a full count
        formula.add_clause(&[!x, !prev[k - 1]]);
    }

    formula.add_clause(&[!lits[n - 1], !registers[n - 2][k - 1]]);
}

/// Encode "exactly `k` of `lits` are true" into `formula`.
///
/// At least `k` true is the same as at most `n - k` false, so both halves reuse [`at_most_k`].
pub(crate) fn exactly_k(formula: &mut CnfFormula, lits: &[Lit], k: usize) {
    let n = lits.len();
    if k > n {
        // unsatisfiable
        formula.add_clause(&[]);
        return;
    }
    if k == 1 {
        exactly_one(lits.to_vec()).iter().for_each(|clause| formula.add_clause(clause));
        return;
    }

    at_most_k(formula, lits, k);
    let negated = lits.iter().map(|lit| !*lit).collect_vec();
    at_most_k(formula, &negated, n - k);
}
