use std::collections::{BTreeMap, BTreeSet};

/// A product term over `width` variables. Bits set in `mask` are eliminated variables;
/// the remaining bits of `value` give the polarity of each literal. Variable `0` is the
/// most significant bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Implicant {
    pub value: u64,
    pub mask: u64,
}

impl Implicant {
    pub fn minterm(value: u64) -> Implicant {
        Implicant { value, mask: 0 }
    }

    pub fn covers(&self, minterm: u64) -> bool {
        minterm & !self.mask == self.value
    }

    /// Number of literals of the term.
    pub fn num_literals(&self, width: usize) -> usize {
        width - (self.mask.count_ones() as usize)
    }

    /// Merge two implicants that differ in exactly one (non-eliminated) variable.
    fn merge(&self, other: &Implicant) -> Option<Implicant> {
        let diff = self.value ^ other.value;
        if self.mask == other.mask && diff.count_ones() == 1 {
            Some(Implicant {
                value: self.value & !diff,
                mask: self.mask | diff,
            })
        } else {
            None
        }
    }
}

/// All prime implicants of the function given by its `minterms`.
///
/// Implicants are grouped by their eliminated variables and by the number of positive
/// literals, so only neighbouring groups are compared.
pub fn prime_implicants(minterms: &[u64]) -> Vec<Implicant> {
    let mut current: BTreeSet<Implicant> =
        minterms.iter().map(|m| Implicant::minterm(*m)).collect();
    let mut primes = BTreeSet::new();
    while !current.is_empty() {
        let mut groups: BTreeMap<(u64, u32), Vec<Implicant>> = BTreeMap::new();
        for implicant in &current {
            groups
                .entry((implicant.mask, implicant.value.count_ones()))
                .or_default()
                .push(*implicant);
        }

        let mut merged = BTreeSet::new();
        let mut next = BTreeSet::new();
        for ((mask, ones), group) in &groups {
            let Some(upper) = groups.get(&(*mask, ones + 1)) else {
                continue;
            };
            for a in group {
                for b in upper {
                    if let Some(combined) = a.merge(b) {
                        merged.insert(*a);
                        merged.insert(*b);
                        next.insert(combined);
                    }
                }
            }
        }

        primes.extend(current.difference(&merged).copied());
        current = next;
    }
    primes.into_iter().collect()
}

/// A minimal (in the greedy sense) cover of `minterms` by prime implicants.
///
/// Essential prime implicants are selected first. Remaining minterms are covered by
/// repeatedly picking the prime that covers most of them (ties prefer fewer literals,
/// then the smaller implicant), so the result is deterministic.
pub fn minimize(minterms: &[u64], width: usize) -> Vec<Implicant> {
    let primes = prime_implicants(minterms);
    let mut uncovered: BTreeSet<u64> = minterms.iter().copied().collect();
    let mut selected = BTreeSet::new();

    for minterm in minterms {
        let mut covering = primes.iter().filter(|p| p.covers(*minterm));
        if let (Some(prime), None) = (covering.next(), covering.next()) {
            selected.insert(*prime);
        }
    }
    uncovered.retain(|m| !selected.iter().any(|p: &Implicant| p.covers(*m)));

    while !uncovered.is_empty() {
        let best = primes
            .iter()
            .filter(|p| !selected.contains(*p))
            .map(|p| {
                let count = uncovered.iter().filter(|m| p.covers(**m)).count();
                (p, count)
            })
            .filter(|(_, count)| *count > 0)
            .min_by_key(|(p, count)| (std::cmp::Reverse(*count), p.num_literals(width), **p));
        let Some((prime, _)) = best else {
            // Unreachable for a valid prime set, every minterm has a covering prime.
            break;
        };
        let prime = *prime;
        uncovered.retain(|m| !prime.covers(*m));
        selected.insert(prime);
    }

    selected.into_iter().collect()
}

/// Render implicants over `names` as a sum of products.
///
/// Literals follow the variable order, terms are sorted lexicographically. A single
/// literal is not parenthesized. An empty cover is `0` and a cover by the empty term is `1`.
/// Implicants are packed into `u64`, so there can be at most 64 `names`.
pub fn format_sop(implicants: &[Implicant], names: &[String]) -> String {
    let width = names.len();
    let mut terms: Vec<String> = Vec::new();
    for implicant in implicants {
        let literals: Vec<String> = names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let bit = 1u64 << (width - 1 - i);
                if implicant.mask & bit != 0 {
                    None
                } else if implicant.value & bit != 0 {
                    Some(name.clone())
                } else {
                    Some(format!("~{name}"))
                }
            })
            .collect();
        match literals.len() {
            0 => return "1".to_string(),
            1 => terms.push(literals[0].clone()),
            _ => terms.push(format!("({})", literals.join(" & "))),
        }
    }
    if terms.is_empty() {
        return "0".to_string();
    }
    terms.sort();
    terms.dedup();
    terms.join(" | ")
}

/// Minimized sum of products of the function with the given `minterms` over `names`.
pub fn sop_expression(minterms: &[u64], names: &[String]) -> String {
    if minterms.is_empty() {
        return "0".to_string();
    }
    let distinct: BTreeSet<u64> = minterms.iter().copied().collect();
    let full = u32::try_from(names.len())
        .ok()
        .and_then(|width| 1u64.checked_shl(width));
    if full == Some(distinct.len() as u64) {
        return "1".to_string();
    }
    let minterms: Vec<u64> = distinct.into_iter().collect();
    format_sop(&minimize(&minterms, names.len()), names)
}
