use std::collections::BTreeSet;
use crate::analyzers::aggregate::AuthorBuckets;
use crate::types::Commit;

/// Author buckets after every spelling of the target has been merged under
/// the target's own name.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub target: String,
    pub buckets: AuthorBuckets<'a>,
    /// Raw author strings that were merged into the target bucket.
    pub matched: BTreeSet<String>,
}

impl<'a> Resolution<'a> {
    /// The target's coalesced commits; empty when nothing matched.
    pub fn commits(&self) -> &[&'a Commit] {
        if self.matched.is_empty() {
            return &[];
        }
        self.buckets
            .get(&self.target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Spellings under which `name` may show up in a commit log.
///
/// For "Jane Doe": `Jane Doe`, `JaneDoe`, `jane doe`, `janedoe`, `JDoe`.
/// The initial form is only produced for names with two or more tokens and
/// is not lower-cased, so a bare `jdoe` does not match.
pub fn name_variants(name: &str) -> Vec<String> {
    let name = name.trim();
    let mut variants: Vec<String> = Vec::new();
    if name.is_empty() {
        return variants;
    }

    push_unique(&mut variants, name.to_string());
    push_unique(&mut variants, name.split_whitespace().collect());

    let lowered: Vec<String> = variants.iter().map(|v| v.to_lowercase()).collect();
    for v in lowered {
        push_unique(&mut variants, v);
    }

    let tokens: Vec<&str> = name.split_whitespace().collect();
    if let [first, rest @ ..] = tokens.as_slice() {
        if !rest.is_empty() {
            if let Some(initial) = first.chars().next() {
                push_unique(&mut variants, format!("{initial}{}", rest.concat()));
            }
        }
    }

    variants
}

fn push_unique(variants: &mut Vec<String>, v: String) {
    if !variants.contains(&v) {
        variants.push(v);
    }
}

/// True when any variant is a substring of the raw author string.
pub fn is_match(variants: &[String], raw_author: &str) -> bool {
    variants.iter().any(|v| raw_author.contains(v.as_str()))
}

/// Builds a new bucket mapping in which every raw author matching `target`
/// is merged into a single bucket keyed by `target`. The input is not touched.
pub fn resolve<'a>(target: &str, buckets: &AuthorBuckets<'a>) -> Resolution<'a> {
    let variants = name_variants(target);

    let mut resolved: AuthorBuckets<'a> = AuthorBuckets::new();
    let mut merged: Vec<&'a Commit> = Vec::new();
    let mut matched: BTreeSet<String> = BTreeSet::new();

    for (author, commits) in buckets {
        if is_match(&variants, author) {
            matched.insert(author.clone());
            merged.extend(commits.iter().copied());
        } else {
            resolved.insert(author.clone(), commits.clone());
        }
    }

    if !matched.is_empty() {
        resolved.insert(target.to_string(), merged);
    }

    Resolution {
        target: target.to_string(),
        buckets: resolved,
        matched,
    }
}
