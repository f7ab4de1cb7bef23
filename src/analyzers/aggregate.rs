use std::collections::BTreeMap;
use crate::types::Commit;

/// Author → commits authored under that string.
pub type AuthorBuckets<'a> = BTreeMap<String, Vec<&'a Commit>>;

/// Groups commits by their raw author string.
pub fn bucket<'a, I>(commits: I) -> AuthorBuckets<'a>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut buckets: AuthorBuckets<'a> = BTreeMap::new();
    for commit in commits {
        buckets.entry(commit.author.clone()).or_default().push(commit);
    }
    buckets
}

/// Reduces buckets to per-author commit counts.
pub fn counts(buckets: &AuthorBuckets<'_>) -> BTreeMap<String, usize> {
    buckets
        .iter()
        .map(|(author, commits)| (author.clone(), commits.len()))
        .collect()
}
