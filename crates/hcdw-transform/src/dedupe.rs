use std::collections::BTreeSet;

/// Keeps the first row for every key, preserving input order.
///
/// Returns the retained rows and the number of duplicates removed.
pub fn dedupe_by_key<T, K, F>(rows: Vec<T>, key: F) -> (Vec<T>, usize)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut seen = BTreeSet::new();
    let mut duplicates = 0usize;
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(key(&row)) {
            kept.push(row);
        } else {
            duplicates += 1;
        }
    }
    (kept, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let rows = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d"), (2, "e")];
        let (kept, duplicates) = dedupe_by_key(rows, |row| row.0);
        assert_eq!(kept, vec![(1, "a"), (2, "b"), (3, "d")]);
        assert_eq!(duplicates, 2);
    }

    #[test]
    fn empty_input() {
        let (kept, duplicates) = dedupe_by_key(Vec::<(i64, &str)>::new(), |row| row.0);
        assert!(kept.is_empty());
        assert_eq!(duplicates, 0);
    }
}
