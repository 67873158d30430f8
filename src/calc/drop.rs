use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome<T> {
    pub kept: Vec<T>,
    pub dropped: Vec<T>,
}

/// Moves up to `n` of the lowest-keyed items into `dropped`, always keeping
/// at least one.
pub fn drop_lowest_by<T, K, F>(mut items: Vec<T>, n: usize, key: F) -> DropOutcome<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal));
    let k = n.min(items.len().saturating_sub(1));
    let kept = items.split_off(k);
    DropOutcome {
        kept,
        dropped: items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_the_lowest_keys() {
        let out = drop_lowest_by(vec![5, 1, 4, 2, 3], 2, |v| *v);
        assert_eq!(out.dropped, vec![1, 2]);
        assert_eq!(out.kept, vec![3, 4, 5]);
    }

    #[test]
    fn never_drops_everything() {
        let out = drop_lowest_by(vec![0.3, 0.9], 5, |v| *v);
        assert_eq!(out.kept, vec![0.9]);
        assert_eq!(out.dropped, vec![0.3]);

        let single = drop_lowest_by(vec![0.1], 1, |v| *v);
        assert_eq!(single.kept, vec![0.1]);
        assert!(single.dropped.is_empty());
    }

    #[test]
    fn empty_input_stays_empty() {
        let out = drop_lowest_by(Vec::<f64>::new(), 3, |v| *v);
        assert!(out.kept.is_empty());
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn tuple_keys_break_ties() {
        let items = vec![("b", 0.5), ("a", 0.5), ("c", 0.9)];
        let out = drop_lowest_by(items, 1, |(id, ratio)| (*ratio, *id));
        assert_eq!(out.dropped, vec![("a", 0.5)]);
    }

    #[test]
    fn zero_drop_keeps_all_sorted() {
        let out = drop_lowest_by(vec![3, 1, 2], 0, |v| *v);
        assert_eq!(out.kept, vec![1, 2, 3]);
        assert!(out.dropped.is_empty());
    }
}
