#![forbid(unsafe_code)]

//! Shallow structural equality for sequences and field maps.
//!
//! Both predicates treat `None` as a distinct "absent" value: two absent
//! inputs are equal, an absent input never equals a present one (even an
//! empty one).

use crate::value::Fields;

/// Pairwise equality of two optional sequences of the same length.
#[must_use]
pub fn seq_equal<T: PartialEq>(x: Option<&[T]>, y: Option<&[T]>) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => {
            std::ptr::eq(x, y) || (x.len() == y.len() && x.iter().zip(y).all(|(a, b)| a == b))
        }
        _ => false,
    }
}

/// Same keys, and every slot equal under [`Value`](crate::value::Value)'s
/// shallow equality.
#[must_use]
pub fn map_equal(x: Option<&Fields>, y: Option<&Fields>) -> bool {
    match (x, y) {
        (None, None) => true,
        (Some(x), Some(y)) => {
            std::ptr::eq(x, y)
                || (x.len() == y.len()
                    && x.iter()
                        .zip(y.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb))
        }
        _ => false,
    }
}

/// Copy of `map` without the entries named in `keys`. Missing keys are skipped.
#[must_use]
pub fn map_except(map: &Fields, keys: &[&str]) -> Fields {
    map.iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use proptest::prelude::*;

    fn fields<const N: usize>(entries: [(&str, Value); N]) -> Fields {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn seq_similar_arrays() {
        assert!(seq_equal(Some(&[1][..]), Some(&[1][..])));
    }

    #[test]
    fn seq_same_array() {
        let array = [1];
        assert!(seq_equal(Some(&array[..]), Some(&array[..])));
    }

    #[test]
    fn seq_both_absent_or_empty() {
        assert!(seq_equal::<i32>(None, None));
        assert!(seq_equal::<i32>(Some(&[][..]), Some(&[][..])));
    }

    #[test]
    fn seq_different_content_or_length() {
        assert!(!seq_equal(Some(&[1][..]), Some(&[2][..])));
        assert!(!seq_equal(Some(&[1][..]), Some(&[1, 2][..])));
        assert!(!seq_equal(Some(&[1, 2][..]), Some(&[1][..])));
    }

    #[test]
    fn seq_absent_vs_present() {
        assert!(!seq_equal(None, Some(&[1][..])));
        assert!(!seq_equal(Some(&[1][..]), None));
        assert!(!seq_equal::<i32>(None, Some(&[][..])));
    }

    #[test]
    fn map_similar_and_same() {
        let a = fields([("abc", Value::from(123))]);
        let b = fields([("abc", Value::from(123))]);
        assert!(map_equal(Some(&a), Some(&b)));
        assert!(map_equal(Some(&a), Some(&a)));
        assert!(map_equal(None, None));
    }

    #[test]
    fn map_larger_either_side() {
        let small = fields([("abc", Value::from(123))]);
        let large = fields([("abc", Value::from(123)), ("def", Value::from(456))]);
        assert!(!map_equal(Some(&large), Some(&small)));
        assert!(!map_equal(Some(&small), Some(&large)));
    }

    #[test]
    fn map_different_keys() {
        let a = fields([("abc", Value::from(123))]);
        let b = fields([("def", Value::from(456))]);
        assert!(!map_equal(Some(&a), Some(&b)));
        assert!(!map_equal(None, Some(&a)));
    }

    #[test]
    fn map_shared_slots_need_identity() {
        let a = fields([("children", Value::shared(1))]);
        let b = fields([("children", Value::shared(1))]);
        assert!(!map_equal(Some(&a), Some(&b)));
        let c = a.clone();
        assert!(map_equal(Some(&a), Some(&c)));
    }

    #[test]
    fn except_excludes_keys() {
        let map = fields([
            ("abc", Value::from(123)),
            ("def", Value::from(456)),
            ("xyz", Value::from(789)),
        ]);
        let actual = map_except(&map, &["def"]);
        assert_eq!(actual.len(), 2);
        assert_eq!(actual.get("abc"), Some(&Value::from(123)));
        assert!(!actual.contains_key("def"));
        assert_eq!(actual.get("xyz"), Some(&Value::from(789)));
    }

    #[test]
    fn except_skips_missing_keys() {
        let map = fields([("abc", Value::from(123)), ("def", Value::from(456))]);
        let actual = map_except(&map, &["ghi"]);
        assert!(map_equal(Some(&actual), Some(&map)));
    }

    proptest! {
        #[test]
        fn seq_equal_matches_slice_eq(a in proptest::collection::vec(0u8..4, 0..6), b in proptest::collection::vec(0u8..4, 0..6)) {
            prop_assert_eq!(seq_equal(Some(&a[..]), Some(&b[..])), a == b);
        }

        #[test]
        fn map_equal_is_reflexive_and_symmetric(entries in proptest::collection::btree_map("[a-d]", 0i64..3, 0..4), other in proptest::collection::btree_map("[a-d]", 0i64..3, 0..4)) {
            let x: Fields = entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
            let y: Fields = other.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
            prop_assert!(map_equal(Some(&x), Some(&x.clone())));
            prop_assert_eq!(map_equal(Some(&x), Some(&y)), map_equal(Some(&y), Some(&x)));
        }
    }
}
