//! Determinism utilities: stable ordering for records that end up in reports.
//!
//! Reports are compared byte-for-byte across runs, so anything sorted for
//! display sorts by a **total** order: a human-facing key first, the id second.

use core::cmp::Ordering;

use crate::ids::{NonprofitId, TeamId, UserId};

/// A total, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! stable_by_str {
    ($($t:ty),*) => {$(
        impl StableOrd for $t {
            #[inline]
            fn stable_cmp(&self, other: &Self) -> Ordering {
                self.as_str().cmp(other.as_str())
            }
        }
    )*};
}

stable_by_str!(UserId, TeamId, NonprofitId);

/// Compare `(label, id)` pairs: case-insensitive label, then exact label, then id.
///
/// Team and nonprofit names are typed by people; "acme" and "Acme" should sit
/// together, but the order between them must still be fixed.
pub fn cmp_labelled<I: StableOrd>(a_label: &str, a_id: &I, b_label: &str, b_id: &I) -> Ordering {
    fold_case(a_label)
        .cmp(fold_case(b_label))
        .then_with(|| a_label.cmp(b_label))
        .then_with(|| a_id.stable_cmp(b_id))
}

#[inline]
fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TeamId {
        s.parse().unwrap()
    }

    #[test]
    fn labels_fold_case_then_break_ties() {
        let mut v = vec![
            ("beta", tid("t3")),
            ("Acme", tid("t2")),
            ("acme", tid("t1")),
            ("Acme", tid("t0")),
        ];
        v.sort_by(|a, b| cmp_labelled(a.0, &a.1, b.0, &b.1));
        let got: Vec<(&str, &str)> = v.iter().map(|(l, id)| (*l, id.as_str())).collect();
        assert_eq!(got, vec![("Acme", "t0"), ("Acme", "t2"), ("acme", "t1"), ("beta", "t3")]);
    }
}
