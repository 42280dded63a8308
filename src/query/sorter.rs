use std::cmp::Ordering;

/// Sorts `items` in place using a strict less-than predicate.
///
/// The sort is stable: records the predicate considers equivalent keep their
/// relative order.
pub fn sort_by_less<T>(items: &mut [T], less: impl Fn(&T, &T) -> bool) {
    items.sort_by(|a, b| {
        if less(a, b) {
            Ordering::Less
        } else if less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    });
}
