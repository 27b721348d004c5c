//! Platform version ordering.

use semver::Version;
use std::cmp::Ordering;

/// Compare two platform version strings.
///
/// Full semantic versions compare by semver precedence. Anything else
/// compares component-wise on `.`-separated parts, numerically where both
/// parts are numbers, so `4.10` sorts after `4.9`.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if let (Ok(ver_a), Ok(ver_b)) = (Version::parse(a), Version::parse(b)) {
        return ver_a.cmp(&ver_b);
    }

    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(nx), Ok(ny)) => nx.cmp(&ny),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
