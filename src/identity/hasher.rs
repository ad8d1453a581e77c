/// 32-bit rolling hash (`hash * 31 + code`) over the UTF-16 code units of
/// `selector`, rendered in base 36 with a leading `-` for negative values.
///
/// Deterministic for a given string. Not collision-free: the output space is
/// 32 bits wide.
pub fn hash_selector(selector: &str) -> String {
    let mut hash: i32 = 0;
    for unit in selector.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }
    to_base36(i64::from(hash))
}

/// Identity token of an element, derived from its canonical selector.
pub fn element_identity(canonical_selector: &str) -> String {
    hash_selector(canonical_selector)
}

fn to_base36(value: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let negative = value < 0;
    let mut n = value.unsigned_abs();
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    if negative {
        digits.push(b'-');
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_values() {
        assert_eq!(hash_selector(""), "0");
        assert_eq!(hash_selector("a"), "2p");
        assert_eq!(hash_selector("html"), "1wvcb");
        assert_eq!(hash_selector("html > body"), "bvx3dl");
    }

    #[test]
    fn wraps_to_negative_tokens() {
        assert_eq!(hash_selector("html > body > div#x"), "-5sm6ub");
        assert_eq!(hash_selector("html > body > ul > li:nth-of-type(2)"), "-2qtsp7");
    }

    #[test]
    fn base36_handles_extremes() {
        assert_eq!(to_base36(i64::from(i32::MIN)), "-zik0zk");
        assert_eq!(to_base36(i64::from(i32::MAX)), "zik0zj");
    }
}
