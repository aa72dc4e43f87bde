use crate::models::SizeVariant;

/// Picks the variant with the largest pixel area.
///
/// Comparison is strict, so on equal areas the variant that appears first
/// wins. Returns `None` only for an empty slice.
pub fn largest_variant(variants: &[SizeVariant]) -> Option<&SizeVariant> {
    let mut variants = variants.iter();
    let first = variants.next()?;
    Some(variants.fold(first, |best, candidate| if candidate.area() > best.area() { candidate } else { best }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn variant(width: u32, height: u32, url: &str) -> SizeVariant {
        SizeVariant { width, height, kind: url.to_string(), url: url.to_string() }
    }

    #[rstest]
    #[case(vec![(10, 10, "a")], "a")]
    #[case(vec![(10, 10, "a"), (20, 20, "b")], "b")]
    #[case(vec![(20, 20, "a"), (10, 10, "b")], "a")]
    #[case(vec![(10, 10, "a"), (40, 40, "b"), (30, 30, "c")], "b")]
    // Equal areas: first one wins.
    #[case(vec![(100, 100, "a"), (200, 50, "b")], "a")]
    #[case(vec![(1, 1, "a"), (200, 50, "b"), (100, 100, "c")], "b")]
    // Degenerate variants still count.
    #[case(vec![(0, 0, "a"), (0, 10, "b")], "a")]
    fn test_largest_variant(#[case] variants: Vec<(u32, u32, &str)>, #[case] expected: &str) {
        let variants: Vec<_> = variants.into_iter().map(|(w, h, u)| variant(w, h, u)).collect();
        assert_eq!(largest_variant(&variants).unwrap().url, expected);
    }

    #[test]
    fn test_empty() {
        assert!(largest_variant(&[]).is_none());
    }
}
