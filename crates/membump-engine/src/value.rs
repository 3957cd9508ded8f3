//! Pure rewrite rules for memory-setting values.
//!
//! Each rule takes a raw property value and a delta in megabytes and computes
//! the replacement string, or `None` when the value matches no known format.
//! Matching is done against literal templates (prefix/suffix/digit checks),
//! not regular expressions; the format space is small and enumerable.

/// JVM heap flag prefix recognized in memory values.
const XMX_PREFIX: &str = "-Xmx";
/// Marker opening an unresolved template reference.
const PLACEHOLDER_PREFIX: &str = "${";
/// Headroom reserved below a reduce container size when a placeholder is
/// replaced by a concrete heap flag.
pub const REDUCE_HEAP_HEADROOM_MB: i64 = 512;

/// Rewrite a YARN application-master value.
///
/// Recognizes `-Xmx<digits>M` (uppercase suffix only, nothing after it) and
/// plain digit strings. Anything else yields `None` and the caller keeps the
/// original value.
pub fn bump_yarn_value(value: &str, delta_mb: i64) -> Option<String> {
    if let Some(heap) = value
        .strip_prefix(XMX_PREFIX)
        .and_then(|rest| rest.strip_suffix('M'))
    {
        let bumped = parse_megabytes(heap)? + delta_mb;
        return Some(format!("{XMX_PREFIX}{bumped}M"));
    }
    let bumped = parse_megabytes(value)? + delta_mb;
    Some(bumped.to_string())
}

/// Rewrite a general MapReduce memory or java-opt value.
///
/// An unresolved `${...}` placeholder has no numeric baseline, so the delta
/// itself becomes the value: as a bare megabyte count, or, for the reduce
/// container size, as a heap flag with [`REDUCE_HEAP_HEADROOM_MB`] subtracted.
/// Otherwise digit strings and `-Xmx<digits><m|M>` prefixes are bumped, the
/// latter preserving the case of its suffix letter. `None` when no rule
/// matches.
pub fn bump_general_value(value: &str, delta_mb: i64, reduce_memory: bool) -> Option<String> {
    if value.starts_with(PLACEHOLDER_PREFIX) {
        if reduce_memory {
            let heap = delta_mb - REDUCE_HEAP_HEADROOM_MB;
            return Some(format!("{XMX_PREFIX}{heap}M"));
        }
        return Some(delta_mb.to_string());
    }
    if let Some(current) = parse_megabytes(value) {
        return Some((current + delta_mb).to_string());
    }
    let rest = value.strip_prefix(XMX_PREFIX)?;
    let digits = rest.bytes().take_while(|byte| byte.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let suffix = match rest[digits..].chars().next() {
        Some(letter @ ('m' | 'M')) => letter,
        _ => return None,
    };
    let bumped: i64 = rest[..digits].parse::<i64>().ok()? + delta_mb;
    Some(format!("{XMX_PREFIX}{bumped}{suffix}"))
}

/// Parse a string composed entirely of ASCII digits.
fn parse_megabytes(text: &str) -> Option<i64> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yarn_bumps_heap_flag() {
        assert_eq!(
            bump_yarn_value("-Xmx4096M", 1024),
            Some("-Xmx5120M".to_string())
        );
    }

    #[test]
    fn yarn_bumps_plain_megabytes() {
        assert_eq!(bump_yarn_value("4096", 1024), Some("5120".to_string()));
    }

    #[test]
    fn yarn_rejects_lowercase_heap_suffix() {
        assert_eq!(bump_yarn_value("-Xmx4096m", 1024), None);
    }

    #[test]
    fn yarn_requires_exact_heap_shape() {
        assert_eq!(bump_yarn_value("", 1024), None);
        assert_eq!(bump_yarn_value("-XmxM", 1024), None);
        assert_eq!(bump_yarn_value("-Xmx4,096M", 1024), None);
        assert_eq!(bump_yarn_value("-Xmx1024M -server", 1024), None);
        assert_eq!(bump_yarn_value("use the queue default", 1024), None);
    }

    #[test]
    fn yarn_zero_delta_reemits_value() {
        assert_eq!(bump_yarn_value("4096", 0), Some("4096".to_string()));
    }

    #[test]
    fn general_placeholder_becomes_delta() {
        assert_eq!(
            bump_general_value("${mapreduce.map.memory.mb}", 1024, false),
            Some("1024".to_string())
        );
    }

    #[test]
    fn general_reduce_placeholder_becomes_heap_flag() {
        assert_eq!(
            bump_general_value("${mapreduce.reduce.memory.mb}", 1024, true),
            Some("-Xmx512M".to_string())
        );
    }

    #[test]
    fn general_bumps_plain_megabytes() {
        assert_eq!(
            bump_general_value("1024", 1024, false),
            Some("2048".to_string())
        );
    }

    #[test]
    fn general_preserves_heap_suffix_case() {
        assert_eq!(
            bump_general_value("-Xmx2048m", 1024, false),
            Some("-Xmx3072m".to_string())
        );
        assert_eq!(
            bump_general_value("-Xmx2048M", 1024, false),
            Some("-Xmx3072M".to_string())
        );
    }

    #[test]
    fn general_heap_match_drops_trailing_flags() {
        // Prefix match: content after the size flag is not carried over.
        assert_eq!(
            bump_general_value("-Xmx1024M -XX:+UseG1GC", 1024, false),
            Some("-Xmx2048M".to_string())
        );
    }

    #[test]
    fn general_rejects_unknown_formats() {
        assert_eq!(bump_general_value("-Xms512M", 1024, false), None);
        assert_eq!(bump_general_value("-XmxM", 1024, false), None);
        assert_eq!(bump_general_value("two gigabytes", 1024, false), None);
        assert_eq!(bump_general_value("", 1024, false), None);
    }

    #[test]
    fn repeated_bumps_keep_growing() {
        let once = bump_yarn_value("1024", 512).expect("first bump");
        let twice = bump_yarn_value(&once, 512).expect("second bump");
        assert_eq!(once, "1536");
        assert_eq!(twice, "2048");

        let once = bump_general_value("-Xmx1024m", 512, false).expect("first bump");
        let twice = bump_general_value(&once, 512, false).expect("second bump");
        assert_eq!(once, "-Xmx1536m");
        assert_eq!(twice, "-Xmx2048m");
    }
}
