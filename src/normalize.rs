//! Query normalization.
//!
//! Rewrites informal nicknames and program-name aliases in a raw question
//! into their canonical forms so the index, which is built on canonical
//! terms, can match informally phrased queries.

/// Nickname aliases for the FCAJ admin team. Keys must be lowercase.
const NAME_MAP: &[(&str, &str)] = &[
    ("anh hưng", "Nguyễn Gia Hưng"),
    ("sư phụ hưng", "Nguyễn Gia Hưng"),
    ("anh thiện", "Lữ Hoàn Thiện"),
    ("anh vĩ", "Trần Đại Vĩ"),
    ("anh long", "Huỳnh Hoàng Long"),
    ("anh quy", "Phạm Hoàng Quy"),
    ("anh việt", "Bùi Hoàng Việt"),
    ("chị thư", "Đặng Thị Minh Thư"),
    ("anh huy", "Lý Kiên Huy"),
    ("anh đạt", "Nguyễn Đỗ Thành Đạt"),
];

/// Program-name aliases. Keys must be lowercase.
const ENTITY_MAP: &[(&str, &str)] = &[
    ("fcaj", "FCAJ"),
    ("fcj", "FCAJ"),
    ("first cloud journey", "FCAJ"),
    ("first cloud ai journey", "FCAJ"),
];

/// Rewrite known aliases in a raw question to their canonical forms.
///
/// Matching is case-insensitive, one pass per alias, using plain substring
/// substitution. Replacement is not word-boundary-aware; a match inside a
/// longer token is also replaced. Text outside matched spans is left
/// untouched. Cannot fail; returns the (possibly unmodified) string.
pub fn normalize_query(question: &str) -> String {
    let mut q = question.to_string();

    for (alias, canonical) in NAME_MAP.iter().chain(ENTITY_MAP.iter()) {
        q = replace_all_ci(&q, alias, canonical);
    }

    q
}

/// Replace every case-insensitive occurrence of `needle_lower` (already
/// lowercase) in `haystack` with `replacement`.
fn replace_all_ci(haystack: &str, needle_lower: &str, replacement: &str) -> String {
    if needle_lower.is_empty() {
        return haystack.to_string();
    }

    let (lowered, offsets) = lowercase_with_offsets(haystack);

    let mut result = String::with_capacity(haystack.len());
    let mut last_orig = 0;
    let mut pos = 0;

    while let Some(found) = lowered[pos..].find(needle_lower) {
        let start = pos + found;
        let end = start + needle_lower.len();
        let orig_start = offsets[start];
        let orig_end = offsets[end];

        result.push_str(&haystack[last_orig..orig_start]);
        result.push_str(replacement);
        last_orig = orig_end;
        pos = end;
    }

    result.push_str(&haystack[last_orig..]);
    result
}

/// Lowercase a string, keeping a byte-offset map back into the original.
///
/// `offsets[i]` is the original byte offset of the character that produced
/// byte `i` of the lowered string; a final sentinel maps one-past-the-end.
fn lowercase_with_offsets(s: &str) -> (String, Vec<usize>) {
    let mut lowered = String::with_capacity(s.len());
    let mut offsets = Vec::with_capacity(s.len() + 1);

    for (idx, ch) in s.char_indices() {
        for lc in ch.to_lowercase() {
            let before = lowered.len();
            lowered.push(lc);
            offsets.extend(std::iter::repeat(idx).take(lowered.len() - before));
        }
    }
    offsets.push(s.len());

    (lowered, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_alias_rewritten() {
        assert_eq!(normalize_query("fcaj là gì?"), "FCAJ là gì?");
        assert_eq!(normalize_query("FCAJ là gì?"), "FCAJ là gì?");
        assert_eq!(normalize_query("fcj là gì?"), "FCAJ là gì?");
        assert_eq!(
            normalize_query("First Cloud AI Journey hoạt động ra sao"),
            "FCAJ hoạt động ra sao"
        );
    }

    #[test]
    fn test_name_alias_rewritten() {
        assert_eq!(normalize_query("anh thiện là ai?"), "Lữ Hoàn Thiện là ai?");
        assert_eq!(normalize_query("Anh Thiện là ai?"), "Lữ Hoàn Thiện là ai?");
        assert_eq!(
            normalize_query("sư phụ hưng dạy môn gì"),
            "Nguyễn Gia Hưng dạy môn gì"
        );
    }

    #[test]
    fn test_no_residual_alias() {
        for (alias, canonical) in NAME_MAP.iter().chain(ENTITY_MAP.iter()) {
            let normalized = normalize_query(&format!("cho hỏi {} nhé", alias));
            assert!(
                normalized.contains(canonical),
                "canonical form missing for alias {:?}",
                alias
            );
            let remainder = normalized.replace(canonical, "");
            assert!(
                !remainder.to_lowercase().contains(alias),
                "residual alias {:?} in {:?}",
                alias,
                normalized
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let queries = [
            "fcaj là gì?",
            "anh thiện và anh vĩ là ai",
            "Cách tính điểm như thế nào",
            "First Cloud Journey có mấy đội admin?",
        ];
        for q in queries {
            let once = normalize_query(q);
            assert_eq!(normalize_query(&once), once, "not idempotent for {:?}", q);
        }
    }

    #[test]
    fn test_unrelated_text_untouched() {
        assert_eq!(
            normalize_query("Cách tính điểm như thế nào"),
            "Cách tính điểm như thế nào"
        );
    }

    #[test]
    fn test_substring_match_inside_longer_token() {
        // Replacement is deliberately not word-boundary-aware.
        assert_eq!(replace_all_ci("xfcajx", "fcaj", "FCAJ"), "xFCAJx");
    }
}
