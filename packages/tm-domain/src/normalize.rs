use unicode_normalization::UnicodeNormalization;

/// NFKC-normalize, lowercase, and trim. Every `*_norm` payload copy and
/// every query term goes through this fold so text-match filters and
/// keyword scoring compare like with like.
pub fn fold(text: &str) -> String {
	text.nfkc().collect::<String>().to_lowercase().trim().to_string()
}
