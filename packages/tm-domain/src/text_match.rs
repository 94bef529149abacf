use regex::Regex;
use strsim::normalized_damerau_levenshtein;

/// Whether `term` appears as a whole word inside `text`. The term is
/// regex-escaped, so user input never changes the pattern semantics.
pub fn whole_word(term: &str, text: &str) -> bool {
	let term = term.trim();

	if term.is_empty() {
		return false;
	}

	let pattern = format!(r"\b{}\b", regex::escape(term));

	match Regex::new(&pattern) {
		Ok(re) => re.is_match(text),
		Err(err) => {
			tracing::warn!(error = %err, "Whole-word pattern failed to compile.");

			false
		},
	}
}

/// Best normalized Damerau-Levenshtein similarity of the shorter string
/// against every same-length window of the longer one, in [0, 1].
pub fn partial_ratio(needle: &str, haystack: &str) -> f64 {
	let (short, long) = if needle.chars().count() <= haystack.chars().count() {
		(needle, haystack)
	} else {
		(haystack, needle)
	};

	if short.is_empty() {
		return 0.0;
	}

	let short_len = short.chars().count();
	let long_chars: Vec<char> = long.chars().collect();

	if long_chars.len() <= short_len {
		return normalized_damerau_levenshtein(short, long);
	}

	let mut best = 0.0_f64;

	for start in 0..=(long_chars.len() - short_len) {
		let window: String = long_chars[start..start + short_len].iter().collect();
		let score = normalized_damerau_levenshtein(short, &window);

		if score > best {
			best = score;
		}
		if best >= 1.0 {
			break;
		}
	}

	best
}
