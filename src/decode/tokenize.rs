/// Split a morphological code into its POS abbreviation and the concatenated trait letters.
///
/// Variant brackets and whitespace are dropped, and every `-` separated segment after the first is
/// joined: `{V-2AAP-NSM}` gives `("V", "2AAPNSM")`.
pub fn split_code(code: &str) -> (String, String) {
    let cleaned: String = code
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '[' | ']') && !c.is_whitespace())
        .collect();
    let mut segments = cleaned.split('-');
    let pos = segments.next().unwrap_or_default().to_string();
    let info = segments.collect::<String>();
    (pos, info)
}

/// Greedy tokenizer for trait letters.
///
/// At each position the first entry of `long_codes` that is a prefix of the remainder is taken as
/// one token, otherwise a single character is. `long_codes` must already be ordered longest first
/// (see [crate::traits::SchemaEntry::long_codes]).
pub fn tokenize_info<'i>(info: &'i str, long_codes: &[String]) -> Vec<&'i str> {
    let mut tokens = Vec::with_capacity(info.len());
    let mut rest = info;
    while let Some(first) = rest.chars().next() {
        let width = long_codes
            .iter()
            .find(|long| rest.starts_with(long.as_str()))
            .map(|long| long.len())
            .unwrap_or_else(|| first.len_utf8());
        let (token, tail) = rest.split_at(width);
        tokens.push(token);
        rest = tail;
    }
    tokens
}
