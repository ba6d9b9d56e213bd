//! Canonical text form used wherever two strings are compared.

/// Normalizes free-form text into its canonical comparison form.
///
/// Lowercases, folds the hamza-carrying alef variants (أ / إ / آ) down to
/// the bare alef, trims the ends and squashes internal whitespace runs to a
/// single space. Idempotent: `normalize(normalize(t)) == normalize(t)`.
///
/// Applied to every matchable record field at load time and to the query
/// string at search time. Numeric-looking fields (phone numbers) are never
/// routed through here.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'أ' | 'إ' | 'آ' => 'ا',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
