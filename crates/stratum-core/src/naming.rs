//! Unique layer naming.

/// Derive a name from `declared` that `is_taken` rejects for none.
///
/// Collisions get a numeric suffix counted from 1: `ct`, `ct-1`, `ct-2`.
/// The suffix is always appended to the declared name, never stacked.
pub fn unique_name(declared: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    let mut name = declared.to_owned();
    let mut suffix = 0_u32;
    while is_taken(&name) {
        suffix += 1;
        name = format!("{declared}-{suffix}");
    }
    name
}
