use crate::error::SyntaxError;

/// Find the index of the suffix closing the first `prefix` in `tokens`.
///
/// Nested prefix/suffix pairs in between are skipped over. A suffix seen
/// before any prefix is open is reported instead of being matched.
pub fn find_scope_end<T: PartialEq>(
    tokens: &[T],
    prefix: &T,
    suffix: &T,
) -> Result<usize, SyntaxError> {
    let mut depth = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        if token == prefix {
            depth += 1;
        } else if token == suffix {
            depth = depth.checked_sub(1).ok_or(SyntaxError::UnopenedScope)?;
            if depth == 0 {
                return Ok(index);
            }
        }
    }

    Err(SyntaxError::UnclosedScope)
}
