//! Word counting used for credit deduction.

/// Number of whitespace-delimited tokens in `text`. Blank text counts
/// as zero words.
pub fn count_words(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_tokens_across_mixed_whitespace() {
        assert_eq!(count_words("hello world"), 2);
        assert_eq!(count_words("  when\tdoes\n term   start? "), 4);
    }

    #[test]
    fn blank_text_is_free() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
    }
}
