//! Continuation lines of embedded code
//!
//!     Code in `-` and `=` lines may continue on the following lines when it ends with a comma
//!     (argument lists, hash literals). `?,` after a non-word character and `?\,` are character
//!     literals, not continuations, while `x?,` is a predicate call and does continue.

use super::line_source::LineSource;

/// Pull the continuation lines of `first`, in order
pub fn read(lines: &mut LineSource<'_>, first: &str) -> Vec<String> {
    let mut buf = Vec::new();
    let mut current = first.to_string();
    while is_continued(&current) {
        match lines.next_line(false) {
            Some(line) => {
                buf.push(line.clone());
                current = line;
            }
            None => break,
        }
    }
    buf
}

/// Whether `text` ends in a comma that continues onto the next line
pub fn is_continued(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    if n <= 1 || chars[n - 1] != ',' {
        return false;
    }
    if n >= 3 {
        let (a, b) = (chars[n - 3], chars[n - 2]);
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        if (!is_word(a) && b == '?') || (a == '?' && b == '\\') {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_continued() {
        assert!(is_continued("foo(a,"));
        assert!(is_continued("x?,"));
        assert!(!is_continued("foo(a)"));
        assert!(!is_continued(","));
        assert!(!is_continued("[ ?,"));
        assert!(!is_continued("?\\,"));
    }

    #[test]
    fn test_read_pulls_until_no_comma() {
        let mut lines = LineSource::new(None, "  b: 2,\n  c: 3)\n%p");
        let pulled = read(&mut lines, "link_to(a: 1,");
        assert_eq!(pulled, vec!["  b: 2,".to_string(), "  c: 3)".to_string()]);
        assert_eq!(lines.lineno(), 2);
    }

    #[test]
    fn test_read_stops_at_end_of_input() {
        let mut lines = LineSource::new(None, "  b,");
        let pulled = read(&mut lines, "a,");
        assert_eq!(pulled, vec!["  b,".to_string()]);
        assert!(!lines.has_next());
    }
}
