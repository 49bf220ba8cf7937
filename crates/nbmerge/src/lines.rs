//! Line splitting for presentation-layer diffs.
//!
//! Splits source text into lines that keep their terminators, so joining
//! the pieces reproduces the original text byte-for-byte. Presentation
//! code feeds the result to [`align`](crate::diff::align) and
//! [`chunk`](crate::diff::chunk); merge semantics never look inside source
//! strings.

/// Split `text` on `\n`, keeping the newline on each line.
pub fn split(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        if b == b'\n' {
            out.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitting_keeps_terminators() {
        assert_eq!(split("a\nb\n"), vec!["a\n", "b\n"]);
        assert_eq!(split("a\nb"), vec!["a\n", "b"]);
        assert_eq!(split(""), Vec::<&str>::new());
        assert_eq!(split("\n"), vec!["\n"]);
    }

    #[test]
    fn join_reproduces_input() {
        let text = "x = 1\n\ny = f(x)\nprint(y)";
        assert_eq!(split(text).concat(), text);
    }
}
