/// Characters stripped before building carrier-safe identifiers. Carrier
/// endpoints tend to reject punctuation in reference and file names.
const STRIP_CHARS: &str = "'\"()/*+?¿!&$[]{}`^:;<>=~%,|\\ºª";

/// Lowercase slug suitable for a derived file name: strips punctuation,
/// folds whitespace runs to a single dash, drops non-ASCII.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;
    for c in text.chars() {
        if STRIP_CHARS.contains(c) || !c.is_ascii() {
            continue;
        }
        if c.is_whitespace() || c == '-' || c == '_' || c == '.' {
            if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        } else {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

pub fn unspaces(text: &str) -> String {
    text.replace(' ', "")
}

/// Flattens a multi-line comment into the single line carrier APIs accept
/// for shipment notes.
pub fn comment_to_notes(comment: &str) -> String {
    comment.replace('\r', "").replace('\n', ". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Seur 24H (Standard)"), "seur-24h-standard");
        assert_eq!(slugify("GLS - Label Report"), "gls-label-report");
        assert_eq!(slugify("  trailing  "), "trailing");
        assert_eq!(slugify("maña/na"), "maana");
    }

    #[test]
    fn test_unspaces() {
        assert_eq!(unspaces("08 024"), "08024");
        assert_eq!(unspaces(""), "");
    }

    #[test]
    fn test_comment_to_notes() {
        assert_eq!(
            comment_to_notes("ring twice\r\nleave at door"),
            "ring twice. leave at door"
        );
    }
}
