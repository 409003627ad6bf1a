use crate::types::Node;

const LINE_ENDINGS: [char; 2] = ['\r', '\n'];

/// Drops whitespace-only text children at both ends of `node`, then strips
/// line endings from the text that ends up first and last. Element children
/// are never touched.
pub fn trim_whitespace(node: &mut Node) {
    let Some(children) = node.children_mut() else {
        return;
    };

    let leading = children.iter().take_while(|c| is_whitespace_text(c)).count();
    children.drain(..leading);
    if let Some(Node::Text { text }) = children.first_mut() {
        let strip = text.len() - text.trim_start_matches(LINE_ENDINGS).len();
        text.drain(..strip);
    }

    while children.last().is_some_and(is_whitespace_text) {
        children.pop();
    }
    if let Some(Node::Text { text }) = children.last_mut() {
        let keep = text.trim_end_matches(LINE_ENDINGS).len();
        text.truncate(keep);
    }
}

fn is_whitespace_text(node: &Node) -> bool {
    matches!(node, Node::Text { text } if text.chars().all(is_host_whitespace))
}

/// Script-engine whitespace (`WhiteSpace` plus `LineTerminator`), the set
/// matched by `\s` and `String.prototype.trim`. Differs from
/// `char::is_whitespace`: U+FEFF is included, U+0085 is not.
pub(crate) fn is_host_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    fn element_with(texts: &[&str]) -> Node {
        let host = Host::default();
        let mut p = host.create_element("p").unwrap();
        for t in texts {
            let child = if t.starts_with('<') {
                host.create_element(&t[1..t.len() - 1]).unwrap()
            } else {
                host.create_text(*t)
            };
            host.append_child(&mut p, child).unwrap();
        }
        p
    }

    fn texts(node: &Node) -> Vec<String> {
        node.children()
            .iter()
            .map(|c| match c {
                Node::Text { text } => text.clone(),
                other => other.label(),
            })
            .collect()
    }

    #[test]
    fn removes_whitespace_nodes_at_both_ends() {
        let mut p = element_with(&[" ", "", "\n\t", "Hello", " ", " "]);
        trim_whitespace(&mut p);
        assert_eq!(texts(&p), vec!["Hello"]);
    }

    #[test]
    fn strips_line_endings_but_keeps_spaces() {
        let mut p = element_with(&["\r\n  a", "<b>", "b \n\n"]);
        trim_whitespace(&mut p);
        assert_eq!(texts(&p), vec!["  a", "<b>", "b "]);
    }

    #[test]
    fn inner_whitespace_survives() {
        let mut p = element_with(&["a", " ", "<i>", "\n", "b"]);
        trim_whitespace(&mut p);
        assert_eq!(texts(&p), vec!["a", " ", "<i>", "\n", "b"]);
    }

    #[test]
    fn stops_at_element_children() {
        let mut p = element_with(&["<br>", "\n"]);
        trim_whitespace(&mut p);
        assert_eq!(texts(&p), vec!["<br>"]);
    }

    #[test]
    fn all_whitespace_leaves_no_children() {
        let mut p = element_with(&[" ", "\n"]);
        trim_whitespace(&mut p);
        assert!(p.children().is_empty());
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace_but_next_line_does_not() {
        let mut p = element_with(&["\u{feff}", "\u{a0}\u{3000}", "x", "\u{85}"]);
        trim_whitespace(&mut p);
        assert_eq!(texts(&p), vec!["x", "\u{85}"]);
    }

    #[test]
    fn trimming_is_idempotent() {
        for input in [
            &["\n\nx\n"][..],
            &[" ", "\ny", "<b>", "z\r\n", "\t"],
            &["\r", "<i>"],
        ] {
            let mut once = element_with(input);
            trim_whitespace(&mut once);
            let mut twice = once.clone();
            trim_whitespace(&mut twice);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn leaves_character_data_alone() {
        let mut comment = Node::Comment {
            text: "\n".to_string(),
        };
        trim_whitespace(&mut comment);
        assert_eq!(comment.text(), Some("\n"));
    }
}
