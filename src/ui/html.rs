//! Flatten status HTML into terminal text.
//!
//! Mastodon-compatible servers only emit a small tag set (`p`, `br`, `a`,
//! `span`), so paragraphs and line breaks are kept and every other tag is
//! dropped.

pub fn to_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&decode_entities(&rest[..start]));
        let Some(end) = rest[start..].find('>') else {
            // Unterminated tag: keep it as text.
            out.push_str(&decode_entities(&rest[start..]));
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");
        match name {
            "br" => out.push('\n'),
            "p" if tag.starts_with('/') => out.push_str("\n\n"),
            _ => {}
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(&decode_entities(rest));

    out.trim_end().to_string()
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        match after.find(';').filter(|&semi| semi <= 10) {
            Some(semi) => {
                match decode_entity(&after[1..semi]) {
                    Some(c) => out.push(c),
                    None => out.push_str(&after[..=semi]),
                }
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_paragraphs_and_breaks() {
        assert_eq!(
            to_plain_text("<p>one<br>two</p><p>three</p>"),
            "one\ntwo\n\nthree"
        );
    }

    #[test]
    fn strips_mention_markup() {
        let html = r#"<p><span class="h-card"><a href="https://kronk.info/@bob" class="u-url mention">@<span>bob</span></a></span> hi</p>"#;
        assert_eq!(to_plain_text(html), "@bob hi");
    }

    #[test]
    fn decodes_entities() {
        assert_eq!(
            to_plain_text("<p>a &amp; b &lt;3 &#39;q&#x27; &bogus; & done</p>"),
            "a & b <3 'q' &bogus; & done"
        );
    }

    #[test]
    fn unterminated_tag_is_text() {
        assert_eq!(to_plain_text("1 <2"), "1 <2");
    }
}
