use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(String),
    Home,
    Help,
    Quit,
}

pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.strip_prefix(':').unwrap_or(input).trim();

    if input.is_empty() {
        return None;
    }

    let (cmd, args) = match input.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (input, ""),
    };

    match cmd {
        "open" | "o" if !args.is_empty() => Some(Command::Open(args.to_owned())),
        "home" => Some(Command::Home),
        "help" | "h" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        _ => None,
    }
}

fn is_status_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Extract a status ID from a raw ID or a status URL.
///
/// Accepted URL paths: `/@user/<id>`, `/statuses/<id>`,
/// `/@user/statuses/<id>` and `/web/statuses/<id>`.
pub fn parse_status_ref(input: &str) -> Option<String> {
    let trimmed = input.trim();

    if is_status_id(trimmed) {
        return Some(trimmed.to_owned());
    }

    let url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let [.., parent, id] = segments.as_slice() else {
        return None;
    };

    if (*parent == "statuses" || parent.starts_with('@')) && is_status_id(id) {
        Some((*id).to_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_open() {
        assert_eq!(
            parse_command(":open 109"),
            Some(Command::Open("109".into()))
        );
        assert_eq!(
            parse_command("o https://kronk.info/@bob/1"),
            Some(Command::Open("https://kronk.info/@bob/1".into()))
        );
        assert_eq!(parse_command(":open"), None);
    }

    #[test]
    fn test_parse_command_aliases() {
        assert_eq!(parse_command(":q"), Some(Command::Quit));
        assert_eq!(parse_command(":h"), Some(Command::Help));
        assert_eq!(parse_command(":home"), Some(Command::Home));
    }

    #[test]
    fn test_parse_command_empty() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command(":"), None);
        assert_eq!(parse_command(":frobnicate"), None);
    }

    #[test]
    fn test_parse_status_ref_raw_id() {
        assert_eq!(parse_status_ref(" 11223344 "), Some("11223344".into()));
    }

    #[test]
    fn test_parse_status_ref_urls() {
        assert_eq!(
            parse_status_ref("https://kronk.info/@alice/110"),
            Some("110".into())
        );
        assert_eq!(
            parse_status_ref("https://kronk.info/statuses/111"),
            Some("111".into())
        );
        assert_eq!(
            parse_status_ref("https://mastodon.social/@bob@kronk.info/statuses/112/"),
            Some("112".into())
        );
        assert_eq!(
            parse_status_ref("https://kronk.info/web/statuses/113"),
            Some("113".into())
        );
    }

    #[test]
    fn test_parse_status_ref_invalid() {
        assert_eq!(parse_status_ref("https://kronk.info/about"), None);
        assert_eq!(parse_status_ref("https://kronk.info/@alice"), None);
        assert_eq!(parse_status_ref("ftp://kronk.info/statuses/1"), None);
        assert_eq!(parse_status_ref("not a url at all"), None);
    }
}
