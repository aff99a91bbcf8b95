use crate::catalog::types::CatalogKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Section(CatalogKind),
    Refresh,
    More,
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
        "section" | "s" if !args.is_empty() => CatalogKind::parse(args).map(Command::Section),
        "refresh" | "r" => Some(Command::Refresh),
        "more" => Some(Command::More),
        "help" | "h" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        other => CatalogKind::parse(other).map(Command::Section),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_section() {
        assert_eq!(
            parse_command(":section music"),
            Some(Command::Section(CatalogKind::Music))
        );
        assert_eq!(
            parse_command("s History"),
            Some(Command::Section(CatalogKind::History))
        );
        assert_eq!(parse_command(":section"), None);
        assert_eq!(parse_command(":section shorts"), None);
    }

    #[test]
    fn test_parse_command_bare_section_name() {
        assert_eq!(parse_command(":home"), Some(Command::Section(CatalogKind::Home)));
        assert_eq!(
            parse_command(":playlists"),
            Some(Command::Section(CatalogKind::Playlists))
        );
    }

    #[test]
    fn test_parse_command_aliases() {
        assert_eq!(parse_command(":q"), Some(Command::Quit));
        assert_eq!(parse_command(":h"), Some(Command::Help));
        assert_eq!(parse_command(":r"), Some(Command::Refresh));
        assert_eq!(parse_command(":more"), Some(Command::More));
    }

    #[test]
    fn test_parse_command_empty() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command(":"), None);
        assert_eq!(parse_command(":bogus"), None);
    }
}
