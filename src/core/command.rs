//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation
    Vault,
    Primitive(usize),
    Qbank,

    Refresh,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(str::trim);

    match cmd.to_lowercase().as_str() {
        "vault" | "v" => Command::Vault,
        "primitive" | "prim" | "p" => match args.and_then(|s| s.parse().ok()) {
            Some(index) => Command::Primitive(index),
            None => Command::Unknown(input.to_string()),
        },
        "qbank" | "store" => Command::Qbank,
        "refresh" | "r" => Command::Refresh,
        "quit" | "q" | "exit" => Command::Quit,
        other => match other.strip_prefix("primitive_").and_then(|n| n.parse().ok()) {
            Some(index) => Command::Primitive(index),
            None => Command::Unknown(input.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_commands() {
        assert_eq!(parse_command("vault"), Command::Vault);
        assert_eq!(parse_command(" VAULT "), Command::Vault);
        assert_eq!(parse_command("primitive 2"), Command::Primitive(2));
        assert_eq!(parse_command("p 0"), Command::Primitive(0));
        assert_eq!(parse_command("primitive_1"), Command::Primitive(1));
        assert_eq!(parse_command("qbank"), Command::Qbank);
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(parse_command("refresh"), Command::Refresh);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_command("primitive"),
            Command::Unknown("primitive".to_string())
        );
        assert_eq!(
            parse_command("primitive x"),
            Command::Unknown("primitive x".to_string())
        );
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
