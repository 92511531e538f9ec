/// Reply a server sends when it understood HELLO but has no catalog support.
pub const CAT_NOT_IMPLEMENTED: &str = "CAT command not implemented\r\n";

/// Suffix that closes a catalog listing.
pub const CATALOG_TERMINATOR: &[u8] = b"\nEND";

/// Line terminator of the handshake.
pub const CRLF: &str = "\r\n";

/// The two commands of the catalog exchange.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Request server identification (two CRLF-terminated lines).
    Hello,
    /// Request the station catalog.
    Cat,
}

impl Command {
    /// Parse a command keyword (case-insensitive, terminator optional).
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches('\n').trim_end_matches('\r').trim();
        if line.eq_ignore_ascii_case("HELLO") {
            Some(Self::Hello)
        } else if line.eq_ignore_ascii_case("CAT") {
            Some(Self::Cat)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hello => "HELLO",
            Self::Cat => "CAT",
        }
    }

    /// Wire bytes including the CRLF terminator.
    pub fn to_bytes(&self) -> &'static [u8] {
        match self {
            Self::Hello => b"HELLO\r\n",
            Self::Cat => b"CAT\r\n",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_bytes() {
        assert_eq!(Command::Hello.to_bytes(), b"HELLO\r\n");
        assert_eq!(Command::Cat.to_bytes(), b"CAT\r\n");
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(Command::parse("HELLO"), Some(Command::Hello));
        assert_eq!(Command::parse("hello\r\n"), Some(Command::Hello));
        assert_eq!(Command::parse("Cat\n"), Some(Command::Cat));
        assert_eq!(Command::parse("STATION ANMO IU"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn as_str_roundtrip() {
        for cmd in [Command::Hello, Command::Cat] {
            assert_eq!(Command::parse(cmd.as_str()), Some(cmd));
            assert_eq!(cmd.to_string(), cmd.as_str());
        }
    }

    #[test]
    fn terminator_is_newline_end() {
        assert_eq!(CATALOG_TERMINATOR, b"\nEND");
        assert!(CAT_NOT_IMPLEMENTED.ends_with(CRLF));
    }
}
