//! Console commands

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn { email: String, password: String },
    SignOut,
    Profile,
    Help,
    Quit,
}

pub const USAGE: &str = "commands: signin <email> <password> | signout | profile | help | quit";

impl Command {
    /// Parse one input line; `None` for blank lines
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let mut words = line.split_whitespace();
        let name = words.next()?;

        let command = match name {
            "signin" => match (words.next(), words.next(), words.next()) {
                (Some(email), Some(password), None) => Ok(Command::SignIn {
                    email: email.to_string(),
                    password: password.to_string(),
                }),
                _ => Err("usage: signin <email> <password>".to_string()),
            },
            "signout" => Ok(Command::SignOut),
            "profile" => Ok(Command::Profile),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other}")),
        };

        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Command::parse("   "), None);
        assert_eq!(
            Command::parse("signin a@b.com hunter2"),
            Some(Ok(Command::SignIn {
                email: "a@b.com".to_string(),
                password: "hunter2".to_string(),
            }))
        );
        assert_eq!(Command::parse(" profile "), Some(Ok(Command::Profile)));
        assert_eq!(Command::parse("signout"), Some(Ok(Command::SignOut)));
        assert_eq!(Command::parse("quit"), Some(Ok(Command::Quit)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("signin a@b.com"), Some(Err(_))));
        assert!(matches!(Command::parse("signin a b c"), Some(Err(_))));
        assert_eq!(
            Command::parse("dance"),
            Some(Err("unknown command: dance".to_string()))
        );
    }
}
