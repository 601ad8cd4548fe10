use core::str::FromStr;

use thiserror::Error;

use wms_core::{DomainError, LocationId};

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    Location(LocationId),
    ClearLocation,
    Count(u32),
    Reason(String),
    Submit,
    Show,
    Locations,
    Reload,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("physical count must be a whole number >= 0, got '{0}'")]
    InvalidCount(String),

    #[error("{0}")]
    InvalidLocation(DomainError),
}

pub const HELP: &str = "\
commands:
  <code> | scan <code>   look up a product by code
  loc <id> | loc clear   select or clear the location
  locations              list locations
  count <n>              enter the physical count
  reason <text>          reason recorded with the adjustment
  submit                 record the adjustment for the current variance
  show                   print the current state
  reload                 reload locations and stock statuses
  reset                  abandon the current count
  quit                   exit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line, ""),
        };

        let require = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        match keyword.to_lowercase().as_str() {
            "scan" => Ok(Command::Scan(require("scan")?.to_string())),
            "loc" | "location" => match require("loc")? {
                "clear" | "-" => Ok(Command::ClearLocation),
                id => id
                    .parse::<LocationId>()
                    .map(Command::Location)
                    .map_err(CommandError::InvalidLocation),
            },
            "count" => {
                let raw = require("count")?;
                raw.parse::<u32>()
                    .map(Command::Count)
                    .map_err(|_| CommandError::InvalidCount(raw.to_string()))
            }
            "reason" => Ok(Command::Reason(rest.to_string())),
            "submit" => Ok(Command::Submit),
            "show" => Ok(Command::Show),
            "locations" => Ok(Command::Locations),
            "reload" => Ok(Command::Reload),
            "reset" => Ok(Command::Reset),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Ok(Command::Scan(line.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_line_is_a_scan() {
        assert_eq!("SKU123".parse::<Command>(), Ok(Command::Scan("SKU123".to_string())));
        assert_eq!(
            "scan show".parse::<Command>(),
            Ok(Command::Scan("show".to_string()))
        );
    }

    #[test]
    fn parses_keyword_commands() {
        assert_eq!("loc 4".parse::<Command>(), Ok(Command::Location(LocationId::from_raw(4))));
        assert_eq!("LOC clear".parse::<Command>(), Ok(Command::ClearLocation));
        assert_eq!("count 45".parse::<Command>(), Ok(Command::Count(45)));
        assert_eq!(
            "reason  box was   crushed ".parse::<Command>(),
            Ok(Command::Reason("box was   crushed".to_string()))
        );
        assert_eq!("reason".parse::<Command>(), Ok(Command::Reason(String::new())));
        assert_eq!("submit".parse::<Command>(), Ok(Command::Submit));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("count".parse::<Command>(), Err(CommandError::MissingArgument("count")));
        assert_eq!(
            "count -3".parse::<Command>(),
            Err(CommandError::InvalidCount("-3".to_string()))
        );
        assert!(matches!(
            "loc A1".parse::<Command>(),
            Err(CommandError::InvalidLocation(_))
        ));
    }
}
