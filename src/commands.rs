//! Command parsing and validation
//!
//! A raw input line becomes a [`Command`]: the first whitespace-delimited
//! token picks the [`Verb`], the rest are arguments. [`Command::validate`]
//! then checks the per-verb arity and argument formats and yields a typed
//! [`Action`] for the interpreter, or the [`InvalidReason`] it was rejected
//! for.

use std::fmt;

/// Argument of `history` that clears the store
pub const HISTORY_CLEAR_FLAG: &str = "-c";

/// Most background copies a single `repeat` may launch
pub const MAX_REPEAT_COUNT: usize = 1024;

/// The recognized verbs of the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    MoveToDir,
    WhereAmI,
    History,
    ByeBye,
    Replay,
    Start,
    Background,
    Dalek,
    Repeat,
    DalekAll,
    Unknown,
}

impl Verb {
    /// Every dispatchable verb, in help-listing order
    pub const ALL: [Verb; 10] = [
        Verb::MoveToDir,
        Verb::WhereAmI,
        Verb::History,
        Verb::ByeBye,
        Verb::Replay,
        Verb::Start,
        Verb::Background,
        Verb::Dalek,
        Verb::Repeat,
        Verb::DalekAll,
    ];

    /// Keyword typed at the prompt for this verb
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Verb::MoveToDir => "movetodir",
            Verb::WhereAmI => "whereami",
            Verb::History => "history",
            Verb::ByeBye => "byebye",
            Verb::Replay => "replay",
            Verb::Start => "start",
            Verb::Background => "background",
            Verb::Dalek => "dalek",
            Verb::Repeat => "repeat",
            Verb::DalekAll => "dalekall",
            Verb::Unknown => return None,
        };
        Some(keyword)
    }

    /// Look up a verb by its exact keyword
    pub fn from_keyword(token: &str) -> Verb {
        Verb::ALL
            .iter()
            .copied()
            .find(|verb| verb.keyword() == Some(token))
            .unwrap_or(Verb::Unknown)
    }

    /// Number of arguments the verb accepts
    pub fn arity(&self) -> Arity {
        match self {
            Verb::MoveToDir | Verb::Replay | Verb::Dalek => Arity::Exactly(1),
            Verb::WhereAmI | Verb::ByeBye | Verb::DalekAll => Arity::Exactly(0),
            Verb::History => Arity::Between(0, 1),
            Verb::Start | Verb::Background => Arity::AtLeast(1),
            Verb::Repeat => Arity::AtLeast(2),
            Verb::Unknown => Arity::Never,
        }
    }

    /// One-line description used by `help`
    pub fn summary(&self) -> &'static str {
        match self {
            Verb::MoveToDir => "movetodir <dir>        change the shell's current directory",
            Verb::WhereAmI => "whereami               print the shell's current directory",
            Verb::History => "history [-c]           list (or clear) the command history",
            Verb::ByeBye => "byebye                 leave the shell",
            Verb::Replay => "replay <n>             run history entry <n> again",
            Verb::Start => "start <prog> [args]    run a program and wait for it",
            Verb::Background => "background <prog> [args]  run a program without waiting",
            Verb::Dalek => "dalek <pid>            terminate a process",
            Verb::Repeat => "repeat <n> <prog> [args]  start <n> background copies",
            Verb::DalekAll => "dalekall               terminate every background process",
            Verb::Unknown => "",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("<unknown>"))
    }
}

/// Argument-count contract of a verb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
    Never,
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
            Arity::Never => false,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::Between(min, max) => write!(f, "{} to {}", min, max),
            Arity::AtLeast(min) => write!(f, "at least {}", min),
            Arity::Never => write!(f, "no invocation"),
        }
    }
}

/// Why a command was rejected before dispatch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("empty command")]
    Empty,

    #[error("unrecognized command '{0}'")]
    UnknownVerb(String),

    #[error("'{verb}' takes {expected} argument(s), got {got}")]
    WrongArity {
        verb: Verb,
        expected: Arity,
        got: usize,
    },

    #[error("unsupported history option '{0}'")]
    HistoryOption(String),

    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("'{0}' is not a valid process id")]
    InvalidPid(String),

    #[error("repeat count must be at least 1")]
    ZeroRepeat,

    #[error("repeat count {count} exceeds the limit of {max}")]
    RepeatTooLarge { count: usize, max: usize },

    #[error("repeated command is invalid: {0}")]
    RepeatTarget(Box<InvalidReason>),
}

/// A validated command with typed arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveToDir { target: String },
    WhereAmI,
    ListHistory,
    ClearHistory,
    ByeBye,
    Replay { index: usize },
    Start { argv: Vec<String> },
    Background { argv: Vec<String> },
    Dalek { pid: u32 },
    Repeat { count: usize, argv: Vec<String> },
    DalekAll,
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// The input exactly as entered
    pub raw_text: String,
    pub verb: Verb,
    pub arguments: Vec<String>,
    /// Position assigned by the most recent history listing
    pub replay_index: Option<usize>,
}

impl Command {
    /// Split a line into verb and arguments. Never fails; unrecognized
    /// input yields [`Verb::Unknown`].
    pub fn parse(input: &str) -> Self {
        let mut tokens = input.split_whitespace();
        let verb = tokens.next().map(Verb::from_keyword).unwrap_or(Verb::Unknown);
        let arguments = tokens.map(str::to_string).collect();

        Self {
            raw_text: input.to_string(),
            verb,
            arguments,
            replay_index: None,
        }
    }

    /// Check arity and argument formats, producing the typed action
    pub fn validate(&self) -> Result<Action, InvalidReason> {
        let expected = self.verb.arity();
        if self.verb != Verb::Unknown && !expected.accepts(self.arguments.len()) {
            return Err(InvalidReason::WrongArity {
                verb: self.verb,
                expected,
                got: self.arguments.len(),
            });
        }

        let args = &self.arguments;
        let action = match self.verb {
            Verb::Unknown => {
                return match self.raw_text.split_whitespace().next() {
                    Some(token) => Err(InvalidReason::UnknownVerb(token.to_string())),
                    None => Err(InvalidReason::Empty),
                };
            }
            Verb::MoveToDir => Action::MoveToDir {
                target: args[0].clone(),
            },
            Verb::WhereAmI => Action::WhereAmI,
            Verb::History => match args.first() {
                None => Action::ListHistory,
                Some(flag) if flag == HISTORY_CLEAR_FLAG => Action::ClearHistory,
                Some(other) => return Err(InvalidReason::HistoryOption(other.clone())),
            },
            Verb::ByeBye => Action::ByeBye,
            Verb::Replay => Action::Replay {
                index: parse_number(&args[0])?,
            },
            Verb::Start => Action::Start { argv: args.clone() },
            Verb::Background => Action::Background { argv: args.clone() },
            Verb::Dalek => Action::Dalek {
                pid: parse_pid(&args[0])?,
            },
            Verb::Repeat => {
                let count = parse_number(&args[0])?;
                if count == 0 {
                    return Err(InvalidReason::ZeroRepeat);
                }
                if count > MAX_REPEAT_COUNT {
                    return Err(InvalidReason::RepeatTooLarge {
                        count,
                        max: MAX_REPEAT_COUNT,
                    });
                }
                let repeated = Command::repeat_target(&args[1..]);
                match repeated.validate() {
                    Ok(Action::Background { argv }) => Action::Repeat { count, argv },
                    Ok(_) => {
                        let reason = InvalidReason::UnknownVerb(repeated.raw_text.clone());
                        return Err(InvalidReason::RepeatTarget(Box::new(reason)));
                    }
                    Err(reason) => return Err(InvalidReason::RepeatTarget(Box::new(reason))),
                }
            }
            Verb::DalekAll => Action::DalekAll,
        };

        Ok(action)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Whether a successful run of this command goes into history.
    /// `byebye` and `history -c` never do, nor does anything invalid.
    pub fn is_recordable(&self) -> bool {
        match self.verb {
            Verb::ByeBye | Verb::Unknown => false,
            Verb::History if self.first_argument_is(HISTORY_CLEAR_FLAG) => false,
            _ => self.is_valid(),
        }
    }

    pub fn first_argument_is(&self, value: &str) -> bool {
        self.arguments.first().is_some_and(|arg| arg == value)
    }

    /// The synthetic `background ...` command a `repeat` launches. A tail
    /// that already starts with the `background` keyword is taken as-is.
    fn repeat_target(tail: &[String]) -> Command {
        let background = Verb::Background.keyword().unwrap_or("background");
        let joined = tail.join(" ");
        if tail.first().is_some_and(|first| first == background) {
            Command::parse(&joined)
        } else {
            Command::parse(&format!("{} {}", background, joined))
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_text)
    }
}

fn parse_number(token: &str) -> Result<usize, InvalidReason> {
    token
        .parse::<usize>()
        .map_err(|_| InvalidReason::NotANumber(token.to_string()))
}

// Zero and negative values would address process groups, not a process.
fn parse_pid(token: &str) -> Result<u32, InvalidReason> {
    match token.parse::<u32>() {
        Ok(pid) if pid > 0 && i32::try_from(pid).is_ok() => Ok(pid),
        _ => Err(InvalidReason::InvalidPid(token.to_string())),
    }
}
