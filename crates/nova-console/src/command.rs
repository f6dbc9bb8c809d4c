//! Console command grammar.

use nova_core::models::feedback::Rating;
use nova_core::models::profile::UserType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{command}`: {value:?} is not one of {expected}")]
    InvalidArgument {
        command: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Logout,
    Start,
    Type(UserType),
    Name(String),
    Back,
    View,
    ToggleInteraction,
    Chat {
        user: String,
        reply: String,
        sources: Vec<String>,
    },
    Voice { input: String, output: String },
    Feedback(Rating),
    Plans,
    Buy(String),
    Credits,
    Admin,
    Proceed,
    Cancel,
    Key(String),
    Pin(String),
    Recover,
    Answer(String),
    Close,
    Dashboard,
    Leave,
    Users,
    Chats,
    Feedbacks,
    Audit,
    ToggleAppMode,
    Rotate { new_key: String, confirm_key: String },
    Mfa,
    RecoveryAnswer(Option<String>),
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
session:   login <email> | logout | view | credits | help | quit
onboard:   start | type <parent|student> | name <display name> | back
chat:      mode | chat <you>|<reply>[|<uri> ...] | voice <heard>|<spoken> | feedback <good|bad>
plans:     plans | buy <free|daily|weekly|monthly>
admin:     admin | proceed | cancel | key <admin key> | pin <pin> | recover | answer <text> | close
dashboard: dashboard | leave | users | chats | feedbacks | audit | toggle-mode
           rotate <new key> <confirm key> | mfa | recovery-answer [text]";

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "login" => Command::Login(required("login", rest, "an email address")?),
        "logout" => Command::Logout,
        "start" => Command::Start,
        "type" => Command::Type(user_type(rest)?),
        "name" => Command::Name(required("name", rest, "a display name")?),
        "back" => Command::Back,
        "view" => Command::View,
        "mode" => Command::ToggleInteraction,
        "chat" => {
            let (user, rest) = pair("chat", rest)?;
            let (reply, sources) = match rest.split_once('|') {
                Some((reply, uris)) => (
                    reply.trim().to_string(),
                    uris.split_whitespace().map(str::to_string).collect(),
                ),
                None => (rest, Vec::new()),
            };
            Command::Chat { user, reply, sources }
        }
        "voice" => {
            let (input, output) = pair("voice", rest)?;
            Command::Voice { input, output }
        }
        "feedback" => Command::Feedback(rating(rest)?),
        "plans" => Command::Plans,
        "buy" => Command::Buy(required("buy", rest, "a plan id")?.to_ascii_lowercase()),
        "credits" => Command::Credits,
        "admin" => Command::Admin,
        "proceed" => Command::Proceed,
        "cancel" => Command::Cancel,
        "key" => Command::Key(required("key", rest, "the admin key")?),
        "pin" => Command::Pin(required("pin", rest, "the security PIN")?),
        "recover" => Command::Recover,
        "answer" => Command::Answer(required("answer", rest, "the recovery answer")?),
        "close" => Command::Close,
        "dashboard" => Command::Dashboard,
        "leave" => Command::Leave,
        "users" => Command::Users,
        "chats" => Command::Chats,
        "feedbacks" => Command::Feedbacks,
        "audit" => Command::Audit,
        "toggle-mode" => Command::ToggleAppMode,
        "rotate" => {
            let mut keys = rest.split_whitespace();
            match (keys.next(), keys.next()) {
                (Some(new_key), Some(confirm_key)) => Command::Rotate {
                    new_key: new_key.to_string(),
                    confirm_key: confirm_key.to_string(),
                },
                _ => {
                    return Err(ParseError::MissingArgument {
                        command: "rotate",
                        expected: "a new key and its confirmation",
                    });
                }
            }
        }
        "mfa" => Command::Mfa,
        "recovery-answer" => {
            Command::RecoveryAnswer(Some(rest.to_string()).filter(|a| !a.is_empty()))
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required(command: &'static str, rest: &str, expected: &'static str) -> Result<String, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument { command, expected })
    } else {
        Ok(rest.to_string())
    }
}

/// Split `<left>|<right>`.
fn pair(command: &'static str, rest: &str) -> Result<(String, String), ParseError> {
    rest.split_once('|')
        .map(|(l, r)| (l.trim().to_string(), r.trim().to_string()))
        .ok_or(ParseError::MissingArgument {
            command,
            expected: "two texts separated by `|`",
        })
}

fn user_type(value: &str) -> Result<UserType, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "parent" => Ok(UserType::Parent),
        "student" => Ok(UserType::Student),
        _ => Err(ParseError::InvalidArgument {
            command: "type",
            value: value.to_string(),
            expected: "parent, student",
        }),
    }
}

fn rating(value: &str) -> Result<Rating, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "good" | "up" => Ok(Rating::Good),
        "bad" | "down" => Ok(Rating::Bad),
        _ => Err(ParseError::InvalidArgument {
            command: "feedback",
            value: value.to_string(),
            expected: "good, bad",
        }),
    }
}
