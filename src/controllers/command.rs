use crate::error::AppError;
use std::path::PathBuf;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  play | pause | toggle | stop     control playback
  next | prev | jump <n>           move between chunks (n starts at 1)
  voice <id> | voices | refresh    choose or list voices
  rate <0.5-2.0> | volume <0-1>    playback settings
  scroll [on|off]                  follow the active chunk
  chunks | stats | status          inspect the document
  load <file> | url <url>          load a file or web article
  text <content>                   load text, \\n starts a new line
  help | quit";

/// One line of terminal input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Stop,
    Next,
    Prev,
    /// Zero-based chunk index
    Jump(usize),
    Voice(String),
    Voices,
    RefreshVoices,
    Rate(f32),
    Volume(f32),
    /// `None` flips the current setting
    AutoScroll(Option<bool>),
    Chunks,
    Stats,
    Status,
    LoadFile(PathBuf),
    LoadUrl(String),
    LoadText(String),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "" | "toggle" | "p" => Command::Toggle,
            "play" => Command::Play,
            "pause" => Command::Pause,
            "stop" | "s" => Command::Stop,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "b" => Command::Prev,
            "jump" | "j" => {
                let position: usize = required(name, arg)?
                    .parse()
                    .map_err(|_| bad(format!("not a chunk number: {}", arg)))?;
                if position == 0 {
                    return Err(bad("chunk numbers start at 1"));
                }
                Command::Jump(position - 1)
            }
            "voice" | "v" => Command::Voice(required(name, arg)?.to_string()),
            "voices" => Command::Voices,
            "refresh" => Command::RefreshVoices,
            "rate" | "speed" => Command::Rate(number(name, arg)?),
            "volume" | "vol" => Command::Volume(number(name, arg)?),
            "scroll" => Command::AutoScroll(match arg.to_lowercase().as_str() {
                "" => None,
                "on" | "true" | "1" => Some(true),
                "off" | "false" | "0" => Some(false),
                other => return Err(bad(format!("expected on or off, got {}", other))),
            }),
            "chunks" | "list" => Command::Chunks,
            "stats" => Command::Stats,
            "status" => Command::Status,
            "load" | "open" => Command::LoadFile(PathBuf::from(required(name, arg)?)),
            "url" => Command::LoadUrl(required(name, arg)?.to_string()),
            "text" => Command::LoadText(required(name, arg)?.replace("\\n", "\n")),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(bad(format!("unknown command: {}", other))),
        };

        Ok(command)
    }
}

fn bad(message: impl Into<String>) -> AppError {
    AppError::BadRequest(message.into())
}

fn required<'a>(name: &str, arg: &'a str) -> Result<&'a str, AppError> {
    if arg.is_empty() {
        return Err(bad(format!("{} needs an argument", name)));
    }
    Ok(arg)
}

fn number(name: &str, arg: &str) -> Result<f32, AppError> {
    required(name, arg)?
        .parse()
        .map_err(|_| bad(format!("not a number: {}", arg)))
}
