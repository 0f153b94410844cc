//! Command line configuration for the driver.
//!
//! The compiler takes no configuration file; everything comes from the
//! argument vector: one mode flag with its input (and, for code generation,
//! output) path, plus any number of verbosity flags.

use std::path::PathBuf;

use thiserror::Error;
use tracing::Level;

pub const USAGE: &str = "usage: bminor [-v|-vv] MODE FILE
modes:
  -scan FILE          print the tokens of FILE
  -parse FILE         check that FILE parses
  -print FILE         print FILE back as canonical source
  -resolve FILE       resolve the names in FILE
  -typecheck FILE     type check FILE
  -codegen FILE OUT   compile FILE to aarch64 assembly in OUT";

/// The last stage the driver runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scan,
    Parse,
    Print,
    Resolve,
    Typecheck,
    Codegen,
}

impl Mode {
    fn from_flag(flag: &str) -> Option<Mode> {
        match flag {
            "scan" => Some(Mode::Scan),
            "parse" => Some(Mode::Parse),
            "print" => Some(Mode::Print),
            "resolve" => Some(Mode::Resolve),
            "typecheck" => Some(Mode::Typecheck),
            "codegen" => Some(Mode::Codegen),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no mode given")]
    MissingMode,
    #[error("more than one mode given")]
    DuplicateMode,
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("-{0} expects an input file")]
    MissingInput(&'static str),
    #[error("-codegen expects an output file")]
    MissingOutput,
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub mode: Mode,
    pub input: PathBuf,
    /// Assembly destination, only set for `Mode::Codegen`.
    pub output: Option<PathBuf>,
    pub verbosity: u8,
}

impl Options {
    /// Parses the arguments that follow the program name.
    pub fn parse<I, S>(args: I) -> Result<Options, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_string()).collect();

        let mut verbosity = 0;
        let mut mode = None;
        let mut operands = vec![];

        for arg in &args {
            let flag = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'));

            match flag {
                Some("v") | Some("verbose") => verbosity += 1,
                Some("vv") => verbosity += 2,
                Some(name) => {
                    let parsed = Mode::from_flag(name).ok_or_else(|| ConfigError::UnknownOption(arg.clone()))?;
                    if mode.replace(parsed).is_some() {
                        return Err(ConfigError::DuplicateMode);
                    }
                }
                None => operands.push(arg.clone()),
            }
        }

        let mode = mode.ok_or(ConfigError::MissingMode)?;
        let mut operands = operands.into_iter();

        let input = operands
            .next()
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingInput(mode_name(mode)))?;

        let output = if mode == Mode::Codegen {
            Some(operands.next().map(PathBuf::from).ok_or(ConfigError::MissingOutput)?)
        } else {
            None
        };

        if let Some(extra) = operands.next() {
            return Err(ConfigError::UnexpectedArgument(extra));
        }

        Ok(Options {
            mode,
            input,
            output,
            verbosity,
        })
    }

    /// Most verbose level the log subscriber lets through.
    pub fn log_level(&self) -> Level {
        match self.verbosity {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Name of the input file, used to tag source positions.
    pub fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input.to_string_lossy().to_string())
    }
}

fn mode_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Scan => "scan",
        Mode::Parse => "parse",
        Mode::Print => "print",
        Mode::Resolve => "resolve",
        Mode::Typecheck => "typecheck",
        Mode::Codegen => "codegen",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        let options = Options::parse(["-scan", "a.bminor"]).unwrap();
        assert_eq!(options.mode, Mode::Scan);
        assert_eq!(options.input, PathBuf::from("a.bminor"));
        assert_eq!(options.output, None);

        let options = Options::parse(["--typecheck", "dir/b.bminor"]).unwrap();
        assert_eq!(options.mode, Mode::Typecheck);
        assert_eq!(options.file_name(), "b.bminor");
    }

    #[test]
    fn test_parse_codegen() {
        let options = Options::parse(["-codegen", "prog.bminor", "prog.s"]).unwrap();
        assert_eq!(options.mode, Mode::Codegen);
        assert_eq!(options.output, Some(PathBuf::from("prog.s")));

        assert_eq!(
            Options::parse(["-codegen", "prog.bminor"]).unwrap_err(),
            ConfigError::MissingOutput
        );
    }

    #[test]
    fn test_parse_verbosity() {
        let options = Options::parse(["-v", "-print", "x.bminor"]).unwrap();
        assert_eq!(options.verbosity, 1);
        assert_eq!(options.log_level(), Level::DEBUG);

        let options = Options::parse(["-resolve", "x.bminor", "-vv"]).unwrap();
        assert_eq!(options.log_level(), Level::TRACE);

        let options = Options::parse(["-parse", "x.bminor"]).unwrap();
        assert_eq!(options.log_level(), Level::WARN);
    }

    #[test]
    fn test_parse_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(Options::parse(empty).unwrap_err(), ConfigError::MissingMode);
        assert_eq!(Options::parse(["x.bminor"]).unwrap_err(), ConfigError::MissingMode);
        assert_eq!(
            Options::parse(["-compile", "x.bminor"]).unwrap_err(),
            ConfigError::UnknownOption(String::from("-compile"))
        );
        assert_eq!(
            Options::parse(["-scan", "-parse", "x.bminor"]).unwrap_err(),
            ConfigError::DuplicateMode
        );
        assert_eq!(Options::parse(["-scan"]).unwrap_err(), ConfigError::MissingInput("scan"));
        assert_eq!(
            Options::parse(["-scan", "a", "b"]).unwrap_err(),
            ConfigError::UnexpectedArgument(String::from("b"))
        );
    }
}
