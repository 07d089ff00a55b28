//! Command-line parsing for the smilepick binary.
//!
//! The surface is small enough that a hand-rolled token walk beats a parser
//! dependency: one optional config path, one page locator, and the usual
//! verbosity trio.

use std::path::PathBuf;

use smilepick_core::{PageContext, PickerError, PickerResult};

/// Parsed command-line invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliInput {
    /// Explicit config file (`--config`).
    pub config_path: Option<PathBuf>,
    /// Page locator the picker pretends to run on (`--page`).
    pub page: String,
    /// `-v` / `--verbose`.
    pub verbose: bool,
    /// `-q` / `--quiet`.
    pub quiet: bool,
    /// `--no-color`.
    pub no_color: bool,
    /// `-V` / `--version`.
    pub version: bool,
}

/// Parse CLI tokens (without the program name).
pub fn parse_cli_args<I, S>(args: I) -> PickerResult<CliInput>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut input = CliInput {
        page: "/gamelist/".to_owned(),
        ..CliInput::default()
    };

    let mut idx = 0;
    while idx < tokens.len() {
        match tokens[idx].as_str() {
            "--config" => {
                input.config_path = Some(PathBuf::from(expect_value(&tokens, idx, "--config")?));
                idx += 2;
            }
            "--page" => {
                input.page = expect_value(&tokens, idx, "--page")?.to_owned();
                idx += 2;
            }
            "-v" | "--verbose" => {
                input.verbose = true;
                idx += 1;
            }
            "-q" | "--quiet" => {
                input.quiet = true;
                idx += 1;
            }
            "--no-color" => {
                input.no_color = true;
                idx += 1;
            }
            "-V" | "--version" => {
                input.version = true;
                idx += 1;
            }
            other => {
                return Err(PickerError::Usage {
                    detail: format!("unknown argument: {other}"),
                });
            }
        }
    }
    Ok(input)
}

fn expect_value<'t>(tokens: &'t [String], idx: usize, flag: &str) -> PickerResult<&'t str> {
    tokens.get(idx + 1).map(String::as_str).ok_or_else(|| {
        PickerError::Usage {
            detail: format!("{flag} requires a value"),
        }
    })
}

/// Split a page locator into path, query, and hash, then classify it.
#[must_use]
pub fn context_from_page(page: &str) -> PageContext {
    let (before_hash, hash) = match page.find('#') {
        Some(pos) => (&page[..pos], &page[pos..]),
        None => (page, ""),
    };
    let (path, query) = match before_hash.find('?') {
        Some(pos) => (&before_hash[..pos], &before_hash[pos + 1..]),
        None => (before_hash, ""),
    };
    PageContext::classify(path, query, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_general_chat_page() {
        let input = parse_cli_args(Vec::<String>::new()).unwrap();
        assert_eq!(input.page, "/gamelist/");
        assert!(!input.verbose);
    }

    #[test]
    fn parses_flags_and_values() {
        let input =
            parse_cli_args(["--config", "/tmp/c.json", "--page", "/forum/x", "-v", "--no-color"])
                .unwrap();
        assert_eq!(input.config_path.as_deref(), Some(std::path::Path::new("/tmp/c.json")));
        assert_eq!(input.page, "/forum/x");
        assert!(input.verbose);
        assert!(input.no_color);
    }

    #[test]
    fn missing_value_is_a_usage_error() {
        let err = parse_cli_args(["--page"]).unwrap_err();
        assert!(matches!(err, PickerError::Usage { .. }));
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        assert!(parse_cli_args(["--frobnicate"]).is_err());
    }

    #[test]
    fn page_locator_splits_into_context_parts() {
        let context = context_from_page("/gamelist/?gmid=42#frag");
        assert!(context.gamelist);
        assert!(context.game);
        assert_eq!(context.gmid.as_deref(), Some("42"));

        let profile = context_from_page("/u/#/12345/");
        assert!(profile.profile);
    }
}
