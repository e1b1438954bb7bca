//! Argument materialization.
//!
//! Some payloads (raw blocks for `submitblock`, large transactions) exceed
//! the OS argument limit or are awkward to quote, so a lone `-` token is
//! replaced by the next line read from stdin.

use std::io::BufRead;

use crate::error::CtlError;

/// Token standing in for one line of standard input.
pub const STDIN_TOKEN: &str = "-";

/// Replace each `-` token with one stdin line, in order. Other tokens pass
/// through untouched; output length always equals input length.
pub fn materialize<R: BufRead>(tokens: &[String], stdin: &mut R) -> Result<Vec<String>, CtlError> {
    let mut params = Vec::with_capacity(tokens.len());
    let mut from_stdin = 0usize;

    for token in tokens {
        if token != STDIN_TOKEN {
            params.push(token.clone());
            continue;
        }

        let mut line = String::new();
        let n = stdin.read_line(&mut line).map_err(CtlError::StdinRead)?;
        // EOF with nothing read; a final line without newline is still accepted.
        if n == 0 {
            return Err(CtlError::InsufficientStdin);
        }
        params.push(line.trim_end_matches(['\r', '\n']).to_string());
        from_stdin += 1;
    }

    if from_stdin > 0 {
        tracing::debug!(count = from_stdin, "read params from stdin");
    }
    Ok(params)
}
