// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `read [-r] [-d c] name...` built-in (`spec.md` §4.6): reads one
//! line (or, with `-d`, one delimiter-terminated record) from fd 0, splits
//! it on `$IFS` across the given names (the last name absorbing whatever
//! is left, trailing `IFS` whitespace trimmed), and assigns them.
//! Backslash-newline is a line continuation unless `-r` is given.

use posh_env::system::Fd;
use posh_env::{Env, Scope, System};
use posh_semantics::ExecResult;

use crate::common::usage_error_2;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let mut raw = false;
    let mut delimiter = b'\n';
    let mut iter = args.into_iter().skip(1).peekable();
    while let Some(arg) = iter.peek() {
        match arg.as_str() {
            "-r" => {
                raw = true;
                iter.next();
            }
            "-d" => {
                iter.next();
                match iter.next() {
                    Some(d) if d.len() == 1 => delimiter = d.as_bytes()[0],
                    _ => return usage_error_2("read", "-d requires a single-character argument"),
                }
            }
            "--" => {
                iter.next();
                break;
            }
            _ => break,
        }
    }
    let names: Vec<String> = iter.collect();
    if names.is_empty() {
        return usage_error_2("read", "missing name operand");
    }

    let (line, hit_eof) = match read_record(env, delimiter, raw) {
        Ok(result) => result,
        Err(e) => return usage_error_2("read", e),
    };

    let ifs = env.variables.get("IFS").and_then(|v| v.value.clone()).unwrap_or_else(|| " \t\n".to_string());
    let fields = split_for_read(&line, &ifs, names.len());
    for (name, value) in names.iter().zip(fields) {
        let _ = env.variables.get_or_new(name.clone(), Scope::Global).assign(value, None);
    }

    std::ops::ControlFlow::Continue(if hit_eof { 1 } else { 0 })
}

/// Reads one record from fd 0, honoring backslash-newline continuation
/// unless `raw`. Returns the record text (delimiter excluded) and whether
/// EOF was hit before a delimiter was seen.
fn read_record<S: System>(env: &mut Env<S>, delimiter: u8, raw: bool) -> Result<(String, bool), String> {
    let mut bytes = Vec::new();
    let mut buf = [0u8; 1];
    loop {
        match env.system.read(Fd::STDIN, &mut buf) {
            Ok(0) => return Ok((String::from_utf8_lossy(&bytes).into_owned(), true)),
            Ok(_) => {
                let b = buf[0];
                if !raw && b == b'\\' {
                    match env.system.read(Fd::STDIN, &mut buf) {
                        Ok(0) => {
                            bytes.push(b'\\');
                            return Ok((String::from_utf8_lossy(&bytes).into_owned(), true));
                        }
                        Ok(_) if buf[0] == delimiter => continue,
                        Ok(_) => {
                            bytes.push(b'\\');
                            bytes.push(buf[0]);
                        }
                        Err(e) => return Err(e.to_string()),
                    }
                } else if b == delimiter {
                    return Ok((String::from_utf8_lossy(&bytes).into_owned(), false));
                } else {
                    bytes.push(b);
                }
            }
            Err(e) => return Err(e.to_string()),
        }
    }
}

/// Splits `line` into exactly `n` fields on `ifs`: the first `n - 1`
/// fields follow ordinary `IFS` splitting, and the last absorbs whatever
/// text remains, with trailing `IFS` whitespace trimmed but no further
/// splitting.
fn split_for_read(line: &str, ifs: &str, n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    if ifs.is_empty() {
        let mut fields = vec![line.to_string()];
        fields.resize(n, String::new());
        return fields;
    }

    let is_ifs = |c: char| ifs.contains(c);
    let is_ws = |c: char| ifs.contains(c) && c.is_whitespace();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    while i < chars.len() && is_ws(chars[i]) {
        i += 1;
    }

    let mut fields = Vec::with_capacity(n);
    for _ in 0..n - 1 {
        let mut field = String::new();
        while i < chars.len() && !is_ifs(chars[i]) {
            field.push(chars[i]);
            i += 1;
        }
        fields.push(field);
        if i < chars.len() {
            i += 1;
            while i < chars.len() && is_ws(chars[i]) {
                i += 1;
            }
        }
    }

    let rest: String = chars[i..].iter().collect();
    let trimmed = rest.trim_end_matches(is_ws);
    fields.push(trimmed.to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn splits_across_names_last_absorbs_rest() {
        let fields = split_for_read("a b  c d", " \t\n", 3);
        assert_eq!(fields, vec!["a", "b", "c d"]);
    }

    #[test]
    fn missing_fields_become_empty() {
        let fields = split_for_read("a", " \t\n", 3);
        assert_eq!(fields, vec!["a", "", ""]);
    }

    #[test]
    fn missing_names_is_a_usage_error() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["read".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(2));
    }
}
