// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Recursive-descent parser for pipeline description strings.

use crate::registry::{StageRole, is_terminal_generator, stage_signature};
use crate::{Arg, ParseError, Pipeline, StageSpec, parse_error};

/// Split a string at commas that are not nested inside parentheses or
/// braces. Fails on unbalanced grouping.
pub fn split_top_level(input: &str) -> Result<Vec<&str>, ParseError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' | '{' => depth += 1,
            ')' | '}' => {
                if depth == 0 {
                    return parse_error!("unbalanced parentheses in '{input}'");
                }
                depth -= 1;
            }
            ',' if depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return parse_error!("unbalanced parentheses in '{input}'");
    }
    parts.push(input[start..].trim());
    Ok(parts)
}

/// Parse a single-class pipeline description.
pub fn parse_pipeline(input: &str) -> Result<Pipeline, ParseError> {
    let mut cursor = Cursor::new(input);
    cursor.skip_ws();
    let root = cursor.parse_stage()?;
    cursor.skip_ws();
    if let Some(c) = cursor.peek() {
        return parse_error!("unexpected '{c}' after pipeline in '{input}'");
    }
    let pipeline = chain_from_root(root, input)?;
    validate(&pipeline, input)?;
    Ok(pipeline)
}

/// Parse a pipeline field that may carry one pipeline per traffic
/// class: `{p1,p2,...}`. An unbraced value yields a single pipeline.
pub fn parse_pipeline_list(input: &str) -> Result<Vec<Pipeline>, ParseError> {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix('{') {
        let Some(inner) = rest.strip_suffix('}') else {
            return parse_error!("unbalanced braces in '{input}'");
        };
        let parts = split_top_level(inner)?;
        if parts.iter().any(|p| p.is_empty()) {
            return parse_error!("empty pipeline in class list '{input}'");
        }
        return parts.iter().map(|p| parse_pipeline(p)).collect();
    }
    Ok(vec![parse_pipeline(trimmed)?])
}

/// Turn a parsed root into a stage chain: `component(...)` lists its
/// stages explicitly, anything else is a chain of one.
fn chain_from_root(root: StageSpec, input: &str) -> Result<Pipeline, ParseError> {
    if root.name != "component" {
        return Ok(Pipeline { stages: vec![root] });
    }
    let mut stages = Vec::with_capacity(root.args.len());
    for arg in root.args {
        match arg {
            Arg::Stage(stage) => stages.push(stage),
            Arg::Ident(name) => stages.push(StageSpec::bare(&name)),
            Arg::Int(_) | Arg::Float(_) => {
                return parse_error!("numeric literal is not a stage in '{input}'");
            }
        }
    }
    Ok(Pipeline { stages })
}

fn validate(pipeline: &Pipeline, input: &str) -> Result<(), ParseError> {
    for (i, stage) in pipeline.stages.iter().enumerate() {
        if stage.name == "component" {
            return parse_error!("component(...) may only appear at the root of '{input}'");
        }
        let Some(sig) = stage_signature(&stage.name) else {
            return parse_error!("unknown stage '{}' in '{input}'", stage.name);
        };
        let n = stage.args.len();
        if n < sig.min_args || n > sig.max_args {
            return parse_error!(
                "stage '{}' takes {} argument(s), got {n} in '{input}'",
                stage.name,
                arity(sig.min_args, sig.max_args),
            );
        }
        match sig.role {
            StageRole::Generator if i != 0 => {
                return parse_error!("generator '{}' must be the first stage in '{input}'", stage.name);
            }
            StageRole::Modifier if i == 0 => {
                return parse_error!("'{}' cannot generate traffic in '{input}'", stage.name);
            }
            _ => {}
        }
        validate_args(stage, input)?;
    }
    Ok(())
}

/// Stage-specific argument checks mirroring what the simulator itself
/// accepts.
fn validate_args(stage: &StageSpec, input: &str) -> Result<(), ParseError> {
    match stage.name.as_str() {
        "random" => {
            let ok = match &stage.args[0] {
                Arg::Ident(name) => is_terminal_generator(name),
                _ => false,
            };
            if !ok {
                return parse_error!("random expects an arrival process name in '{input}'");
            }
        }
        "SMC" => {
            let ok = matches!(&stage.args[0], Arg::Ident(side) if side == "switch" || side == "end");
            if !ok {
                return parse_error!("SMC expects 'switch' or 'end' in '{input}'");
            }
        }
        "SWM" => {
            if !matches!(&stage.args[0], Arg::Ident(_)) {
                return parse_error!("SWM expects an application name in '{input}'");
            }
        }
        _ => {}
    }
    Ok(())
}

fn arity(min: usize, max: usize) -> String {
    if min == max {
        format!("{min}")
    } else if max == usize::MAX {
        format!("at least {min}")
    } else {
        format!("{min}..{max}")
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn parse_stage(&mut self) -> Result<StageSpec, ParseError> {
        let name = self.parse_ident()?;
        self.skip_ws();
        if self.peek() != Some('(') {
            return Ok(StageSpec::bare(&name));
        }
        let args = self.parse_args(&name)?;
        Ok(StageSpec::new(&name, args))
    }

    /// Parse a parenthesised argument list, cursor positioned at '('.
    fn parse_args(&mut self, name: &str) -> Result<Vec<Arg>, ParseError> {
        self.bump(); // '('
        let mut args = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(')') if args.is_empty() => {
                    return parse_error!("empty argument list for '{name}' in '{}'", self.src);
                }
                None => {
                    return parse_error!("unbalanced parentheses in '{}'", self.src);
                }
                _ => {}
            }
            args.push(self.parse_arg()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(')') => return Ok(args),
                Some(c) => {
                    return parse_error!("unexpected '{c}' in argument list of '{}'", self.src);
                }
                None => {
                    return parse_error!("unbalanced parentheses in '{}'", self.src);
                }
            }
        }
    }

    fn parse_arg(&mut self) -> Result<Arg, ParseError> {
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let name = self.parse_ident()?;
                self.skip_ws();
                if self.peek() == Some('(') {
                    let args = self.parse_args(&name)?;
                    Ok(Arg::Stage(StageSpec::new(&name, args)))
                } else {
                    Ok(Arg::Ident(name))
                }
            }
            Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => self.parse_number(),
            Some(c) => parse_error!("unexpected '{c}' in '{}'", self.src),
            None => parse_error!("unexpected end of input in '{}'", self.src),
        }
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        if self.pos == start {
            match self.peek() {
                Some(c) => return parse_error!("expected a stage name, found '{c}' in '{}'", self.src),
                None => return parse_error!("expected a stage name in '{}'", self.src),
            }
        }
        Ok(self.src[start..self.pos].to_owned())
    }

    fn parse_number(&mut self) -> Result<Arg, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || "+-.eE".contains(c)) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        if text.contains(['.', 'e', 'E']) {
            match text.parse::<f64>() {
                Ok(v) => Ok(Arg::Float(v)),
                Err(_) => parse_error!("bad numeric literal '{text}' in '{}'", self.src),
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => Ok(Arg::Int(v)),
                Err(_) => parse_error!("bad numeric literal '{text}' in '{}'", self.src),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_nesting() {
        let parts = split_top_level("random(bernoulli),packetize(66,18,1500,12.5)").unwrap();
        assert_eq!(parts, vec!["random(bernoulli)", "packetize(66,18,1500,12.5)"]);
    }

    #[test]
    fn split_rejects_unbalanced() {
        assert!(split_top_level("random(bernoulli").is_err());
        assert!(split_top_level("a),b").is_err());
    }

    #[test]
    fn chain_order_is_generator_first() {
        let p = parse_pipeline("component(random(bernoulli),SMC(switch),packetize(66,18,1500,12.5))")
            .unwrap();
        let names: Vec<_> = p.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["random", "SMC", "packetize"]);
    }

    #[test]
    fn packetize_literal_types() {
        let p = parse_pipeline("component(random(bernoulli),packetize(0,1,999999,1.0))").unwrap();
        assert_eq!(
            p.stages[1].args,
            vec![Arg::Int(0), Arg::Int(1), Arg::Int(999999), Arg::Float(1.0)]
        );
    }
}
