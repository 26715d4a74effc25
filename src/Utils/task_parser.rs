/// parse a problem-description document with lines like
/// "func: sin(x)/x  point: 0.5 ..." into a TaskSpec. The format is a
/// flat set of `key: value` pairs, one per line; comment lines starting
/// with //, #, % or ; are filtered out. Malformed input is a fatal
/// ingestion error returned before the symbolic core is ever invoked.
///
/// keys: `func` (expression string, required), `point` (expansion point,
/// required), `count` (Taylor order, required), `width`/`height`
/// (plotting ranges, optional).
use itertools::Itertools;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, space0},
    combinator::{map, recognize},
    multi::many0,
    sequence::{delimited, pair, separated_pair},
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_WIDTH: i32 = 10;
const DEFAULT_HEIGHT: i32 = 5;

/// Scalar parameters of one Taylor-expansion problem.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    /// expression string handed to the tokenizer untouched
    pub func: String,
    /// expansion point
    pub point: f64,
    /// Taylor order
    pub count: usize,
    /// plotting half-range along x
    pub width: i32,
    /// plotting half-range along y
    pub height: i32,
}

/// Parses a key (word characters without spaces)
fn parse_key(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    let (input, result) = parser.parse(input)?;
    Ok((input, result))
}

/// Parses a value: the rest of the line, trimmed.
fn parse_value(input: &str) -> IResult<&str, String> {
    let parser = take_while1(|c: char| c != '\n' && c != '\r');
    let mut parser = map(parser, |s: &str| s.trim().to_string());
    let (input, result) = parser.parse(input)?;
    Ok((input, result))
}

/// Parses one `key: value` line.
fn parse_key_value_pair(input: &str) -> IResult<&str, (String, String)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value);
    let (input, result) = parser.parse(input)?;
    Ok((input, result))
}

/// Filters out comment lines (starting with //, #, %, or ;)
fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the whole document into a [`TaskSpec`].
pub fn parse_task_document(input: &str) -> Result<TaskSpec, String> {
    let filtered = filter_comments(input);
    let mut pairs: HashMap<String, String> = HashMap::new();

    for line in filtered.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_key_value_pair(line) {
            Ok((rest, (key, value))) if rest.trim().is_empty() => {
                pairs.insert(key, value);
            }
            _ => return Err(format!("malformed task line: '{}'", line)),
        }
    }

    let required = ["func", "point", "count"];
    let missing: Vec<&str> = required
        .iter()
        .filter(|key| !pairs.contains_key(**key))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(format!("missing task keys: {}", missing.iter().join(", ")));
    }

    let point = pairs["point"]
        .parse::<f64>()
        .map_err(|_| format!("point must be a number, got '{}'", pairs["point"]))?;
    let count = pairs["count"]
        .parse::<usize>()
        .map_err(|_| format!("count must be a non-negative integer, got '{}'", pairs["count"]))?;
    let width = match pairs.get("width") {
        Some(value) => value
            .parse::<i32>()
            .map_err(|_| format!("width must be an integer, got '{}'", value))?,
        None => DEFAULT_WIDTH,
    };
    let height = match pairs.get("height") {
        Some(value) => value
            .parse::<i32>()
            .map_err(|_| format!("height must be an integer, got '{}'", value))?,
        None => DEFAULT_HEIGHT,
    };

    Ok(TaskSpec {
        func: pairs["func"].clone(),
        point,
        count,
        width,
        height,
    })
}

/// Reads and parses a task file.
pub fn parse_task_file(path: impl AsRef<Path>) -> Result<TaskSpec, String> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|err| format!("cannot read task file {:?}: {}", path.as_ref(), err))?;
    parse_task_document(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let doc = "func: sin(x)/x\npoint: 0.5\ncount: 5\nwidth: 20\nheight: 10\n";
        let spec = parse_task_document(doc).unwrap();
        assert_eq!(
            spec,
            TaskSpec {
                func: "sin(x)/x".to_string(),
                point: 0.5,
                count: 5,
                width: 20,
                height: 10,
            }
        );
    }

    #[test]
    fn test_defaults_and_comments() {
        let doc = "// Taylor task\nfunc: x^2\npoint: 0\ncount: 3\n";
        let spec = parse_task_document(doc).unwrap();
        assert_eq!(spec.width, DEFAULT_WIDTH);
        assert_eq!(spec.height, DEFAULT_HEIGHT);
        assert_eq!(spec.func, "x^2");
    }

    #[test]
    fn test_missing_keys_reported() {
        let err = parse_task_document("func: x\n").unwrap_err();
        assert!(err.contains("point"));
        assert!(err.contains("count"));
    }

    #[test]
    fn test_malformed_line_is_fatal() {
        let err = parse_task_document("func x\npoint: 0\ncount: 1\n").unwrap_err();
        assert!(err.contains("malformed"));
    }

    #[test]
    fn test_non_numeric_scalars_rejected() {
        let doc = "func: x\npoint: zero\ncount: 3\n";
        assert!(parse_task_document(doc).unwrap_err().contains("point"));
        let doc = "func: x\npoint: 0\ncount: -1\n";
        assert!(parse_task_document(doc).unwrap_err().contains("count"));
    }

    #[test]
    fn test_parse_task_file() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "func: cos(x)").unwrap();
        writeln!(file, "point: 1.5").unwrap();
        writeln!(file, "count: 4").unwrap();
        let spec = parse_task_file(&path).unwrap();
        assert_eq!(spec.func, "cos(x)");
        assert_eq!(spec.point, 1.5);
        assert_eq!(spec.count, 4);
    }
}
