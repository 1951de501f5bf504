//! Shader compile diagnostics
//!
//! Drivers report errors as `ERROR: <file>:<line>: <message>`. Those logs are
//! turned into a numbered listing of the source with each message printed
//! under the line it refers to.

use std::fmt;

use thiserror::Error;

/// Programmable pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader compilation or link failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// A stage failed to compile
    #[error("Failed to compile {stage} shader:\n{annotated}")]
    Compile {
        /// Stage that failed
        stage: ShaderStage,
        /// Raw driver log
        log: String,
        /// Source listing with the log's messages inlined
        annotated: String,
    },

    /// The program failed to link
    #[error("Failed to link shader program: {log}")]
    Link {
        /// Raw driver log
        log: String,
    },
}

impl ShaderError {
    /// Build a compile error, annotating `source` with `log`
    pub fn compile(stage: ShaderStage, source: &str, log: &str) -> Self {
        Self::Compile {
            stage,
            log: log.to_string(),
            annotated: annotate_source(source, log),
        }
    }
}

/// Parse `ERROR: 0:12: message` lines into `(line, message)` pairs
pub fn parse_log(log: &str) -> Vec<(usize, String)> {
    log.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("ERROR:")?;
            let mut parts = rest.splitn(3, ':');
            let _file = parts.next()?;
            let line_number = parts.next()?.trim().parse::<usize>().ok()?;
            let message = parts.next()?.trim().to_string();
            Some((line_number, message))
        })
        .collect()
}

/// Numbered source listing with log messages under their lines
///
/// Messages that name no parsable line are appended at the end.
pub fn annotate_source(source: &str, log: &str) -> String {
    let errors = parse_log(log);
    let width = source.lines().count().to_string().len();
    let mut out = String::new();

    for (index, line) in source.lines().enumerate() {
        let number = index + 1;
        out.push_str(&format!("{:>width$} | {}\n", number, line, width = width));
        for (_, message) in errors.iter().filter(|(at, _)| *at == number) {
            out.push_str(&format!("{:>width$} | ^^^ {}\n", "", message, width = width));
        }
    }

    let line_count = source.lines().count();
    let unplaced: Vec<&str> = log
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            parse_log(line)
                .first()
                .map_or(true, |(at, _)| *at == 0 || *at > line_count)
        })
        .collect();
    for line in unplaced {
        out.push_str(line);
        out.push('\n');
    }

    out
}
