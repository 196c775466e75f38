//! Parsing of the line-oriented graph commands:
//! * `V <n>` declares a new graph on the vertices `1..=n`.
//! * `E {<a,b>,<c,d,w>,...}` adds a batch of edges. The optional third field is a weight, it is
//!   read but plays no role for covers. `E {}` is an empty batch.

use std::io::{self, BufRead, Write};
use crate::cust_error::{GraphError, ImportError};
use crate::graph::UGraph;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EdgeSpec {
    pub src: usize,
    pub trg: usize,
    pub weight: Option<i64>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    Vertices(usize),
    Edges(Vec<EdgeSpec>),
}

fn malformed(line: &str, reason: &str) -> ImportError {
    ImportError::InputMalformedError(format!("{} in `{}`", reason, line.trim()))
}

/// Parses one input line. Returns `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Command>, ImportError> {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let command = match chars.next() {
        None => return Ok(None),
        Some(c) => c,
    };
    let rest = chars.as_str();
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) && !rest.starts_with('{') {
        return Err(malformed(line, "unknown command"))
    }
    match command {
        'V' => {
            let mut s = rest.split_whitespace();
            let n = s.next()
                .ok_or_else(|| malformed(line, "missing vertex count"))?
                .parse::<usize>()?;
            if s.next().is_some() {
                return Err(malformed(line, "trailing input"))
            }
            Ok(Some(Command::Vertices(n)))
        },
        'E' => Ok(Some(Command::Edges(parse_edge_list(line, rest)?))),
        _ => Err(malformed(line, "unknown command")),
    }
}

fn parse_edge_list(line: &str, rest: &str) -> Result<Vec<EdgeSpec>, ImportError> {
    let body = rest.trim()
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .ok_or_else(|| malformed(line, "edge list must be enclosed in `{}`"))?;
    let mut edges = Vec::new();
    let mut remaining = body.trim();
    while !remaining.is_empty() {
        let open = remaining.strip_prefix('<')
            .ok_or_else(|| malformed(line, "expected `<`"))?;
        let close = open.find('>')
            .ok_or_else(|| malformed(line, "expected `>`"))?;
        let fields: Vec<&str> = open[..close].split(',').map(str::trim).collect();
        let edge = match fields.as_slice() {
            [src, trg] => EdgeSpec { src: src.parse()?, trg: trg.parse()?, weight: None },
            [src, trg, weight] => EdgeSpec { src: src.parse()?, trg: trg.parse()?, weight: Some(weight.parse()?) },
            _ => return Err(malformed(line, "an edge has two or three fields")),
        };
        edges.push(edge);
        remaining = open[close + 1..].trim_start();
        if let Some(next) = remaining.strip_prefix(',') {
            remaining = next.trim_start();
            if remaining.is_empty() {
                return Err(malformed(line, "trailing `,`"))
            }
        } else if !remaining.is_empty() {
            return Err(malformed(line, "expected `,` between edges"))
        }
    }
    Ok(edges)
}

/// Replays all commands of `input` and returns the resulting graph.
///
/// Rejected edges are logged and dropped. Fails on malformed lines and if no `V` command occurs.
pub fn read_commands<R: BufRead>(input: R) -> Result<UGraph, ImportError> {
    let mut graph = None;
    for line in input.lines() {
        match parse_line(&line?)? {
            None => {},
            Some(Command::Vertices(n)) => graph = Some(UGraph::new(n)),
            Some(Command::Edges(edges)) => {
                let graph = graph.as_mut()
                    .ok_or_else(|| ImportError::InputMalformedError(GraphError::NoGraph.to_string()))?;
                for e in graph.add_edges(edges.into_iter().map(|edge| (edge.src, edge.trg))) {
                    tracing::warn!("Dropping edge: {}", e);
                }
            },
        }
    }
    graph.ok_or_else(|| ImportError::InputMalformedError(GraphError::NoGraph.to_string()))
}

/// Writes `graph` as a `V` and an `E` command.
pub fn write_commands<W: Write>(graph: &UGraph, mut out: W) -> Result<(), io::Error> {
    writeln!(out, "V {}", graph.num_nodes())?;
    let edges: Vec<String> = graph.edges()
        .iter()
        .map(|(src, trg)| format!("<{},{}>", src, trg))
        .collect();
    writeln!(out, "E {{{}}}", edges.join(","))
}
