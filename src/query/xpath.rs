use std::collections::{HashMap, HashSet};

use crate::error::{LocatorError, Result};
use crate::page::page_model::{NodeId, Page};

/// Predicate attached to a location step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[n]`, 1-based
    Position(usize),
    /// `[@name]`
    HasAttribute(String),
    /// `[@name='value']`
    AttributeEquals(String, String),
    /// `[contains(@name, 'value')]`
    AttributeContains(String, String),
    /// `[text()]`: has a text child
    HasText,
    /// `[text()='value']`: some text child equals the value
    TextEquals(String),
    /// `[contains(text(), 'value')]`: the first text child contains the value
    TextContains(String),
}

/// One `/`-separated step of a hierarchical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Preceded by `//`
    pub descendant: bool,
    /// Lowercase tag name, `None` for `*`
    pub name: Option<String>,
    pub predicates: Vec<Predicate>,
}

/// Parse an absolute hierarchical path such as `/html/body/div[2]/a`.
pub fn parse(path: &str) -> Result<Vec<Step>> {
    let chars: Vec<char> = path.trim().chars().collect();
    if chars.first() != Some(&'/') {
        return Err(LocatorError::path(path, "path must start with '/'"));
    }

    let mut steps = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '/' {
            return Err(LocatorError::path(path, format!("expected '/' at offset {}", i)));
        }
        i += 1;
        let descendant = chars.get(i) == Some(&'/');
        if descendant {
            i += 1;
        }

        let start = i;
        while i < chars.len() && is_name_char(chars[i]) {
            i += 1;
        }
        let name: String = chars[start..i].iter().collect();
        let name = match name.as_str() {
            "" => return Err(LocatorError::path(path, "empty location step")),
            "*" => None,
            n if n.contains('*') => return Err(LocatorError::path(path, "invalid name test")),
            n => Some(n.to_lowercase()),
        };

        let mut predicates = Vec::new();
        while chars.get(i) == Some(&'[') {
            let close = predicate_end(&chars, i)
                .ok_or_else(|| LocatorError::path(path, "unterminated predicate"))?;
            let body: String = chars[i + 1..close].iter().collect();
            predicates.push(parse_predicate(path, body.trim())?);
            i = close + 1;
        }

        steps.push(Step {
            descendant,
            name,
            predicates,
        });
    }

    Ok(steps)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '*')
}

/// Index of the `]` closing the predicate opened at `open`; brackets inside
/// quoted literals do not count.
fn predicate_end(chars: &[char], open: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, &c) in chars.iter().enumerate().skip(open + 1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == ']' => return Some(i),
            None => {}
        }
    }
    None
}

/// `'value'` or `"value"` without the quotes.
fn unquote(literal: &str) -> Option<&str> {
    let literal = literal.trim();
    literal
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| literal.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
}

fn parse_predicate(path: &str, body: &str) -> Result<Predicate> {
    if let Ok(n) = body.parse::<usize>() {
        if n == 0 {
            return Err(LocatorError::path(path, "positions are 1-based"));
        }
        return Ok(Predicate::Position(n));
    }

    if let Some(rest) = body.strip_prefix("text()") {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(Predicate::HasText);
        }
        let value = rest
            .strip_prefix('=')
            .and_then(unquote)
            .ok_or_else(|| LocatorError::path(path, format!("unsupported predicate [{}]", body)))?;
        return Ok(Predicate::TextEquals(value.to_string()));
    }

    if let Some(args) = body.strip_prefix("contains(").and_then(|b| b.strip_suffix(')')) {
        return parse_contains(path, body, args);
    }

    let Some(attr) = body.strip_prefix('@') else {
        return Err(LocatorError::path(path, format!("unsupported predicate [{}]", body)));
    };

    match attr.split_once('=') {
        None => {
            let name = attr.trim();
            if name.is_empty() {
                return Err(LocatorError::path(path, "empty attribute name"));
            }
            Ok(Predicate::HasAttribute(name.to_string()))
        }
        Some((name, value)) => {
            let unquoted =
                unquote(value).ok_or_else(|| LocatorError::path(path, "attribute value must be quoted"))?;
            Ok(Predicate::AttributeEquals(
                name.trim().to_string(),
                unquoted.to_string(),
            ))
        }
    }
}

/// `contains(text(), 'v')` or `contains(@name, 'v')`.
fn parse_contains(path: &str, body: &str, args: &str) -> Result<Predicate> {
    let unsupported = || LocatorError::path(path, format!("unsupported predicate [{}]", body));

    let (subject, literal) = args.split_once(',').ok_or_else(unsupported)?;
    let value = unquote(literal).ok_or_else(unsupported)?.to_string();

    match subject.trim() {
        "text()" => Ok(Predicate::TextContains(value)),
        s => match s.strip_prefix('@').map(str::trim) {
            Some(name) if !name.is_empty() => Ok(Predicate::AttributeContains(name.to_string(), value)),
            _ => Err(unsupported()),
        },
    }
}

/// Evaluate a hierarchical path; result is deduplicated and in document order.
pub fn evaluate<P: Page + ?Sized>(page: &P, path: &str) -> Result<Vec<NodeId>> {
    let steps = parse(path)?;
    let Some(root) = page.document_element() else {
        return Ok(vec![]);
    };

    // `None` stands for the document node above the root element.
    let mut context: Vec<Option<NodeId>> = vec![None];

    for step in &steps {
        let mut bases = Vec::new();
        if step.descendant {
            for ctx in &context {
                bases.push(*ctx);
                let start = match ctx {
                    None => vec![root],
                    Some(node) => page.children(*node),
                };
                collect_descendants(page, start, &mut bases);
            }
        } else {
            bases = context;
        }

        let mut next = Vec::new();
        for base in bases {
            let candidates = match base {
                None => vec![root],
                Some(node) => page.children(node),
            };
            let mut selected: Vec<NodeId> = candidates
                .into_iter()
                .filter(|&c| step.name.as_deref().is_none_or(|n| page.tag_name(c) == n))
                .collect();

            for predicate in &step.predicates {
                selected = apply_predicate(page, selected, predicate);
            }
            next.extend(selected.into_iter().map(Some));
        }
        context = next;
    }

    Ok(document_order(page, context.into_iter().flatten().collect()))
}

fn collect_descendants<P: Page + ?Sized>(page: &P, start: Vec<NodeId>, out: &mut Vec<Option<NodeId>>) {
    let mut stack: Vec<NodeId> = start.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(Some(node));
        stack.extend(page.children(node).into_iter().rev());
    }
}

fn apply_predicate<P: Page + ?Sized>(page: &P, nodes: Vec<NodeId>, predicate: &Predicate) -> Vec<NodeId> {
    match predicate {
        Predicate::Position(n) => nodes.get(n - 1).copied().into_iter().collect(),
        Predicate::HasAttribute(name) => nodes
            .into_iter()
            .filter(|&n| page.has_attribute(n, name))
            .collect(),
        Predicate::AttributeEquals(name, value) => nodes
            .into_iter()
            .filter(|&n| page.attribute(n, name) == Some(value.as_str()))
            .collect(),
        Predicate::AttributeContains(name, value) => nodes
            .into_iter()
            .filter(|&n| page.attribute(n, name).unwrap_or("").contains(value.as_str()))
            .collect(),
        Predicate::HasText => nodes
            .into_iter()
            .filter(|&n| !page.text_segments(n).is_empty())
            .collect(),
        Predicate::TextEquals(value) => nodes
            .into_iter()
            .filter(|&n| page.text_segments(n).iter().any(|t| t == value))
            .collect(),
        Predicate::TextContains(value) => nodes
            .into_iter()
            .filter(|&n| {
                let first = page.text_segments(n).first().copied().unwrap_or("");
                first.contains(value.as_str())
            })
            .collect(),
    }
}

fn document_order<P: Page + ?Sized>(page: &P, nodes: Vec<NodeId>) -> Vec<NodeId> {
    let order: HashMap<NodeId, usize> = page
        .all_elements()
        .into_iter()
        .enumerate()
        .map(|(i, n)| (n, i))
        .collect();

    let mut seen = HashSet::new();
    let mut unique: Vec<NodeId> = nodes.into_iter().filter(|n| seen.insert(*n)).collect();
    unique.sort_by_key(|n| order.get(n).copied().unwrap_or(usize::MAX));
    unique
}
