use crate::error::{LocatorError, Result};
use crate::page::page_model::{NodeId, Page};

// ============================================================================
// Selector model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOperator {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    /// `~=`: one of the whitespace-separated words
    Includes(String),
    /// `|=`: the value itself or the value followed by `-`
    DashMatch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrCondition {
    pub name: String,
    pub operator: AttrOperator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    NthOfType(usize),
    NthChild(usize),
    FirstChild,
    LastChild,
    FirstOfType,
    LastOfType,
    /// `:not(a, b > c)`: matches none of the listed selectors
    Not(Vec<Vec<SelectorPart>>),
}

/// One compound step such as `li.item:nth-of-type(2)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub universal: bool,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrCondition>,
    pub pseudo_classes: Vec<PseudoClass>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPart {
    pub compound: CompoundSelector,
    /// Relation to the previous (left) part; `None` for the first part.
    pub combinator: Option<Combinator>,
}

/// A parsed selector list (`a > b, c d`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub groups: Vec<Vec<SelectorPart>>,
}

// ============================================================================
// Querying
// ============================================================================

/// All elements matching `selector`, in document order.
pub fn query_all<P: Page + ?Sized>(page: &P, selector: &str) -> Result<Vec<NodeId>> {
    let parsed = parse(selector)?;
    Ok(page
        .all_elements()
        .into_iter()
        .filter(|&node| parsed.matches(page, node))
        .collect())
}

/// First element matching `selector` in document order.
pub fn query_first<P: Page + ?Sized>(page: &P, selector: &str) -> Result<Option<NodeId>> {
    let parsed = parse(selector)?;
    Ok(page
        .all_elements()
        .into_iter()
        .find(|&node| parsed.matches(page, node)))
}

impl Selector {
    pub fn matches<P: Page + ?Sized>(&self, page: &P, node: NodeId) -> bool {
        self.groups
            .iter()
            .any(|parts| matches_from(page, parts, parts.len() - 1, node))
    }
}

fn matches_from<P: Page + ?Sized>(page: &P, parts: &[SelectorPart], idx: usize, node: NodeId) -> bool {
    let part = &parts[idx];
    if !part.compound.matches(page, node) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    match part.combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => page
            .parent(node)
            .is_some_and(|p| matches_from(page, parts, idx - 1, p)),
        Combinator::Descendant => {
            let mut current = page.parent(node);
            while let Some(ancestor) = current {
                if matches_from(page, parts, idx - 1, ancestor) {
                    return true;
                }
                current = page.parent(ancestor);
            }
            false
        }
        Combinator::AdjacentSibling => page
            .previous_sibling(node)
            .is_some_and(|s| matches_from(page, parts, idx - 1, s)),
        Combinator::GeneralSibling => {
            let mut current = page.previous_sibling(node);
            while let Some(sibling) = current {
                if matches_from(page, parts, idx - 1, sibling) {
                    return true;
                }
                current = page.previous_sibling(sibling);
            }
            false
        }
    }
}

impl CompoundSelector {
    pub fn matches<P: Page + ?Sized>(&self, page: &P, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if !page.tag_name(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if page.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let class_attr = page.attribute(node, "class").unwrap_or("");
            let has_all = self
                .classes
                .iter()
                .all(|wanted| class_attr.split_whitespace().any(|c| c == wanted));
            if !has_all {
                return false;
            }
        }

        for attr in &self.attrs {
            let value = page.attribute(node, &attr.name);
            let ok = match (&attr.operator, value) {
                (_, None) => false,
                (AttrOperator::Exists, Some(_)) => true,
                (AttrOperator::Equals(expected), Some(v)) => v == expected,
                (AttrOperator::Prefix(expected), Some(v)) => {
                    !expected.is_empty() && v.starts_with(expected.as_str())
                }
                (AttrOperator::Suffix(expected), Some(v)) => {
                    !expected.is_empty() && v.ends_with(expected.as_str())
                }
                (AttrOperator::Contains(expected), Some(v)) => {
                    !expected.is_empty() && v.contains(expected.as_str())
                }
                (AttrOperator::Includes(expected), Some(v)) => {
                    !expected.is_empty()
                        && !expected.contains(char::is_whitespace)
                        && v.split_whitespace().any(|word| word == expected)
                }
                (AttrOperator::DashMatch(expected), Some(v)) => {
                    v == expected || v.strip_prefix(expected.as_str()).is_some_and(|rest| rest.starts_with('-'))
                }
            };
            if !ok {
                return false;
            }
        }

        self.pseudo_classes
            .iter()
            .all(|pseudo| pseudo_matches(page, node, pseudo))
    }
}

fn pseudo_matches<P: Page + ?Sized>(page: &P, node: NodeId, pseudo: &PseudoClass) -> bool {
    match pseudo {
        PseudoClass::NthOfType(n) => nth_of_type(page, node) == *n,
        PseudoClass::NthChild(n) => nth_child(page, node) == *n,
        PseudoClass::FirstChild => page.previous_sibling(node).is_none(),
        PseudoClass::FirstOfType => nth_of_type(page, node) == 1,
        PseudoClass::LastChild => following_siblings(page, node).is_empty(),
        PseudoClass::LastOfType => {
            let tag = page.tag_name(node);
            !following_siblings(page, node)
                .into_iter()
                .any(|s| page.tag_name(s) == tag)
        }
        PseudoClass::Not(inners) => !inners
            .iter()
            .any(|parts| matches_from(page, parts, parts.len() - 1, node)),
    }
}

/// 1 + number of preceding element siblings sharing the node's tag name.
pub fn nth_of_type<P: Page + ?Sized>(page: &P, node: NodeId) -> usize {
    let tag = page.tag_name(node);
    let mut nth = 1;
    let mut sibling = page.previous_sibling(node);
    while let Some(s) = sibling {
        if page.tag_name(s) == tag {
            nth += 1;
        }
        sibling = page.previous_sibling(s);
    }
    nth
}

fn nth_child<P: Page + ?Sized>(page: &P, node: NodeId) -> usize {
    let mut nth = 1;
    let mut sibling = page.previous_sibling(node);
    while let Some(s) = sibling {
        nth += 1;
        sibling = page.previous_sibling(s);
    }
    nth
}

fn following_siblings<P: Page + ?Sized>(page: &P, node: NodeId) -> Vec<NodeId> {
    let Some(parent) = page.parent(node) else {
        return vec![];
    };
    page.children(parent)
        .into_iter()
        .skip_while(|&s| s != node)
        .skip(1)
        .collect()
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Compound(String),
    Combinator(Combinator),
    Comma,
}

pub fn parse(selector: &str) -> Result<Selector> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(LocatorError::selector(selector, "empty selector"));
    }

    let tokens = tokenize(trimmed)?;
    let mut groups = Vec::new();
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokens {
        match token {
            Token::Comma => {
                if parts.is_empty() || pending.is_some() {
                    return Err(LocatorError::selector(selector, "empty selector in list"));
                }
                groups.push(std::mem::take(&mut parts));
            }
            Token::Combinator(c) => {
                if parts.is_empty() || pending.is_some() {
                    return Err(LocatorError::selector(selector, "dangling combinator"));
                }
                pending = Some(c);
            }
            Token::Compound(text) => {
                let compound = parse_compound(selector, &text)?;
                let combinator = if parts.is_empty() {
                    None
                } else {
                    Some(pending.take().unwrap_or(Combinator::Descendant))
                };
                parts.push(SelectorPart {
                    compound,
                    combinator,
                });
            }
        }
    }

    if parts.is_empty() || pending.is_some() {
        return Err(LocatorError::selector(selector, "selector ends unexpectedly"));
    }
    groups.push(parts);

    Ok(Selector { groups })
}

/// Split a selector into compound steps, combinators and commas. Escapes,
/// quoted strings, brackets and parentheses are kept inside their step.
fn tokenize(selector: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = selector.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = 0;

    let flush = |current: &mut String, tokens: &mut Vec<Token>| {
        if !current.is_empty() {
            tokens.push(Token::Compound(std::mem::take(current)));
        }
    };

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\\' {
            i = copy_escape(selector, &chars, i, &mut current)?;
            continue;
        }

        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match ch {
            '"' | '\'' if bracket_depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(LocatorError::selector(selector, "unbalanced ']'"));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                if paren_depth == 0 {
                    return Err(LocatorError::selector(selector, "unbalanced ')'"));
                }
                paren_depth -= 1;
                current.push(ch);
            }
            '>' | '+' | '~' | ',' if bracket_depth == 0 && paren_depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push(match ch {
                    '>' => Token::Combinator(Combinator::Child),
                    '+' => Token::Combinator(Combinator::AdjacentSibling),
                    '~' => Token::Combinator(Combinator::GeneralSibling),
                    _ => Token::Comma,
                });
            }
            c if c.is_whitespace() && bracket_depth == 0 && paren_depth == 0 => {
                flush(&mut current, &mut tokens);
            }
            _ => current.push(ch),
        }
        i += 1;
    }

    if bracket_depth != 0 || paren_depth != 0 || quote.is_some() {
        return Err(LocatorError::selector(selector, "unterminated bracket, parenthesis or string"));
    }
    flush(&mut current, &mut tokens);

    Ok(tokens)
}

/// Copy an escape sequence verbatim, including the whitespace that may
/// terminate a hex escape. Returns the index after the sequence.
fn copy_escape(selector: &str, chars: &[char], start: usize, out: &mut String) -> Result<usize> {
    let mut i = start + 1;
    if i >= chars.len() {
        return Err(LocatorError::selector(selector, "trailing backslash"));
    }

    out.push('\\');
    if chars[i].is_ascii_hexdigit() {
        let mut digits = 0;
        while i < chars.len() && digits < 6 && chars[i].is_ascii_hexdigit() {
            out.push(chars[i]);
            i += 1;
            digits += 1;
        }
        if i < chars.len() && chars[i].is_whitespace() {
            out.push(' ');
            i += 1;
        }
    } else {
        out.push(chars[i]);
        i += 1;
    }
    Ok(i)
}

fn parse_compound(selector: &str, part: &str) -> Result<CompoundSelector> {
    let chars: Vec<char> = part.chars().collect();
    let mut step = CompoundSelector::default();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if i != 0 {
                    return Err(LocatorError::selector(selector, "misplaced '*'"));
                }
                step.universal = true;
                i += 1;
            }
            '#' => {
                let (id, next) = parse_ident(&chars, i + 1)
                    .ok_or_else(|| LocatorError::selector(selector, "expected id after '#'"))?;
                if step.id.replace(id).is_some() {
                    return Err(LocatorError::selector(selector, "more than one id in a step"));
                }
                i = next;
            }
            '.' => {
                let (class, next) = parse_ident(&chars, i + 1)
                    .ok_or_else(|| LocatorError::selector(selector, "expected class after '.'"))?;
                step.classes.push(class);
                i = next;
            }
            '[' => {
                let (attr, next) = parse_attr(selector, &chars, i)?;
                step.attrs.push(attr);
                i = next;
            }
            ':' => {
                let (pseudo, next) = parse_pseudo(selector, &chars, i)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(LocatorError::selector(selector, format!("unexpected '{}'", chars[i])));
                }
                let (tag, next) = parse_ident(&chars, i)
                    .ok_or_else(|| LocatorError::selector(selector, format!("unexpected '{}'", chars[i])))?;
                step.tag = Some(tag);
                i = next;
            }
        }
    }

    Ok(step)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || (c as u32) >= 0x80
}

/// Parse a CSS identifier starting at `start`, decoding escapes.
fn parse_ident(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut out = String::new();
    let mut i = start;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            i += 1;
            let next = *chars.get(i)?;
            if next.is_ascii_hexdigit() {
                let mut hex = String::new();
                while i < chars.len() && hex.len() < 6 && chars[i].is_ascii_hexdigit() {
                    hex.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() && chars[i].is_whitespace() {
                    i += 1;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                let decoded = match code {
                    0 => '\u{FFFD}',
                    _ => char::from_u32(code).unwrap_or('\u{FFFD}'),
                };
                out.push(decoded);
            } else {
                out.push(next);
                i += 1;
            }
        } else if is_ident_char(c) {
            out.push(c);
            i += 1;
        } else {
            break;
        }
    }

    if out.is_empty() {
        None
    } else {
        Some((out, i))
    }
}

fn parse_attr(selector: &str, chars: &[char], open: usize) -> Result<(AttrCondition, usize)> {
    let mut i = skip_ws(chars, open + 1);
    let (name, next) =
        parse_ident(chars, i).ok_or_else(|| LocatorError::selector(selector, "expected attribute name"))?;
    i = skip_ws(chars, next);

    let op = match (chars.get(i), chars.get(i + 1)) {
        (Some(']'), _) => return Ok((AttrCondition { name, operator: AttrOperator::Exists }, i + 1)),
        (Some('='), _) => {
            i += 1;
            '='
        }
        (Some(c @ ('^' | '$' | '*' | '~' | '|')), Some('=')) => {
            i += 2;
            *c
        }
        _ => return Err(LocatorError::selector(selector, "unsupported attribute operator")),
    };

    i = skip_ws(chars, i);
    let value = match chars.get(i) {
        Some(q @ ('"' | '\'')) => {
            let q = *q;
            let mut value = String::new();
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(LocatorError::selector(selector, "unterminated string")),
                    Some(c) if *c == q => {
                        i += 1;
                        break;
                    }
                    Some('\\') => {
                        if let Some(c) = chars.get(i + 1) {
                            value.push(*c);
                        }
                        i += 2;
                    }
                    Some(c) => {
                        value.push(*c);
                        i += 1;
                    }
                }
            }
            value
        }
        _ => {
            let (value, next) = parse_ident(chars, i)
                .ok_or_else(|| LocatorError::selector(selector, "expected attribute value"))?;
            i = next;
            value
        }
    };

    i = skip_ws(chars, i);
    if chars.get(i) != Some(&']') {
        return Err(LocatorError::selector(selector, "expected ']'"));
    }

    let operator = match op {
        '^' => AttrOperator::Prefix(value),
        '$' => AttrOperator::Suffix(value),
        '*' => AttrOperator::Contains(value),
        '~' => AttrOperator::Includes(value),
        '|' => AttrOperator::DashMatch(value),
        _ => AttrOperator::Equals(value),
    };
    Ok((AttrCondition { name, operator }, i + 1))
}

fn parse_pseudo(selector: &str, chars: &[char], colon: usize) -> Result<(PseudoClass, usize)> {
    let (name, mut i) = parse_ident(chars, colon + 1)
        .ok_or_else(|| LocatorError::selector(selector, "expected pseudo-class name"))?;

    let argument = if chars.get(i) == Some(&'(') {
        let close = matching_paren(chars, i)
            .ok_or_else(|| LocatorError::selector(selector, "unterminated pseudo-class argument"))?;
        let arg: String = chars[i + 1..close].iter().collect();
        i = close + 1;
        Some(arg.trim().to_string())
    } else {
        None
    };

    let index = |arg: Option<String>| -> Result<usize> {
        arg.and_then(|a| a.parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .ok_or_else(|| LocatorError::selector(selector, format!("unsupported argument for :{}", name)))
    };

    let pseudo = match (name.as_str(), argument.is_some()) {
        ("nth-of-type", true) => PseudoClass::NthOfType(index(argument)?),
        ("nth-child", true) => PseudoClass::NthChild(index(argument)?),
        ("first-child", false) => PseudoClass::FirstChild,
        ("last-child", false) => PseudoClass::LastChild,
        ("first-of-type", false) => PseudoClass::FirstOfType,
        ("last-of-type", false) => PseudoClass::LastOfType,
        ("not", true) => {
            let inner = argument.unwrap_or_default();
            PseudoClass::Not(parse(&inner)?.groups)
        }
        _ => {
            return Err(LocatorError::selector(
                selector,
                format!("unsupported pseudo-class :{}", name),
            ));
        }
    };

    Ok((pseudo, i))
}

/// Index of the `)` closing the `(` at `open`, skipping quoted strings and
/// escapes.
fn matching_paren(chars: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut i = open;

    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\\' => i += 1,
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

fn skip_ws(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}
