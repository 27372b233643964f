//! Output templates for event blocks.
//!
//! A template is plain text with `{name}` placeholders for the variables in
//! [`Variable`]. Rendering happens in three steps:
//!
//! 1. Lines that contain a `::` property marker together with the
//!    placeholder of an empty variable are dropped (unless empty fields are
//!    included). Every other recognized placeholder is replaced with its value.
//! 2. Escaped `\n` sequences become real line breaks.
//! 3. The text is split on `---CHILD---` into a main block and child blocks.
//!
//! A suppressed placeholder on a line without `::` is left in the output as
//! literal text.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Separates the main block from child blocks.
pub const CHILD_DELIMITER: &str = "---CHILD---";

/// Marks a line as a `key:: value` block property.
pub const PROPERTY_MARKER: &str = "::";

/// A newline typed as backslash + `n` in single-line settings fields.
const ESCAPED_NEWLINE: &str = "\\n";

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("Invalid placeholder regex"));

/// A template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Subject,
    Time,
    Duration,
    Attendees,
    Location,
    Description,
}

impl Variable {
    /// Every recognized variable.
    pub const ALL: [Variable; 6] = [
        Self::Subject,
        Self::Time,
        Self::Duration,
        Self::Attendees,
        Self::Location,
        Self::Description,
    ];

    /// Returns the name used inside a placeholder.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Attendees => "attendees",
            Self::Location => "location",
            Self::Description => "description",
        }
    }

    /// Returns the `{name}` placeholder token.
    pub fn placeholder(&self) -> String {
        format!("{{{}}}", self.name())
    }

    /// Looks up a variable by placeholder name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rendered values for one event, keyed by variable.
///
/// Built once with [`FromIterator`]; there is no way to change a value
/// afterwards. Missing variables read as empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMap {
    values: BTreeMap<Variable, String>,
}

impl VariableMap {
    /// Returns the value of a variable, or empty text.
    pub fn get(&self, variable: Variable) -> &str {
        self.values.get(&variable).map(String::as_str).unwrap_or("")
    }

    /// Returns true if the variable has no text.
    pub fn is_empty(&self, variable: Variable) -> bool {
        self.get(variable).is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Variable, S)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (Variable, S)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

/// Final block content for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedEvent {
    /// Text of the parent block.
    pub main_content: String,
    /// Text of each child block, in order.
    pub child_blocks: Vec<String>,
}

/// One template line and the separator that preceded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TemplateLine<'a> {
    separator: &'a str,
    text: &'a str,
}

/// Renders a template against a variable map.
pub fn render(template: &str, variables: &VariableMap, include_empty: bool) -> RenderedEvent {
    let suppressed: Vec<Variable> = Variable::ALL
        .into_iter()
        .filter(|v| !include_empty && variables.is_empty(*v))
        .collect();

    let lines = split_lines(template);
    let kept = remove_suppressed_lines(&lines, &suppressed);
    let substituted = substitute(&join_lines(&kept), variables, &suppressed);
    let text = substituted.replace(ESCAPED_NEWLINE, "\n");

    split_children(&text)
}

/// Splits on real and escaped newlines, remembering which one was used.
fn split_lines(template: &str) -> Vec<TemplateLine<'_>> {
    let mut lines = Vec::new();
    let mut separator = "";
    let mut rest = template;

    loop {
        let real = rest.find('\n').map(|at| (at, 1));
        let escaped = rest
            .find(ESCAPED_NEWLINE)
            .map(|at| (at, ESCAPED_NEWLINE.len()));

        let next = match (real, escaped) {
            (Some(r), Some(e)) => Some(if r.0 <= e.0 { r } else { e }),
            (r, e) => r.or(e),
        };

        let Some((at, len)) = next else {
            lines.push(TemplateLine {
                separator,
                text: rest,
            });
            return lines;
        };

        lines.push(TemplateLine {
            separator,
            text: &rest[..at],
        });
        separator = &rest[at..at + len];
        rest = &rest[at + len..];
    }
}

/// Drops every line holding both a property marker and a suppressed placeholder.
fn remove_suppressed_lines<'a>(
    lines: &[TemplateLine<'a>],
    suppressed: &[Variable],
) -> Vec<TemplateLine<'a>> {
    let placeholders: Vec<String> = suppressed.iter().map(Variable::placeholder).collect();

    lines
        .iter()
        .filter(|line| {
            !(line.text.contains(PROPERTY_MARKER)
                && placeholders.iter().any(|p| line.text.contains(p.as_str())))
        })
        .copied()
        .collect()
}

/// Rejoins lines; a dropped line takes its preceding separator with it.
fn join_lines(lines: &[TemplateLine<'_>]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push_str(line.separator);
        }
        out.push_str(line.text);
    }
    out
}

/// Replaces recognized placeholders in one pass; values are never rescanned.
fn substitute(text: &str, variables: &VariableMap, suppressed: &[Variable]) -> String {
    PLACEHOLDER_REGEX
        .replace_all(text, |caps: &Captures<'_>| {
            match Variable::from_name(&caps[1]) {
                Some(variable) if !suppressed.contains(&variable) => {
                    variables.get(variable).to_string()
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn split_children(text: &str) -> RenderedEvent {
    let mut segments = text.split(CHILD_DELIMITER);
    let main_content = segments.next().unwrap_or_default().trim().to_string();
    let child_blocks = segments
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    RenderedEvent {
        main_content,
        child_blocks,
    }
}
