//! Manifest template rendering
//!
//! Manifest templates use the familiar `{{ .name }}` action syntax. The
//! supported subset is deliberately small:
//!
//! - `{{ .name }}` substitutes a variable; an undefined name is an error.
//! - `{{- ... }}` and `{{ ... -}}` trim whitespace before/after the action.
//! - `{{/* ... */}}` is a comment and produces no output.
//!
//! Anything else inside `{{ }}`, or an unterminated `{{`, is a parse error.
//! Rendering is a pure function of the template text and the variables.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;

/// Variables available to a template
pub type Variables = BTreeMap<String, String>;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(String),
    Variable { name: String, line: usize },
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text; `name` is used in error messages
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let variable = Regex::new(r"^\.([A-Za-z_][A-Za-z0-9_]*)$")?;
        let mut nodes = Vec::new();
        let mut rest = text;
        let mut line = 1;
        let mut trim_next = false;

        while let Some(start) = rest.find(OPEN) {
            let mut literal = &rest[..start];
            if trim_next {
                literal = literal.trim_start();
            }

            let after_open = &rest[start + OPEN.len()..];
            let end = action_end(after_open).ok_or_else(|| Error::Template {
                message: format!(
                    "{}:{}: unclosed action",
                    name,
                    line + rest[..start].matches('\n').count()
                ),
                variable: None,
            })?;
            let mut body = &after_open[..end];

            let trim_left = body.starts_with("- ")
                || body.starts_with("-\n")
                || body.starts_with("-\t");
            if trim_left {
                body = &body[1..];
                literal = literal.trim_end();
            }
            trim_next = body.ends_with(" -") || body.ends_with("\n-") || body.ends_with("\t-");
            if trim_next {
                body = &body[..body.len() - 1];
            }

            if !literal.is_empty() {
                nodes.push(Node::Text(literal.to_string()));
            }

            let action_line = line + rest[..start].matches('\n').count();
            let action = body.trim();

            if action.starts_with("/*") && action.ends_with("*/") && action.len() >= 4 {
                // comment
            } else if let Some(caps) = variable.captures(action) {
                nodes.push(Node::Variable {
                    name: caps[1].to_string(),
                    line: action_line,
                });
            } else {
                return Err(Error::Template {
                    message: format!(
                        "{}:{}: unsupported action '{}'",
                        name, action_line, action
                    ),
                    variable: None,
                });
            }

            let consumed = start + OPEN.len() + end + CLOSE.len();
            line += rest[..consumed].matches('\n').count();
            rest = &rest[consumed..];
        }

        let tail = if trim_next { rest.trim_start() } else { rest };
        if !tail.is_empty() {
            nodes.push(Node::Text(tail.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    /// Names of the variables the template references, sorted and deduplicated
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .nodes
            .iter()
            .filter_map(|node| match node {
                Node::Variable { name, .. } => Some(name.as_str()),
                Node::Text(_) => None,
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Render the template with `vars`
    pub fn execute(&self, vars: &Variables) -> Result<Vec<u8>> {
        let mut out = String::new();

        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Variable { name, line } => {
                    let value = vars.get(name).ok_or_else(|| Error::Template {
                        message: format!("{}:{}: undefined variable", self.name, line),
                        variable: Some(name.clone()),
                    })?;
                    out.push_str(value);
                }
            }
        }

        Ok(out.into_bytes())
    }
}

/// Offset of the closing delimiter in `after_open`, reading a comment
/// through its `*/` so delimiters inside it do not end the action
fn action_end(after_open: &str) -> Option<usize> {
    let trimmed = after_open
        .strip_prefix('-')
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim_start)
        .unwrap_or(after_open);

    if trimmed.starts_with("/*") {
        let comment_start = after_open.len() - trimmed.len();
        let comment_end = comment_start + 2 + trimmed[2..].find("*/")? + 2;
        return after_open[comment_end..]
            .find(CLOSE)
            .map(|offset| comment_end + offset);
    }

    after_open.find(CLOSE)
}

/// Parse and render `text` in one step
pub fn render(name: &str, text: &str, vars: &Variables) -> Result<Vec<u8>> {
    Template::parse(name, text)?.execute(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace(value: &str) -> Variables {
        Variables::from([("namespace".to_string(), value.to_string())])
    }

    fn render_str(text: &str, vars: &Variables) -> Result<String> {
        render("test.yaml", text, vars).map(|b| String::from_utf8(b).unwrap())
    }

    #[test]
    fn test_substitutes_namespace() {
        let out = render_str(
            "metadata:\n  namespace: {{.namespace}}\n  labels:\n    story: {{ .namespace }}\n",
            &namespace("feature-x"),
        )
        .unwrap();

        assert_eq!(
            out,
            "metadata:\n  namespace: feature-x\n  labels:\n    story: feature-x\n"
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = "apiVersion: v1\nkind: Service\n";
        assert_eq!(render_str(text, &Variables::new()).unwrap(), text);
    }

    #[test]
    fn test_trim_markers() {
        let out = render_str("a:   {{- .namespace -}}   \n  b", &namespace("ns")).unwrap();
        assert_eq!(out, "a:nsb");
    }

    #[test]
    fn test_comment_is_dropped() {
        let out = render_str("x{{/* generated */}}y", &Variables::new()).unwrap();
        assert_eq!(out, "xy");
    }

    #[test]
    fn test_comment_may_contain_actions() {
        let out = render_str(
            "a{{/* uses {{ .namespace }} */}}b\n{{- /* } }} */ -}}\nc",
            &Variables::new(),
        )
        .unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let err = render_str("a\n{{/* open }}", &Variables::new()).unwrap_err();
        assert!(err.to_string().contains("test.yaml:2: unclosed action"));
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let err = render_str("region: {{ .region }}", &namespace("ns")).unwrap_err();
        match err {
            Error::Template { message, variable } => {
                assert_eq!(variable.as_deref(), Some("region"));
                assert!(message.contains("test.yaml:1"));
            }
            other => panic!("expected template error, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_action_is_error() {
        let err = render_str("a\nb: {{ .namespace\n", &namespace("ns")).unwrap_err();
        assert!(err.to_string().contains("test.yaml:2: unclosed action"));
    }

    #[test]
    fn test_unsupported_action_is_error() {
        let err = render_str("{{ range .items }}", &namespace("ns")).unwrap_err();
        assert!(err.to_string().contains("unsupported action"));
    }

    #[test]
    fn test_error_line_numbers_follow_actions() {
        let err = render_str("a: {{ .namespace }}\nb: {{ .missing }}\n", &namespace("ns"))
            .unwrap_err();
        assert!(err.to_string().contains("test.yaml:2"));
    }

    #[test]
    fn test_variables_listing() {
        let template =
            Template::parse("t", "{{ .namespace }} {{ .b }} {{ .namespace }}").unwrap();
        assert_eq!(template.variables(), vec!["b", "namespace"]);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let text = "kind: Deployment\nmetadata:\n  namespace: {{ .namespace }}\n";
        let vars = namespace("feature-x");

        let first = render("d.yaml", text, &vars).unwrap();
        let second = render("d.yaml", text, &vars).unwrap();
        assert_eq!(first, second);
    }
}
