//! Path template rendering: `$name` / `${name}` substitution against the
//! document config, with `$$` as the escape for a literal dollar sign.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Substitution variables for path templates. Loaded once per invocation
/// from the document config file, or empty when none is given.
pub type DocConfig = BTreeMap<String, String>;

/// A template referenced a variable the document config does not define.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unresolved variable '${name}' in template '{template}'")]
pub struct TemplateError {
    pub name: String,
    pub template: String,
}

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(
            r"\$(?:(?P<escaped>\$)|(?P<named>[A-Za-z_][A-Za-z0-9_]*)|\{(?P<braced>[A-Za-z_][A-Za-z0-9_]*)\})",
        )
        .unwrap()
    })
}

/// Renders one template, substituting every `$name`/`${name}` token from
/// `config`. Any token without a config entry is a fatal configuration
/// mistake and fails the whole operation.
pub fn render(template: &str, config: &DocConfig) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut tail = 0;
    for captures in token_pattern().captures_iter(template) {
        let token = captures.get(0).unwrap();
        rendered.push_str(&template[tail..token.start()]);
        tail = token.end();

        if captures.name("escaped").is_some() {
            rendered.push('$');
            continue;
        }
        let name = captures
            .name("named")
            .or_else(|| captures.name("braced"))
            .unwrap()
            .as_str();
        match config.get(name) {
            Some(value) => rendered.push_str(value),
            None => {
                return Err(TemplateError {
                    name: name.to_string(),
                    template: template.to_string(),
                })
            }
        }
    }
    rendered.push_str(&template[tail..]);
    Ok(rendered)
}
