//! Line-based module declarations.
//!
//! ```text
//! # comments run to the end of the line
//! core
//! storage <- core
//! core -> api, cli
//! api <- storage
//! ```
//!
//! `name` declares a module, `name <- a, b` adds upstreams and `name -> a, b`
//! adds downstreams. Repeated lines for one name merge. Names in a list must
//! be declared somewhere in the file; that is checked when the graph is
//! built, not here.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::Module;

const NAME: &str = r"[A-Za-z_][A-Za-z0-9_.:/-]*";

pub struct DeclarationParser {
    declaration: Regex,
    name: Regex,
}

impl DeclarationParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            declaration: Regex::new(&format!(
                r"^(?P<name>{NAME})\s*(?:(?P<arrow><-|->)\s*(?P<refs>.*))?$"
            ))?,
            name: Regex::new(&format!("^{NAME}$"))?,
        })
    }

    /// Parse declarations into modules, in order of first appearance.
    pub fn parse(&self, src: &str) -> Result<Vec<Module>> {
        let mut modules: Vec<Module> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (number, raw) in src.lines().enumerate() {
            let line = number + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let caps = self.declaration.captures(text).ok_or_else(|| Error::Parse {
                line,
                message: format!("expected `name`, `name <- a, b` or `name -> a, b`, found \"{text}\""),
            })?;

            let name = &caps["name"];
            let slot = *index.entry(name.to_string()).or_insert_with(|| {
                modules.push(Module::new(name));
                modules.len() - 1
            });

            let Some(arrow) = caps.name("arrow") else {
                continue;
            };
            let refs = caps.name("refs").map_or("", |m| m.as_str());
            let names = self.name_list(refs, arrow.as_str(), line)?;

            let module = &mut modules[slot];
            for reference in names {
                match arrow.as_str() {
                    "<-" => module.add_upstream(reference),
                    _ => module.add_downstream(reference),
                };
            }
        }

        debug!(modules = modules.len(), "declarations loaded");
        Ok(modules)
    }

    fn name_list<'s>(&self, refs: &'s str, arrow: &str, line: usize) -> Result<Vec<&'s str>> {
        let refs = refs.trim();
        if refs.is_empty() {
            return Err(Error::Parse {
                line,
                message: format!("missing module names after `{arrow}`"),
            });
        }

        refs.split(',')
            .map(str::trim)
            .map(|name| {
                if self.name.is_match(name) {
                    Ok(name)
                } else if name.is_empty() {
                    Err(Error::Parse {
                        line,
                        message: "empty module name in list".into(),
                    })
                } else {
                    Err(Error::Parse {
                        line,
                        message: format!("invalid module name \"{name}\""),
                    })
                }
            })
            .collect()
    }
}

/// Parse declarations with a fresh [`DeclarationParser`].
pub fn load_modules(src: &str) -> Result<Vec<Module>> {
    DeclarationParser::new()?.parse(src)
}

#[cfg(test)]
#[path = "../tests/rust/test_loader.rs"]
mod tests;
