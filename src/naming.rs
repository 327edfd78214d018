//! Canonical naming for projects.
//! Converts between a human project name, the project symbol that names the
//! project's namespace, and the program/package name used on the filesystem.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{2,}").unwrap());

// FooBar => Foo_Bar
static CAMEL_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]+)([A-Z])([A-Za-z0-9_]+)").unwrap());

// XMLParser => XML_Parser
static ABBREVIATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z]+)([A-Z])([a-z]+)").unwrap());

/// Identifier naming the namespace of a project, such as `AnXMLParser`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectSymbol(String);

impl ProjectSymbol {
    /// Derives the symbol from a raw project name. See [`symbol_from_name`].
    pub fn from_name<S: AsRef<str>>(raw_name: S) -> Result<Self> {
        symbol_from_name(raw_name)
    }

    /// Wraps an identifier that is already in symbol form.
    pub fn new<S: Into<String>>(symbol: S) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.is_empty() || NON_WORD.is_match(&symbol) {
            return Err(Error::ValidationError(format!(
                "'{symbol}' is not a valid project symbol"
            )));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the main program executable for this symbol.
    pub fn program_name(&self) -> String {
        program_name_from_symbol(&self.0)
    }
}

impl fmt::Display for ProjectSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calculates the project symbol from the given project name.
///
/// Runs of non-word characters become a single underscore, surrounding
/// underscores are dropped and the first character is capitalized. The case
/// of every other character is preserved.
///
/// # Errors
/// * `Error::ValidationError` if the name contains no word characters
///
/// # Examples
/// ```
/// use inochi::naming::symbol_from_name;
///
/// assert_eq!(symbol_from_name("foo!!bar$$qux").unwrap().as_str(), "Foo_bar_qux");
/// ```
pub fn symbol_from_name<S: AsRef<str>>(raw_name: S) -> Result<ProjectSymbol> {
    let raw_name = raw_name.as_ref();
    let name = NON_WORD.replace_all(raw_name, "_");
    let name = UNDERSCORES.replace_all(&name, "_");
    let name = name.trim_matches('_');

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(Error::ValidationError(format!(
            "project name '{raw_name}' contains no word characters"
        )));
    };

    let mut symbol = String::with_capacity(name.len());
    symbol.push(first.to_ascii_uppercase());
    symbol.push_str(chars.as_str());
    Ok(ProjectSymbol(symbol))
}

/// Returns the name of the main program executable, which is the project
/// symbol in snake_case and fully in lowercase.
pub fn program_name_from_symbol<S: AsRef<str>>(symbol: S) -> String {
    camel_to_snake_case(symbol).to_ascii_lowercase()
}

/// Transforms the given input from CamelCase to snake_case.
///
/// Case is preserved; only underscores are inserted. Both rewrites are
/// repeated until nothing changes, because a single pass leaves names with
/// several word boundaries under-segmented.
pub fn camel_to_snake_case<S: AsRef<str>>(input: S) -> String {
    let output = rewrite_to_fixed_point(input.as_ref().to_string(), &CAMEL_CASE);
    rewrite_to_fixed_point(output, &ABBREVIATION)
}

fn rewrite_to_fixed_point(mut input: String, pattern: &Regex) -> String {
    loop {
        let output = pattern.replace_all(&input, "${1}_${2}${3}").into_owned();
        if output == input {
            return output;
        }
        input = output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_symbol_new() {
        assert_eq!(ProjectSymbol::new("FooBar").unwrap().as_str(), "FooBar");
        assert!(ProjectSymbol::new("").is_err());
        assert!(ProjectSymbol::new("Foo Bar").is_err());
    }

    #[test]
    fn test_project_symbol_display() {
        let symbol = ProjectSymbol::from_name("an XML parser").unwrap();
        assert_eq!(symbol.to_string(), "An_XML_parser");
        assert_eq!(symbol.program_name(), "an_xml_parser");
    }
}
