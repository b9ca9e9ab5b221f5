//! Rendering of the pesto markup.
//!
//! A document is a marker line, the ingredients no step mentions, each step
//! preceded by the ingredients it mentions, and a metadata block:
//!
//! ```text
//! %pesto
//! +1 pinch "salt"
//! +2 cup "flour" (sifted)
//! [Sift the flour]
//! >Bread
//! (description: Plain white bread)
//! ```

use crate::fraction::format_quantity;
use crate::model::{Ingredient, Instruction, Metadata, Recipe};
use std::fmt;

pub const DEFAULT_MARKER: &str = "%pesto";

/// Double-quote `s`, escaping inner quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}

/// Parenthesize `s`, escaping inner parentheses.
pub fn paren(s: &str) -> String {
    format!("({})", s.replace('(', "\\(").replace(')', "\\)"))
}

fn format_comment(comment: &str) -> String {
    let comment = comment.trim();
    if comment.starts_with('(') && comment.ends_with(')') {
        comment.to_string()
    } else if comment.is_empty() {
        String::new()
    } else {
        paren(comment)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            format_quantity(self.quantity),
            self.unit.clone(),
            quote(&self.name),
            format_comment(&self.comment),
        ];
        write!(f, "+{}", fields.join(" "))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.original_string)
    }
}

impl Metadata {
    /// Metadata block lines. Absent fields keep their slot as an empty line.
    pub fn lines(&self) -> Vec<String> {
        let title = self.title.as_deref().unwrap_or("None");
        let mut lines = vec![format!(">{title}")];

        let fields = [
            ("description", &self.description),
            ("language", &self.language),
            ("yield", &self.recipe_yield),
            ("time", &self.time),
            ("image", &self.image),
            ("author", &self.author),
        ];
        lines.extend(fields.iter().map(|(key, value)| field_line(key, value.as_deref())));

        lines.extend(
            self.other
                .iter()
                .map(|(key, value)| field_line(&format!("x-schema-{key}"), value.as_deref())),
        );
        lines
    }
}

fn field_line(key: &str, value: Option<&str>) -> String {
    value.map_or_else(String::new, |value| format!("({key}: {value})"))
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

/// Render `recipe` as a pesto document starting with `marker`.
pub fn render_with_marker(recipe: &Recipe, marker: &str) -> String {
    let mut lines = vec![marker.to_string()];
    lines.extend(recipe.unused.iter().map(ToString::to_string));

    for instruction in &recipe.instructions {
        lines.extend(instruction.ingredients.iter().map(ToString::to_string));
        lines.push(instruction.to_string());
    }

    lines.extend(recipe.metadata.lines());
    lines.join("\n")
}

pub fn render(recipe: &Recipe) -> String {
    render_with_marker(recipe, DEFAULT_MARKER)
}
