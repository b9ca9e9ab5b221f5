//! Turning free-form ingredient lines into [`Ingredient`] records.
//!
//! The pipeline only depends on the [`IngredientParser`] trait. The default
//! implementation is a small heuristic: quantity, then an optional known
//! unit, then the name, with parentheticals and anything after the first
//! non-decimal comma collected into the comment.

use crate::error::PestoError;
use crate::model::Ingredient;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

pub trait IngredientParser: Send + Sync {
    fn parse(&self, line: &str) -> Result<Ingredient, PestoError>;
}

/// Mixed numbers, plain fractions, decimals (`0.5` or `0,5`) and unicode vulgar fractions.
/// Digits are ASCII only so every capture parses as `f64`.
static QUANTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<mixed_whole>[0-9]+)\s+(?P<mixed_num>[0-9]+)/(?P<mixed_den>[0-9]+)|(?P<num>[0-9]+)/(?P<den>[0-9]+)|(?P<number>[0-9]+(?:[.,][0-9]+)?)\s*(?P<trailing>[½⅓⅔¼¾⅛⅜⅝⅞])?|(?P<vulgar>[½⅓⅔¼¾⅛⅜⅝⅞]))",
    )
    .unwrap()
});

static PARENTHETICAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]*\)").unwrap());

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Unit spellings and the canonical name they normalize to
const UNITS: &[(&[&str], &str)] = &[
    (&["cup", "cups", "c"], "cup"),
    (&["tablespoon", "tablespoons", "tbsp", "tbs", "tbl"], "tablespoon"),
    (&["teaspoon", "teaspoons", "tsp"], "teaspoon"),
    (&["gram", "grams", "g", "gr"], "gram"),
    (&["kilogram", "kilograms", "kg"], "kilogram"),
    (&["milliliter", "milliliters", "millilitre", "millilitres", "ml"], "milliliter"),
    (&["liter", "liters", "litre", "litres", "l"], "liter"),
    (&["ounce", "ounces", "oz"], "ounce"),
    (&["pound", "pounds", "lb", "lbs"], "pound"),
    (&["quart", "quarts", "qt"], "quart"),
    (&["pint", "pints", "pt"], "pint"),
    (&["pinch", "pinches"], "pinch"),
    (&["dash", "dashes"], "dash"),
    (&["clove", "cloves"], "clove"),
    (&["can", "cans"], "can"),
    (&["slice", "slices"], "slice"),
    (&["stick", "sticks"], "stick"),
    (&["bunch", "bunches"], "bunch"),
];

fn vulgar_value(c: &str) -> f64 {
    match c {
        "½" => 1.0 / 2.0,
        "⅓" => 1.0 / 3.0,
        "⅔" => 2.0 / 3.0,
        "¼" => 1.0 / 4.0,
        "¾" => 3.0 / 4.0,
        "⅛" => 1.0 / 8.0,
        "⅜" => 3.0 / 8.0,
        "⅝" => 5.0 / 8.0,
        "⅞" => 7.0 / 8.0,
        _ => 0.0,
    }
}

/// Byte offset of the first comma that separates the comment, skipping
/// decimal commas like the one in `1,5 kg`.
fn comment_separator(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    text.match_indices(',').map(|(i, _)| i).find(|&i| {
        let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
        let digit_after = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        !(digit_before && digit_after)
    })
}

fn canonical_unit(word: &str) -> Option<&'static str> {
    let word = word.trim_end_matches('.').to_lowercase();
    UNITS
        .iter()
        .find(|(aliases, _)| aliases.contains(&word.as_str()))
        .map(|(_, canonical)| *canonical)
}

/// Heuristic parser used when no other [`IngredientParser`] is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultIngredientParser;

impl DefaultIngredientParser {
    /// Leading quantity of `text` and the rest of the line after it.
    fn split_quantity<'a>(&self, line: &str, text: &'a str) -> Result<(f64, &'a str), PestoError> {
        let Some(caps) = QUANTITY_REGEX.captures(text) else {
            return Ok((1.0, text));
        };
        let number = |name: &str| -> Result<f64, PestoError> {
            caps.name(name)
                .map(|m| m.as_str())
                .unwrap_or("0")
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|e| PestoError::parse_failure(line, e.to_string()))
        };
        let ratio = |num: &str, den: &str| -> Result<f64, PestoError> {
            let denominator = number(den)?;
            if denominator == 0.0 {
                return Err(PestoError::parse_failure(line, "zero denominator"));
            }
            Ok(number(num)? / denominator)
        };

        let quantity = if caps.name("mixed_whole").is_some() {
            number("mixed_whole")? + ratio("mixed_num", "mixed_den")?
        } else if caps.name("num").is_some() {
            ratio("num", "den")?
        } else if caps.name("number").is_some() {
            number("number")? + caps.name("trailing").map_or(0.0, |m| vulgar_value(m.as_str()))
        } else {
            caps.name("vulgar").map_or(1.0, |m| vulgar_value(m.as_str()))
        };

        Ok((quantity, &text[caps.get(0).map_or(0, |m| m.end())..]))
    }
}

impl IngredientParser for DefaultIngredientParser {
    fn parse(&self, line: &str) -> Result<Ingredient, PestoError> {
        let mut comments: Vec<String> = PARENTHETICAL_REGEX
            .find_iter(line)
            .map(|m| m.as_str().to_string())
            .collect();
        let without_parens = PARENTHETICAL_REGEX.replace_all(line, " ");
        let without_parens = WHITESPACE_REGEX.replace_all(without_parens.trim(), " ");

        let (head, tail) = match comment_separator(&without_parens) {
            Some(i) => (
                without_parens[..i].trim(),
                Some(without_parens[i + 1..].trim()),
            ),
            None => (&*without_parens, None),
        };
        if let Some(tail) = tail.filter(|t| !t.is_empty()) {
            comments.push(tail.to_string());
        }

        let (quantity, rest) = self.split_quantity(line, head)?;
        let rest = rest.trim_start();

        let (unit, rest) = match rest.split_once(' ') {
            Some((word, remainder)) => match canonical_unit(word) {
                Some(unit) => (unit, remainder),
                None => ("", rest),
            },
            None => ("", rest),
        };

        let rest = rest.trim();
        let name = rest
            .strip_prefix("of ")
            .unwrap_or(rest)
            .trim()
            .trim_end_matches(['.', ';', ':'])
            .to_string();
        if name.is_empty() {
            return Err(PestoError::parse_failure(line, "no ingredient name"));
        }

        let ingredient = Ingredient {
            name,
            quantity,
            unit: unit.to_string(),
            comment: comments.join(", "),
            original_string: line.to_string(),
        };
        debug!("Parsed ingredient {:?} -> {:?}", line, ingredient);
        Ok(ingredient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Ingredient {
        DefaultIngredientParser.parse(line).unwrap()
    }

    #[test]
    fn test_quantity_unit_name() {
        let ingredient = parse("2 cups flour");
        assert_eq!(ingredient.name, "flour");
        assert_eq!(ingredient.quantity, 2.0);
        assert_eq!(ingredient.unit, "cup");
        assert_eq!(ingredient.comment, "");
        assert_eq!(ingredient.original_string, "2 cups flour");
    }

    #[test]
    fn test_no_unit() {
        let ingredient = parse("1 egg");
        assert_eq!(ingredient.name, "egg");
        assert_eq!(ingredient.quantity, 1.0);
        assert_eq!(ingredient.unit, "");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(parse("1/2 cup sugar").quantity, 0.5);
        assert_eq!(parse("1 1/2 tsp salt").quantity, 1.5);
        assert_eq!(parse("¾ cup milk").quantity, 0.75);
        assert_eq!(parse("1½ cups water").quantity, 1.5);
        assert_eq!(parse("0.25 l cream").quantity, 0.25);
    }

    #[test]
    fn test_decimal_comma() {
        let ingredient = parse("1,5 kg Mehl");
        assert_eq!(ingredient.quantity, 1.5);
        assert_eq!(ingredient.unit, "kilogram");
        assert_eq!(ingredient.name, "Mehl");
        assert_eq!(ingredient.comment, "");
    }

    #[test]
    fn test_decimal_comma_with_comment() {
        let ingredient = parse("0,5 l Milch, lauwarm");
        assert_eq!(ingredient.quantity, 0.5);
        assert_eq!(ingredient.name, "Milch");
        assert_eq!(ingredient.comment, "lauwarm");
    }

    #[test]
    fn test_comma_after_digit_still_separates() {
        let ingredient = parse("2 eggs, 1 beaten");
        assert_eq!(ingredient.name, "eggs");
        assert_eq!(ingredient.comment, "1 beaten");
    }

    #[test]
    fn test_non_ascii_digits_are_not_quantities() {
        let ingredient = parse("２ cups flour");
        assert_eq!(ingredient.quantity, 1.0);
        assert_eq!(ingredient.name, "２ cups flour");

        let ingredient = parse("٣ eggs");
        assert_eq!(ingredient.quantity, 1.0);
        assert_eq!(ingredient.name, "٣ eggs");
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        let ingredient = parse("salt");
        assert_eq!(ingredient.quantity, 1.0);
        assert_eq!(ingredient.name, "salt");
    }

    #[test]
    fn test_comma_tail_becomes_comment() {
        let ingredient = parse("2 cups flour, sifted");
        assert_eq!(ingredient.name, "flour");
        assert_eq!(ingredient.comment, "sifted");
    }

    #[test]
    fn test_parenthetical_kept_with_parens() {
        let ingredient = parse("1 cup brown sugar (packed)");
        assert_eq!(ingredient.name, "brown sugar");
        assert_eq!(ingredient.comment, "(packed)");
    }

    #[test]
    fn test_unit_abbreviations() {
        assert_eq!(parse("2 Tbsp. butter").unit, "tablespoon");
        assert_eq!(parse("500 g pasta").unit, "gram");
        assert_eq!(parse("3 lbs potatoes").unit, "pound");
    }

    #[test]
    fn test_of_is_stripped() {
        assert_eq!(parse("1 pinch of nutmeg").name, "nutmeg");
    }

    #[test]
    fn test_unit_word_alone_is_a_name() {
        let ingredient = parse("2 cans");
        assert_eq!(ingredient.unit, "");
        assert_eq!(ingredient.name, "cans");
    }

    #[test]
    fn test_empty_name_is_parse_failure() {
        assert!(matches!(
            DefaultIngredientParser.parse("2 (about a cup)"),
            Err(PestoError::ParseFailure { .. })
        ));
        assert!(matches!(
            DefaultIngredientParser.parse("   "),
            Err(PestoError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_zero_denominator_is_parse_failure() {
        assert!(DefaultIngredientParser.parse("1/0 cup rice").is_err());
    }
}
