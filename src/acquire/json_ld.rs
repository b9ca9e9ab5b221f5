use crate::error::PestoError;
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;

/// Finds a schema.org `Recipe` object among a page's JSON-LD scripts.
pub struct JsonLdExtractor;

impl JsonLdExtractor {
    /// The first recipe object on the page, with HTML entities in every
    /// string value decoded.
    pub fn extract(&self, document: &Html) -> Result<Value, PestoError> {
        let selector = Selector::parse("script[type='application/ld+json']").unwrap();
        let scripts: Vec<_> = document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        // Try each script element until we find a valid recipe
        for (index, script) in scripts.iter().enumerate() {
            let cleaned_json = sanitize_json(&script.inner_html());
            match serde_json::from_str::<Value>(&cleaned_json) {
                Ok(json_ld) => {
                    if let Some(recipe) = find_recipe(&json_ld) {
                        debug!("JsonLdExtractor: Found recipe in script {}", index);
                        return Ok(decode_strings(recipe.clone()));
                    }
                    debug!("JsonLdExtractor: No recipe found in script {}", index);
                }
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                }
            }
        }

        Err(PestoError::NoRecipeFound)
    }
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Recipe object at the root, in a top level array, or in `@graph`.
fn find_recipe(json_ld: &Value) -> Option<&Value> {
    if let Some(items) = json_ld.as_array() {
        items
            .iter()
            .find(|item| is_recipe_type(item) || item.get("recipeInstructions").is_some())
    } else if is_recipe_type(json_ld) || json_ld.get("recipeInstructions").is_some() {
        Some(json_ld)
    } else if let Some(graph) = json_ld.get("@graph") {
        graph
            .as_array()
            .and_then(|items| items.iter().find(|item| is_recipe_type(item)))
    } else {
        None
    }
}

fn decode_html_symbols(text: &str) -> String {
    // for some reason need to decode twice to get the correct string
    decode_html_entities(&decode_html_entities(text)).into_owned()
}

fn decode_strings(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(decode_html_symbols(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(decode_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, decode_strings(value)))
                .collect(),
        ),
        other => other,
    }
}

fn sanitize_json(json_str: &str) -> String {
    let trimmed = json_str.trim();

    // Skip anything in front of the first object
    let start = if trimmed.starts_with('{') || trimmed.starts_with('[') {
        0
    } else {
        trimmed.find('{').unwrap_or(0)
    };

    let chars: Vec<char> = trimmed[start..].chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            cleaned.push(c);
            i += 1;
            continue;
        }

        let rest = &chars[i..];
        match c {
            '"' => {
                in_string = true;
                cleaned.push(c);
            }
            // HTML comment markers around the script body
            '<' if rest.starts_with(&['<', '!', '-', '-']) => {
                i += 4;
                continue;
            }
            '-' if rest.starts_with(&['-', '-', '>']) => {
                i += 3;
                continue;
            }
            ',' => {
                let next_char = rest[1..].iter().copied().find(|c| !c.is_whitespace());
                if matches!(next_char, Some(']' | '}')) {
                    debug!("Dropping trailing comma");
                } else {
                    cleaned.push(c);
                }
            }
            _ => cleaned.push(c),
        }
        i += 1;
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_html_document(json_ld: &str) -> Html {
        let html = format!(
            r#"
            <!DOCTYPE html>
            <html>
            <head>
                <script type="application/ld+json">
                    {json_ld}
                </script>
            </head>
            <body></body>
            </html>
            "#
        );
        Html::parse_document(&html)
    }

    #[test]
    fn test_no_scripts() {
        let document = Html::parse_document("<html><body>Test</body></html>");
        assert!(matches!(
            JsonLdExtractor.extract(&document),
            Err(PestoError::NoRecipeFound)
        ));
    }

    #[test]
    fn test_root_recipe() {
        let document = create_html_document(
            r#"
            {
                "@context": "https://schema.org/",
                "@type": "Recipe",
                "name": "Chocolate Chip Cookies",
                "recipeIngredient": ["flour", "sugar"],
                "recipeInstructions": [{"@type": "HowToStep", "text": "Mix"}]
            }
            "#,
        );

        let record = JsonLdExtractor.extract(&document).unwrap();
        assert_eq!(record["name"], "Chocolate Chip Cookies");
        assert_eq!(record["recipeIngredient"], json!(["flour", "sugar"]));
    }

    #[test]
    fn test_recipe_in_array() {
        let document = create_html_document(
            r#"
            [
                {"@type": "WebSite", "name": "Recipe Website"},
                {"@type": "Recipe", "name": "Pasta Carbonara", "recipeIngredient": [], "recipeInstructions": []}
            ]
            "#,
        );

        let record = JsonLdExtractor.extract(&document).unwrap();
        assert_eq!(record["name"], "Pasta Carbonara");
    }

    #[test]
    fn test_recipe_in_graph() {
        let document = create_html_document(
            r#"
            {
                "@context": "https://schema.org",
                "@graph": [
                    {"@type": "Organization", "name": "Publisher"},
                    {"@type": ["Recipe", "NewsArticle"], "name": "Graph Recipe"}
                ]
            }
            "#,
        );

        let record = JsonLdExtractor.extract(&document).unwrap();
        assert_eq!(record["name"], "Graph Recipe");
    }

    #[test]
    fn test_type_is_case_insensitive() {
        let document = create_html_document(r#"{"@type": "recipe", "name": "Lower"}"#);
        assert_eq!(JsonLdExtractor.extract(&document).unwrap()["name"], "Lower");
    }

    #[test]
    fn test_html_entities_decoded() {
        let document = create_html_document(
            r#"{"@type": "Recipe", "name": "Mac &amp;amp; Cheese", "recipeIngredient": ["1 cup cheddar &quot;sharp&quot;"]}"#,
        );

        let record = JsonLdExtractor.extract(&document).unwrap();
        assert_eq!(record["name"], "Mac & Cheese");
        assert_eq!(record["recipeIngredient"][0], "1 cup cheddar \"sharp\"");
    }

    #[test]
    fn test_trailing_commas_tolerated() {
        let document = create_html_document(
            r#"{"@type": "Recipe", "name": "Sloppy", "recipeIngredient": ["a", "b",],}"#,
        );
        assert_eq!(JsonLdExtractor.extract(&document).unwrap()["name"], "Sloppy");
    }

    #[test]
    fn test_sanitize_leaves_strings_alone() {
        let raw = r#"<!-- {"name": "Tricky <!-- x -->", "note": "a,]b,}", "q": "say \"hi\",]", "list": [1, 2 ,
        ],} -->"#;
        let value: Value = serde_json::from_str(&sanitize_json(raw)).unwrap();
        assert_eq!(value["name"], "Tricky <!-- x -->");
        assert_eq!(value["note"], "a,]b,}");
        assert_eq!(value["q"], "say \"hi\",]");
        assert_eq!(value["list"], json!([1, 2]));
    }

    #[test]
    fn test_punctuation_in_step_text_survives_extraction() {
        let document = create_html_document(
            r#"{"@type": "Recipe", "name": "Lists", "recipeInstructions": [{"text": "Stir (a,b,],c),}"},]}"#,
        );
        let record = JsonLdExtractor.extract(&document).unwrap();
        assert_eq!(record["recipeInstructions"][0]["text"], "Stir (a,b,],c),}");
    }

    #[test]
    fn test_invalid_script_skipped() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">{"@type": "Recipe", "name": "Second"}</script>
            </head><body></body></html>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(JsonLdExtractor.extract(&document).unwrap()["name"], "Second");
    }
}
