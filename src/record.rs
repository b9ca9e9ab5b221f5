//! The raw schema.org record as handed over by acquisition, validated at the
//! boundary into typed fields.

use crate::error::PestoError;
use crate::model::Metadata;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Keys with a dedicated metadata line, never repeated as `x-schema-` lines
const RESERVED_KEYS: &[&str] = &[
    "name",
    "headline",
    "inLanguage",
    "recipeYield",
    "totalTime",
    "image",
    "author",
];

#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipe {
    #[serde(rename = "recipeIngredient")]
    recipe_ingredient: Option<Vec<String>>,
    #[serde(rename = "recipeInstructions")]
    recipe_instructions: Option<Vec<RawInstruction>>,
    /// Every other key, in record order
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawInstruction {
    Text(String),
    Section {
        #[serde(rename = "itemListElement")]
        item_list_element: Vec<RawInstruction>,
    },
    Step {
        text: String,
    },
}

impl RawInstruction {
    fn collect_texts(self, texts: &mut Vec<String>) {
        match self {
            RawInstruction::Text(text) | RawInstruction::Step { text } => texts.push(text),
            RawInstruction::Section { item_list_element } => {
                for step in item_list_element {
                    step.collect_texts(texts);
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextField {
    String(String),
    Number(serde_json::Number),
    Array(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    Object(ImageObject),
    Multiple(Vec<ImageType>),
}

#[derive(Debug, Deserialize)]
struct AuthorObject {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorEntry {
    Name(String),
    Object(AuthorObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Author {
    Single(AuthorEntry),
    Multiple(Vec<AuthorEntry>),
}

impl AuthorEntry {
    fn into_name(self) -> String {
        match self {
            AuthorEntry::Name(name) => name,
            AuthorEntry::Object(author) => author.name,
        }
    }
}

impl ImageType {
    fn into_url(self) -> Option<String> {
        match self {
            ImageType::String(url) => Some(url),
            ImageType::Object(image) => Some(image.url),
            ImageType::Multiple(images) => images.into_iter().next().and_then(ImageType::into_url),
        }
    }
}

impl RawRecipe {
    /// Validate a loosely typed record.
    ///
    /// Fails with [`PestoError::MissingRequiredField`] when either
    /// `recipeIngredient` or `recipeInstructions` is absent, and with
    /// [`PestoError::InvalidRecord`] when they have the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, PestoError> {
        if !value.is_object() {
            return Err(PestoError::InvalidRecord(
                "recipe record must be a JSON object".to_string(),
            ));
        }
        let recipe: RawRecipe = serde_json::from_value(value.clone())
            .map_err(|e| PestoError::InvalidRecord(e.to_string()))?;
        if recipe.recipe_ingredient.is_none() {
            return Err(PestoError::MissingRequiredField("recipeIngredient"));
        }
        if recipe.recipe_instructions.is_none() {
            return Err(PestoError::MissingRequiredField("recipeInstructions"));
        }
        Ok(recipe)
    }

    pub fn ingredient_lines(&self) -> &[String] {
        self.recipe_ingredient.as_deref().unwrap_or_default()
    }

    /// Display text of every step, sections flattened in order.
    pub fn instruction_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        for instruction in self.recipe_instructions.iter().flatten() {
            instruction.clone().collect_texts(&mut texts);
        }
        texts
    }

    fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PestoError> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| PestoError::InvalidRecord(format!("{key}: {e}"))),
        }
    }

    fn text_field(&self, key: &str) -> Result<Option<String>, PestoError> {
        Ok(self.field::<TextField>(key)?.and_then(|field| match field {
            TextField::String(s) => Some(s),
            TextField::Number(n) => Some(n.to_string()),
            // Prefer the descriptive entry, e.g. "4 servings" over "4"
            TextField::Array(values) => values
                .iter()
                .find(|s| s.contains(char::is_alphabetic))
                .or_else(|| values.first())
                .cloned(),
        }))
    }

    /// Derive the metadata block, joining multiple authors with `author_separator`.
    pub fn metadata(&self, author_separator: &str) -> Result<Metadata, PestoError> {
        let image = self.field::<ImageType>("image")?.and_then(ImageType::into_url);
        let author = self.field::<Author>("author")?.map(|author| match author {
            Author::Single(author) => author.into_name(),
            Author::Multiple(authors) => authors
                .into_iter()
                .map(AuthorEntry::into_name)
                .collect::<Vec<String>>()
                .join(author_separator),
        });

        let other = self
            .fields
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), Some(v.to_string()))))
            .collect();

        Ok(Metadata {
            title: self.text_field("name")?,
            description: self.text_field("headline")?,
            language: self.text_field("inLanguage")?,
            recipe_yield: self.text_field("recipeYield")?,
            time: self.text_field("totalTime")?,
            image,
            author,
            other,
        })
    }
}
