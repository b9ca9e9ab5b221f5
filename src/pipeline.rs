use crate::config::OutputConfig;
use crate::error::PestoError;
use crate::matcher::match_ingredients;
use crate::model::{Ingredient, Recipe};
use crate::parser::{DefaultIngredientParser, IngredientParser};
use crate::record::RawRecipe;
use crate::serializer::render_with_marker;
use log::debug;
use serde_json::Value;

/// Converts raw recipe records into pesto documents.
///
/// The converter holds no per-recipe state; one instance can convert any
/// number of records, from any number of threads.
pub struct PestoConverter {
    parser: Box<dyn IngredientParser>,
    output: OutputConfig,
}

impl Default for PestoConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PestoConverter {
    pub fn new() -> Self {
        Self {
            parser: Box::new(DefaultIngredientParser),
            output: OutputConfig::default(),
        }
    }

    pub fn from_config(output: &OutputConfig) -> Self {
        Self::new().with_output(output.clone())
    }

    /// Use a different ingredient parser
    ///
    /// # Example
    /// ```
    /// use recipe2pesto::{DefaultIngredientParser, PestoConverter};
    ///
    /// let converter = PestoConverter::new().with_parser(DefaultIngredientParser);
    /// ```
    pub fn with_parser(mut self, parser: impl IngredientParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Parse, match and collect everything the serializer needs.
    ///
    /// The first ingredient line that fails to parse aborts the conversion.
    pub fn build_recipe(&self, raw: &RawRecipe) -> Result<Recipe, PestoError> {
        let ingredients = raw
            .ingredient_lines()
            .iter()
            .map(|line| self.parser.parse(line))
            .collect::<Result<Vec<Ingredient>, PestoError>>()?;
        debug!("Parsed {} ingredient(s)", ingredients.len());

        let matched = match_ingredients(&ingredients, &raw.instruction_texts());
        let metadata = raw.metadata(&self.output.author_separator)?;

        Ok(Recipe {
            ingredients,
            instructions: matched.instructions,
            unused: matched.unused,
            metadata,
        })
    }

    pub fn convert(&self, raw: &RawRecipe) -> Result<String, PestoError> {
        let recipe = self.build_recipe(raw)?;
        Ok(render_with_marker(&recipe, &self.output.marker))
    }

    /// Convert a loosely typed record, validating it first.
    pub fn convert_value(&self, record: &Value) -> Result<String, PestoError> {
        let raw = RawRecipe::from_value(record)?;
        self.convert(&raw)
    }
}
