pub mod acquire;
pub mod config;
pub mod error;
pub mod fraction;
pub mod matcher;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod serializer;

pub use acquire::fetch_record;
pub use config::{FetchConfig, OutputConfig, PestoConfig};
pub use error::PestoError;
pub use model::{Ingredient, Instruction, Metadata, Recipe};
pub use parser::{DefaultIngredientParser, IngredientParser};
pub use pipeline::PestoConverter;
pub use record::RawRecipe;

use log::debug;
use serde_json::Value;

/// Convert a schema.org recipe record to pesto with the default parser and
/// output settings.
///
/// # Example
/// ```
/// use serde_json::json;
///
/// let pesto = recipe2pesto::convert_record(&json!({
///     "name": "Omelette",
///     "recipeIngredient": ["2 eggs"],
///     "recipeInstructions": [{"text": "Beat the eggs"}]
/// }))
/// .unwrap();
/// assert!(pesto.starts_with("%pesto\n+2  \"eggs\" \n[Beat the eggs]\n>Omelette"));
/// ```
pub fn convert_record(record: &Value) -> Result<String, PestoError> {
    PestoConverter::new().convert_value(record)
}

/// Fetch a recipe page and convert the recipe it describes.
pub async fn import_recipe(url: &str) -> Result<String, PestoError> {
    let record = fetch_record(url, &FetchConfig::default()).await?;
    debug!("{:#?}", record);
    convert_record(&record)
}
