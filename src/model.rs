use std::hash::{Hash, Hasher};

/// One parsed ingredient line.
///
/// Equality is over every field, so two lines that parse identically are the
/// same ingredient as far as matching and deduplication go. Quantities are
/// compared by canonical bit pattern: `0.0` equals `-0.0` and every NaN
/// equals every other NaN, keeping `Eq` and `Hash` consistent for any parser.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    /// Empty when the line has no unit
    pub unit: String,
    /// Empty when the line has no annotation
    pub comment: String,
    pub original_string: String,
}

impl Ingredient {
    fn quantity_bits(&self) -> u64 {
        if self.quantity.is_nan() {
            f64::NAN.to_bits()
        } else if self.quantity == 0.0 {
            0.0f64.to_bits()
        } else {
            self.quantity.to_bits()
        }
    }
}

impl PartialEq for Ingredient {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.quantity_bits() == other.quantity_bits()
            && self.unit == other.unit
            && self.comment == other.comment
            && self.original_string == other.original_string
    }
}

impl Eq for Ingredient {}

impl Hash for Ingredient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.quantity_bits().hash(state);
        self.unit.hash(state);
        self.comment.hash(state);
        self.original_string.hash(state);
    }
}

/// One instruction step and the ingredients it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub original_string: String,
    /// Deduplicated, in order of first appearance in the ingredient list
    pub ingredients: Vec<Ingredient>,
}

/// Recipe level descriptive fields. Absent fields are `None`, never `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub recipe_yield: Option<String>,
    pub time: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    /// Extension fields in record order
    pub other: Vec<(String, Option<String>)>,
}

/// A fully matched recipe, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    /// Ingredients mentioned by no instruction
    pub unused: Vec<Ingredient>,
    pub metadata: Metadata,
}
