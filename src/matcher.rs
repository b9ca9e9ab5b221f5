use crate::model::{Ingredient, Instruction};
use log::debug;
use std::collections::HashSet;

/// Instructions with their matched ingredients, plus the ingredients no
/// instruction mentions.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched {
    pub instructions: Vec<Instruction>,
    pub unused: Vec<Ingredient>,
}

/// Associate every instruction with the ingredients whose name occurs in its
/// text.
///
/// The rule is a plain case-sensitive substring test, nothing smarter: an
/// ingredient named `"egg"` is referenced by `"Beat the eggplant"` and not by
/// `"Add Egg"`. Names are not guarded, so an empty name matches every step.
///
/// Ingredients are deduplicated by value and kept in ingredient-list order,
/// both per instruction and in the unused list.
pub fn match_ingredients<S: AsRef<str>>(ingredients: &[Ingredient], texts: &[S]) -> Matched {
    let mut referenced: HashSet<&Ingredient> = HashSet::new();

    let instructions: Vec<Instruction> = texts
        .iter()
        .map(|text| {
            let text = text.as_ref();
            let mut seen = HashSet::new();
            let matched: Vec<Ingredient> = ingredients
                .iter()
                .filter(|ingredient| text.contains(ingredient.name.as_str()))
                .filter(|ingredient| seen.insert(*ingredient))
                .cloned()
                .collect();
            debug!(
                "Instruction {:?} references {} ingredient(s)",
                text,
                matched.len()
            );
            referenced.extend(seen);
            Instruction {
                original_string: text.to_string(),
                ingredients: matched,
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let unused: Vec<Ingredient> = ingredients
        .iter()
        .filter(|ingredient| !referenced.contains(ingredient))
        .filter(|ingredient| seen.insert(*ingredient))
        .cloned()
        .collect();
    debug!("{} ingredient(s) not mentioned by any instruction", unused.len());

    Matched {
        instructions,
        unused,
    }
}
