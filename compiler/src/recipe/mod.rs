//! Named presets that expand to a canonical pipeline string.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CompileResult, CompilerError};
use crate::ir::ProcessGraph;

const BUILTIN_RECIPES: &str = include_str!("recipes.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub pipeline: String,
    /// Processes that must be present once dependencies are resolved.
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: IndexMap<String, Recipe>,
}

impl RecipeCatalog {
    pub fn builtin() -> CompileResult<Self> {
        Self::from_json(BUILTIN_RECIPES)
    }

    pub fn from_json(json: &str) -> CompileResult<Self> {
        let file = serde_json::from_str::<RecipeFile>(json).map_err(|e| {
            CompilerError::config("C001", format!("Failed to parse recipe JSON: {e}"))
        })?;
        Self::from_recipes(file.recipes)
    }

    pub fn from_recipes(list: Vec<Recipe>) -> CompileResult<Self> {
        let mut recipes = IndexMap::with_capacity(list.len());
        for recipe in list {
            if recipes.contains_key(&recipe.name) {
                return Err(CompilerError::config(
                    "C002",
                    format!("Recipe '{}' is declared more than once", recipe.name),
                ));
            }
            recipes.insert(recipe.name.clone(), recipe);
        }
        Ok(RecipeCatalog { recipes })
    }

    /// Look up a recipe's pipeline string and its required processes.
    pub fn resolve(&self, name: &str) -> CompileResult<(&str, &[String])> {
        self.recipes
            .get(name)
            .map(|r| (r.pipeline.as_str(), r.required.as_slice()))
            .ok_or_else(|| CompilerError::unknown_recipe(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }
}

/// Ensure every process a recipe depends on made it into the resolved graph.
pub fn check_required(
    recipe: &str,
    required: &[String],
    graph: &ProcessGraph,
) -> CompileResult<()> {
    for name in required {
        if !graph.processes().any(|p| &p.name == name) {
            return Err(CompilerError::unresolvable(
                "R002",
                format!(
                    "Recipe '{recipe}' requires process '{name}', which is missing from the resolved pipeline"
                ),
                Some(name.clone()),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builtin_recipes_resolve() {
        let recipes = RecipeCatalog::builtin().unwrap();
        let (pipeline, required) = recipes.resolve("plasmids").unwrap();
        assert_eq!(pipeline, "integrity_coverage mapping_patlas");
        assert_eq!(required, ["mapping_patlas".to_string()]);
    }

    #[test]
    fn unknown_recipe() {
        let recipes = RecipeCatalog::builtin().unwrap();
        let err = recipes.resolve("does_not_exist").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownRecipe);
        assert_eq!(err.code, "R001");
        assert_eq!(err.token.as_deref(), Some("does_not_exist"));
    }

    #[test]
    fn duplicate_recipe_rejected() {
        let r = Recipe {
            name: "x".into(),
            pipeline: "a".into(),
            required: vec![],
            description: String::new(),
        };
        let err = RecipeCatalog::from_recipes(vec![r.clone(), r]).unwrap_err();
        assert_eq!(err.code, "C002");
    }
}
