use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entity::ingredient;
use crate::store::RecipeRecord;

use super::validation::{ValidationErrors, Validator};

/// Raw recipe submission as sent by the client.
///
/// Fields are kept as raw JSON so that missing fields and values of the wrong
/// type are both reported per field by [`validate_create_recipe`] rather than
/// as a single decode failure. Unknown keys (including any `authorId`) are
/// ignored.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeRequest {
    /// At least 2 characters.
    #[schema(value_type = String, example = "Pasta")]
    pub name: Option<Value>,
    /// At least 3 characters.
    #[schema(value_type = String, example = "Quick pasta")]
    pub description: Option<Value>,
    /// At least 2 characters.
    #[schema(value_type = String, example = "Vegetarian")]
    pub diet: Option<Value>,
    /// Free-text portion description, at least 1 character.
    #[serde(rename = "yield")]
    #[schema(value_type = String, example = "2 portions")]
    pub recipe_yield: Option<Value>,
    /// At least 3 characters.
    #[schema(value_type = String, example = "Boil. Mix.")]
    pub instruction: Option<Value>,
    /// Newline-separated block or a list of lines; blank lines are dropped.
    #[schema(value_type = String, example = "Pasta\nSalt\n\nOlive oil")]
    pub ingredients: Option<Value>,
    /// Minutes, number or numeric string.
    #[schema(value_type = Option<i32>, example = 5)]
    pub preptime: Option<Value>,
    /// Minutes, number or numeric string. Required.
    #[schema(value_type = i32, example = 15)]
    pub cooktime: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub fatcontent: Option<Value>,
    #[schema(value_type = Option<i32>, example = 520)]
    pub calories: Option<Value>,
    /// Meal category, at least 3 characters.
    #[schema(value_type = String, example = "Dinner")]
    pub meal: Option<Value>,
    /// URL returned by the image host; stored as given.
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Value>,
}

/// A submission that passed every field rule, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSubmission {
    pub name: String,
    pub description: String,
    pub diet: String,
    pub recipe_yield: String,
    pub instruction: String,
    pub ingredients: Vec<String>,
    pub preptime: Option<i32>,
    pub cooktime: i32,
    pub fatcontent: Option<String>,
    pub calories: Option<i32>,
    pub meal: String,
    pub image_url: Option<String>,
}

pub fn validate_create_recipe(
    req: CreateRecipeRequest,
) -> Result<RecipeSubmission, ValidationErrors> {
    let mut v = Validator::new();

    let name = v.text("name", req.name, 2);
    let description = v.text("description", req.description, 3);
    let diet = v.text("diet", req.diet, 2);
    let recipe_yield = v.text("yield", req.recipe_yield, 1);
    let instruction = v.text("instruction", req.instruction, 3);
    let ingredients = v.ingredients("ingredients", req.ingredients);
    let preptime = v.optional_whole_number("preptime", req.preptime);
    let cooktime = v.whole_number("cooktime", req.cooktime);
    let fatcontent = v.optional_text("fatcontent", req.fatcontent, 1);
    let calories = v.optional_whole_number("calories", req.calories);
    let meal = v.text("meal", req.meal, 3);
    let image_url = v.optional_string("imageUrl", req.image_url);

    match (
        name,
        description,
        diet,
        recipe_yield,
        instruction,
        ingredients,
        preptime,
        cooktime,
        fatcontent,
        calories,
        meal,
        image_url,
    ) {
        (
            Some(name),
            Some(description),
            Some(diet),
            Some(recipe_yield),
            Some(instruction),
            Some(ingredients),
            Some(preptime),
            Some(cooktime),
            Some(fatcontent),
            Some(calories),
            Some(meal),
            Some(image_url),
        ) => Ok(RecipeSubmission {
            name,
            description,
            diet,
            recipe_yield,
            instruction,
            ingredients,
            preptime,
            cooktime,
            fatcontent,
            calories,
            meal,
            image_url,
        }),
        _ => Err(v.into_errors()),
    }
}

#[derive(Serialize, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: Uuid,
    #[schema(example = "Olive oil")]
    pub ingredient: String,
    pub recipe_id: Uuid,
}

#[derive(Serialize, Debug, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: Uuid,
    #[schema(example = "Pasta")]
    pub name: String,
    pub description: String,
    #[serde(rename = "yield")]
    pub recipe_yield: String,
    pub instruction: String,
    pub preptime: Option<i32>,
    pub cooktime: i32,
    pub fatcontent: Option<String>,
    pub calories: Option<i32>,
    pub meal: String,
    pub diet: String,
    pub image_url: Option<String>,
    /// Identity of the user who published the recipe.
    #[schema(example = "user_2NNEqL2nrIRdJ194ndJqAHwEfxC")]
    pub author_id: String,
    /// Publication date, `YYYY-MM-DD` (UTC).
    #[schema(example = "2026-10-19")]
    pub datepublished: String,
    pub created_at: DateTime<Utc>,
    /// In the order they were submitted.
    pub ingredients: Vec<IngredientResponse>,
}

impl From<ingredient::Model> for IngredientResponse {
    fn from(m: ingredient::Model) -> Self {
        Self {
            id: m.id,
            ingredient: m.ingredient,
            recipe_id: m.recipe_id,
        }
    }
}

impl From<RecipeRecord> for RecipeResponse {
    fn from(record: RecipeRecord) -> Self {
        let m = record.recipe;
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            recipe_yield: m.recipe_yield,
            instruction: m.instruction,
            preptime: m.preptime,
            cooktime: m.cooktime,
            fatcontent: m.fatcontent,
            calories: m.calories,
            meal: m.meal,
            diet: m.diet,
            image_url: m.image_url,
            author_id: m.author_id,
            datepublished: m.datepublished,
            created_at: m.created_at,
            ingredients: record.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}
