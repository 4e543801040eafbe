//! Persistence of recipes and their ingredients.
//!
//! Multi-row writes run in one transaction each: either the recipe and all of
//! its ingredient rows exist, or none of them do.

use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::*;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::entity::{ingredient, recipe};
use crate::models::recipe::RecipeSubmission;

/// A recipe row together with its ingredient rows in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub recipe: recipe::Model,
    pub ingredients: Vec<ingredient::Model>,
}

#[derive(Clone)]
pub struct RecipeStore {
    db: DatabaseConnection,
}

impl RecipeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Insert the recipe and one ingredient row per submitted line.
    ///
    /// `author_id` is the verified caller; the submission never carries one.
    #[instrument(skip(self, submission), fields(name = %submission.name))]
    pub async fn create(
        &self,
        submission: RecipeSubmission,
        author_id: &str,
    ) -> Result<RecipeRecord, DbErr> {
        let now = Utc::now();

        let txn = self.db.begin().await?;

        // v7 ids sort by creation time, which breaks `created_at` ties in listings.
        let recipe = recipe::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(submission.name),
            description: Set(submission.description),
            recipe_yield: Set(submission.recipe_yield),
            instruction: Set(submission.instruction),
            preptime: Set(submission.preptime),
            cooktime: Set(submission.cooktime),
            fatcontent: Set(submission.fatcontent),
            calories: Set(submission.calories),
            meal: Set(submission.meal),
            diet: Set(submission.diet),
            image_url: Set(submission.image_url),
            author_id: Set(author_id.to_owned()),
            datepublished: Set(now.format("%Y-%m-%d").to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut ingredients = Vec::with_capacity(submission.ingredients.len());
        for (position, line) in submission.ingredients.into_iter().enumerate() {
            let position = ingredient_position(position)?;
            let model = ingredient::ActiveModel {
                id: Set(Uuid::new_v4()),
                ingredient: Set(line),
                position: Set(position),
                recipe_id: Set(recipe.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            ingredients.push(model);
        }

        txn.commit().await?;

        info!(recipe_id = %recipe.id, ingredients = ingredients.len(), "Recipe created");
        Ok(RecipeRecord {
            recipe,
            ingredients,
        })
    }

    /// Every recipe, newest first.
    pub async fn get_all(&self) -> Result<Vec<RecipeRecord>, DbErr> {
        let recipes = recipe::Entity::find()
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(&self.db)
            .await?;

        self.attach_ingredients(recipes).await
    }

    /// Recipes published by `author_id`, newest first.
    #[instrument(skip(self))]
    pub async fn get_by_author(&self, author_id: &str) -> Result<Vec<RecipeRecord>, DbErr> {
        let recipes = recipe::Entity::find()
            .filter(recipe::Column::AuthorId.eq(author_id))
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(&self.db)
            .await?;

        self.attach_ingredients(recipes).await
    }

    /// `Ok(None)` when no recipe has this id.
    #[instrument(skip(self))]
    pub async fn get_single(&self, recipe_id: Uuid) -> Result<Option<RecipeRecord>, DbErr> {
        let Some(recipe) = recipe::Entity::find_by_id(recipe_id).one(&self.db).await? else {
            return Ok(None);
        };

        let ingredients = recipe
            .find_related(ingredient::Entity)
            .order_by_asc(ingredient::Column::Position)
            .all(&self.db)
            .await?;

        Ok(Some(RecipeRecord {
            recipe,
            ingredients,
        }))
    }

    /// Owner of the recipe, without loading its ingredients.
    pub async fn author_of(&self, recipe_id: Uuid) -> Result<Option<String>, DbErr> {
        recipe::Entity::find_by_id(recipe_id)
            .select_only()
            .column(recipe::Column::AuthorId)
            .into_tuple::<String>()
            .one(&self.db)
            .await
    }

    /// Remove the recipe's ingredients, then the recipe. Deleting a missing
    /// recipe succeeds without effect. Ownership is not checked here.
    #[instrument(skip(self))]
    pub async fn delete(&self, recipe_id: Uuid) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        let existing = recipe::Entity::find_by_id(recipe_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?;
        if existing.is_none() {
            debug!("Recipe already absent");
            return Ok(());
        }

        let removed = ingredient::Entity::delete_many()
            .filter(ingredient::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await?;
        recipe::Entity::delete_by_id(recipe_id).exec(&txn).await?;

        txn.commit().await?;

        info!(%recipe_id, ingredients = removed.rows_affected, "Recipe deleted");
        Ok(())
    }

    async fn attach_ingredients(
        &self,
        recipes: Vec<recipe::Model>,
    ) -> Result<Vec<RecipeRecord>, DbErr> {
        let grouped = recipes.load_many(ingredient::Entity, &self.db).await?;

        Ok(recipes
            .into_iter()
            .zip(grouped)
            .map(|(recipe, mut ingredients)| {
                ingredients.sort_by_key(|i| i.position);
                RecipeRecord {
                    recipe,
                    ingredients,
                }
            })
            .collect())
    }
}

fn ingredient_position(index: usize) -> Result<i32, DbErr> {
    i32::try_from(index)
        .map_err(|_| DbErr::Custom(format!("ingredient position {index} out of range")))
}
