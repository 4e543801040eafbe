use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "yield")]
    pub recipe_yield: String,
    #[sea_orm(column_type = "Text")]
    pub instruction: String,
    pub preptime: Option<i32>, // in minutes
    pub cooktime: i32,         // in minutes
    pub fatcontent: Option<String>,
    pub calories: Option<i32>,
    pub meal: String,
    pub diet: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,

    // Opaque user id from the identity provider
    #[sea_orm(indexed)]
    pub author_id: String,
    pub datepublished: String,

    #[sea_orm(has_many)]
    pub ingredients: HasMany<super::ingredient::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
