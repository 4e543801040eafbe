use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use server::config::RecipeConfig;
use server::entity::{ingredient, recipe};

use crate::common::{TestApp, pasta_body, routes, token_for};

mod recipe_creation {
    use super::*;

    #[tokio::test]
    async fn author_can_publish_the_pasta_recipe() {
        let app = TestApp::spawn().await;
        let token = token_for("u1");

        let res = app
            .post_with_token(routes::RECIPES, &pasta_body(), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Pasta");
        assert_eq!(res.body["yield"], "2 portions");
        assert_eq!(res.body["cooktime"], 15);
        assert_eq!(res.body["authorId"], "u1");
        assert!(res.body["preptime"].is_null());
        assert_eq!(res.ingredient_names(), ["Pasta", "Salt", "Olive oil"]);

        let recipe_id = res.id();
        for item in res.body["ingredients"].as_array().unwrap() {
            assert_eq!(item["recipeId"], recipe_id.as_str());
        }
    }

    #[tokio::test]
    async fn publication_date_is_the_creation_day() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(routes::RECIPES, &pasta_body(), &token_for("u1"))
            .await;

        assert_eq!(res.status, 201);
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(res.body["datepublished"], today.as_str());
    }

    #[tokio::test]
    async fn author_in_the_body_is_ignored() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["authorId"] = json!("someone-else");

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;
        assert_eq!(res.status, 201);

        let fetched = app.get_without_token(&routes::recipe(&res.id())).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["authorId"], "u1");
    }

    #[tokio::test]
    async fn numeric_strings_and_ingredient_lists_are_accepted() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["cooktime"] = json!("20");
        body["preptime"] = json!("");
        body["calories"] = json!(640);
        body["ingredients"] = json!(["Flour", {"ingredient": "Eggs"}, "  "]);

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["cooktime"], 20);
        assert!(res.body["preptime"].is_null());
        assert_eq!(res.body["calories"], 640);
        assert_eq!(res.ingredient_names(), ["Flour", "Eggs"]);
    }

    #[tokio::test]
    async fn missing_image_uses_the_configured_default() {
        let app = TestApp::spawn_with(RecipeConfig {
            default_image_url: Some("https://img.example/placeholder.png".into()),
        })
        .await;
        let token = token_for("u1");

        let without = app
            .post_with_token(routes::RECIPES, &pasta_body(), &token)
            .await;
        assert_eq!(without.status, 201);
        assert_eq!(
            without.body["imageUrl"],
            "https://img.example/placeholder.png"
        );

        let mut body = pasta_body();
        body["imageUrl"] = json!("https://img.example/pasta.jpg");
        let with = app.post_with_token(routes::RECIPES, &body, &token).await;
        assert_eq!(with.status, 201);
        assert_eq!(with.body["imageUrl"], "https://img.example/pasta.jpg");
    }

    #[tokio::test]
    async fn image_stays_empty_without_a_configured_default() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(routes::RECIPES, &pasta_body(), &token_for("u1"))
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["imageUrl"].is_null());
    }
}

mod recipe_validation {
    use super::*;

    #[tokio::test]
    async fn short_name_is_rejected_and_nothing_is_stored() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["name"] = json!("P");

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["errors"]["name"][0], "name too short");

        assert_eq!(recipe::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(ingredient::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn every_invalid_field_is_reported_at_once() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["name"] = json!("P");
        body["meal"] = json!("x");
        body["cooktime"] = json!(-5);
        body["ingredients"] = json!("\n  \n");

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        assert_eq!(res.status, 400);
        let errors = res.body["errors"].as_object().unwrap();
        let mut fields: Vec<_> = errors.keys().map(String::as_str).collect();
        fields.sort_unstable();
        assert_eq!(fields, ["cooktime", "ingredients", "meal", "name"]);
        assert_eq!(
            res.body["errors"]["ingredients"][0],
            "at least one ingredient required"
        );
    }

    #[tokio::test]
    async fn mistyped_field_is_reported_alongside_other_violations() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["name"] = json!(5);
        body["meal"] = json!("D");

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["errors"]["name"][0], "name must be a string");
        assert_eq!(res.body["errors"]["meal"][0], "meal too short");
        assert_eq!(recipe::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_cooktime_is_required() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body.as_object_mut().unwrap().remove("cooktime");

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["errors"]["cooktime"][0], "cooktime is required");
    }

    #[tokio::test]
    async fn fractional_preptime_is_rejected() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["preptime"] = json!("2.5");

        let res = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        assert_eq!(res.status, 400);
        assert!(res.body["errors"]["preptime"].is_array());
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_raw_with_token(routes::RECIPES, "{\"name\": ", &token_for("u1"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod recipe_reading {
    use super::*;

    #[tokio::test]
    async fn anyone_can_list_all_recipes_newest_first() {
        let app = TestApp::spawn().await;
        app.create_recipe(&token_for("u1"), "Pasta").await;
        app.create_recipe(&token_for("u2"), "Risotto").await;

        let res = app.get_without_token(routes::RECIPES).await;

        assert_eq!(res.status, 200);
        let recipes = res.body.as_array().unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0]["name"], "Risotto");
        assert_eq!(recipes[1]["name"], "Pasta");
        assert_eq!(recipes[1]["ingredients"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::RECIPES).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn single_recipe_keeps_ingredient_order() {
        let app = TestApp::spawn().await;
        let mut body = pasta_body();
        body["ingredients"] = json!("Zucchini\nApple\nMango");
        let created = app
            .post_with_token(routes::RECIPES, &body, &token_for("u1"))
            .await;

        let res = app.get_without_token(&routes::recipe(&created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.ingredient_names(), ["Zucchini", "Apple", "Mango"]);
    }

    #[tokio::test]
    async fn unknown_recipe_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token(&routes::recipe(&uuid::Uuid::new_v4().to_string()))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_recipe_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::recipe("not-a-uuid")).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn my_recipes_only_include_the_callers_own() {
        let app = TestApp::spawn().await;
        let u1 = token_for("u1");
        let u2 = token_for("u2");
        app.create_recipe(&u1, "Pasta").await;
        app.create_recipe(&u2, "Risotto").await;
        app.create_recipe(&u1, "Lasagne").await;

        let res = app.get_with_token(routes::MY_RECIPES, &u1).await;

        assert_eq!(res.status, 200);
        let names: Vec<_> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Lasagne", "Pasta"]);
        for r in res.body.as_array().unwrap() {
            assert_eq!(r["authorId"], "u1");
        }
    }

    #[tokio::test]
    async fn user_without_recipes_gets_an_empty_list() {
        let app = TestApp::spawn().await;
        app.create_recipe(&token_for("u1"), "Pasta").await;

        let res = app.get_with_token(routes::MY_RECIPES, &token_for("u3")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }
}

mod recipe_deletion {
    use super::*;

    #[tokio::test]
    async fn author_can_delete_their_recipe_and_its_ingredients() {
        let app = TestApp::spawn().await;
        let token = token_for("u1");
        let id = app.create_recipe(&token, "Pasta").await;

        let res = app.delete_with_token(&routes::recipe(&id), &token).await;
        assert_eq!(res.status, 204);

        let fetched = app.get_without_token(&routes::recipe(&id)).await;
        assert_eq!(fetched.status, 404);
        assert_eq!(ingredient::Entity::find().count(&app.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn other_users_cannot_delete_a_recipe() {
        let app = TestApp::spawn().await;
        let id = app.create_recipe(&token_for("u1"), "Pasta").await;

        let res = app
            .delete_with_token(&routes::recipe(&id), &token_for("u2"))
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let fetched = app.get_without_token(&routes::recipe(&id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.ingredient_names().len(), 3);
    }

    #[tokio::test]
    async fn deleting_twice_succeeds() {
        let app = TestApp::spawn().await;
        let token = token_for("u1");
        let id = app.create_recipe(&token, "Pasta").await;

        let first = app.delete_with_token(&routes::recipe(&id), &token).await;
        let second = app.delete_with_token(&routes::recipe(&id), &token).await;

        assert_eq!(first.status, 204);
        assert_eq!(second.status, 204);
    }

    #[tokio::test]
    async fn deleting_one_recipe_leaves_the_others() {
        let app = TestApp::spawn().await;
        let token = token_for("u1");
        let doomed = app.create_recipe(&token, "Pasta").await;
        let kept = app.create_recipe(&token, "Risotto").await;

        let res = app.delete_with_token(&routes::recipe(&doomed), &token).await;
        assert_eq!(res.status, 204);

        let fetched = app.get_without_token(&routes::recipe(&kept)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(ingredient::Entity::find().count(&app.db).await.unwrap(), 3);
    }
}
