use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .nest("/recipes", recipe_routes())
}

fn recipe_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::recipe::list_recipes,
            handlers::recipe::create_recipe
        ))
        .routes(routes!(handlers::recipe::list_my_recipes))
        .routes(routes!(
            handlers::recipe::get_recipe,
            handlers::recipe::delete_recipe
        ))
}
