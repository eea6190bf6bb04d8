//! Bounded cache of computed recipe costings.
//!
//! Recipes are immutable once created, so a costing stays valid until the
//! recipe or one of its ingredients is deleted, or the entry expires. Sale entry reads through this cache
//! instead of recomputing the recipe on every request.

use std::sync::Arc;

use moka::future::Cache;

use bakeledger_core::{IngredientId, Recipe, RecipeCosting, RecipeId, compute_metrics};

use crate::config::RecipeCacheConfig;

/// Recipe costings keyed by recipe ID.
#[derive(Clone)]
pub struct RecipeCostCache {
    cache: Cache<RecipeId, Arc<RecipeCosting>>,
}

impl RecipeCostCache {
    /// Create a cache with the configured capacity and TTL.
    #[must_use]
    pub fn new(config: RecipeCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .build();

        Self { cache }
    }

    /// Get a cached costing.
    pub async fn get(&self, id: RecipeId) -> Option<Arc<RecipeCosting>> {
        self.cache.get(&id).await
    }

    /// Compute a recipe's costing and cache it.
    ///
    /// Degraded recipes are logged and cached like any other result.
    pub async fn cost(&self, recipe: Recipe) -> Arc<RecipeCosting> {
        let id = recipe.id;
        let costing = Arc::new(compute_metrics(recipe));

        if let Some(reason) = costing.degraded_reason() {
            tracing::warn!(recipe_id = %id, %reason, "recipe costing degraded");
        }

        self.cache.insert(id, Arc::clone(&costing)).await;
        costing
    }

    /// Drop a recipe's cached costing.
    pub async fn invalidate(&self, id: RecipeId) {
        self.cache.invalidate(&id).await;
    }

    /// Drop every cached costing with a line pointing at `ingredient`.
    ///
    /// Deleting an ingredient clears `ingredient_id` on stored lines; cached
    /// copies would otherwise keep the old reference.
    pub async fn invalidate_ingredient(&self, ingredient: IngredientId) {
        let stale: Vec<RecipeId> = self
            .cache
            .iter()
            .filter(|(_, costing)| {
                costing
                    .recipe()
                    .ingredients
                    .iter()
                    .any(|line| line.ingredient_id == Some(ingredient))
            })
            .map(|(id, _)| *id)
            .collect();

        for id in stale {
            self.cache.invalidate(&id).await;
        }
    }
}
