//! Repository behaviour against a real `PostgreSQL` database.
//!
//! These tests require:
//! - A running `PostgreSQL` database reachable through `DATABASE_URL`
//!
//! Each test applies the server migrations first and uses unique names, so
//! they can share one database and run in parallel.
//!
//! Run with: cargo test -p bakeledger-integration-tests --test database -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bakeledger_core::{
    DateRange, FixedCostLine, Ingredient, IngredientId, PaymentMethod, Recipe, Sale,
    SaleQuantities, compute_metrics, price_sale,
};
use bakeledger_server::db::ingredients::NewIngredient;
use bakeledger_server::db::operational_costs::NewOperationalCost;
use bakeledger_server::db::recipes::{NewIngredientLine, NewRecipe};
use bakeledger_server::db::sales::NewSale;
use bakeledger_server::db::{
    IngredientRepository, OperationalCostRepository, RecipeRepository, RepositoryError,
    SaleRepository,
};

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let pool = PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

fn unique(prefix: &str) -> String {
    static NEXT: AtomicU32 = AtomicU32::new(0);
    format!(
        "{prefix} {}-{}",
        Utc::now().timestamp_micros(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    )
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn ingredient(pool: &PgPool, name: &str, cost: &str) -> Ingredient {
    IngredientRepository::new(pool)
        .create(&NewIngredient {
            name: unique(name),
            cost: dec(cost),
            unit: "kg".to_string(),
        })
        .await
        .unwrap()
}

/// Yield 10, margin 50%, one unit of `chocolate` plus 5.00 of gas.
async fn brigadeiro(pool: &PgPool, chocolate: &Ingredient) -> Recipe {
    RecipeRepository::new(pool)
        .create(&NewRecipe {
            name: unique("Brigadeiro"),
            total_quantity_yield: dec("10"),
            profit_margin: dec("50"),
            ingredients: vec![NewIngredientLine {
                ingredient_id: chocolate.id,
                quantity: Decimal::ONE,
            }],
            fixed_costs: vec![FixedCostLine {
                label: "Gas".to_string(),
                cost: dec("5"),
            }],
        })
        .await
        .unwrap()
}

async fn sell(pool: &PgPool, recipe: &Recipe, day: &str, quantity: &str) -> Sale {
    let costing = compute_metrics(recipe.clone());
    let quantities = SaleQuantities {
        quantity_sold: dec(quantity),
        delivery_fee: Decimal::ZERO,
        delivery_cost: Decimal::ZERO,
    };
    let totals = price_sale(costing.metrics().unwrap(), quantities).unwrap();

    SaleRepository::new(pool)
        .create(&NewSale {
            recipe_id: recipe.id,
            recipe_name: recipe.name.clone(),
            sale_date: date(day),
            payment_method: PaymentMethod::Pix,
            quantities,
            totals,
        })
        .await
        .unwrap()
}

// ============================================================================
// Recipe Snapshots
// ============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_recipe_freezes_ingredient_cost() {
    let pool = pool().await;
    let butter = ingredient(&pool, "Butter", "12.50").await;

    let recipe = RecipeRepository::new(&pool)
        .create(&NewRecipe {
            name: unique("Shortbread"),
            total_quantity_yield: dec("4"),
            profit_margin: dec("20"),
            ingredients: vec![NewIngredientLine {
                ingredient_id: butter.id,
                quantity: dec("0.5"),
            }],
            fixed_costs: vec![],
        })
        .await
        .unwrap();
    assert_eq!(recipe.ingredients[0].cost, dec("6.25"));

    // Deleting the ingredient only clears the reference on the line.
    assert!(IngredientRepository::new(&pool).delete(butter.id).await.unwrap());

    let stored = RecipeRepository::new(&pool)
        .get(recipe.id)
        .await
        .unwrap()
        .unwrap();
    let line = &stored.ingredients[0];
    assert_eq!(line.ingredient_id, None);
    assert_eq!(line.name, butter.name);
    assert_eq!(line.cost, dec("6.25"));
    assert_eq!(line.quantity, dec("0.5"));
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_unknown_ingredient_rolls_back_recipe() {
    let pool = pool().await;
    let name = unique("Ghost cake");

    let err = RecipeRepository::new(&pool)
        .create(&NewRecipe {
            name: name.clone(),
            total_quantity_yield: Decimal::ONE,
            profit_margin: Decimal::ZERO,
            ingredients: vec![NewIngredientLine {
                ingredient_id: IngredientId::new(i32::MAX),
                quantity: Decimal::ONE,
            }],
            fixed_costs: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Invalid(_)));

    let recipes = RecipeRepository::new(&pool).list().await.unwrap();
    assert!(recipes.iter().all(|recipe| recipe.name != name));
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_line_cost_beyond_column_range_is_invalid() {
    let pool = pool().await;
    let flour = ingredient(&pool, "Flour", "10").await;

    let err = RecipeRepository::new(&pool)
        .create(&NewRecipe {
            name: unique("Silo"),
            total_quantity_yield: Decimal::ONE,
            profit_margin: Decimal::ZERO,
            ingredients: vec![NewIngredientLine {
                ingredient_id: flour.id,
                quantity: dec("20000000"),
            }],
            fixed_costs: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Invalid(_)));
}

// ============================================================================
// Unique Names
// ============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_duplicate_names_conflict() {
    let pool = pool().await;
    let sugar = ingredient(&pool, "Sugar", "4.99").await;

    let err = IngredientRepository::new(&pool)
        .create(&NewIngredient {
            name: sugar.name.clone(),
            cost: Decimal::ONE,
            unit: "kg".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let recipe = brigadeiro(&pool, &sugar).await;
    let err = RecipeRepository::new(&pool)
        .create(&NewRecipe {
            name: recipe.name.clone(),
            total_quantity_yield: Decimal::ONE,
            profit_margin: Decimal::ZERO,
            ingredients: vec![],
            fixed_costs: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));
}

// ============================================================================
// Sales
// ============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_recipe_delete_keeps_sale_snapshot() {
    let pool = pool().await;
    let chocolate = ingredient(&pool, "Chocolate", "10").await;
    let recipe = brigadeiro(&pool, &chocolate).await;

    let sale = sell(&pool, &recipe, "2024-03-05", "10").await;
    assert_eq!(sale.total_revenue, dec("22.50"));
    assert_eq!(sale.total_profit, dec("7.50"));

    assert!(RecipeRepository::new(&pool).delete(recipe.id).await.unwrap());

    let stored = SaleRepository::new(&pool)
        .list()
        .await
        .unwrap()
        .into_iter()
        .find(|s| s.id == sale.id)
        .unwrap();
    assert_eq!(stored.recipe_id, None);
    assert_eq!(stored.recipe_name, recipe.name);
    assert_eq!(stored.total_revenue, dec("22.50"));
    assert_eq!(stored.total_cost, dec("15.00"));
    assert_eq!(stored.total_profit, dec("7.50"));
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_range_queries_include_both_ends() {
    let pool = pool().await;
    let chocolate = ingredient(&pool, "Cocoa", "10").await;
    let recipe = brigadeiro(&pool, &chocolate).await;
    let march = DateRange::new(date("2024-03-01"), date("2024-03-31")).unwrap();

    let before = sell(&pool, &recipe, "2024-02-29", "1").await;
    let first = sell(&pool, &recipe, "2024-03-01", "1").await;
    let last = sell(&pool, &recipe, "2024-03-31", "1").await;
    let after = sell(&pool, &recipe, "2024-04-01", "1").await;

    let in_march: Vec<_> = SaleRepository::new(&pool)
        .list_in_range(march)
        .await
        .unwrap()
        .into_iter()
        .map(|sale| sale.id)
        .collect();
    assert!(in_march.contains(&first.id));
    assert!(in_march.contains(&last.id));
    assert!(!in_march.contains(&before.id));
    assert!(!in_march.contains(&after.id));

    let costs = OperationalCostRepository::new(&pool);
    let mut ids = Vec::new();
    for day in ["2024-02-29", "2024-03-01", "2024-03-31", "2024-04-01"] {
        let cost = costs
            .create(&NewOperationalCost {
                name: unique("Rent"),
                cost: dec("100"),
                date_incurred: date(day),
            })
            .await
            .unwrap();
        ids.push(cost.id);
    }

    let in_march: Vec<_> = costs
        .list_in_range(march)
        .await
        .unwrap()
        .into_iter()
        .map(|cost| cost.id)
        .collect();
    assert_eq!(
        ids.iter().map(|id| in_march.contains(id)).collect::<Vec<_>>(),
        [false, true, true, false]
    );
}
