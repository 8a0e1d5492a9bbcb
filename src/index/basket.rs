//! Local Survival Budget (LSB)

/// Meals per day in the basket
pub const MEALS_PER_DAY: f64 = 3.0;

/// Drinks per day in the basket
pub const DRINKS_PER_DAY: f64 = 2.0;

/// Nights of lodging per day in the basket
pub const NIGHTS_PER_DAY: f64 = 1.0;

/// Daily survival cost: `3 * meal + 2 * drink + 1 * accommodation`.
///
/// All three costs must already be in the same local currency. A negative or
/// non-finite cost invalidates the whole basket and yields `0.0`.
pub fn calculate_lsb(meal_cost: f64, drink_cost: f64, accommodation_cost: f64) -> f64 {
    let costs = [meal_cost, drink_cost, accommodation_cost];
    if costs.iter().any(|c| *c < 0.0 || !c.is_finite()) {
        return 0.0;
    }

    MEALS_PER_DAY * meal_cost + DRINKS_PER_DAY * drink_cost + NIGHTS_PER_DAY * accommodation_cost
}
