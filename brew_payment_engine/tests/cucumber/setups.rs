use brew_payment_engine::ReconciliationPolicy;
use cucumber::given;

use crate::cucumber::{cafe_world::OrderSystem, CafeWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut CafeWorld) {
    let system = OrderSystem::new(ReconciliationPolicy::Monotonic).await;
    world.system = Some(system);
}

#[given("a fresh install with the last-write-wins policy")]
async fn fresh_database_lww(world: &mut CafeWorld) {
    let system = OrderSystem::new(ReconciliationPolicy::LastWriteWins).await;
    world.system = Some(system);
}
