//! Scenario tests driving a whole `PhysicsWorld` through ticks
