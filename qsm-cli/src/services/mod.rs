// Business logic services layer
//
// Reusable logic kept apart from the CLI so it can be driven from tests or
// other front ends.

pub mod mapping;
