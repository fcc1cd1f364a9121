// cogs-layout: Gear chain layout builder for the cogs gear-chain engine.

pub mod builder;
pub mod collision;

pub use builder::{build_layout, ChainLayout, LayoutParams, MAX_FALLBACK_RETRIES, MAX_REFINE_ITERS};
pub use collision::{min_facing_tip_distance, safety_margin, tips_collide, SAFETY_FACTOR};
