//! LayerEdge node keeper: keeps every configured wallet's light node
//! claimed, restarted and accounted for, one hourly sweep at a time.

pub mod api;
pub mod config;
pub mod identity;
pub mod lifecycle;
pub mod sweep;
