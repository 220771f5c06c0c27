//! Screen flow — the loading guard and the flow controller.

pub mod controller;
pub mod guard;
