//! API-facing facade (transport DTOs and route constants).

pub mod routes;
pub mod types;
