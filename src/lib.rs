//! Mock Endpoint Server
//!
//! A small HTTP server that serves canned responses from a declarative route
//! table. Built for exercising clients against fixed server behaviors:
//! rate-limit replies, delayed responses, request-body echo.
//!
//! # Features
//!
//! - **Exact Routing**: deterministic (method, path) lookup, one route per pair
//! - **Canned Responses**: fixed status code and JSON body per route
//! - **Delay Simulation**: per-request fixed delay that never blocks other traffic
//! - **Body Echo**: return the client-submitted JSON back under `sentBody`
//! - **Default Response**: configurable reply for unmatched requests (404 otherwise)
//!
//! # Example Configuration
//!
//! ```yaml
//! port: 8080
//! routes:
//!   - method: GET
//!     path: /api/ping
//!     status: 422
//!     body:
//!       message: "pong"
//!   - method: GET
//!     path: /api/wait-room
//!     status: 200
//!     delay_seconds: 25
//!     body:
//!       message: "You have entered app successfully"
//! ```

pub mod config;
pub mod server;
pub mod table;

pub use config::MockConfig;
pub use server::MockServer;
