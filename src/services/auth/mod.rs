pub mod bearer;
pub mod chain;
pub mod claims;
pub mod credential;
pub mod decision;
pub mod factory;
pub mod gateway;
pub mod identity;
pub mod propagate;
pub mod routes;
pub mod session;

pub use factory::build_gateway;
pub use gateway::AuthGateway;
