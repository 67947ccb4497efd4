mod cors_middleware;

pub use cors_middleware::cors;
