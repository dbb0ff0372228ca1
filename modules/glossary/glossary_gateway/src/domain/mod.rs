pub mod service;

pub use service::{FeedItem, HealthReport, SERVICE_NAME, Service, ServiceConfig};
