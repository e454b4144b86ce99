// Command processing - the boundary between a completed command and the browser

mod service;

pub use service::{
    CommandOutcome, CommandService, ServiceError, ERROR_NOTIFICATION, NOTIFICATION_TITLE,
};
