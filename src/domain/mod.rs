// Domain layer: cart models, notifications and ports (interfaces) to the
// stock service, storage and notification sink.

pub mod model;
pub mod notification;
pub mod ports;
