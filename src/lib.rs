// ImageView Proxy Library
// Edge image proxy serving originals and imageView2 renditions from object storage

pub mod config;
pub mod constants;
pub mod error;
pub mod image_optimizer;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod proxy;
pub mod server;
pub mod storage;
