// Constants module - centralized default values for configuration
//
// This module defines the literal values of the imageView2 wire contract
// and the defaults used when the configuration file leaves a field out.

// =============================================================================
// Response contract
// =============================================================================

/// Cache directive attached to every successful response
pub const CACHE_CONTROL_VALUE: &str = "public, max-age=31536000";

/// Content-Type used when neither stored metadata nor a requested format exists
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Content-Type of the short literal error bodies
pub const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =============================================================================
// imageView2 mini-language
// =============================================================================

/// Query key prefix that marks a transform request
pub const SPEC_KEY_PREFIX: &str = "imageView2";

/// Prefix stripped from the extracted spec string before parsing
pub const SPEC_STRIP_PREFIX: &str = "imageView2/";

/// Token delimiter of the spec string
pub const SPEC_DELIMITER: char = '/';

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

// =============================================================================
// Storage defaults
// =============================================================================

/// Default S3 region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default S3 operation timeout in seconds
pub const DEFAULT_S3_TIMEOUT_SECS: u64 = 20;

// =============================================================================
// Transform defaults
// =============================================================================

/// Encoder quality used when the request does not carry `q`
pub const DEFAULT_QUALITY: u8 = 80;

/// Largest original the built-in transformer will decode (50 MB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 50 * 1024 * 1024;

/// Largest width or height the built-in transformer will produce
pub const MAX_OUTPUT_DIMENSION: u32 = 16384;

/// Largest pixel count the built-in transformer will produce (100 megapixels)
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Largest source width or height the built-in transformer will decode
pub const MAX_SOURCE_DIMENSION: u32 = 16384;

/// Largest source pixel count the built-in transformer will decode (100 megapixels)
pub const MAX_SOURCE_PIXELS: u64 = 100_000_000;
