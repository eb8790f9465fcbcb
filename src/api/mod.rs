//! HTTP 接口的请求、响应与错误类型

pub mod error;
pub mod request;
pub mod response;

pub use error::{MedlingoError, Result};
