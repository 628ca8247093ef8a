pub mod form;
pub mod sse;
