pub mod api;
pub mod builder;
pub mod editor;
pub mod run;
pub mod run_sse;
