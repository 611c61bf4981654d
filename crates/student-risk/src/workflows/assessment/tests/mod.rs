mod common;
mod fallback;
mod service;
