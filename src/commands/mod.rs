pub mod config;
pub mod export;
pub mod lists;
pub mod price;
pub mod visible;
pub mod watch;
