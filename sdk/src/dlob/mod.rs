pub mod book_builder;
pub mod codec;
pub mod dlob;
pub mod dlob_node;
pub mod dlob_subscriber;
pub mod fallback;
pub mod market;
pub mod market_provider;
pub mod order_book_levels;
pub mod order_list;
pub mod top_makers;
pub mod types;
pub mod vamm;

pub use book_builder::BookBuilder;
pub use dlob::DLOB;
pub use dlob_subscriber::DLOBSubscriber;
pub use market::MarketAccount;
pub use market_provider::MarketAccountMap;
pub use types::{DLOBSubscriptionConfig, DlobSource, MarketProvider};
