pub mod feed;
pub mod matchmaking;
pub mod quota;
