pub mod analysis;
pub mod extract;
pub mod logging;
pub mod normalize;
pub mod skills;
pub mod vector;
pub mod web;

pub const TARGET_ANALYSIS: &str = "analysis";
pub const TARGET_WEB_REQUEST: &str = "web_request";
