pub mod chittorgarh;
pub mod html;
pub mod investorgain;
pub mod ipo_source;
pub mod renaissance;
