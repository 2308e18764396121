pub mod admin;
pub mod broker;
pub mod education;
pub mod ipo;
pub mod lead;
pub mod site_content;

pub use admin::{Admin, AdminSummary};
pub use broker::Broker;
pub use education::{EducationArticle, EducationCategory, EducationSubcategory};
pub use ipo::{IngestReport, IpoListing};
pub use lead::{Lead, LeadStatus};
pub use site_content::SiteContent;
